//! The optional `#Type` line that may precede the header.
//!
//! Any leading line starting with `#` is consumed. When it starts with
//! `#Type` (ASCII case-insensitive) the rest of the line becomes an
//! annotation such as `CSV:Foo`. The annotation is informational only; it
//! never changes how records are decoded.

use crate::source::CharSource;

const COMMENT_PREFIX: char = '#';
const TYPE_PREFIX: &str = "#type";
const ANNOTATION_PREFIX: &str = "CSV:";

/// Consumes a leading comment line and extracts its type annotation.
///
/// Does nothing unless the next character is `#`. The remainder after
/// `#Type` is trimmed, and a single `=` or `:` separator in front of the
/// name is dropped, so `#TYPE Foo`, `#Type=Foo` and `#type: Foo` all yield
/// `CSV:Foo`. An empty name yields `None`.
///
/// # Examples
///
/// ```rust
/// use lenient_csv::{skip_type_hint, CharSource, StrSource};
///
/// let mut source = StrSource::new("#Type=Person\nname\n");
/// assert_eq!(skip_type_hint(&mut source).as_deref(), Some("CSV:Person"));
/// assert_eq!(source.read_line(), "name");
/// ```
pub fn skip_type_hint<S: CharSource + ?Sized>(source: &mut S) -> Option<String> {
    if source.peek() != Some(COMMENT_PREFIX) {
        return None;
    }

    let line = source.read_line();
    let annotation = annotation_for(&line);
    match &annotation {
        Some(hint) => tracing::debug!(annotation = %hint, "skipped type-hint line"),
        None => tracing::debug!("skipped comment line"),
    }
    annotation
}

fn annotation_for(line: &str) -> Option<String> {
    let prefix = line.get(..TYPE_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(TYPE_PREFIX) {
        return None;
    }

    let rest = line[TYPE_PREFIX.len()..].trim();
    let name = rest
        .strip_prefix(&['=', ':'][..])
        .map(str::trim_start)
        .unwrap_or(rest);

    if name.is_empty() {
        None
    } else {
        Some(format!("{}{}", ANNOTATION_PREFIX, name))
    }
}
