//! Decoded records.
//!
//! A [`Record`] maps header names to field values in header order. Values
//! are `None` when the row had fewer fields than the header.
//!
//! ## Why IndexMap?
//!
//! Field order must follow the header so that iteration, serialization and
//! re-encoding are deterministic. [`IndexMap`] keeps insertion order and
//! replaces values in place when a key repeats.
//!
//! ## Examples
//!
//! ```rust
//! use lenient_csv::parse;
//!
//! let record = parse("a,b,c\n1,2\n", None).next().unwrap().unwrap();
//! assert_eq!(record.get("a"), Some("1"));
//! assert_eq!(record.get("c"), None);
//! assert!(record.contains_key("c"));
//! ```

use crate::error::Result;
use crate::header::Header;
use crate::tokenizer::RawRow;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Prefix for names synthesized in place of blank header entries.
pub const DEFAULT_PLACEHOLDER_PREFIX: &str = "H";

/// The record key for each header position, with blank names replaced by
/// `{prefix}1`, `{prefix}2`, ...
pub(crate) fn field_keys<'h>(
    header: &'h Header,
    prefix: &'h str,
) -> impl Iterator<Item = String> + 'h {
    let mut placeholder = 0usize;
    header.iter().map(move |name| {
        if name.is_empty() {
            placeholder += 1;
            format!("{}{}", prefix, placeholder)
        } else {
            name.clone()
        }
    })
}

/// One decoded CSV row: an ordered map from field name to optional value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record(IndexMap<String, Option<String>>);

impl Record {
    /// Creates an empty `Record`.
    #[must_use]
    pub fn new() -> Self {
        Record(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Record(IndexMap::with_capacity(capacity))
    }

    /// Pairs header names with one row's values.
    ///
    /// Blank header names become `{prefix}1`, `{prefix}2`, ... counting only
    /// blank slots. Positions past the end of `row` get `None`; extra row
    /// values are ignored. If a synthesized name equals a real header name
    /// the later position overwrites the earlier value in place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lenient_csv::{Header, Record};
    ///
    /// let header = Header::from(vec!["id", "", ""]);
    /// let record = Record::build(&header, vec!["7".into(), "x".into()], "H");
    /// let keys: Vec<_> = record.keys().map(String::as_str).collect();
    /// assert_eq!(keys, ["id", "H1", "H2"]);
    /// assert_eq!(record.get("H1"), Some("x"));
    /// assert_eq!(record.get("H2"), None);
    /// ```
    #[must_use]
    pub fn build(header: &Header, row: RawRow, prefix: &str) -> Self {
        let mut record = Record::with_capacity(header.len());
        let mut values = row.into_iter();

        for key in field_keys(header, prefix) {
            record.insert(key, values.next());
        }

        record
    }

    /// Inserts a field, returning the previous value if the key was present.
    ///
    /// A repeated key keeps its original position.
    pub fn insert(&mut self, key: String, value: Option<String>) -> Option<Option<String>> {
        self.0.insert(key, value)
    }

    /// Returns the value of a field, or `None` if the field is absent or has
    /// no value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.as_deref())
    }

    /// Returns the raw entry of a field, distinguishing "no such field"
    /// (`None`) from "field without value" (`Some(None)`).
    #[must_use]
    pub fn get_field(&self, key: &str) -> Option<Option<&str>> {
        self.0.get(key).map(|value| value.as_deref())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the field names, in header order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Option<String>> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in header order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Option<String>> {
        self.0.values()
    }

    /// Returns an iterator over the fields, in header order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Option<String>> {
        self.0.iter()
    }

    /// Converts this record into a `T`.
    ///
    /// # Errors
    ///
    /// See [`from_record`](crate::de::from_record).
    pub fn deserialize<'a, T: Deserialize<'a>>(&'a self) -> Result<T> {
        crate::de::from_record(self)
    }
}

impl IntoIterator for Record {
    type Item = (String, Option<String>);
    type IntoIter = indexmap::map::IntoIter<String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Option<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Option<String>)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        Record(IndexMap::from_iter(iter))
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
