//! Property-based tests for the decoder's core guarantees
//!
//! Generated tables are encoded with the crate's writer and decoded again;
//! arbitrary text is checked for determinism and for never failing outside
//! header validation.

use lenient_csv::{parse, to_string, Header, Record};
use proptest::prelude::*;

/// Field text drawn from the characters that exercise quoting.
fn field() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just('a'),
            Just('Z'),
            Just('7'),
            Just('é'),
            Just(','),
            Just('"'),
            Just(' '),
            Just('\t'),
            Just('\n'),
            Just('\r'),
            Just('#'),
        ],
        0..8,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// A header of 2..6 names plus rows of exactly that width.
///
/// Names may be blank or look like placeholders (`H1`, ...), so blank
/// columns can collide with real ones. The last name is never blank, since
/// trailing blank names are dropped when a header line is read.
fn table() -> impl Strategy<Value = (Header, Vec<Vec<String>>)> {
    (2usize..6).prop_flat_map(|width| {
        let names = prop::collection::vec(0u8..3, width).prop_map(move |kinds| {
            kinds
                .into_iter()
                .enumerate()
                .map(|(i, kind)| match kind {
                    _ if i + 1 == width => format!("col{}", i),
                    0 => String::new(),
                    1 => format!("H{}", i),
                    _ => format!("col{}", i),
                })
                .collect::<Header>()
        });
        let rows = prop::collection::vec(prop::collection::vec(field(), width), 0..6);
        (names, rows)
    })
}

fn decode(text: &str) -> Vec<Record> {
    parse(text, None).collect::<Result<_, _>>().unwrap()
}

proptest! {
    #[test]
    fn prop_roundtrip((header, rows) in table()) {
        let records: Vec<Record> = rows
            .iter()
            .map(|row| Record::build(&header, row.clone(), "H"))
            .collect();

        let text = to_string(&header, &records).unwrap();
        let decoded = decode(&text);
        prop_assert_eq!(decoded, records);
    }

    #[test]
    fn prop_parse_is_idempotent(text in "[a-c,\" \t\r\n#]{0,40}") {
        let first: Vec<_> = parse(&text, None).collect();
        let second: Vec<_> = parse(&text, None).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_only_header_validation_fails(body in "[a-c,\" \t\r\n]{0,40}") {
        // A fixed, valid header means nothing in the body can raise an error.
        let text = format!("h1,h2,h3\n{}", body);
        for record in parse(&text, None) {
            prop_assert!(record.is_ok());
        }
    }

    #[test]
    fn prop_record_count_matches_non_blank_lines(
        lines in prop::collection::vec("[a-z]{0,3}(,[a-z]{0,3}){0,2}", 0..10)
    ) {
        let text = format!("a,b,c\n{}\n", lines.join("\n"));
        let expected = lines.iter().filter(|line| !line.is_empty()).count();
        prop_assert_eq!(decode(&text).len(), expected);
    }
}
