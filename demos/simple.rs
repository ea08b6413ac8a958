//! Decoding CSV text into records.
//!
//! Run with: cargo run --example simple

use lenient_csv::{parse, Header};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let text = "#TYPE Contact\n\
name,email,phone\n\
\"Lovelace, Ada\",ada@example.com,555-0100\n\
\n\
Grace Hopper,grace@example.com\n";

    let mut records = parse(text, None);
    println!("Header: {:?}", records.header()?.names());
    println!("Type hint: {:?}", records.type_hint());

    for record in records {
        let record = record?;
        println!("{}", serde_json::to_string(&record)?);
    }

    // Data without a header line
    let header = Header::from(vec!["x", "y"]);
    for record in parse("1,2\n3,4\n", Some(header)) {
        let record = record?;
        println!("x={:?} y={:?}", record.get("x"), record.get("y"));
    }

    Ok(())
}
