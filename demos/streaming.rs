//! Streaming records from a reader with bounded memory.
//!
//! Run with: cargo run --example streaming

use lenient_csv::{parse_reader, Reader, ReaderSource};
use std::error::Error;
use std::io::Cursor;

fn main() -> Result<(), Box<dyn Error>> {
    let mut data = String::from("sensor,reading\n");
    for i in 0..10_000 {
        data.push_str(&format!("s{},{}\n", i % 8, i));
    }

    // Stop pulling whenever enough has been seen
    let over_limit = parse_reader(Cursor::new(data.as_bytes()), None)
        .filter_map(Result::ok)
        .filter(|record| {
            record
                .get("reading")
                .and_then(|value| value.parse::<u32>().ok())
                .is_some_and(|reading| reading > 9_990)
        })
        .count();
    println!("Readings over limit: {}", over_limit);

    // The stream stays with the caller when borrowed
    let mut cursor = Cursor::new(data.as_bytes());
    let mut reader = Reader::new(ReaderSource::from_read(&mut cursor));
    let first = reader.read_record()?;
    println!("First record: {:?}", first);

    Ok(())
}
