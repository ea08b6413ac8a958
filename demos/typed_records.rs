//! Converting records into Rust structs with serde.
//!
//! Run with: cargo run --example typed_records

use lenient_csv::{from_str, to_string, Header, Record};
use serde::Deserialize;
use std::error::Error;

#[derive(Debug, Deserialize)]
struct Order {
    id: u32,
    customer: String,
    total: f64,
    shipped: bool,
    note: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let text = "id,customer,total,shipped,note\n\
1,Alice,19.99,true,\n\
2,Bob,5.00,FALSE,\"leave at \"\"back\"\" door\"\n";

    let orders: Vec<Order> = from_str(text)?;
    for order in &orders {
        println!("{:?}", order);
    }

    let total: f64 = orders.iter().map(|order| order.total).sum();
    println!("Total: {:.2}", total);

    // Re-encode a derived table
    let header = Header::from(vec!["customer", "shipped"]);
    let summary: Vec<Record> = orders
        .iter()
        .map(|order| {
            let row = vec![order.customer.clone(), order.shipped.to_string()];
            Record::build(&header, row, "H")
        })
        .collect();
    print!("{}", to_string(&header, &summary)?);

    Ok(())
}
