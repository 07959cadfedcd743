//! Unit tests for the transmission_writer module
//!
//! Record layout tests live in `format_tests`; rebuild and append file
//! handling in `writer_tests`.


use crate::app::models::{InventoryRecords, ParsedBatch, StockQuantities, TransmissionContext};
use chrono::NaiveDate;

/// Interface context used by the production deployment
pub fn create_test_context() -> TransmissionContext {
    TransmissionContext::new("ARRAY.INTM", "01.7020")
}

/// Fixed transmission date so rendered documents are reproducible
pub fn test_transmission_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 20).unwrap()
}

/// Build a parsed batch from `(inventory, stock number, quantity)` triples
pub fn create_test_batch(
    name: &str,
    transaction_date: &str,
    records: &[(&str, &str, &str)],
) -> ParsedBatch {
    let mut inventory = InventoryRecords::new();
    for (code, stock_number, quantity) in records {
        inventory
            .entry(code.to_string())
            .or_insert_with(StockQuantities::new)
            .insert(stock_number.to_string(), quantity.to_string());
    }
    ParsedBatch::new(
        format!("/data/BATCH/{}", name),
        inventory,
        records.len(),
        transaction_date,
    )
}

/// The two-group batch from the interface documentation
pub fn create_sample_batch() -> ParsedBatch {
    create_test_batch(
        "4607.txt",
        "20230116",
        &[("A", "1", "10"), ("A", "2", "20"), ("B", "1", "5")],
    )
}

/// Expected group header for the test context
pub fn expected_group_header(inventory: &str, transaction_date: &str) -> String {
    format!(
        "050 {}{}{}{}",
        pad(inventory, 10),
        transaction_date,
        pad("01.7020", 25),
        "ARRAY.INTM"
    )
}

/// Expected stock line with an already zero-padded quantity
pub fn expected_stock_line(stock_number: &str, padded_quantity: &str) -> String {
    format!("051 {}{}{}", pad(stock_number, 20), padded_quantity, " ".repeat(15))
}

fn pad(value: &str, width: usize) -> String {
    format!("{}{}", value, " ".repeat(width - value.len()))
}
