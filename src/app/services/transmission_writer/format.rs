//! Fixed-width record formatting for HHT transmissions
//!
//! Every field has an exact width. Values longer than their column are
//! rejected with a field width error; nothing is ever truncated. The whole
//! document is rendered in memory before any file is touched, so a width
//! violation never leaves a partial transmission behind.

use chrono::NaiveDate;

use crate::app::models::{ParsedBatch, TransmissionContext};
use crate::constants::{TRANSMISSION_DATE_FORMAT, field_widths, record_codes};
use crate::{Error, Result};

/// A transmission document rendered in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Newline-terminated records
    pub content: String,

    /// Inventory groups in the document
    pub groups: usize,

    /// Stock lines in the document
    pub stock_lines: usize,
}

/// Render one complete document (header, groups, trailer) for the given batches
///
/// Groups are emitted per batch, in batch order, then in inventory insertion
/// order; each group carries its own batch's transaction date while the
/// header carries `transmission_date`.
pub fn render_document(
    batches: &[ParsedBatch],
    context: &TransmissionContext,
    transmission_date: NaiveDate,
) -> Result<RenderedDocument> {
    let mut content = String::new();
    let mut groups = 0usize;
    let mut stock_lines = 0usize;

    let date = transmission_date.format(TRANSMISSION_DATE_FORMAT).to_string();
    push_record(&mut content, document_header(&date, &context.user_code)?);

    for batch in batches {
        let (batch_groups, batch_lines) = push_groups(&mut content, batch, context)?;
        groups += batch_groups;
        stock_lines += batch_lines;
    }

    push_record(&mut content, document_trailer(groups, stock_lines)?);

    Ok(RenderedDocument {
        content,
        groups,
        stock_lines,
    })
}

/// Check that every field of `batch` fits its column
///
/// Renders the batch's groups into a scratch buffer exactly as
/// [`render_document`] would.
pub fn validate_batch(batch: &ParsedBatch, context: &TransmissionContext) -> Result<()> {
    let mut scratch = String::new();
    push_groups(&mut scratch, batch, context)?;
    Ok(())
}

/// Render the groups of one batch, returning (groups, stock lines)
fn push_groups(
    content: &mut String,
    batch: &ParsedBatch,
    context: &TransmissionContext,
) -> Result<(usize, usize)> {
    let mut stock_lines = 0usize;

    for (inventory, stock) in &batch.records {
        push_record(
            content,
            group_header(inventory, &batch.transaction_date, context)?,
        );
        for (stock_number, quantity) in stock {
            push_record(content, stock_line(stock_number, quantity)?);
        }
        push_record(content, group_trailer(stock.len())?);
        stock_lines += stock.len();
    }

    Ok((batch.records.len(), stock_lines))
}

fn push_record(content: &mut String, record: String) {
    content.push_str(&record);
    content.push('\n');
}

/// `001` document header
pub fn document_header(transmission_date: &str, user_code: &str) -> Result<String> {
    Ok(format!(
        "{} {}{}",
        record_codes::DOCUMENT_HEADER,
        exact_width("transmission date", transmission_date, field_widths::DATE)?,
        left_justify("user code", user_code, field_widths::HEADER_USER_CODE)?
    ))
}

/// `050` inventory group header
pub fn group_header(
    inventory: &str,
    transaction_date: &str,
    context: &TransmissionContext,
) -> Result<String> {
    Ok(format!(
        "{} {}{}{}{}",
        record_codes::GROUP_HEADER,
        left_justify("inventory code", inventory, field_widths::INVENTORY_CODE)?,
        exact_width("transaction date", transaction_date, field_widths::DATE)?,
        left_justify(
            "department code",
            &context.department_code,
            field_widths::DEPARTMENT_CODE
        )?,
        left_justify(
            "user code",
            &context.user_code,
            field_widths::GROUP_USER_CODE
        )?
    ))
}

/// `051` stock line
pub fn stock_line(stock_number: &str, quantity: &str) -> Result<String> {
    Ok(format!(
        "{} {}{}{}",
        record_codes::STOCK_LINE,
        left_justify("stock number", stock_number, field_widths::STOCK_NUMBER)?,
        zero_pad("quantity", quantity, field_widths::QUANTITY)?,
        " ".repeat(field_widths::STOCK_LINE_FILLER)
    ))
}

/// `990` inventory group trailer
pub fn group_trailer(stock_lines: usize) -> Result<String> {
    Ok(format!(
        "{} {}",
        record_codes::GROUP_TRAILER,
        zero_pad("group stock line count", &stock_lines.to_string(), field_widths::COUNT)?
    ))
}

/// `999` document trailer
pub fn document_trailer(groups: usize, stock_lines: usize) -> Result<String> {
    Ok(format!(
        "{} {}{}",
        record_codes::DOCUMENT_TRAILER,
        zero_pad("total group count", &groups.to_string(), field_widths::COUNT)?,
        zero_pad(
            "total stock line count",
            &stock_lines.to_string(),
            field_widths::COUNT
        )?
    ))
}

fn check_width(field: &'static str, value: &str, width: usize) -> Result<()> {
    if value.chars().count() > width {
        return Err(Error::field_width(field, value, width));
    }
    Ok(())
}

/// Pad on the right with spaces to exactly `width` characters
fn left_justify(field: &'static str, value: &str, width: usize) -> Result<String> {
    check_width(field, value, width)?;
    Ok(format!("{:<width$}", value, width = width))
}

/// Pad on the left with zeros to exactly `width` characters
///
/// The value is treated as an opaque string; it is not re-validated as a number.
fn zero_pad(field: &'static str, value: &str, width: usize) -> Result<String> {
    check_width(field, value, width)?;
    Ok(format!("{:0>width$}", value, width = width))
}

/// Require exactly `width` characters
fn exact_width(field: &'static str, value: &str, width: usize) -> Result<String> {
    check_width(field, value, width)?;
    if value.chars().count() != width {
        return Err(Error::field_width(field, value, width));
    }
    Ok(value.to_string())
}
