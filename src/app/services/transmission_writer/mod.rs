//! MEDITECH HHT transmission writer
//!
//! Serializes parsed batches into the fixed-width handheld terminal
//! transmission format defined by the MEDITECH Materials Management interface:
//!
//! ```text
//! 001 YYYYMMDD<user code: 20>
//! 050 <inventory: 10>YYYYMMDD<department: 25><user code: 10>
//! 051 <stock number: 20><quantity: 10 zero-padded><15 spaces>
//! 990 <stock lines in group: 6>
//! 999 <groups: 6><stock lines: 6>
//! ```
//!
//! - [`format`] - Record layout and width enforcement
//! - [`writer`] - Rebuild and append file handling

pub mod format;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use format::{RenderedDocument, render_document, validate_batch};
pub use writer::TransmissionWriter;
