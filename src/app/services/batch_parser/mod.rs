//! Parser for ARRAY supply usage batch files
//!
//! A batch file is a sequence of comma-separated data lines
//! (`inventory,stock_number,quantity[,...]`), the `END OF FILE` sentinel, and
//! a space-delimited trailer line carrying the transaction date:
//!
//! ```text
//! A,1,10
//! A,2,20
//! B,1,5
//! END OF FILE
//! OR+ SUPPLIES DOWNLOADED 01/16/23 AT 1011 ARRAY BATCH# 4607
//! ```
//!
//! ## Architecture
//!
//! - [`parser`] - Line-by-line record extraction into an ordered batch
//! - [`trailer`] - Transaction date extraction from the trailer line
//!
//! ## Usage
//!
//! ```rust,no_run
//! use supply_sync::app::services::batch_parser::BatchParser;
//!
//! # fn example() -> supply_sync::Result<()> {
//! let batch = BatchParser::new().parse_file(std::path::Path::new("BATCH/4607.txt"))?;
//! println!(
//!     "{} inventory groups dated {}",
//!     batch.group_count(),
//!     batch.transaction_date
//! );
//! # Ok(())
//! # }
//! ```

pub mod parser;
pub mod trailer;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::BatchParser;
pub use trailer::parse_trailer_date;
