//! Test utilities for batch parser testing
//!
//! Provides sample batch content and temporary file helpers shared by the
//! parser and trailer test modules.

use std::io::Write;
use tempfile::NamedTempFile;


/// Trailer line as produced by ARRAY
pub const SAMPLE_TRAILER: &str = "OR+ SUPPLIES DOWNLOADED 01/16/23 AT 1011 ARRAY BATCH# 4607";

/// Helper to create a complete, well-formed batch
pub fn create_sample_batch() -> String {
    format!("A,1,10\nA,2,20\nB,1,5\nEND OF FILE\n{}\n", SAMPLE_TRAILER)
}

/// Helper to create a temporary batch file with given content
pub fn create_temp_batch(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file.flush().unwrap();
    temp_file
}
