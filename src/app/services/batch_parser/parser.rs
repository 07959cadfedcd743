//! Core batch file parser
//!
//! Reads data lines up to the sentinel into an ordered inventory map, then
//! hands the single line after the sentinel to the trailer parser. Lines are
//! split on raw bytes; a data line that is not UTF-8 is a malformed record.
//! The parser never relocates the file; that is the pipeline's decision.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use super::trailer::parse_trailer_date;
use crate::app::models::{InventoryRecords, ParsedBatch};
use crate::constants::{END_OF_FILE_SENTINEL, MIN_RECORD_FIELDS, RECORD_FIELD_SEPARATOR};
use crate::{Error, Result};

/// Parser for ARRAY batch files
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchParser;

impl BatchParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a batch file from disk
    ///
    /// The caller is expected to have confirmed readiness first; on an
    /// incomplete file this fails with a trailer error.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedBatch> {
        debug!("Parsing batch file: {}", path.display());

        let file = File::open(path).map_err(|e| {
            Error::io(format!("Failed to open batch file {}", path.display()), e)
        })?;

        self.parse_reader(path, BufReader::new(file))
    }

    /// Parse batch content from any buffered reader
    ///
    /// `path` is recorded as the batch source and used in error context.
    pub fn parse_reader<R: BufRead>(&self, path: &Path, reader: R) -> Result<ParsedBatch> {
        let mut records = InventoryRecords::new();
        let mut lines = reader.split(b'\n').enumerate();

        while let Some((index, line)) = lines.next() {
            let line = line.map_err(|e| {
                Error::io(
                    format!("Failed to read line {} of {}", index + 1, path.display()),
                    e,
                )
            })?;
            let line = String::from_utf8(line).map_err(|e| {
                Error::malformed_record(
                    path,
                    index + 1,
                    format!("line is not valid UTF-8: {}", e.utf8_error()),
                )
            })?;

            let fields: Vec<&str> = line.trim().split(RECORD_FIELD_SEPARATOR).collect();

            if fields[0] == END_OF_FILE_SENTINEL {
                let trailer = match lines.next() {
                    Some((_, Ok(trailer))) => String::from_utf8_lossy(&trailer).into_owned(),
                    Some((trailer_index, Err(e))) => {
                        return Err(Error::io(
                            format!(
                                "Failed to read trailer line {} of {}",
                                trailer_index + 1,
                                path.display()
                            ),
                            e,
                        ));
                    }
                    None => {
                        return Err(Error::malformed_trailer(
                            path,
                            "no trailer line after END OF FILE",
                        ));
                    }
                };

                let transaction_date = parse_trailer_date(path, &trailer)?;
                debug!(
                    "Sentinel at line index {} in {}, trailer date {}",
                    index,
                    path.display(),
                    transaction_date
                );

                return Ok(ParsedBatch::new(path, records, index, transaction_date));
            }

            if fields.len() < MIN_RECORD_FIELDS {
                return Err(Error::malformed_record(
                    path,
                    index + 1,
                    format!(
                        "expected at least {} comma-separated fields, found {}",
                        MIN_RECORD_FIELDS,
                        fields.len()
                    ),
                ));
            }

            records
                .entry(fields[0].to_string())
                .or_default()
                .insert(fields[1].to_string(), fields[2].to_string());
        }

        Err(Error::malformed_trailer(
            path,
            "END OF FILE sentinel not found",
        ))
    }
}
