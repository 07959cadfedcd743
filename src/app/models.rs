//! Core data structures shared by the ingestion pipeline
//!
//! Defines the parsed batch value produced from one ARRAY batch file, the
//! interface context written into every transmission, the writer modes and
//! the per-file lifecycle stages used for logging and error reporting.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Stock number to transaction quantity, in input order
pub type StockQuantities = IndexMap<String, String>;

/// Inventory code to its stock quantities, in input order
///
/// Order is significant: transmission groups and stock lines are written in
/// the order they were first encountered in the batch file.
pub type InventoryRecords = IndexMap<String, StockQuantities>;

/// One ARRAY batch file parsed into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBatch {
    /// Batch file the records were read from
    pub source: PathBuf,

    /// Inventory code -> stock number -> quantity string
    pub records: InventoryRecords,

    /// Zero-based line index of the sentinel line (diagnostics only)
    pub line_count: usize,

    /// Transaction date from the trailer line, formatted YYYYMMDD
    pub transaction_date: String,
}

impl ParsedBatch {
    /// Create a parsed batch
    pub fn new(
        source: impl Into<PathBuf>,
        records: InventoryRecords,
        line_count: usize,
        transaction_date: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            records,
            line_count,
            transaction_date: transaction_date.into(),
        }
    }

    /// Number of inventory groups this batch contributes to a transmission
    pub fn group_count(&self) -> usize {
        self.records.len()
    }

    /// Number of stock lines this batch contributes to a transmission
    pub fn stock_line_count(&self) -> usize {
        self.records.values().map(IndexMap::len).sum()
    }

    /// File name of the source batch file
    pub fn file_name(&self) -> Option<&str> {
        self.source.file_name().and_then(|name| name.to_str())
    }

    /// Source path of the batch
    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Interface identifiers written into every transmission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmissionContext {
    /// MEDITECH interface user code
    pub user_code: String,

    /// MEDITECH department code
    pub department_code: String,
}

impl TransmissionContext {
    pub fn new(user_code: impl Into<String>, department_code: impl Into<String>) -> Self {
        Self {
            user_code: user_code.into(),
            department_code: department_code.into(),
        }
    }
}

/// How the transmission writer treats an existing destination file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the destination with a document covering exactly the given batches
    Rebuild,
    /// Add one document for the given batches after the existing content
    Append,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Rebuild => write!(f, "rebuild"),
            WriteMode::Append => write!(f, "append"),
        }
    }
}

/// Lifecycle stage of a single batch file
///
/// ```text
/// Discovered -> AwaitingReadiness -> Ready -> Parsed -> Relocated -> Written
///                      |               |          |           |
///                  TimedOut       ParseFailed  RelocationFailed  WriteFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStage {
    Discovered,
    AwaitingReadiness,
    Ready,
    Parsed,
    Relocated,
    Written,
    TimedOut,
    ParseFailed,
    RelocationFailed,
    WriteFailed,
}

impl FileStage {
    /// Whether no further transition happens for this file in the current run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FileStage::Written
                | FileStage::TimedOut
                | FileStage::ParseFailed
                | FileStage::RelocationFailed
                | FileStage::WriteFailed
        )
    }

    /// Whether the stage is a terminal failure
    pub fn is_failure(&self) -> bool {
        self.is_terminal() && *self != FileStage::Written
    }
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileStage::Discovered => "discovered",
            FileStage::AwaitingReadiness => "awaiting-readiness",
            FileStage::Ready => "ready",
            FileStage::Parsed => "parsed",
            FileStage::Relocated => "relocated",
            FileStage::Written => "written",
            FileStage::TimedOut => "timed-out",
            FileStage::ParseFailed => "parse-failed",
            FileStage::RelocationFailed => "relocation-failed",
            FileStage::WriteFailed => "write-failed",
        };
        f.write_str(name)
    }
}

/// Result of one transmission write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// Transmission file written
    pub destination: PathBuf,

    /// Mode used for the write
    pub mode: WriteMode,

    /// Inventory groups written
    pub groups: usize,

    /// Stock lines written
    pub stock_lines: usize,
}
