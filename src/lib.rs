//! SupplySync Library
//!
//! Converts ARRAY supply usage batch downloads into MEDITECH Materials
//! Management handheld terminal (HHT) transmission files.
//!
//! This library provides tools for:
//! - Confirming a batch file is completely written before reading it
//! - Parsing batch records and the trailer transaction date
//! - Writing the fixed-width HHT transmission format with exact widths and counts
//! - Archiving processed batch files exactly once
//! - Startup reconciliation and live ingestion driven by directory notifications

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod batch_parser;
        pub mod ingestion;
        pub mod readiness_gate;
        pub mod transmission_writer;
    }
    pub mod adapters {
        pub mod directory_watch;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{FileStage, InventoryRecords, ParsedBatch, TransmissionContext, WriteMode};
pub use config::Config;

use std::path::{Path, PathBuf};

/// Result type alias for SupplySync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for batch ingestion and transmission writing
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The sentinel line never appeared within the retry window
    #[error("Batch file '{}' not ready after {attempts} attempts", .path.display())]
    ReadinessTimeout { path: PathBuf, attempts: u32 },

    /// A data line lacks the minimum field count
    #[error("Malformed record in '{}' at line {line}: {message}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The date-bearing trailer line is absent or unparsable
    #[error("Missing or malformed trailer in '{}': {message}", .path.display())]
    MissingOrMalformedTrailer { path: PathBuf, message: String },

    /// Moving a parsed batch file into the processed directory failed
    #[error("Failed to move '{}' to '{}'", .from.display(), .to.display())]
    Relocation {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The transmission file could not be created, opened or appended
    #[error("Failed to write transmission file '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value does not fit its fixed-width column
    #[error("Value '{value}' for {field} exceeds field width {width}")]
    FieldWidth {
        field: &'static str,
        value: String,
        width: usize,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Directory notification error
    #[error("Directory watch error: {message}")]
    Watch {
        message: String,
        #[source]
        source: notify::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a readiness timeout error
    pub fn readiness_timeout(path: impl AsRef<Path>, attempts: u32) -> Self {
        Self::ReadinessTimeout {
            path: path.as_ref().to_path_buf(),
            attempts,
        }
    }

    /// Create a malformed record error
    pub fn malformed_record(
        path: impl AsRef<Path>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            path: path.as_ref().to_path_buf(),
            line,
            message: message.into(),
        }
    }

    /// Create a missing or malformed trailer error
    pub fn malformed_trailer(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::MissingOrMalformedTrailer {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a relocation error
    pub fn relocation(
        from: impl AsRef<Path>,
        to: impl AsRef<Path>,
        source: std::io::Error,
    ) -> Self {
        Self::Relocation {
            from: from.as_ref().to_path_buf(),
            to: to.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a transmission write error
    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a field width error
    pub fn field_width(field: &'static str, value: impl Into<String>, width: usize) -> Self {
        Self::FieldWidth {
            field,
            value: value.into(),
            width,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a directory watch error
    pub fn watch(message: impl Into<String>, source: notify::Error) -> Self {
        Self::Watch {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Error message followed by every underlying cause
    pub fn full_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }

    /// Pipeline stage at which this error terminates a file, if it is file-scoped
    pub fn stage(&self) -> Option<FileStage> {
        match self {
            Self::ReadinessTimeout { .. } => Some(FileStage::TimedOut),
            Self::MalformedRecord { .. }
            | Self::MissingOrMalformedTrailer { .. }
            | Self::FieldWidth { .. } => Some(FileStage::ParseFailed),
            Self::Relocation { .. } => Some(FileStage::RelocationFailed),
            Self::Write { .. } => Some(FileStage::WriteFailed),
            _ => None,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<notify::Error> for Error {
    fn from(error: notify::Error) -> Self {
        Self::Watch {
            message: "Notification backend failed".to_string(),
            source: error,
        }
    }
}
