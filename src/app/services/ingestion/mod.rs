//! Batch ingestion pipeline
//!
//! Orchestrates readiness gate → batch parser → archival move → transmission
//! writer for the two entry points of the service:
//!
//! - **Startup reconciliation** catches up on every batch file already waiting
//!   in the download directory and rebuilds the transmission file from them.
//! - **Live ingestion** handles one newly created batch file and appends a
//!   single document to the transmission file.
//!
//! # Module Organization
//!
//! - [`discovery`] - Batch file filter and download directory listing
//! - [`archive`] - Exactly-once move into the processed directory
//! - [`pipeline`] - The orchestrating pipeline and its write lock
//! - [`stats`] - Per-file outcomes and run statistics

pub mod archive;
pub mod discovery;
pub mod pipeline;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use archive::relocate;
pub use discovery::{BatchFileFilter, discover_batch_files};
pub use pipeline::{BatchIngestionPipeline, PipelinePaths};
pub use stats::{FailedFile, FileOutcome, IngestionStats};
