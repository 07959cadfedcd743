//! Unit tests for the ingestion module
//!
//! Each test works in its own temporary download/processed/upload tree with
//! a fast readiness gate so timeouts resolve in milliseconds.

pub mod archive_tests;
pub mod pipeline_tests;

use crate::app::models::TransmissionContext;
use crate::app::services::ingestion::{BatchIngestionPipeline, PipelinePaths};
use crate::app::services::readiness_gate::ReadinessGate;
use crate::app::services::transmission_writer::TransmissionWriter;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Trailer line as produced by ARRAY
pub const SAMPLE_TRAILER: &str = "OR+ SUPPLIES DOWNLOADED 01/16/23 AT 1011 ARRAY BATCH# 4607";

/// Create the download, processed and upload directories under a temp root
pub fn create_test_paths() -> (TempDir, PipelinePaths) {
    let temp_dir = TempDir::new().unwrap();
    let paths = PipelinePaths::new(
        temp_dir.path().join("BATCH"),
        temp_dir.path().join("PROCESSED"),
        temp_dir.path().join("HHT").join("SupplySync.hht"),
    );
    fs::create_dir_all(&paths.download_dir).unwrap();
    fs::create_dir_all(&paths.processed_dir).unwrap();
    (temp_dir, paths)
}

/// Pipeline with a gate that gives up after 3 attempts 10ms apart
pub fn create_test_pipeline(paths: &PipelinePaths) -> BatchIngestionPipeline {
    BatchIngestionPipeline::new(
        paths.clone(),
        ReadinessGate::new(3, Duration::from_millis(10)),
        TransmissionWriter::new(TransmissionContext::new("ARRAY.INTM", "01.7020")),
    )
}

/// Batch file content for the given data lines
pub fn batch_content(lines: &[&str]) -> String {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    content.push_str("END OF FILE\n");
    content.push_str(SAMPLE_TRAILER);
    content.push('\n');
    content
}

/// Write a batch file into `dir`
pub fn write_batch(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Count documents in a transmission file
pub fn count_documents(content: &str) -> usize {
    content.lines().filter(|line| line.starts_with("001 ")).count()
}
