//! Ingestion outcomes and run statistics

use std::path::{Path, PathBuf};

use crate::Error;
use crate::app::models::{FileStage, WriteSummary};

/// Result of live ingestion of a single file
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was gone by the time it was handled; nothing happened
    Skipped,
    /// The batch was archived and appended to the transmission file
    Ingested(WriteSummary),
    /// The file stopped at a terminal failure stage
    Failed { stage: FileStage, error: Error },
}

impl FileOutcome {
    pub fn is_ingested(&self) -> bool {
        matches!(self, FileOutcome::Ingested(_))
    }

    /// Terminal stage reached by the file, if it entered the pipeline
    pub fn stage(&self) -> Option<FileStage> {
        match self {
            FileOutcome::Skipped => None,
            FileOutcome::Ingested(_) => Some(FileStage::Written),
            FileOutcome::Failed { stage, .. } => Some(*stage),
        }
    }
}

/// A batch file that failed during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub path: PathBuf,
    pub stage: FileStage,
    pub message: String,
}

/// Statistics for a reconciliation pass or a live ingestion session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionStats {
    /// Batch files that entered the pipeline
    pub files_discovered: usize,
    /// Batch files archived and written to the transmission file
    pub files_ingested: usize,
    /// Notifications for files that were already gone
    pub files_skipped: usize,
    /// Inventory groups written
    pub groups_written: usize,
    /// Stock lines written
    pub stock_lines_written: usize,
    /// Files that reached a failure stage
    pub failures: Vec<FailedFile>,
}

impl IngestionStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files that failed
    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether every discovered file was ingested
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Record one transmission write covering `files` batch files
    pub fn record_write(&mut self, summary: &WriteSummary, files: usize) {
        self.files_ingested += files;
        self.groups_written += summary.groups;
        self.stock_lines_written += summary.stock_lines;
    }

    /// Record a file that stopped at `stage`
    pub fn record_failure(&mut self, path: &Path, stage: FileStage, error: &Error) {
        self.failures.push(FailedFile {
            path: path.to_path_buf(),
            stage,
            message: error.full_message(),
        });
    }

    /// Fold one live ingestion outcome into the statistics
    pub fn record_outcome(&mut self, path: &Path, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Skipped => self.files_skipped += 1,
            FileOutcome::Ingested(summary) => {
                self.files_discovered += 1;
                self.record_write(summary, 1);
            }
            FileOutcome::Failed { stage, error } => {
                self.files_discovered += 1;
                self.record_failure(path, *stage, error);
            }
        }
    }
}
