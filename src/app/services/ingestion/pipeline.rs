//! Gate → parse → relocate → write orchestration
//!
//! Each file moves through the stages
//!
//! ```text
//! Discovered -> AwaitingReadiness -> Ready -> Parsed -> Relocated -> Written
//! ```
//!
//! and stops at the first failure. Field widths are checked before relocation,
//! so a batch that cannot be transmitted stays in the download directory. A
//! failing file never prevents other files from being handled, and nothing is
//! retried within a run. Every write to the
//! transmission file, rebuild or append, happens under one async lock.

use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, error, info};

use super::archive::relocate;
use super::discovery::discover_batch_files;
use super::stats::{FileOutcome, IngestionStats};
use crate::app::models::{FileStage, ParsedBatch, WriteMode, WriteSummary};
use crate::app::services::batch_parser::BatchParser;
use crate::app::services::readiness_gate::{Readiness, ReadinessGate};
use crate::app::services::transmission_writer::{TransmissionWriter, validate_batch};
use crate::config::Config;
use crate::{Error, Result};

/// A failure tagged with the stage it ended the file at
type StageResult<T> = std::result::Result<T, (FileStage, Error)>;

/// A parsed batch whose source file now lives in the processed directory
#[derive(Debug)]
struct PreparedBatch {
    batch: ParsedBatch,
    archived: PathBuf,
}

/// Directories and destination file used by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    /// Directory the inventory system drops batch files into
    pub download_dir: PathBuf,
    /// Archive for batch files that have been parsed
    pub processed_dir: PathBuf,
    /// Transmission file picked up by MEDITECH
    pub hht_file: PathBuf,
}

impl PipelinePaths {
    pub fn new(
        download_dir: impl Into<PathBuf>,
        processed_dir: impl Into<PathBuf>,
        hht_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            download_dir: download_dir.into(),
            processed_dir: processed_dir.into(),
            hht_file: hht_file.into(),
        }
    }
}

/// The batch ingestion pipeline shared by reconciliation and live ingestion
#[derive(Debug)]
pub struct BatchIngestionPipeline {
    paths: PipelinePaths,
    gate: ReadinessGate,
    parser: BatchParser,
    writer: TransmissionWriter,
    write_lock: Mutex<()>,
}

impl BatchIngestionPipeline {
    pub fn new(paths: PipelinePaths, gate: ReadinessGate, writer: TransmissionWriter) -> Self {
        Self {
            paths,
            gate,
            parser: BatchParser::new(),
            writer,
            write_lock: Mutex::new(()),
        }
    }

    /// Build the pipeline from a validated configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            PipelinePaths::new(
                &config.paths.download_dir,
                &config.paths.processed_dir,
                &config.paths.hht_file,
            ),
            config.readiness_gate(),
            TransmissionWriter::new(config.transmission_context()),
        )
    }

    pub fn paths(&self) -> &PipelinePaths {
        &self.paths
    }

    pub fn gate(&self) -> &ReadinessGate {
        &self.gate
    }

    /// Catch up on every batch file waiting in the download directory
    ///
    /// All batches that make it through gate, parse and relocation are written
    /// in a single rebuild. When none do, the transmission file is left as it
    /// is. Only a failure to list the download directory is returned as an
    /// error; per-file failures are logged and counted.
    pub async fn reconcile_startup(&self) -> Result<IngestionStats> {
        info!(
            "Reconciling batch files in {}",
            self.paths.download_dir.display()
        );

        let files = discover_batch_files(&self.paths.download_dir)?;
        let mut stats = IngestionStats::new();
        stats.files_discovered = files.len();

        let mut batches = Vec::with_capacity(files.len());
        let mut archived = Vec::with_capacity(files.len());
        for path in &files {
            info!(stage = %FileStage::Discovered, "Batch file discovered: {}", path.display());
            match self.prepare_batch(path).await {
                Ok(prepared) => {
                    batches.push(prepared.batch);
                    archived.push(prepared.archived);
                }
                Err((stage, error)) => {
                    log_failure(path, stage, &error);
                    stats.record_failure(path, stage, &error);
                }
            }
        }

        match self.write(batches, WriteMode::Rebuild).await {
            Ok(Some(summary)) => stats.record_write(&summary, archived.len()),
            Ok(None) => info!(
                "No batches to reconcile, {} left unchanged",
                self.paths.hht_file.display()
            ),
            Err(error) => {
                for path in &archived {
                    log_failure(path, FileStage::WriteFailed, &error);
                    stats.record_failure(path, FileStage::WriteFailed, &error);
                }
            }
        }

        info!(
            "Reconciliation complete: {} discovered, {} ingested, {} failed",
            stats.files_discovered,
            stats.files_ingested,
            stats.files_failed()
        );

        Ok(stats)
    }

    /// Handle one newly created batch file
    ///
    /// A path that no longer exists (already archived, or a duplicate
    /// notification) is skipped without touching anything.
    pub async fn ingest_file(&self, path: &Path) -> FileOutcome {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            debug!("{} is no longer present, skipping", path.display());
            return FileOutcome::Skipped;
        }

        info!(stage = %FileStage::Discovered, "Batch file discovered: {}", path.display());

        let PreparedBatch { batch, archived } = match self.prepare_batch(path).await {
            Ok(prepared) => prepared,
            Err((stage, error)) => return failed(path, stage, error),
        };

        match self.write(vec![batch], WriteMode::Append).await {
            Ok(Some(summary)) => {
                info!(
                    stage = %FileStage::Written,
                    "Appended {} to {}",
                    path.display(),
                    summary.destination.display()
                );
                FileOutcome::Ingested(summary)
            }
            Ok(None) => FileOutcome::Skipped,
            Err(error) => failed(&archived, FileStage::WriteFailed, error),
        }
    }

    /// Run gate, parse, width check and relocation for one file
    async fn prepare_batch(&self, path: &Path) -> StageResult<PreparedBatch> {
        debug!(
            stage = %FileStage::AwaitingReadiness,
            "Waiting for {} to be complete",
            path.display()
        );
        match self.gate.await_ready(path).await {
            Readiness::Ready { attempts } => {
                debug!(
                    stage = %FileStage::Ready,
                    "{} ready after {} attempts",
                    path.display(),
                    attempts
                );
            }
            Readiness::TimedOut { attempts } => {
                return Err((
                    FileStage::TimedOut,
                    Error::readiness_timeout(path, attempts),
                ));
            }
        }

        let parser = self.parser;
        let source = path.to_path_buf();
        let batch = task::spawn_blocking(move || parser.parse_file(&source))
            .await
            .map_err(|e| {
                (
                    FileStage::ParseFailed,
                    Error::processing_interrupted(format!("parser task failed: {}", e)),
                )
            })?
            .map_err(|e| (e.stage().unwrap_or(FileStage::ParseFailed), e))?;

        info!(
            stage = %FileStage::Parsed,
            "Parsed {}: {} groups, {} stock lines, transaction date {}",
            path.display(),
            batch.group_count(),
            batch.stock_line_count(),
            batch.transaction_date
        );

        validate_batch(&batch, self.writer.context())
            .map_err(|e| (FileStage::ParseFailed, e))?;

        let archived = relocate(path, &self.paths.processed_dir)
            .await
            .map_err(|e| (FileStage::RelocationFailed, e))?;

        Ok(PreparedBatch { batch, archived })
    }

    /// Serialize all transmission writes behind the pipeline lock
    async fn write(
        &self,
        batches: Vec<ParsedBatch>,
        mode: WriteMode,
    ) -> Result<Option<WriteSummary>> {
        let _guard = self.write_lock.lock().await;

        let writer = self.writer.clone();
        let destination = self.paths.hht_file.clone();
        task::spawn_blocking(move || writer.write(&batches, &destination, mode))
            .await
            .map_err(|e| Error::processing_interrupted(format!("writer task failed: {}", e)))?
    }
}

fn failed(path: &Path, stage: FileStage, error: Error) -> FileOutcome {
    log_failure(path, stage, &error);
    FileOutcome::Failed { stage, error }
}

fn log_failure(path: &Path, stage: FileStage, error: &Error) {
    error!(
        path = %path.display(),
        stage = %stage,
        "Batch file not ingested: {}",
        error.full_message()
    );
}
