//! Directory watch adapter
//!
//! Bridges `notify` file-created notifications for the download directory
//! into live ingestion. The notify callback runs on the backend's own thread
//! and forwards candidate paths through a bounded channel; the event loop
//! spawns one ingestion task per path so readiness polls for several files
//! overlap. A path already being ingested is not started a second time.
//!
//! Notifications that arrive before [`DirectoryWatchAdapter::run`] is called
//! (for example during startup reconciliation) wait in the channel.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::app::services::ingestion::{
    BatchFileFilter, BatchIngestionPipeline, FileOutcome, IngestionStats,
};
use crate::constants::WATCH_CHANNEL_CAPACITY;
use crate::{Error, Result};

/// Live notification source for the download directory
pub struct DirectoryWatchAdapter {
    watcher: RecommendedWatcher,
    events: mpsc::Receiver<PathBuf>,
    download_dir: PathBuf,
}

impl DirectoryWatchAdapter {
    /// Start watching `download_dir` (recursively) for new batch files
    pub fn start(download_dir: &Path) -> Result<Self> {
        let filter = BatchFileFilter::new()?;
        let (event_tx, events) = mpsc::channel(WATCH_CHANNEL_CAPACITY);

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if !matches!(event.kind, EventKind::Create(_)) {
                        return;
                    }
                    for path in event.paths {
                        if path.is_dir() || !filter.matches(&path) {
                            continue;
                        }
                        if let Err(e) = event_tx.blocking_send(path) {
                            error!("Failed to queue batch file notification: {e}");
                        }
                    }
                }
                Err(e) => error!("Watch error: {e}"),
            },
        )
        .map_err(|e| Error::watch("Failed to create directory watcher", e))?;

        watcher
            .watch(download_dir, RecursiveMode::Recursive)
            .map_err(|e| Error::watch(format!("Failed to watch {}", download_dir.display()), e))?;

        info!("Watching {} for new batch files", download_dir.display());

        Ok(Self {
            watcher,
            events,
            download_dir: download_dir.to_path_buf(),
        })
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Ingest notified files until `token` is cancelled
    ///
    /// On cancellation the watcher is dropped and in-flight ingestions are
    /// awaited before the statistics are returned.
    pub async fn run(
        self,
        pipeline: Arc<BatchIngestionPipeline>,
        token: CancellationToken,
    ) -> IngestionStats {
        let Self {
            watcher,
            events,
            download_dir,
        } = self;

        let stats = dispatch_events(events, pipeline, token, Some(watcher)).await;
        info!("Stopped watching {}", download_dir.display());
        stats
    }
}

/// Event loop shared by the watcher and tests that inject paths directly
///
/// `watcher` is held until cancellation so notifications keep flowing while
/// the loop runs.
pub async fn dispatch_events(
    mut events: mpsc::Receiver<PathBuf>,
    pipeline: Arc<BatchIngestionPipeline>,
    token: CancellationToken,
    watcher: Option<RecommendedWatcher>,
) -> IngestionStats {
    let in_flight: Arc<Mutex<HashSet<PathBuf>>> = Arc::new(Mutex::new(HashSet::new()));
    let mut tasks: JoinSet<(PathBuf, FileOutcome)> = JoinSet::new();
    let mut stats = IngestionStats::new();

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                info!("Shutdown requested, no longer accepting batch files");
                break;
            }
            received = events.recv() => {
                let Some(path) = received else {
                    warn!("Notification channel closed");
                    break;
                };

                if !in_flight.lock().await.insert(path.clone()) {
                    debug!("{} is already being ingested", path.display());
                } else {
                    let pipeline = Arc::clone(&pipeline);
                    let in_flight = Arc::clone(&in_flight);
                    tasks.spawn(async move {
                        let outcome = pipeline.ingest_file(&path).await;
                        in_flight.lock().await.remove(&path);
                        (path, outcome)
                    });
                }
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                record_joined(&mut stats, joined);
            }
        }
    }

    drop(watcher);

    if !tasks.is_empty() {
        info!("Waiting for {} in-flight batch files", tasks.len());
    }
    while let Some(joined) = tasks.join_next().await {
        record_joined(&mut stats, joined);
    }

    stats
}

fn record_joined(
    stats: &mut IngestionStats,
    joined: std::result::Result<(PathBuf, FileOutcome), JoinError>,
) {
    match joined {
        Ok((path, outcome)) => stats.record_outcome(&path, &outcome),
        Err(e) => error!("Ingestion task failed: {}", e),
    }
}
