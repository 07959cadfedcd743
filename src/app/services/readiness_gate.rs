//! Readiness gate for inbound batch files
//!
//! The upstream writer may still be flushing a batch file when its creation
//! notification fires. The gate rescans the file from the start until the
//! `END OF FILE` sentinel appears, up to a bounded number of attempts. The
//! file is reopened on every attempt so writers that replace the file rather
//! than append to it are handled too.

use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::constants::{
    DEFAULT_READINESS_ATTEMPTS, DEFAULT_READINESS_INTERVAL, END_OF_FILE_SENTINEL,
};

/// Outcome of waiting for a batch file to be completely written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The sentinel was found on the given (1-based) attempt
    Ready { attempts: u32 },
    /// The sentinel never appeared
    TimedOut { attempts: u32 },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready { .. })
    }
}

/// Bounded poll for the sentinel line
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    attempts: u32,
    interval: Duration,
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new(DEFAULT_READINESS_ATTEMPTS, DEFAULT_READINESS_INTERVAL)
    }
}

impl ReadinessGate {
    /// Create a gate; at least one attempt is always made
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            interval,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the file contains the sentinel line or the attempts run out
    pub async fn await_ready(&self, path: &Path) -> Readiness {
        for attempt in 1..=self.attempts {
            match contains_sentinel(path).await {
                Ok(true) => {
                    debug!(
                        "Sentinel found in {} on attempt {}",
                        path.display(),
                        attempt
                    );
                    return Readiness::Ready { attempts: attempt };
                }
                Ok(false) => {
                    debug!(
                        "Sentinel not yet present in {} (attempt {}/{})",
                        path.display(),
                        attempt,
                        self.attempts
                    );
                }
                Err(e) => {
                    // Replaced or locked mid-write; counts as a failed attempt
                    debug!(
                        "Could not scan {} (attempt {}/{}): {}",
                        path.display(),
                        attempt,
                        self.attempts,
                        e
                    );
                }
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        Readiness::TimedOut {
            attempts: self.attempts,
        }
    }
}

/// Scan the file once for a line equal to the sentinel after trimming
///
/// Compares raw bytes, so content that is not UTF-8 does not hide the
/// sentinel.
async fn contains_sentinel(path: &Path) -> std::io::Result<bool> {
    let file = File::open(path).await?;
    let mut reader = BufReader::new(file);
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            return Ok(false);
        }
        if line.trim_ascii() == END_OF_FILE_SENTINEL.as_bytes() {
            return Ok(true);
        }
    }
}
