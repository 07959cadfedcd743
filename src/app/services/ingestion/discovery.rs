//! Batch file discovery
//!
//! Only files directly inside the download directory take part in startup
//! reconciliation; they are returned sorted by file name so reconciliation
//! order is deterministic.

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::constants::BATCH_FILE_PATTERN;
use crate::{Error, Result};

/// Case-insensitive matcher for batch file names
#[derive(Debug, Clone)]
pub struct BatchFileFilter {
    pattern: Pattern,
}

impl BatchFileFilter {
    /// Compile the batch file pattern
    pub fn new() -> Result<Self> {
        let pattern = Pattern::new(BATCH_FILE_PATTERN).map_err(|e| {
            Error::configuration(format!(
                "Invalid batch file pattern '{}': {}",
                BATCH_FILE_PATTERN, e
            ))
        })?;
        Ok(Self { pattern })
    }

    /// Whether the file name of `path` looks like a batch file
    ///
    /// Only the name is inspected; callers check that the path is a file.
    pub fn matches(&self, path: &Path) -> bool {
        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.pattern.matches_with(name, options))
    }
}

/// List the batch files waiting directly inside `download_dir`
pub fn discover_batch_files(download_dir: &Path) -> Result<Vec<PathBuf>> {
    if !download_dir.is_dir() {
        return Err(Error::io(
            format!("Download directory does not exist: {}", download_dir.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "Directory not found"),
        ));
    }

    let filter = BatchFileFilter::new()?;
    let mut files = Vec::new();

    for entry in WalkDir::new(download_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if entry.file_type().is_file() && filter.matches(path) {
            files.push(path.to_path_buf());
        } else {
            debug!("Ignoring non-batch entry: {}", path.display());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(
        "Discovered {} batch files in {}",
        files.len(),
        download_dir.display()
    );

    Ok(files)
}
