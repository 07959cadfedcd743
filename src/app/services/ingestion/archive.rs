//! Processed-file archive

use std::path::{Path, PathBuf};
use tracing::info;

use crate::{Error, Result};

/// Move a parsed batch file into `processed_dir`, keeping its name
///
/// The move is a single rename, so the file is either still in the download
/// directory or already archived. An archived file with the same name is
/// replaced.
pub async fn relocate(source: &Path, processed_dir: &Path) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| {
        Error::relocation(
            source,
            processed_dir,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let destination = processed_dir.join(file_name);

    tokio::fs::create_dir_all(processed_dir)
        .await
        .map_err(|e| Error::relocation(source, &destination, e))?;
    tokio::fs::rename(source, &destination)
        .await
        .map_err(|e| Error::relocation(source, &destination, e))?;

    info!(
        "Moved {} to {}",
        source.display(),
        destination.display()
    );

    Ok(destination)
}
