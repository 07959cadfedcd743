//! Transmission file handling
//!
//! Rebuild writes go to a temporary file in the destination directory that is
//! then renamed over the destination, so the transmission file is replaced in
//! one step. Append writes add one complete document after whatever the file
//! already holds.

use chrono::{Local, NaiveDate};
use std::fs::{self, File, OpenOptions, Permissions};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::format::render_document;
use crate::app::models::{ParsedBatch, TransmissionContext, WriteMode, WriteSummary};
#[cfg(unix)]
use crate::constants::NEW_TRANSMISSION_FILE_MODE;
use crate::{Error, Result};

/// Writer for HHT transmission files
#[derive(Debug, Clone)]
pub struct TransmissionWriter {
    context: TransmissionContext,
}

impl TransmissionWriter {
    /// Create a writer for the given interface context
    pub fn new(context: TransmissionContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &TransmissionContext {
        &self.context
    }

    /// Write the batches with today's date in the document header
    ///
    /// Returns `None` without touching the filesystem when `batches` is empty.
    pub fn write(
        &self,
        batches: &[ParsedBatch],
        destination: &Path,
        mode: WriteMode,
    ) -> Result<Option<WriteSummary>> {
        self.write_dated(batches, destination, mode, Local::now().date_naive())
    }

    /// Write the batches with an explicit transmission date
    pub fn write_dated(
        &self,
        batches: &[ParsedBatch],
        destination: &Path,
        mode: WriteMode,
        transmission_date: NaiveDate,
    ) -> Result<Option<WriteSummary>> {
        if batches.is_empty() {
            debug!(
                "No batches to write, leaving {} untouched",
                destination.display()
            );
            return Ok(None);
        }

        let document = render_document(batches, &self.context, transmission_date)?;

        match mode {
            WriteMode::Rebuild => rebuild(destination, &document.content),
            WriteMode::Append => append(destination, &document.content),
        }
        .map_err(|e| Error::write(destination, e))?;

        info!(
            "Transmission file {} ({}): {} groups, {} stock lines from {} batches",
            destination.display(),
            mode,
            document.groups,
            document.stock_lines,
            batches.len()
        );

        Ok(Some(WriteSummary {
            destination: destination.to_path_buf(),
            mode,
            groups: document.groups,
            stock_lines: document.stock_lines,
        }))
    }
}

fn parent_dir(destination: &Path) -> &Path {
    destination
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Replace the destination with `content` in a single rename
fn rebuild(destination: &Path, content: &str) -> std::io::Result<()> {
    let parent = parent_dir(destination);
    fs::create_dir_all(parent)?;

    if destination.exists() {
        info!("Rebuilding transmission file: {}", destination.display());
    }

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;
    let permissions = destination_permissions(destination, temp_file.as_file())?;
    temp_file.as_file().set_permissions(permissions)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(destination).map_err(|e| e.error)?;

    Ok(())
}

/// Permissions for a rebuilt destination
///
/// An existing destination keeps its mode. A new one gets the mode an
/// appended file would get under the usual umask, not the owner-only mode of
/// a temporary file.
fn destination_permissions(destination: &Path, temp_file: &File) -> std::io::Result<Permissions> {
    match fs::metadata(destination) {
        Ok(metadata) => Ok(metadata.permissions()),
        Err(_) => new_file_permissions(temp_file),
    }
}

#[cfg(unix)]
fn new_file_permissions(_temp_file: &File) -> std::io::Result<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(Permissions::from_mode(NEW_TRANSMISSION_FILE_MODE))
}

#[cfg(not(unix))]
fn new_file_permissions(temp_file: &File) -> std::io::Result<Permissions> {
    Ok(temp_file.metadata()?.permissions())
}

/// Append `content`, creating the destination if it does not exist
fn append(destination: &Path, content: &str) -> std::io::Result<()> {
    fs::create_dir_all(parent_dir(destination))?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(destination)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    Ok(())
}
