use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::ManifestDocument;
use crate::error::{Error, Result};

/// Persists a document by staging it next to the destination and renaming it
/// into place. The destination is either the old file or the complete new
/// one, never a partial write.
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    path: PathBuf,
}

impl DocumentWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn write(&self, document: &ManifestDocument) -> Result<()> {
        self.write_text(document.text())
    }

    pub fn write_text(&self, text: &str) -> Result<()> {
        check_balanced(text)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staging = NamedTempFile::new_in(dir)?;
        if let Ok(meta) = fs::metadata(&self.path) {
            staging.as_file().set_permissions(meta.permissions())?;
        }

        staging.write_all(text.as_bytes())?;
        staging.flush()?;
        staging.as_file().sync_all()?;

        let staged = staging.as_file().metadata()?.len();
        if staged != text.len() as u64 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("staged {} of {} bytes", staged, text.len()),
            )));
        }
        debug!(path = %staging.path().display(), bytes = staged, "staged manifest");

        staging.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        info!(path = %self.path.display(), "wrote manifest");
        Ok(())
    }
}

/// Every `{` must have a matching `}` in the output.
pub fn check_balanced(text: &str) -> Result<()> {
    let open = text.bytes().filter(|&b| b == b'{').count();
    let close = text.bytes().filter(|&b| b == b'}').count();
    if open != close {
        return Err(Error::CorruptionDetected { open, close });
    }
    Ok(())
}
