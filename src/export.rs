//! Turning an attached document back into a file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::codec;
use crate::document::DocumentRecord;
use crate::error::MalformedEncoding;

/// A decoded document, ready to be written or handed to a viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Decodes `record` into its original bytes under its original name.
pub fn reconstruct(record: &DocumentRecord) -> Result<ExportedFile, MalformedEncoding> {
    let (mime_type, bytes) = codec::decode(&record.encoded_data)?;
    Ok(ExportedFile {
        filename: record.name.clone(),
        mime_type,
        bytes,
    })
}

impl ExportedFile {
    /// Writes the file into `directory`, keeping only the last component of the name.
    pub fn save_to(&self, directory: &Path) -> io::Result<PathBuf> {
        let name = Path::new(&self.filename)
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!("unusable file name `{}`", self.filename)))?;
        fs::create_dir_all(directory)?;
        let path = directory.join(name);
        fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "document exported");
        Ok(path)
    }
}
