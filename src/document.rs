//! Attachments at the ingestion boundary: accepted types, size policy and the stored record.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec;
use crate::error::IngestionError;

/// Document types the ingestion boundary accepts and the viewer can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 1] = [DocumentKind::Pdf];

    pub fn from_mime(mime_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.mime_type() == mime_type)
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
        }
    }
}

/// MIME type for a file name, by extension. Unknown extensions map to `application/octet-stream`.
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// A file as handed over by a picker or drop target, already read into memory.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }
}

/// Limits a file must satisfy before it becomes a [`DocumentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionPolicy {
    pub max_bytes: u64,
}

impl Default for IngestionPolicy {
    fn default() -> Self {
        Self {
            max_bytes: crate::config::DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

impl IngestionPolicy {
    /// Checks type and declared size without touching the bytes.
    pub fn check(&self, name: &str, mime_type: &str, size: u64) -> Result<DocumentKind, IngestionError> {
        let kind = DocumentKind::from_mime(mime_type).ok_or_else(|| IngestionError::UnsupportedType {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
        })?;
        if size > self.max_bytes {
            return Err(IngestionError::TooLarge {
                name: name.to_string(),
                size,
                limit: self.max_bytes,
            });
        }
        Ok(kind)
    }
}

/// An attached document, stored as a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(rename = "data")]
    pub encoded_data: String,
    pub created_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Validates `file` against `policy` and encodes it under a fresh id.
    pub fn ingest(file: &IncomingFile, policy: &IngestionPolicy) -> Result<Self, IngestionError> {
        policy.check(&file.name, &file.mime_type, file.size)?;
        if file.bytes.len() as u64 > policy.max_bytes {
            // The declared size understated the content
            return Err(IngestionError::TooLarge {
                name: file.name.clone(),
                size: file.bytes.len() as u64,
                limit: policy.max_bytes,
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            encoded_data: codec::encode(&file.bytes, &file.mime_type),
            created_at: Utc::now(),
        })
    }

    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_mime(&self.mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cv.pdf", "application/pdf")]
    #[case("CV.PDF", "application/pdf")]
    #[case("letter.docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document")]
    #[case("photo.jpeg", "image/jpeg")]
    #[case("README", "application/octet-stream")]
    fn test_mime_by_extension(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(mime_from_path(Path::new(name)), expected);
    }

    #[test]
    fn test_ingest_encodes_and_keeps_name() {
        let file = IncomingFile::new("Aadhaar card.pdf", "application/pdf", b"%PDF-1.4".to_vec());
        let record = DocumentRecord::ingest(&file, &IngestionPolicy::default()).unwrap();
        assert_eq!(record.name, "Aadhaar card.pdf");
        assert_eq!(record.kind(), Some(DocumentKind::Pdf));
        assert_eq!(codec::decode(&record.encoded_data).unwrap().1, b"%PDF-1.4");
    }

    #[test]
    fn test_ingest_assigns_fresh_ids() {
        let file = IncomingFile::new("a.pdf", "application/pdf", vec![1, 2, 3]);
        let policy = IngestionPolicy::default();
        let a = DocumentRecord::ingest(&file, &policy).unwrap();
        let b = DocumentRecord::ingest(&file, &policy).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_policy_limit_is_inclusive() {
        let policy = IngestionPolicy { max_bytes: 4 };
        assert!(policy.check("a.pdf", "application/pdf", 4).is_ok());
        assert!(matches!(
            policy.check("a.pdf", "application/pdf", 5),
            Err(IngestionError::TooLarge { size: 5, limit: 4, .. })
        ));
    }

    #[test]
    fn test_understated_size_is_caught() {
        let policy = IngestionPolicy { max_bytes: 4 };
        let mut file = IncomingFile::new("a.pdf", "application/pdf", vec![0; 10]);
        file.size = 1;
        assert!(matches!(
            DocumentRecord::ingest(&file, &policy),
            Err(IngestionError::TooLarge { size: 10, .. })
        ));
    }

    #[test]
    fn test_serializes_with_short_field_names() {
        let file = IncomingFile::new("a.pdf", "application/pdf", vec![]);
        let record = DocumentRecord::ingest(&file, &IngestionPolicy::default()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "application/pdf");
        assert_eq!(json["data"], "data:application/pdf;base64,");
        assert!(json.get("createdAt").is_some());
    }
}
