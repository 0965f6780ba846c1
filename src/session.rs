//! One interactive editing session: the draft, its attachments, and submission.
//!
//! The session is the only owner of the draft. The registry sits behind a mutex so file reads
//! finishing in any order each append as a single step. Abandoning the session cancels reads
//! still in flight and any pending submission; late completions are dropped instead of landing
//! in a registry nobody looks at.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, MIN_SUBMIT_DELAY_MS};
use crate::document::{self, DocumentRecord, IncomingFile, IngestionPolicy};
use crate::error::{IngestionError, SessionError};
use crate::profile::{self, DraftProfile, ProfileRecord};
use crate::registry::{self, DocumentRegistry, IngestReport};

pub struct EditingSession {
    config: Config,
    draft: DraftProfile,
    registry: Arc<Mutex<DocumentRegistry>>,
    cancel: CancellationToken,
}

impl EditingSession {
    pub fn new(config: Config) -> Self {
        let registry = DocumentRegistry::new(config.ingestion_policy());
        Self {
            config,
            draft: DraftProfile::default(),
            registry: Arc::new(Mutex::new(registry)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn draft(&self) -> &DraftProfile {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut DraftProfile {
        &mut self.draft
    }

    /// Snapshot of the attached documents.
    pub fn documents(&self) -> Vec<DocumentRecord> {
        self.registry.lock().list()
    }

    pub fn remove_document(&self, id: Uuid) -> bool {
        self.registry.lock().remove(id)
    }

    /// Attaches files that are already in memory. Encoding happens outside the lock.
    pub fn attach(&self, files: &[IncomingFile]) -> IngestReport {
        let policy = *self.registry.lock().policy();
        registry::ingest_each(files, &policy, |record| self.registry.lock().push(record))
    }

    /// Encoded size of everything attached so far.
    pub fn attached_bytes(&self) -> usize {
        self.registry.lock().total_encoded_len()
    }

    /// Reads `paths` concurrently and attaches each file as its read completes.
    ///
    /// Registry order follows completion order. Type and size are checked from metadata before
    /// any bytes are read.
    pub async fn attach_paths(&self, paths: Vec<PathBuf>) -> IngestReport {
        let policy = *self.registry.lock().policy();
        let mut tasks = JoinSet::new();
        for path in paths {
            tasks.spawn(read_and_attach(
                path,
                policy,
                Arc::clone(&self.registry),
                self.cancel.clone(),
            ));
        }

        let mut report = IngestReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(Ok(record))) => report.added.push(record),
                Ok(Some(Err(e))) => {
                    warn!(error = %e, "document rejected");
                    report.rejected.push(e);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "document read task failed"),
            }
        }
        report
    }

    /// Finalizes the draft, waits out the processing delay and resets the session.
    ///
    /// On a validation error or cancellation the draft and documents are left as they were.
    pub async fn submit(&mut self) -> Result<ProfileRecord, SessionError> {
        let documents = self.documents();
        let record = profile::finalize(&self.draft, &documents)?;

        let delay = self
            .config
            .session
            .submit_delay()
            .max(Duration::from_millis(MIN_SUBMIT_DELAY_MS));
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                info!(id = %record.id(), "submission cancelled");
                return Err(SessionError::Cancelled);
            }
            _ = tokio::time::sleep(delay) => {}
        }

        self.reset();
        Ok(record)
    }

    /// Clears the draft and detaches every document.
    pub fn reset(&mut self) {
        self.draft = DraftProfile::default();
        self.registry.lock().clear();
    }

    /// Tears the session down: in-flight reads are discarded and a pending submit fails.
    pub fn abandon(&self) {
        debug!("editing session abandoned");
        self.cancel.cancel();
    }

    pub fn is_abandoned(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token that abandons this session when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// `None` when the session was abandoned before the read finished.
async fn read_and_attach(
    path: PathBuf,
    policy: IngestionPolicy,
    registry: Arc<Mutex<DocumentRegistry>>,
    cancel: CancellationToken,
) -> Option<Result<DocumentRecord, IngestionError>> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = document::mime_from_path(&path);

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => return None,
        outcome = read_file(&path, &name, mime_type, &policy) => outcome,
    };
    if cancel.is_cancelled() {
        return None;
    }
    if let Ok(record) = &outcome {
        registry.lock().push(record.clone());
    }
    Some(outcome)
}

async fn read_file(
    path: &Path,
    name: &str,
    mime_type: &str,
    policy: &IngestionPolicy,
) -> Result<DocumentRecord, IngestionError> {
    let read_error = |source: std::io::Error| IngestionError::Read {
        name: name.to_string(),
        source,
    };
    let metadata = tokio::fs::metadata(path).await.map_err(read_error)?;
    policy.check(name, mime_type, metadata.len())?;
    let bytes = tokio::fs::read(path).await.map_err(read_error)?;
    DocumentRecord::ingest(&IncomingFile::new(name, mime_type, bytes), policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ana_lee, pdf_bytes, pdf_file};
    use std::collections::HashSet;
    use std::fs;

    #[tokio::test(start_paused = true)]
    async fn test_submit_waits_then_resets() {
        let mut session = EditingSession::new(Config::default());
        *session.draft_mut() = ana_lee();
        session.attach(&[pdf_file("a.pdf", 1)]);

        let start = tokio::time::Instant::now();
        let record = session.submit().await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(1));
        assert_eq!(record.first_name(), "Ana");
        assert_eq!(record.documents().len(), 1);
        assert_eq!(session.draft(), &DraftProfile::default());
        assert!(session.documents().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_draft_fails_immediately_and_is_kept() {
        let mut session = EditingSession::new(Config::default());
        session.draft_mut().first_name = "Ana".into();

        let start = tokio::time::Instant::now();
        let err = session.submit().await.unwrap_err();

        assert!(matches!(err, SessionError::Validation(ref v) if v.errors().len() == 8));
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(session.draft().first_name, "Ana");
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoning_cancels_pending_submit() {
        let mut session = EditingSession::new(Config::default());
        *session.draft_mut() = ana_lee();
        session.attach(&[pdf_file("a.pdf", 1)]);
        let token = session.cancellation_token();

        let (result, _) = tokio::join!(session.submit(), async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            token.cancel();
        });

        assert!(matches!(result, Err(SessionError::Cancelled)));
        assert!(session.is_abandoned());
        assert_eq!(session.draft(), &ana_lee());
        assert_eq!(session.documents().len(), 1);
    }

    #[tokio::test]
    async fn test_attach_paths_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let good_a = dir.path().join("a.pdf");
        let good_b = dir.path().join("b.pdf");
        let docx = dir.path().join("letter.docx");
        let big = dir.path().join("big.pdf");
        fs::write(&good_a, pdf_bytes(1)).unwrap();
        fs::write(&good_b, pdf_bytes(2)).unwrap();
        fs::write(&docx, b"PK\x03\x04").unwrap();
        fs::write(&big, vec![0u8; 3 * 1024 * 1024]).unwrap();
        let missing = dir.path().join("missing.pdf");

        let session = EditingSession::new(Config::default());
        let report = session
            .attach_paths(vec![good_a, docx, big, good_b, missing])
            .await;

        let added: HashSet<String> = report.added.iter().map(|d| d.name.clone()).collect();
        assert_eq!(added, HashSet::from(["a.pdf".to_string(), "b.pdf".to_string()]));
        assert_eq!(report.rejected.len(), 3);
        assert!(report
            .rejected
            .iter()
            .any(|e| matches!(e, IngestionError::UnsupportedType { name, .. } if name == "letter.docx")));
        assert!(report
            .rejected
            .iter()
            .any(|e| matches!(e, IngestionError::TooLarge { name, .. } if name == "big.pdf")));
        assert!(report
            .rejected
            .iter()
            .any(|e| matches!(e, IngestionError::Read { name, .. } if name == "missing.pdf")));

        let listed: Vec<Uuid> = session.documents().iter().map(|d| d.id).collect();
        let reported: Vec<Uuid> = report.added.iter().map(|d| d.id).collect();
        assert_eq!(listed, reported);
    }

    #[tokio::test]
    async fn test_abandoned_session_drops_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.pdf");
        fs::write(&path, pdf_bytes(1)).unwrap();

        let session = EditingSession::new(Config::default());
        session.abandon();
        let report = session.attach_paths(vec![path]).await;

        assert!(report.added.is_empty());
        assert!(report.rejected.is_empty());
        assert!(session.documents().is_empty());
    }

    #[test]
    fn test_attach_uses_configured_limit() {
        let config = Config::from_toml("[ingestion]\nmax_document_bytes = 16\n").unwrap();
        let session = EditingSession::new(config);

        let report = session.attach(&[pdf_file("small.pdf", 0), pdf_file("large.pdf", 3)]);

        assert_eq!(report.added.len(), 0);
        assert_eq!(report.rejected.len(), 2);
    }

    #[test]
    fn test_attached_bytes_tracks_registry() {
        let session = EditingSession::new(Config::default());
        assert_eq!(session.attached_bytes(), 0);

        let report = session.attach(&[pdf_file("a.pdf", 1), pdf_file("b.pdf", 2)]);

        let expected: usize = report.added.iter().map(|d| d.encoded_data.len()).sum();
        assert_eq!(session.attached_bytes(), expected);
        assert!(report.is_clean());
    }

    #[test]
    fn test_remove_document_by_id() {
        let session = EditingSession::new(Config::default());
        let report = session.attach(&[pdf_file("a.pdf", 1), pdf_file("b.pdf", 1)]);

        assert!(session.remove_document(report.added[0].id));

        let names: Vec<String> = session.documents().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["b.pdf"]);
    }
}
