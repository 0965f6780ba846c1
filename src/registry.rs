//! Ordered collection of documents attached to one editing session.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::document::{DocumentRecord, IncomingFile, IngestionPolicy};
use crate::error::IngestionError;

/// Documents in insertion order. Ids are unique because they are minted on ingestion.
#[derive(Debug, Default, Clone)]
pub struct DocumentRegistry {
    policy: IngestionPolicy,
    documents: Vec<DocumentRecord>,
}

/// Result of a multi-file upload: what went in and what was refused.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub added: Vec<DocumentRecord>,
    pub rejected: Vec<IngestionError>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Ingests each file under `policy` and hands every accepted record to `attach`.
pub(crate) fn ingest_each<'a, I, F>(files: I, policy: &IngestionPolicy, mut attach: F) -> IngestReport
where
    I: IntoIterator<Item = &'a IncomingFile>,
    F: FnMut(DocumentRecord),
{
    let mut report = IngestReport::default();
    for file in files {
        match DocumentRecord::ingest(file, policy) {
            Ok(record) => {
                attach(record.clone());
                report.added.push(record);
            }
            Err(e) => {
                warn!(error = %e, "document rejected");
                report.rejected.push(e);
            }
        }
    }
    report
}

impl DocumentRegistry {
    pub fn new(policy: IngestionPolicy) -> Self {
        Self {
            policy,
            documents: Vec::new(),
        }
    }

    pub fn policy(&self) -> &IngestionPolicy {
        &self.policy
    }

    /// Encodes and appends `file`. A refused file leaves the registry unchanged.
    pub fn add(&mut self, file: &IncomingFile) -> Result<DocumentRecord, IngestionError> {
        let record = DocumentRecord::ingest(file, &self.policy).inspect_err(|e| warn!(error = %e, "document rejected"))?;
        self.push(record.clone());
        Ok(record)
    }

    /// Adds every file independently; one refusal does not stop the rest.
    pub fn add_all<'a, I>(&mut self, files: I) -> IngestReport
    where
        I: IntoIterator<Item = &'a IncomingFile>,
    {
        let policy = self.policy;
        ingest_each(files, &policy, |record| self.push(record))
    }

    /// Appends a record that was ingested elsewhere, e.g. off the registry lock.
    ///
    /// A record whose id is already present is ignored.
    pub fn push(&mut self, record: DocumentRecord) {
        if self.contains(record.id) {
            warn!(id = %record.id, "duplicate document id ignored");
            return;
        }
        debug!(id = %record.id, name = %record.name, "document attached");
        self.documents.push(record);
    }

    /// Removes the document with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| d.id != id);
        let removed = self.documents.len() != before;
        if removed {
            debug!(%id, "document removed");
        }
        removed
    }

    /// Snapshot of the current documents.
    pub fn list(&self) -> Vec<DocumentRecord> {
        self.documents.clone()
    }

    pub fn get(&self, id: Uuid) -> Option<&DocumentRecord> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    /// Sum of the data URL lengths; a lower bound on what the documents add to a payload.
    pub fn total_encoded_len(&self) -> usize {
        self.documents.iter().map(|d| d.encoded_data.len()).sum()
    }
}
