//! Document viewer boundary.
//!
//! Rasterising pages is left to a [`PageSource`]; this module owns what the viewer decides on
//! its own: which documents it can open, which page is showing, and downloading.

use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::codec;
use crate::document::{DocumentKind, DocumentRecord};
use crate::error::{MalformedEncoding, ViewerError};
use crate::export::{self, ExportedFile};

// Matches `/Type /Page` but not `/Type /Pages`
static PDF_PAGE_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/Type\s*/Page(?:[^s]|$)").expect("page pattern is valid"));

/// Something that can lay out pages of some document kinds.
pub trait PageSource {
    fn supports(&self, kind: DocumentKind) -> bool;

    /// Number of pages in `bytes`. Zero is allowed for documents still loading.
    fn page_count(&self, kind: DocumentKind, bytes: &[u8]) -> Result<u32, ViewerError>;
}

/// Counts page objects in a PDF without rendering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfPageCounter;

impl PageSource for PdfPageCounter {
    fn supports(&self, kind: DocumentKind) -> bool {
        kind == DocumentKind::Pdf
    }

    fn page_count(&self, kind: DocumentKind, bytes: &[u8]) -> Result<u32, ViewerError> {
        if !self.supports(kind) {
            return Err(ViewerError::Unsupported(kind.label().to_string()));
        }
        if !bytes.starts_with(b"%PDF") {
            return Err(ViewerError::Unreadable("missing %PDF header".into()));
        }
        Ok(PDF_PAGE_OBJECT.find_iter(bytes).count() as u32)
    }
}

/// Current page, always within `[1, max(total, 1)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    current: u32,
    total: u32,
}

impl PageCursor {
    pub fn new(total: u32) -> Self {
        Self { current: 1, total }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Moves by `offset` pages, stopping at the first and last page.
    pub fn change_page(&mut self, offset: i64) -> u32 {
        self.go_to(i64::from(self.current).saturating_add(offset))
    }

    pub fn next(&mut self) -> u32 {
        self.change_page(1)
    }

    pub fn previous(&mut self) -> u32 {
        self.change_page(-1)
    }

    pub fn go_to(&mut self, page: i64) -> u32 {
        let last = i64::from(self.total.max(1));
        self.current = page.clamp(1, last) as u32;
        self.current
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }
}

/// An opened document: decoded bytes plus the page cursor.
#[derive(Debug)]
pub struct DocumentViewer<'a> {
    record: &'a DocumentRecord,
    kind: DocumentKind,
    bytes: Vec<u8>,
    cursor: PageCursor,
}

impl<'a> DocumentViewer<'a> {
    pub fn open(record: &'a DocumentRecord, source: &dyn PageSource) -> Result<Self, ViewerError> {
        let kind = record
            .kind()
            .filter(|k| source.supports(*k))
            .ok_or_else(|| ViewerError::Unsupported(record.mime_type.clone()))?;
        let (_, bytes) = codec::decode(&record.encoded_data)?;
        let total = source.page_count(kind, &bytes)?;
        Ok(Self {
            record,
            kind,
            bytes,
            cursor: PageCursor::new(total),
        })
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut PageCursor {
        &mut self.cursor
    }

    /// Same as exporting the record: original bytes under the original name.
    pub fn download(&self) -> Result<ExportedFile, MalformedEncoding> {
        export::reconstruct(self.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{IncomingFile, IngestionPolicy};
    use crate::test_support::{pdf_bytes, pdf_file};
    use rstest::rstest;

    #[rstest]
    #[case(3, &[1, 1, 1, 1], 3)]
    #[case(3, &[-1, -5, -100], 1)]
    #[case(5, &[2, -1, 10, -2], 3)]
    #[case(0, &[1, 1, -1], 1)]
    #[case(1, &[i64::MAX, i64::MIN], 1)]
    fn test_cursor_stays_in_range(#[case] total: u32, #[case] moves: &[i64], #[case] expected: u32) {
        let mut cursor = PageCursor::new(total);
        for &offset in moves {
            let page = cursor.change_page(offset);
            assert!((1..=total.max(1)).contains(&page));
        }
        assert_eq!(cursor.current(), expected);
    }

    #[test]
    fn test_next_and_previous_stop_at_ends() {
        let mut cursor = PageCursor::new(2);
        assert!(!cursor.has_previous());
        assert_eq!(cursor.previous(), 1);
        assert_eq!(cursor.next(), 2);
        assert!(!cursor.has_next());
        assert_eq!(cursor.next(), 2);
        assert_eq!(cursor.go_to(0), 1);
    }

    #[test]
    fn test_counts_pdf_pages() {
        let counter = PdfPageCounter;
        assert_eq!(counter.page_count(DocumentKind::Pdf, &pdf_bytes(4)).unwrap(), 4);
        assert_eq!(counter.page_count(DocumentKind::Pdf, b"%PDF-1.4\n/Type/Page").unwrap(), 1);
        assert!(matches!(
            counter.page_count(DocumentKind::Pdf, b"GIF89a"),
            Err(ViewerError::Unreadable(_))
        ));
    }

    #[test]
    fn test_open_and_download() {
        let record = DocumentRecord::ingest(&pdf_file("cert.pdf", 3), &IngestionPolicy::default()).unwrap();

        let mut viewer = DocumentViewer::open(&record, &PdfPageCounter).unwrap();

        assert_eq!(viewer.name(), "cert.pdf");
        assert_eq!(viewer.kind(), DocumentKind::Pdf);
        assert_eq!(viewer.cursor().total(), 3);
        assert_eq!(viewer.cursor_mut().change_page(7), 3);
        let file = viewer.download().unwrap();
        assert_eq!(file.filename, "cert.pdf");
        assert_eq!(file.bytes, viewer.bytes());
    }

    #[test]
    fn test_open_refuses_unknown_kinds() {
        let mut record =
            DocumentRecord::ingest(&IncomingFile::new("a.pdf", "application/pdf", pdf_bytes(1)), &IngestionPolicy::default())
                .unwrap();
        record.mime_type = "image/png".into();
        assert!(matches!(
            DocumentViewer::open(&record, &PdfPageCounter),
            Err(ViewerError::Unsupported(ref t)) if t == "image/png"
        ));
    }
}
