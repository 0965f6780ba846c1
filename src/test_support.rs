//! Fixtures shared by unit tests.

use crate::document::IncomingFile;
use crate::profile::DraftProfile;

pub(crate) fn ana_lee() -> DraftProfile {
    DraftProfile {
        first_name: "Ana".into(),
        last_name: "Lee".into(),
        email: "ana@x.com".into(),
        phone: "555-1234".into(),
        address: "1 Main St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip_code: "62701".into(),
        country: "US".into(),
        ..Default::default()
    }
}

/// A small but well-formed PDF with `pages` page objects.
pub(crate) fn pdf_bytes(pages: usize) -> Vec<u8> {
    let mut out = String::from("%PDF-1.4\n1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
    out.push_str(&format!("2 0 obj << /Type /Pages /Count {pages} >> endobj\n"));
    for i in 0..pages {
        out.push_str(&format!("{} 0 obj << /Type /Page /Parent 2 0 R >> endobj\n", i + 3));
    }
    out.push_str("%%EOF\n");
    out.into_bytes()
}

pub(crate) fn pdf_file(name: &str, pages: usize) -> IncomingFile {
    IncomingFile::new(name, "application/pdf", pdf_bytes(pages))
}
