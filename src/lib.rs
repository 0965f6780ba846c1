//! # qiprofile
//!
//! Turn a personal profile and its PDF attachments into a single QR code.
//!
//! A profile is collected as a [`profile::DraftProfile`], PDF documents are embedded as base64
//! data URLs, and the finalized [`profile::ProfileRecord`] is serialized to compact JSON and
//! encoded into a QR Code Model 2 symbol in byte mode. Rendering targets a PNG image at error
//! correction level High by default.
//!
//! ## Features
//!
//! - Validate the nine required personal fields, with a relaxed email check.
//! - Attach PDF documents up to a configurable size limit (2 MiB by default).
//! - Deterministic JSON payload and deterministic QR rendering.
//! - Export the QR code as PNG, SVG or terminal text; share it through a host [`share::ShareTarget`].
//! - Reconstruct attached documents from a scanned payload, page through them with a
//!   [`viewer::PageCursor`].
//!
//! ## Example
//!
//! ```rust
//! use qiprofile::profile::{finalize, DraftProfile};
//! use qiprofile::{payload, render};
//!
//! let draft = DraftProfile {
//!     first_name: "Ana".into(),
//!     last_name: "Lee".into(),
//!     email: "ana@x.com".into(),
//!     phone: "555-1234".into(),
//!     address: "1 Main St".into(),
//!     city: "Springfield".into(),
//!     state: "IL".into(),
//!     zip_code: "62701".into(),
//!     country: "US".into(),
//!     ..Default::default()
//! };
//! let record = finalize(&draft, &[]).unwrap();
//! let text = payload::encode(&record).unwrap();
//! let qr = render::render(&text, qiprofile::qrcode::QrCodeEcc::High).unwrap();
//! assert!(qr.to_png().unwrap().starts_with(b"\x89PNG"));
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Core QR code encoding.
//! - [`render`]: Rasterising a payload into an image.
//! - [`codec`]: Data URL encoding of document bytes.
//! - [`document`], [`registry`]: Ingesting and holding attachments.
//! - [`profile`], [`payload`]: Validation, finalization and the QR text.
//! - [`export`], [`share`], [`viewer`]: Getting things back out.
//! - [`session`]: One editing session end to end.

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod payload;
pub mod profile;
pub mod qrcode;
pub mod registry;
pub mod render;
pub mod session;
pub mod share;
pub mod telemetry;
pub mod viewer;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use document::{DocumentKind, DocumentRecord, IncomingFile};
pub use error::{Error, Result};
pub use profile::{finalize, DraftProfile, PersonalDetails, ProfileRecord};
pub use qrcode::QrCodeEcc;
pub use registry::DocumentRegistry;
pub use render::{QrImage, RenderOptions};
pub use session::EditingSession;
