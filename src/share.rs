//! Saving and sharing a rendered QR code.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ShareError;
use crate::profile::ProfileRecord;

pub const PNG_MIME: &str = "image/png";

/// PNG bytes plus the name and title they travel under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareBundle {
    pub title: String,
    pub filename: String,
    pub mime_type: &'static str,
    pub png: Vec<u8>,
}

impl ShareBundle {
    pub fn for_profile(profile: &ProfileRecord, png: Vec<u8>) -> Self {
        Self {
            title: format!("{} {} - QR Code", profile.first_name(), profile.last_name()),
            filename: qr_filename(profile),
            mime_type: PNG_MIME,
            png,
        }
    }
}

/// `<first>-<last>-qrcode.png`
pub fn qr_filename(profile: &ProfileRecord) -> String {
    format!("{}-{}-qrcode.png", profile.first_name(), profile.last_name())
}

/// A host facility that can send files elsewhere (a share sheet, a messenger, ...).
pub trait ShareTarget {
    /// Whether the host can share at all right now.
    fn is_available(&self) -> bool;

    fn share(&self, bundle: &ShareBundle) -> Result<(), ShareError>;
}

/// Host without any sharing facility.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShareTarget;

impl ShareTarget for NoShareTarget {
    fn is_available(&self) -> bool {
        false
    }

    fn share(&self, _bundle: &ShareBundle) -> Result<(), ShareError> {
        Err(ShareError::Target("sharing is not supported on this host".into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Unsupported,
}

/// Hands `bundle` to `target`, or reports `Unsupported` when there is nothing to share with.
pub fn share_qr(target: &dyn ShareTarget, bundle: &ShareBundle) -> Result<ShareOutcome, ShareError> {
    if !target.is_available() {
        debug!(filename = %bundle.filename, "no share target available");
        return Ok(ShareOutcome::Unsupported);
    }
    target.share(bundle)?;
    info!(title = %bundle.title, "QR code shared");
    Ok(ShareOutcome::Shared)
}

/// Local download: writes the PNG into `directory` under the bundle's file name.
pub fn save_qr(bundle: &ShareBundle, directory: &Path) -> Result<PathBuf, ShareError> {
    fs::create_dir_all(directory)?;
    let path = directory.join(&bundle.filename);
    fs::write(&path, &bundle.png)?;
    info!(path = %path.display(), "QR code saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::finalize;
    use crate::test_support::ana_lee;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingTarget {
        shared: RefCell<Vec<ShareBundle>>,
    }

    impl ShareTarget for RecordingTarget {
        fn is_available(&self) -> bool {
            true
        }

        fn share(&self, bundle: &ShareBundle) -> Result<(), ShareError> {
            self.shared.borrow_mut().push(bundle.clone());
            Ok(())
        }
    }

    fn bundle() -> ShareBundle {
        let profile = finalize(&ana_lee(), &[]).unwrap();
        ShareBundle::for_profile(&profile, b"\x89PNG".to_vec())
    }

    #[test]
    fn test_bundle_names_follow_profile() {
        let bundle = bundle();
        assert_eq!(bundle.filename, "Ana-Lee-qrcode.png");
        assert_eq!(bundle.title, "Ana Lee - QR Code");
        assert_eq!(bundle.mime_type, "image/png");
    }

    #[test]
    fn test_unavailable_target_is_unsupported() {
        assert_eq!(share_qr(&NoShareTarget, &bundle()).unwrap(), ShareOutcome::Unsupported);
    }

    #[test]
    fn test_available_target_receives_same_bytes() {
        let target = RecordingTarget::default();
        let bundle = bundle();

        assert_eq!(share_qr(&target, &bundle).unwrap(), ShareOutcome::Shared);
        assert_eq!(target.shared.borrow().as_slice(), &[bundle]);
    }

    #[test]
    fn test_save_writes_png_under_bundle_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_qr(&bundle(), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "Ana-Lee-qrcode.png");
        assert_eq!(fs::read(path).unwrap(), b"\x89PNG");
    }
}
