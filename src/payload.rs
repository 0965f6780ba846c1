//! The text stored inside the QR symbol.
//!
//! A payload is the compact JSON form of a [`ProfileRecord`]. Struct fields serialize in
//! declaration order and optional fields are omitted when absent, so one record always yields
//! the same bytes. Nothing is compressed or chunked: a profile carrying real PDF attachments
//! will usually be too large for a single symbol, and that surfaces as a render error.

use crate::error::PayloadError;
use crate::profile::ProfileRecord;
use crate::qrcode::{byte_capacity, QrCodeEcc, Version};

pub fn encode(profile: &ProfileRecord) -> Result<String, PayloadError> {
    Ok(serde_json::to_string(profile)?)
}

/// Parses a scanned payload back into a record.
pub fn decode(payload: &str) -> Result<ProfileRecord, PayloadError> {
    Ok(serde_json::from_str(payload)?)
}

/// Bytes a payload may occupy in the largest symbol at `ecc`.
pub fn capacity(ecc: QrCodeEcc) -> usize {
    byte_capacity(ecc, Version::MAX)
}

/// Whether `payload` fits a single symbol at `ecc`.
pub fn fits(payload: &str, ecc: QrCodeEcc) -> bool {
    payload.len() <= capacity(ecc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentRecord, IngestionPolicy};
    use crate::profile::finalize;
    use crate::test_support::{ana_lee, pdf_file};

    #[test]
    fn test_encoding_is_deterministic() {
        let record = finalize(&ana_lee(), &[]).unwrap();
        assert_eq!(encode(&record).unwrap(), encode(&record).unwrap());
    }

    #[test]
    fn test_field_order_is_fixed() {
        let mut draft = ana_lee();
        draft.company = Some("Acme".into());
        let record = finalize(&draft, &[]).unwrap();
        let payload = encode(&record).unwrap();

        let positions: Vec<usize> = [
            "\"id\"", "\"firstName\"", "\"lastName\"", "\"email\"", "\"phone\"", "\"address\"", "\"city\"",
            "\"state\"", "\"zipCode\"", "\"country\"", "\"company\"", "\"createdAt\"", "\"documents\"",
        ]
        .iter()
        .map(|key| payload.find(key).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{payload}");
        assert!(!payload.contains("jobTitle"));
    }

    #[test]
    fn test_decode_restores_record_with_documents() {
        let doc = DocumentRecord::ingest(&pdf_file("ssc.pdf", 1), &IngestionPolicy::default()).unwrap();
        let record = finalize(&ana_lee(), &[doc]).unwrap();

        let decoded = decode(&encode(&record).unwrap()).unwrap();

        assert_eq!(decoded, record);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("not json").is_err());
        assert!(decode("{\"id\":\"x\"}").is_err());
    }

    #[test]
    fn test_capacity_matches_level() {
        assert_eq!(capacity(QrCodeEcc::High), 1273);
        assert!(capacity(QrCodeEcc::Low) > capacity(QrCodeEcc::High));
        assert!(fits(&"a".repeat(1273), QrCodeEcc::High));
        assert!(!fits(&"a".repeat(1274), QrCodeEcc::High));
    }

    #[test]
    fn test_minimal_profile_fits_at_high() {
        let record = finalize(&ana_lee(), &[]).unwrap();
        assert!(fits(&encode(&record).unwrap(), QrCodeEcc::High));
    }
}
