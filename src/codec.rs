//! Binary-to-text codec.
//!
//! Files travel inside the QR payload as data URLs, `data:<mime>;base64,<payload>`, using the
//! standard base64 alphabet with padding. The MIME type rides along so a decoder needs nothing
//! but the string.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::MalformedEncoding;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Encodes `bytes` as a data URL tagged with `mime_type`.
pub fn encode(bytes: &[u8], mime_type: &str) -> String {
    let payload = STANDARD.encode(bytes);
    let mut out = String::with_capacity(SCHEME.len() + mime_type.len() + BASE64_MARKER.len() + 1 + payload.len());
    out.push_str(SCHEME);
    out.push_str(mime_type);
    out.push_str(BASE64_MARKER);
    out.push(',');
    out.push_str(&payload);
    out
}

/// Splits a data URL into its MIME type and decoded bytes.
///
/// The header is everything between the scheme and the first `,`; the base64 marker is
/// stripped from its end so MIME parameters such as `;charset=utf-8` survive intact.
pub fn decode(encoded: &str) -> Result<(String, Vec<u8>), MalformedEncoding> {
    let rest = encoded.strip_prefix(SCHEME).ok_or(MalformedEncoding::MissingScheme)?;
    let (header, payload) = rest.split_once(',').ok_or(MalformedEncoding::MissingPayload)?;
    let mime_type = header.strip_suffix(BASE64_MARKER).ok_or(MalformedEncoding::NotBase64)?;
    if mime_type.is_empty() {
        return Err(MalformedEncoding::MissingMimeType);
    }
    let bytes = STANDARD.decode(payload)?;
    Ok((mime_type.to_string(), bytes))
}

/// Length of the data URL [`encode`] would produce, without encoding.
pub fn encoded_len(byte_len: usize, mime_type: &str) -> usize {
    SCHEME.len() + mime_type.len() + BASE64_MARKER.len() + 1 + byte_len.div_ceil(3) * 4
}
