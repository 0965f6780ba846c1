//! Error types for every stage of the profile-to-QR pipeline.
//!
//! Each stage has its own enum so callers can tell recoverable, per-item failures
//! (ingestion, validation) apart from failures that end an operation (malformed
//! encoding, capacity overflow). [`Error`] unifies them for callers that only
//! need to report.

use std::io;

use crate::profile::ProfileField;

/// A data URL could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum MalformedEncoding {
    #[error("malformed encoding: expected a `data:` scheme")]
    MissingScheme,
    #[error("malformed encoding: missing `,` before the payload")]
    MissingPayload,
    #[error("malformed encoding: payload is not marked `;base64`")]
    NotBase64,
    #[error("malformed encoding: empty MIME type")]
    MissingMimeType,
    #[error("malformed encoding: invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
}

/// A file was refused at the ingestion boundary. The registry is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("{name}: only PDF files are supported (got `{mime_type}`)")]
    UnsupportedType { name: String, mime_type: String },
    #[error("{name} is too large ({size} bytes). Maximum size is {limit} bytes")]
    TooLarge { name: String, size: u64, limit: u64 },
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl IngestionError {
    /// Name of the file that was refused.
    pub fn file_name(&self) -> &str {
        match self {
            Self::UnsupportedType { name, .. } | Self::TooLarge { name, .. } | Self::Read { name, .. } => name,
        }
    }
}

/// What is wrong with a single form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    InvalidEmail,
}

/// One invalid form field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", field_message(.field, .problem))]
pub struct FieldError {
    pub field: ProfileField,
    pub problem: FieldProblem,
}

fn field_message(field: &ProfileField, problem: &FieldProblem) -> String {
    match problem {
        FieldProblem::Missing => format!("{} is required", field.label()),
        FieldProblem::InvalidEmail => "Invalid email address".to_string(),
    }
}

/// All field errors found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid profile: {}", join_messages(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn join_messages(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Error for `field`, if it was flagged.
    pub fn get(&self, field: ProfileField) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }
}

/// The payload could not be serialized or parsed.
#[derive(Debug, thiserror::Error)]
#[error("payload error: {0}")]
pub struct PayloadError(#[from] pub serde_json::Error);

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The payload does not fit the largest symbol at the chosen error-correction level.
    #[error("payload of {payload_bytes} bytes exceeds QR capacity of {capacity_bytes} bytes at level {level}")]
    CapacityExceeded {
        payload_bytes: usize,
        capacity_bytes: usize,
        level: char,
    },
    #[error("invalid render options: {0}")]
    InvalidOptions(String),
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to write image: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("no viewer for `{0}` documents")]
    Unsupported(String),
    #[error(transparent)]
    Malformed(#[from] MalformedEncoding),
    #[error("document could not be read: {0}")]
    Unreadable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("share target failed: {0}")]
    Target(String),
    #[error("failed to save QR code: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("editing session was abandoned")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}

/// Any pipeline failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Encoding(#[from] MalformedEncoding),
    #[error(transparent)]
    Ingestion(#[from] IngestionError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
    #[error(transparent)]
    Share(#[from] ShareError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
