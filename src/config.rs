//! Runtime configuration.
//!
//! Every section has defaults, so an empty TOML file (or no file at all) is a valid
//! configuration. Example:
//!
//! ```toml
//! [ingestion]
//! max_document_bytes = 1048576
//!
//! [render]
//! ecc = "high"
//! target_size = 300
//!
//! [session]
//! submit_delay_ms = 1500
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::document::IngestionPolicy;
use crate::error::ConfigError;
use crate::qrcode::QrCodeEcc;
use crate::render::{RenderOptions, MAX_BORDER, MAX_TARGET_SIZE};

/// 2 MiB per attached document.
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 2 * 1024 * 1024;
pub const DEFAULT_TARGET_SIZE: u32 = 250;
pub const DEFAULT_BORDER: u32 = 4;
/// Floor for the simulated processing delay on submit.
pub const MIN_SUBMIT_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ingestion: IngestionConfig,
    pub render: RenderConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    pub max_document_bytes: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub ecc: QrCodeEcc,
    /// Side of the rendered image in pixels, quiet zone included.
    pub target_size: u32,
    /// Quiet zone width in modules.
    pub border: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ecc: QrCodeEcc::High,
            target_size: DEFAULT_TARGET_SIZE,
            border: DEFAULT_BORDER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub submit_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: MIN_SUBMIT_DELAY_MS,
        }
    }
}

impl SessionConfig {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

impl Config {
    /// Parses and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` when given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingestion.max_document_bytes == 0 {
            return Err(invalid("ingestion.max_document_bytes", "must be greater than zero"));
        }
        if self.render.target_size == 0 {
            return Err(invalid("render.target_size", "must be greater than zero"));
        }
        if self.render.target_size > MAX_TARGET_SIZE {
            return Err(invalid(
                "render.target_size",
                format!("must be at most {MAX_TARGET_SIZE}"),
            ));
        }
        if self.render.border > MAX_BORDER {
            return Err(invalid("render.border", format!("must be at most {MAX_BORDER}")));
        }
        if self.session.submit_delay_ms < MIN_SUBMIT_DELAY_MS {
            return Err(invalid(
                "session.submit_delay_ms",
                format!("must be at least {MIN_SUBMIT_DELAY_MS}"),
            ));
        }
        Ok(())
    }

    pub fn ingestion_policy(&self) -> IngestionPolicy {
        IngestionPolicy {
            max_bytes: self.ingestion.max_document_bytes,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            ecc: self.render.ecc,
            target_size: self.render.target_size,
            border: self.render.border,
            ..RenderOptions::default()
        }
    }
}

fn invalid(path: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.ingestion.max_document_bytes, 2 * 1024 * 1024);
        assert_eq!(config.render.ecc, QrCodeEcc::High);
        assert_eq!(config.session.submit_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::from_toml("[render]\necc = \"quartile\"\n").unwrap();
        assert_eq!(config.render.ecc, QrCodeEcc::Quartile);
        assert_eq!(config.render.target_size, DEFAULT_TARGET_SIZE);
        assert_eq!(config.ingestion, IngestionConfig::default());
    }

    #[test]
    fn test_rejects_short_submit_delay() {
        let err = Config::from_toml("[session]\nsubmit_delay_ms = 10\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { ref path, .. } if path == "session.submit_delay_ms"));
    }

    #[test]
    fn test_rejects_zero_limits() {
        assert!(Config::from_toml("[ingestion]\nmax_document_bytes = 0\n").is_err());
        assert!(Config::from_toml("[render]\ntarget_size = 0\n").is_err());
    }

    #[test]
    fn test_rejects_huge_border() {
        let err = Config::from_toml("[render]\nborder = 3000000000\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { ref path, .. } if path == "render.border"));
        assert!(Config::from_toml("[render]\nborder = 64\n").is_ok());
        assert!(Config::from_toml("[render]\nborder = 65\n").is_err());
    }

    #[test]
    fn test_rejects_huge_target_size() {
        let err = Config::from_toml("[render]\ntarget_size = 4294967295\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { ref path, .. } if path == "render.target_size"));
        assert!(Config::from_toml("[render]\ntarget_size = 8192\n").is_ok());
        assert!(Config::from_toml("[render]\ntarget_size = 8193\n").is_err());
    }

    #[test]
    fn test_rejects_unknown_ecc() {
        assert!(matches!(
            Config::from_toml("[render]\necc = \"ultra\"\n"),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ingestion]\nmax_document_bytes = 1024").unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.ingestion_policy().max_bytes, 1024);
        assert!(matches!(
            Config::load(Some(Path::new("/nonexistent/qiprofile.toml"))),
            Err(ConfigError::ReadFailed(_))
        ));
    }
}
