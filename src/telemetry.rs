//! Logging setup for the binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_DIRECTIVE: &str = "qiprofile=info";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (or [`DEFAULT_DIRECTIVE`]) applies.
pub fn init_tracing(default_directive: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let fallback = default_directive.unwrap_or(DEFAULT_DIRECTIVE);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    tracing::debug!(fallback, "tracing initialised");
    Ok(())
}
