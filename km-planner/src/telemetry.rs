//! Logging setup.
//!
//! Events go to the console and, without colours, to a per-run log file.
//! The level comes from `RUST_LOG` and defaults to `info`.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Error installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to create log file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Install the global subscriber, writing a copy of every event to
/// `log_path`.
pub fn init(log_path: &Path) -> Result<(), TelemetryError> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| TelemetryError::Io { path, source }
    };

    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    let file = File::create(log_path).map_err(io_error(log_path))?;

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .with(env_filter(LevelFilter::INFO))
        .try_init()?;

    Ok(())
}

/// Filter from `RUST_LOG`, or `default_level` if unset or invalid.
fn env_filter(default_level: LevelFilter) -> EnvFilter {
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    EnvFilter::try_new(rust_log).unwrap_or_else(|err| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            err,
        );
        EnvFilter::new(default_level.to_string())
    })
}
