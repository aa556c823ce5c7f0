//! Run outputs on disk.
//!
//! Everything a run produces lives under one output directory:
//!
//! ```text
//! <output_dir>/
//!   network/station_distances_enhanced.json
//!   network/intermediate_paths.json
//!   network/source.json
//!   parameters/<stamp>.json
//!   routes/<stamp>_<hectometres>.csv
//!   logs/<stamp>.log
//! ```
//!
//! The enhanced network is shared between runs; the other files are keyed
//! by the run's start stamp.

mod error;
mod route;

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::StoreError;
pub use route::write_route;

/// Format of the per-run stamp.
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// File locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    stamp: String,
}

impl OutputLayout {
    /// Layout for a run starting now.
    pub fn now(root: impl Into<PathBuf>) -> Self {
        Self::with_stamp(root, Local::now().format(STAMP_FORMAT).to_string())
    }

    /// Layout with an explicit stamp.
    pub fn with_stamp(root: impl Into<PathBuf>, stamp: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            stamp: stamp.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    pub fn enhanced_distances(&self) -> PathBuf {
        self.root
            .join("network")
            .join("station_distances_enhanced.json")
    }

    pub fn intermediate_paths(&self) -> PathBuf {
        self.root.join("network").join("intermediate_paths.json")
    }

    /// Record of the raw distance file the enhanced network was built from.
    pub fn network_source(&self) -> PathBuf {
        self.root.join("network").join("source.json")
    }

    pub fn parameters(&self) -> PathBuf {
        self.root
            .join("parameters")
            .join(format!("{}.json", self.stamp))
    }

    /// Route file, named after the credited distance in whole hectometres.
    pub fn route(&self, counted_km: f64) -> PathBuf {
        let hectometres = (counted_km * 10.0).floor() as u64;
        self.root
            .join("routes")
            .join(format!("{}_{hectometres}.csv", self.stamp))
    }

    pub fn log(&self) -> PathBuf {
        self.root.join("logs").join(format!("{}.log", self.stamp))
    }
}

/// Read a JSON file written by [`write_json`].
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as pretty JSON to `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    ensure_parent(path)?;

    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, json).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Create the parent directory of `path` if it is missing.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
