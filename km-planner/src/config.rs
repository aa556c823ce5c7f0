//! Run parameters.
//!
//! A run is described by a small JSON file naming the day, the start and
//! end of the run, the transfer window and where the input data lives.
//! The same structure is written back next to each result so a route can
//! always be traced to the parameters that produced it.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Minute, Station, TimeError};
use crate::network::DistanceFormat;
use crate::planner::{SearchConfig, Strategy};

/// Errors from loading or validating a run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid configuration
    #[error("invalid config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A start or end time could not be parsed
    #[error(transparent)]
    Time(#[from] TimeError),

    /// A field has a value the search cannot work with
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Complete description of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Operating day of the timetable.
    pub day: NaiveDate,

    /// Station the route starts from.
    pub start_station: Station,

    /// Start time as "HH:MM" on `day`.
    pub start_time: String,

    /// End time as "HH:MM" on `day`. Every leg must arrive by then.
    pub end_time: String,

    #[serde(default = "default_min_transfer")]
    pub min_transfer_mins: i64,

    #[serde(default = "default_max_transfer")]
    pub max_transfer_mins: i64,

    /// Candidates kept per expansion.
    #[serde(default = "default_branching_factor")]
    pub branching_factor: usize,

    #[serde(default)]
    pub strategy: Strategy,

    /// `;`-delimited timetable CSV.
    pub timetable_path: PathBuf,

    /// Neighbour distance JSON.
    pub distances_path: PathBuf,

    #[serde(default)]
    pub distances_format: DistanceFormat,

    /// Root for the enhanced network, parameters, routes and logs.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Expansions between progress log lines.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

fn default_min_transfer() -> i64 {
    3
}

fn default_max_transfer() -> i64 {
    15
}

fn default_branching_factor() -> usize {
    2
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("runs")
}

fn default_progress_interval() -> u64 {
    10_000
}

impl RunConfig {
    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the parameters describe a searchable run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_transfer_mins < 0 {
            return Err(ConfigError::Invalid {
                field: "min_transfer_mins",
                reason: "must not be negative",
            });
        }
        if self.min_transfer_mins > self.max_transfer_mins {
            return Err(ConfigError::Invalid {
                field: "max_transfer_mins",
                reason: "must be at least min_transfer_mins",
            });
        }
        if self.branching_factor == 0 {
            return Err(ConfigError::Invalid {
                field: "branching_factor",
                reason: "must be at least 1",
            });
        }
        if self.end()? <= self.start()? {
            return Err(ConfigError::Invalid {
                field: "end_time",
                reason: "must be after start_time",
            });
        }
        Ok(())
    }

    /// Start instant.
    pub fn start(&self) -> Result<Minute, ConfigError> {
        Ok(Minute::parse_hhmm(&self.start_time, self.day)?)
    }

    /// End instant.
    pub fn end(&self) -> Result<Minute, ConfigError> {
        Ok(Minute::parse_hhmm(&self.end_time, self.day)?)
    }

    /// Search parameters for this run.
    pub fn search_config(&self) -> Result<SearchConfig, ConfigError> {
        Ok(SearchConfig::new(
            self.min_transfer_mins,
            self.max_transfer_mins,
            self.branching_factor,
            self.end()?,
            self.progress_interval,
        ))
    }
}
