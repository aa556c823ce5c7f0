//! Network loading and persistence errors.

use std::path::PathBuf;

use crate::domain::DomainError;

/// Errors from reading or writing distance networks.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Reading or writing a network file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A network file was not valid JSON of the expected shape
    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A distance record carried an invalid station code or distance
    #[error("invalid distance record: {0}")]
    Record(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_file() {
        let err = NetworkError::Io {
            path: PathBuf::from("data/station_distances.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            err.to_string(),
            "I/O error on data/station_distances.json: missing"
        );
    }
}
