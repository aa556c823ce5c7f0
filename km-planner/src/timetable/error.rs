//! Timetable loading errors.

use std::path::PathBuf;

use crate::domain::{DomainError, Station};

/// Errors raised while reading or annotating the timetable.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// The CSV file could not be opened or read
    #[error("failed to read timetable {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row names a service class the counting rules do not know
    #[error("{} line {line}: {source}", path.display())]
    UnknownServiceClass {
        path: PathBuf,
        line: u64,
        #[source]
        source: DomainError,
    },

    /// No distance is known for a ride's station pair
    #[error("no distance known for {from} -> {to}")]
    MissingDistance { from: Station, to: Station },

    /// A ride could not be turned into a leg
    #[error(transparent)]
    Record(#[from] DomainError),
}
