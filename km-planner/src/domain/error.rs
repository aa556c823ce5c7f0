//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They
//! are distinct from I/O and data-loading errors.

use super::{InvalidStation, Station, TimeError};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Station code failed validation
    #[error(transparent)]
    InvalidStation(#[from] InvalidStation),

    /// Timestamp failed to parse
    #[error(transparent)]
    InvalidTime(#[from] TimeError),

    /// Service id was empty
    #[error("service id must not be empty")]
    InvalidServiceId,

    /// Service class is not one the counting rules know about
    #[error("unknown service class: {0}")]
    UnknownServiceClass(String),

    /// Ride would not move forward in time or space
    #[error("invalid ride {from} -> {to}: {reason}")]
    InvalidRide {
        from: Station,
        to: Station,
        reason: &'static str,
    },

    /// Distance is negative or not a number
    #[error("invalid distance {distance} for {from} -> {to}")]
    InvalidDistance {
        from: Station,
        to: Station,
        distance: f64,
    },
}
