//! Service identity and class.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::DomainError;

/// Identifier grouping the legs of one physically running train.
///
/// Identifiers are opaque; the only validation is that they are non-empty.
/// Two consecutive legs with the same id can be ridden without a transfer
/// buffer, since the traveller simply stays on board.
///
/// # Examples
///
/// ```
/// use km_planner::domain::ServiceId;
///
/// let id = ServiceId::new("16911556").unwrap();
/// assert_eq!(id.as_str(), "16911556");
///
/// assert!(ServiceId::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ServiceId(Arc<str>);

impl ServiceId {
    /// Create a service id, rejecting empty strings.
    pub fn new(s: &str) -> Result<Self, DomainError> {
        if s.trim().is_empty() {
            return Err(DomainError::InvalidServiceId);
        }
        Ok(ServiceId(Arc::from(s.trim())))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceId({})", self.as_str())
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ServiceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Category of train service, which decides how a ride is counted.
///
/// A `Local` train stops at every station on its way; an `Express` train
/// may skip stations, so a single express leg can cover several sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceClass {
    /// Stops everywhere ("Sprinter", "Stoptrein").
    Local,
    /// Skips stops ("Intercity").
    Express,
}

impl ServiceClass {
    /// Short code written to route files.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceClass::Local => "Spr",
            ServiceClass::Express => "Int",
        }
    }
}

impl FromStr for ServiceClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let class = match trimmed.to_ascii_lowercase().as_str() {
            "spr" | "local" | "l" => ServiceClass::Local,
            "int" | "express" | "e" => ServiceClass::Express,
            _ => return Err(DomainError::UnknownServiceClass(trimmed.to_string())),
        };
        Ok(class)
    }
}

impl fmt::Display for ServiceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for ServiceClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}
