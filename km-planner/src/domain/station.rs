//! Station code type.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code {code:?}: {reason}")]
pub struct InvalidStation {
    code: String,
    reason: &'static str,
}

/// A station code such as `Ht`, `Ehv` or `Asd`.
///
/// Codes are opaque: the only requirements are that they are non-empty and
/// contain no whitespace. The code is stored behind an `Arc` so that the
/// many copies held by ledgers and route histories are cheap to clone.
///
/// # Examples
///
/// ```
/// use km_planner::domain::Station;
///
/// let ht = Station::parse("Ht").unwrap();
/// assert_eq!(ht.as_str(), "Ht");
///
/// assert!(Station::parse("").is_err());
/// assert!(Station::parse("H t").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Station(Arc<str>);

impl Station {
    /// Parse a station code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStation> {
        if s.is_empty() {
            return Err(InvalidStation {
                code: s.to_string(),
                reason: "must not be empty",
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(InvalidStation {
                code: s.to_string(),
                reason: "must not contain whitespace",
            });
        }

        Ok(Station(Arc::from(s)))
    }

    /// Parse a raw lowercase code (`"ehv"`) into the title-cased form (`"Ehv"`)
    /// used throughout the timetable.
    pub fn parse_title_case(s: &str) -> Result<Self, InvalidStation> {
        let mut chars = s.chars();
        let titled: String = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        };
        Self::parse(&titled)
    }

    /// Returns the station code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({})", self.as_str())
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Station {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Station {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Station::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(Station::parse("Ht").is_ok());
        assert!(Station::parse("Ehv").is_ok());
        assert!(Station::parse("Asdz").is_ok());
        assert!(Station::parse("A").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(Station::parse("").is_err());
    }

    #[test]
    fn reject_whitespace() {
        assert!(Station::parse(" Ht").is_err());
        assert!(Station::parse("Ht\n").is_err());
        assert!(Station::parse("E hv").is_err());
    }

    #[test]
    fn title_case() {
        assert_eq!(Station::parse_title_case("ehv").unwrap().as_str(), "Ehv");
        assert_eq!(Station::parse_title_case("HT").unwrap().as_str(), "Ht");
        assert!(Station::parse_title_case("").is_err());
    }

    #[test]
    fn display_and_debug() {
        let ht = Station::parse("Ht").unwrap();
        assert_eq!(format!("{}", ht), "Ht");
        assert_eq!(format!("{:?}", ht), "Station(Ht)");
    }

    #[test]
    fn serde_as_plain_string() {
        let ht = Station::parse("Ht").unwrap();
        let json = serde_json::to_string(&ht).unwrap();
        assert_eq!(json, "\"Ht\"");

        let back: Station = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ht);

        assert!(serde_json::from_str::<Station>("\"\"").is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = Station::parse("Asd").unwrap();
        let b = Station::parse("Ht").unwrap();
        assert!(a < b);
    }
}
