//! Reading the cleaned timetable export and attaching distances.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{DomainError, Leg, Minute, Ride, ServiceClass, ServiceId, Station};
use crate::network::DistanceGraph;

use super::TimetableError;

/// One row of the `;`-delimited timetable file.
///
/// Extra columns (a processed export may carry `Distance`, `Speed`, ...)
/// are ignored.
#[derive(Debug, Deserialize)]
struct TimetableRow {
    #[serde(rename = "Station")]
    station: String,
    #[serde(rename = "To")]
    to: String,
    #[serde(rename = "Departure")]
    departure: String,
    #[serde(rename = "Arrival")]
    arrival: String,
    #[serde(rename = "Type")]
    class: String,
    #[serde(rename = "ID")]
    id: String,
}

impl TimetableRow {
    fn into_ride(self, class: ServiceClass) -> Result<Ride, DomainError> {
        Ride::new(
            Station::parse(&self.station)?,
            Station::parse(&self.to)?,
            Minute::parse_timestamp(&self.departure)?,
            Minute::parse_timestamp(&self.arrival)?,
            class,
            ServiceId::new(&self.id)?,
        )
    }
}

/// Read every ride from a timetable CSV with header
/// `Station;To;Departure;Arrival;Type;ID`.
///
/// Rows with unparseable times or stations, or that would travel backwards
/// in time, are logged and skipped. An unknown service class aborts the
/// load: the counting rules cannot be applied to it.
pub fn read_rides(path: &Path) -> Result<Vec<Ride>, TimetableError> {
    let csv_error = |source| TimetableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut rides = Vec::new();
    let mut skipped = 0usize;
    let mut record = csv::StringRecord::new();

    while reader.read_record(&mut record).map_err(csv_error)? {
        let line = record.position().map_or(0, |p| p.line());

        let row: TimetableRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                warn!(path = %path.display(), line, error = %e, "Skipping malformed row");
                skipped += 1;
                continue;
            }
        };

        let class: ServiceClass =
            row.class
                .parse()
                .map_err(|source| TimetableError::UnknownServiceClass {
                    path: path.to_path_buf(),
                    line,
                    source,
                })?;

        match row.into_ride(class) {
            Ok(ride) => rides.push(ride),
            Err(e) => {
                warn!(path = %path.display(), line, error = %e, "Skipping invalid row");
                skipped += 1;
            }
        }
    }

    debug!(path = %path.display(), rides = rides.len(), skipped, "Read timetable");
    Ok(rides)
}

/// Distinct `(origin, destination)` pairs in first-encounter order.
pub fn station_pairs(rides: &[Ride]) -> Vec<(Station, Station)> {
    let mut seen = HashSet::new();
    rides
        .iter()
        .map(|r| (r.origin().clone(), r.destination().clone()))
        .filter(|pair| seen.insert(pair.clone()))
        .collect()
}

/// Attach a distance to every ride.
///
/// # Errors
///
/// Fails on the first ride whose station pair has no known distance.
pub fn annotate(rides: Vec<Ride>, graph: &DistanceGraph) -> Result<Vec<Leg>, TimetableError> {
    rides
        .into_iter()
        .map(|ride| {
            let km = graph.distance(ride.origin(), ride.destination()).ok_or_else(|| {
                TimetableError::MissingDistance {
                    from: ride.origin().clone(),
                    to: ride.destination().clone(),
                }
            })?;
            Ok(Leg::new(ride, km)?)
        })
        .collect()
}
