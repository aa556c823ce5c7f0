//! Route CSV output.

use std::path::Path;

use serde::Serialize;

use crate::planner::RouteLeg;

use super::{StoreError, ensure_parent};

/// One row of a saved route. Column names match the timetable export, with
/// the waiting time and credited distance appended.
#[derive(Debug, Serialize)]
struct RouteRow<'a> {
    #[serde(rename = "Station")]
    station: &'a str,
    #[serde(rename = "To")]
    to: &'a str,
    #[serde(rename = "Departure")]
    departure: String,
    #[serde(rename = "Arrival")]
    arrival: String,
    #[serde(rename = "Distance")]
    distance: String,
    #[serde(rename = "Type")]
    class: &'static str,
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Waiting_Time")]
    waiting_mins: i64,
    #[serde(rename = "Distance_Counted")]
    counted: String,
}

impl<'a> From<&'a RouteLeg> for RouteRow<'a> {
    fn from(entry: &'a RouteLeg) -> Self {
        let leg = &entry.leg;
        Self {
            station: leg.origin().as_str(),
            to: leg.destination().as_str(),
            departure: leg.departure().to_string(),
            arrival: leg.arrival().to_string(),
            distance: format!("{:.1}", leg.distance_km()),
            class: leg.class().code(),
            id: leg.service().as_str(),
            waiting_mins: entry.waiting_mins,
            counted: format!("{:.1}", entry.counted_km),
        }
    }
}

/// Write a route as `;`-delimited CSV. An empty route still gets a header.
pub fn write_route(path: &Path, route: &[RouteLeg]) -> Result<(), StoreError> {
    ensure_parent(path)?;

    let csv_error = |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;

    writer
        .write_record([
            "Station",
            "To",
            "Departure",
            "Arrival",
            "Distance",
            "Type",
            "ID",
            "Waiting_Time",
            "Distance_Counted",
        ])
        .map_err(csv_error)?;
    for entry in route {
        writer.serialize(RouteRow::from(entry)).map_err(csv_error)?;
    }

    writer.flush().map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
