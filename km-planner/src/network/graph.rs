//! Symmetric station-to-station distance graph.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Station};

use super::NetworkError;
use super::store::{read_json, write_json};

/// Adjacency map `station -> station -> km`.
///
/// Every insertion writes both directions, so `distance(a, b)` and
/// `distance(b, a)` always agree. Ordered maps keep iteration (and the
/// persisted JSON) deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistanceGraph {
    edges: BTreeMap<Station, BTreeMap<Station, f64>>,
}

/// One entry of the raw neighbour-distance export.
///
/// Station codes are lowercase and distances are in hectometres:
/// `{"fromStation": "ehv", "toStation": "ehs", "distance": 26}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HectometreRecord {
    pub from_station: String,
    pub to_station: String,
    pub distance: u32,
}

/// On-disk shape of a distance file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceFormat {
    /// Nested map in kilometres: `{"Ehv": {"Ehs": 2.6}}`.
    #[default]
    Adjacency,
    /// List of [`HectometreRecord`]s.
    HectometreList,
}

impl DistanceGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a possibly one-sided adjacency map, filling in the
    /// reverse direction of every entry.
    pub fn from_adjacency(adjacency: BTreeMap<Station, BTreeMap<Station, f64>>) -> Self {
        let mut graph = Self::new();
        for (from, neighbours) in adjacency {
            for (to, km) in neighbours {
                graph.insert(from.clone(), to, km);
            }
        }
        graph
    }

    /// Build a graph from raw hectometre records, title-casing station
    /// codes and converting distances to kilometres.
    pub fn from_hectometre_records(records: &[HectometreRecord]) -> Result<Self, DomainError> {
        let mut graph = Self::new();
        for record in records {
            let from = Station::parse_title_case(&record.from_station)?;
            let to = Station::parse_title_case(&record.to_station)?;
            graph.insert(from, to, f64::from(record.distance) / 10.0);
        }
        Ok(graph)
    }

    /// Read a distance file in the given format.
    pub fn read(path: &Path, format: DistanceFormat) -> Result<Self, NetworkError> {
        match format {
            DistanceFormat::Adjacency => {
                let adjacency: BTreeMap<Station, BTreeMap<Station, f64>> = read_json(path)?;
                Ok(Self::from_adjacency(adjacency))
            }
            DistanceFormat::HectometreList => {
                let records: Vec<HectometreRecord> = read_json(path)?;
                Ok(Self::from_hectometre_records(&records)?)
            }
        }
    }

    /// Write the graph as a nested adjacency map.
    pub fn write(&self, path: &Path) -> Result<(), NetworkError> {
        write_json(path, self)
    }

    /// Insert an undirected edge. Self-loops are ignored.
    pub fn insert(&mut self, a: Station, b: Station, km: f64) {
        if a == b {
            return;
        }
        self.edges
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), km);
        self.edges.entry(b).or_default().insert(a, km);
    }

    /// Distance between two stations, if an edge is known.
    pub fn distance(&self, a: &Station, b: &Station) -> Option<f64> {
        self.edges.get(a)?.get(b).copied()
    }

    /// All stations with a known edge from `station`, in code order.
    pub fn neighbours<'a>(
        &'a self,
        station: &Station,
    ) -> impl Iterator<Item = (&'a Station, f64)> + use<'a> {
        self.edges
            .get(station)
            .into_iter()
            .flat_map(|n| n.iter().map(|(s, km)| (s, *km)))
    }

    /// Whether the station appears in the graph at all.
    pub fn contains(&self, station: &Station) -> bool {
        self.edges.contains_key(station)
    }

    /// Number of stations.
    pub fn station_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    /// Iterate over every directed entry `(a, b, km)`.
    pub fn iter(&self) -> impl Iterator<Item = (&Station, &Station, f64)> {
        self.edges
            .iter()
            .flat_map(|(a, n)| n.iter().map(move |(b, km)| (a, b, *km)))
    }
}
