//! Stop-by-stop paths between station pairs.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Station;

use super::NetworkError;
use super::store::{read_json, write_json};

/// Map `station -> station -> [stations]` of full stop chains.
///
/// A path always starts with its key station and ends with its target.
/// Insertion records the reverse chain as well, so the path for `(b, a)`
/// is exactly the path for `(a, b)` read backwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathTable {
    paths: BTreeMap<Station, BTreeMap<Station, Vec<Station>>>,
}

impl PathTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a table written by [`PathTable::write`].
    pub fn read(path: &Path) -> Result<Self, NetworkError> {
        read_json(path)
    }

    /// Write the table as nested JSON maps.
    pub fn write(&self, path: &Path) -> Result<(), NetworkError> {
        write_json(path, self)
    }

    /// Record a path and its reverse. Paths with fewer than two stops are
    /// ignored.
    pub fn insert(&mut self, path: Vec<Station>) {
        let (Some(first), Some(last)) = (path.first().cloned(), path.last().cloned()) else {
            return;
        };
        if path.len() < 2 || first == last {
            return;
        }

        let mut reversed = path.clone();
        reversed.reverse();

        self.paths
            .entry(first.clone())
            .or_default()
            .insert(last.clone(), path);
        self.paths.entry(last).or_default().insert(first, reversed);
    }

    /// The stop chain from `a` to `b`, if recorded.
    pub fn get(&self, a: &Station, b: &Station) -> Option<&[Station]> {
        self.paths.get(a)?.get(b).map(Vec::as_slice)
    }

    /// Whether the recorded path skips stations (more than one hop).
    pub fn is_multi_hop(&self, a: &Station, b: &Station) -> bool {
        self.get(a, b).is_some_and(|p| p.len() > 2)
    }

    /// Number of directed entries.
    pub fn len(&self) -> usize {
        self.paths.values().map(BTreeMap::len).sum()
    }

    /// Returns true if no paths are recorded.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over every directed entry `(a, b, path)`.
    pub fn iter(&self) -> impl Iterator<Item = (&Station, &Station, &[Station])> {
        self.paths
            .iter()
            .flat_map(|(a, t)| t.iter().map(move |(b, p)| (a, b, p.as_slice())))
    }
}
