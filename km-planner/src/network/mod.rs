//! Distance network: neighbour distances completed with shortest paths.
//!
//! The raw distance data only knows about physically adjacent stations.
//! Express trains run between stations that are several sections apart,
//! so before a timetable can be annotated with distances the network is
//! *enhanced*: every station pair that appears together in the timetable
//! gets a distance and a stop-by-stop path, computed with Dijkstra over
//! the graph as enhanced so far.

mod error;
mod graph;
mod paths;
mod shortest;
mod store;

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::domain::Station;

pub use error::NetworkError;
pub use graph::{DistanceFormat, DistanceGraph, HectometreRecord};
pub use paths::PathTable;

/// Counts of what an enhancement pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnhanceReport {
    /// Pairs that were already neighbours.
    pub direct: usize,
    /// Pairs given a synthesized distance and path.
    pub synthesized: usize,
    /// Pairs that already had a path from an earlier pass.
    pub already_known: usize,
    /// Pairs for which no path exists.
    pub unreachable: Vec<(Station, Station)>,
}

/// Distance graph plus the path table describing every synthesized edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Network {
    graph: DistanceGraph,
    paths: PathTable,
}

impl Network {
    /// Wrap a raw neighbour graph with an empty path table.
    pub fn new(graph: DistanceGraph) -> Self {
        Self {
            graph,
            paths: PathTable::new(),
        }
    }

    /// Assemble a network from previously persisted parts.
    pub fn from_parts(graph: DistanceGraph, paths: PathTable) -> Self {
        Self { graph, paths }
    }

    /// The (possibly enhanced) distance graph.
    pub fn graph(&self) -> &DistanceGraph {
        &self.graph
    }

    /// The path table.
    pub fn paths(&self) -> &PathTable {
        &self.paths
    }

    /// Distance between two stations, if known.
    pub fn distance(&self, a: &Station, b: &Station) -> Option<f64> {
        self.graph.distance(a, b)
    }

    /// Stop-by-stop path between two stations, if known.
    pub fn path(&self, a: &Station, b: &Station) -> Option<&[Station]> {
        self.paths.get(a, b)
    }

    /// Whether the station appears in the graph.
    pub fn contains(&self, station: &Station) -> bool {
        self.graph.contains(station)
    }

    /// Complete the network for the given station pairs.
    ///
    /// Pairs are processed in the order given, skipping repeats. Pairs that
    /// are already neighbours get a two-stop path; other pairs get the
    /// shortest path over the graph as enhanced so far, with any
    /// synthesized hop expanded back into its stops. Unreachable pairs are
    /// left out and reported.
    pub fn enhance<I>(&mut self, pairs: I) -> EnhanceReport
    where
        I: IntoIterator<Item = (Station, Station)>,
    {
        let mut report = EnhanceReport::default();
        let mut seen: HashSet<(Station, Station)> = HashSet::new();

        for (from, to) in pairs {
            if from == to || !seen.insert((from.clone(), to.clone())) {
                continue;
            }

            if self.paths.get(&from, &to).is_some() {
                report.already_known += 1;
                continue;
            }

            if self.graph.distance(&from, &to).is_some() {
                self.paths.insert(vec![from, to]);
                report.direct += 1;
                continue;
            }

            match shortest::shortest_path(&self.graph, &from, &to) {
                Some((hops, km)) if km > 0.0 => {
                    let path = self.expand_hops(&hops);
                    debug!(
                        from = %from,
                        to = %to,
                        km,
                        stops = path.len(),
                        "Synthesized distance"
                    );
                    self.graph.insert(from, to, km);
                    self.paths.insert(path);
                    report.synthesized += 1;
                }
                _ => {
                    warn!(from = %from, to = %to, "No path between stations");
                    report.unreachable.push((from, to));
                }
            }
        }

        info!(
            direct = report.direct,
            synthesized = report.synthesized,
            already_known = report.already_known,
            unreachable = report.unreachable.len(),
            "Network enhanced"
        );

        report
    }

    /// Replace every synthesized hop in a Dijkstra path with the stops it
    /// stands for.
    fn expand_hops(&self, hops: &[Station]) -> Vec<Station> {
        let mut path = Vec::with_capacity(hops.len());
        if let Some(first) = hops.first() {
            path.push(first.clone());
        }
        for pair in hops.windows(2) {
            match self.paths.get(&pair[0], &pair[1]) {
                Some(inner) if inner.len() > 2 => path.extend(inner[1..].iter().cloned()),
                _ => path.push(pair[1].clone()),
            }
        }
        path
    }

    /// Load a network persisted by [`Network::save`].
    pub fn load(distances_path: &Path, paths_path: &Path) -> Result<Self, NetworkError> {
        let graph = DistanceGraph::read(distances_path, DistanceFormat::Adjacency)?;
        let paths = PathTable::read(paths_path)?;
        Ok(Self { graph, paths })
    }

    /// Persist the enhanced graph and the path table as nested JSON maps.
    pub fn save(&self, distances_path: &Path, paths_path: &Path) -> Result<(), NetworkError> {
        self.graph.write(distances_path)?;
        self.paths.write(paths_path)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn name(i: u8) -> Station {
        Station::parse(&format!("S{i}")).unwrap()
    }

    /// A connected chain S0..S9 with random section lengths, plus a few
    /// random extra neighbour links.
    fn network_strategy() -> impl Strategy<Value = Network> {
        (
            prop::collection::vec(1u32..100, 9),
            prop::collection::vec((0u8..10, 0u8..10, 1u32..300), 0..5),
        )
            .prop_map(|(chain, extra)| {
                let mut graph = DistanceGraph::new();
                for (i, hm) in chain.iter().enumerate() {
                    graph.insert(name(i as u8), name(i as u8 + 1), f64::from(*hm) / 10.0);
                }
                for (a, b, hm) in extra {
                    graph.insert(name(a), name(b), f64::from(hm) / 10.0);
                }
                Network::new(graph)
            })
    }

    proptest! {
        /// Property: after enhancement distances are symmetric and every
        /// recorded path is the exact reverse of its counterpart.
        #[test]
        fn enhanced_network_is_symmetric(
            mut network in network_strategy(),
            pairs in prop::collection::vec((0u8..10, 0u8..10), 1..20),
        ) {
            network.enhance(pairs.into_iter().map(|(a, b)| (name(a), name(b))));

            for (a, b, km) in network.graph().iter() {
                prop_assert_eq!(network.distance(b, a), Some(km));
            }
            for (a, b, path) in network.paths().iter() {
                let mut reversed = network.path(b, a).unwrap().to_vec();
                reversed.reverse();
                prop_assert_eq!(path, reversed.as_slice());
                prop_assert_eq!(path.first(), Some(a));
                prop_assert_eq!(path.last(), Some(b));
            }
        }

        /// Property: every recorded path is made of known neighbour sections
        /// whose lengths add up to the recorded distance.
        #[test]
        fn paths_follow_neighbour_sections(
            mut network in network_strategy(),
            pairs in prop::collection::vec((0u8..10, 0u8..10), 1..20),
        ) {
            let raw = network.graph().clone();
            network.enhance(pairs.into_iter().map(|(a, b)| (name(a), name(b))));

            for (a, b, path) in network.paths().iter() {
                let mut total = 0.0;
                for hop in path.windows(2) {
                    let km = raw.distance(&hop[0], &hop[1]);
                    prop_assert!(km.is_some(), "hop {:?} is not a neighbour section", hop);
                    total += km.unwrap_or_default();
                }
                let recorded = network.distance(a, b).unwrap_or_default();
                prop_assert!((total - recorded).abs() < 1e-6);
            }
        }
    }
}
