//! Exploration order.
//!
//! Both strategies share scoring and forking ([`super::expand`]); they only
//! differ in which state is expanded next and when children are offered
//! to the incumbent.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::{Incumbent, SearchState};

/// A collection of states waiting to be expanded.
pub trait Frontier {
    /// Add the children of the state just expanded, best first.
    fn extend(&mut self, children: Vec<SearchState>, incumbent: &mut Incumbent);

    /// Take the next state to expand, or `None` when exhausted.
    fn next(&mut self, incumbent: &mut Incumbent) -> Option<SearchState>;

    /// Number of states waiting.
    fn len(&self) -> usize;

    /// Returns true if no states are waiting.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Greedy depth-first exploration.
///
/// Behaves exactly like recursing into each child in score order: a child
/// is compared with the incumbent right before its own subtree is
/// explored. An explicit stack replaces the call stack, so deep routes
/// cannot overflow it.
#[derive(Debug, Default)]
pub struct DepthFirst {
    stack: Vec<SearchState>,
}

impl DepthFirst {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for DepthFirst {
    fn extend(&mut self, children: Vec<SearchState>, _incumbent: &mut Incumbent) {
        self.stack.extend(children.into_iter().rev());
    }

    fn next(&mut self, incumbent: &mut Incumbent) -> Option<SearchState> {
        let state = self.stack.pop()?;
        incumbent.offer(&state);
        Some(state)
    }

    fn len(&self) -> usize {
        self.stack.len()
    }
}

/// Heap entry: most credited kilometres first, then earliest pushed.
#[derive(Debug)]
struct Ranked {
    counted_km: f64,
    seq: u64,
    state: SearchState,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.counted_km
            .total_cmp(&other.counted_km)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

/// Best-first exploration over a max-heap of credited kilometres.
///
/// Children are offered to the incumbent as soon as they are pushed, so
/// an interrupted run keeps the best state generated so far.
#[derive(Debug, Default)]
pub struct BestFirst {
    heap: BinaryHeap<Ranked>,
    seq: u64,
}

impl BestFirst {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for BestFirst {
    fn extend(&mut self, children: Vec<SearchState>, incumbent: &mut Incumbent) {
        for state in children {
            incumbent.offer(&state);
            self.seq += 1;
            self.heap.push(Ranked {
                counted_km: state.counted_km(),
                seq: self.seq,
                state,
            });
        }
    }

    fn next(&mut self, _incumbent: &mut Incumbent) -> Option<SearchState> {
        self.heap.pop().map(|ranked| ranked.state)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Which exploration order to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// [`DepthFirst`]
    DepthFirst,
    /// [`BestFirst`]
    #[default]
    BestFirst,
}

impl Strategy {
    /// A fresh, empty frontier for this strategy.
    pub fn frontier(&self) -> Box<dyn Frontier + Send> {
        match self {
            Strategy::DepthFirst => Box::new(DepthFirst::new()),
            Strategy::BestFirst => Box::new(BestFirst::new()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::DepthFirst => f.write_str("depth_first"),
            Strategy::BestFirst => f.write_str("best_first"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Leg, Minute, Ride, ServiceClass, ServiceId, Station};
    use crate::network::{DistanceGraph, Network};
    use std::sync::Arc;

    fn station(s: &str) -> Station {
        Station::parse(s).unwrap()
    }

    fn network() -> Network {
        let mut graph = DistanceGraph::new();
        for to in ["B", "C", "D"] {
            graph.insert(station("A"), station(to), 1.0);
        }
        Network::new(graph)
    }

    /// A child of the seed at `to` credited with `km`.
    fn child(to: &str, km: f64, network: &Network) -> SearchState {
        let ride = Ride::new(
            station("A"),
            station(to),
            Minute::new(0),
            Minute::new(10),
            ServiceClass::Local,
            ServiceId::new("1").unwrap(),
        )
        .unwrap();
        let leg = Arc::new(Leg::new(ride, 1.0).unwrap());
        seed().fork(leg, km, network).unwrap()
    }

    fn seed() -> SearchState {
        SearchState::seed(station("A"), Minute::new(0))
    }

    fn drain(frontier: &mut dyn Frontier, incumbent: &mut Incumbent) -> Vec<String> {
        std::iter::from_fn(|| frontier.next(incumbent))
            .map(|s| s.station().to_string())
            .collect()
    }

    #[test]
    fn depth_first_pops_in_given_order() {
        let network = network();
        let mut incumbent = Incumbent::new(seed());
        let mut frontier = DepthFirst::new();

        frontier.extend(
            vec![child("B", 1.0, &network), child("C", 3.0, &network)],
            &mut incumbent,
        );
        assert_eq!(frontier.len(), 2);
        assert_eq!(incumbent.improvements(), 0);

        assert_eq!(drain(&mut frontier, &mut incumbent), vec!["B", "C"]);
        assert!(frontier.is_empty());
        assert_eq!(incumbent.improvements(), 2);
        assert_eq!(incumbent.best().station(), &station("C"));
    }

    #[test]
    fn depth_first_explores_subtree_before_sibling() {
        let network = network();
        let mut incumbent = Incumbent::new(seed());
        let mut frontier = DepthFirst::new();

        frontier.extend(
            vec![child("B", 1.0, &network), child("C", 1.0, &network)],
            &mut incumbent,
        );
        let first = frontier.next(&mut incumbent).unwrap();
        assert_eq!(first.station(), &station("B"));

        frontier.extend(vec![child("D", 2.0, &network)], &mut incumbent);
        assert_eq!(drain(&mut frontier, &mut incumbent), vec!["D", "C"]);
    }

    #[test]
    fn best_first_pops_highest_credit() {
        let network = network();
        let mut incumbent = Incumbent::new(seed());
        let mut frontier = BestFirst::new();

        frontier.extend(
            vec![
                child("B", 1.0, &network),
                child("C", 3.0, &network),
                child("D", 2.0, &network),
            ],
            &mut incumbent,
        );
        // Offered on push
        assert_eq!(incumbent.best().station(), &station("C"));
        assert_eq!(drain(&mut frontier, &mut incumbent), vec!["C", "D", "B"]);
    }

    #[test]
    fn best_first_ties_go_to_earliest_pushed() {
        let network = network();
        let mut incumbent = Incumbent::new(seed());
        let mut frontier = BestFirst::new();

        frontier.extend(vec![child("B", 2.0, &network)], &mut incumbent);
        frontier.extend(
            vec![child("C", 2.0, &network), child("D", 2.0, &network)],
            &mut incumbent,
        );
        assert_eq!(drain(&mut frontier, &mut incumbent), vec!["B", "C", "D"]);
    }

    #[test]
    fn strategy_names() {
        let strategy: Strategy = serde_json::from_str("\"depth_first\"").unwrap();
        assert_eq!(strategy, Strategy::DepthFirst);
        assert_eq!(Strategy::default(), Strategy::BestFirst);
        assert_eq!(Strategy::BestFirst.to_string(), "best_first");
        assert!(Strategy::DepthFirst.frontier().is_empty());
    }
}
