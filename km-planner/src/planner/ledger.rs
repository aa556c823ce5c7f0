//! Traversal ledger enforcing the section counting rule.
//!
//! A section is the single hop between two physically adjacent stations.
//! Every section may be credited at most twice along a route. An express
//! leg skips stations, so it is spread over the sections it runs through:
//! each of those sections is credited to the express class at most once.
//! The second credit for a section therefore always requires having
//! stopped at every station on at least one of the two rides.

use std::collections::HashMap;

use crate::domain::{Leg, ServiceClass, Station};
use crate::network::Network;

/// Number of times a section may be credited in total.
const MAX_CREDITS: u32 = 2;

/// Ledger lookup failures. Both mean the network does not cover the
/// timetable and are not recoverable.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    /// Express leg between stations with no recorded stop chain
    #[error("no intermediate path recorded for {from} -> {to}")]
    MissingPath { from: Station, to: Station },

    /// Hop of a stop chain with no known distance
    #[error("no distance recorded for section {from} -> {to}")]
    MissingSection { from: Station, to: Station },
}

/// Unordered station pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Section(Station, Station);

impl Section {
    fn new(a: &Station, b: &Station) -> Self {
        if a <= b {
            Section(a.clone(), b.clone())
        } else {
            Section(b.clone(), a.clone())
        }
    }
}

/// Traversals of one section, by service class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ClassTally {
    local: u32,
    express: u32,
}

impl ClassTally {
    fn total(&self) -> u32 {
        self.local + self.express
    }

    fn get(&self, class: ServiceClass) -> u32 {
        match class {
            ServiceClass::Local => self.local,
            ServiceClass::Express => self.express,
        }
    }

    fn bump(&mut self, class: ServiceClass) {
        match class {
            ServiceClass::Local => self.local += 1,
            ServiceClass::Express => self.express += 1,
        }
    }
}

/// Per-branch record of traversed sections.
///
/// Cloning produces a fully independent copy; branches fork by cloning
/// the ledger of their parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    sections: HashMap<Section, ClassTally>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the sections under `leg` as traversed by its class.
    pub fn record(&mut self, leg: &Leg, network: &Network) -> Result<(), LedgerError> {
        let class = leg.class();
        match section_path(leg, network)? {
            Some(path) => {
                for hop in path.windows(2) {
                    self.sections
                        .entry(Section::new(&hop[0], &hop[1]))
                        .or_default()
                        .bump(class);
                }
            }
            None => {
                self.sections
                    .entry(Section::new(leg.origin(), leg.destination()))
                    .or_default()
                    .bump(class);
            }
        }
        Ok(())
    }

    /// Kilometres of `leg` that may still be credited.
    ///
    /// A leg over a single section counts in full while that section has
    /// fewer than two traversals. A leg passing through stations is summed
    /// hop by hop under the same rule, and for an express leg a hop counts
    /// only if no express train has run over it yet.
    pub fn countable_distance(&self, leg: &Leg, network: &Network) -> Result<f64, LedgerError> {
        let Some(path) = section_path(leg, network)? else {
            let tally = self.tally(leg.origin(), leg.destination());
            return Ok(if tally.total() < MAX_CREDITS {
                leg.distance_km()
            } else {
                0.0
            });
        };

        let express = leg.class() == ServiceClass::Express;
        let mut km = 0.0;
        for hop in path.windows(2) {
            let (from, to) = (&hop[0], &hop[1]);
            let tally = self.tally(from, to);
            if tally.total() < MAX_CREDITS && !(express && tally.express > 0) {
                km += network
                    .distance(from, to)
                    .ok_or_else(|| LedgerError::MissingSection {
                        from: from.clone(),
                        to: to.clone(),
                    })?;
            }
        }
        Ok(km)
    }

    /// Total traversals of the section between `a` and `b`.
    pub fn traversals(&self, a: &Station, b: &Station) -> u32 {
        self.tally(a, b).total()
    }

    /// Traversals of the section between `a` and `b` by one class.
    pub fn traversals_by(&self, a: &Station, b: &Station, class: ServiceClass) -> u32 {
        self.tally(a, b).get(class)
    }

    /// Number of distinct sections traversed.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn tally(&self, a: &Station, b: &Station) -> ClassTally {
        self.sections
            .get(&Section::new(a, b))
            .copied()
            .unwrap_or_default()
    }
}

/// Stop chain under `leg`, or `None` when it covers a single section.
///
/// Express legs always go through the path table. A local leg between
/// stations that are not neighbours uses it too, so every ledger key
/// stays a single physical section.
fn section_path<'n>(
    leg: &Leg,
    network: &'n Network,
) -> Result<Option<&'n [Station]>, LedgerError> {
    let path = network.path(leg.origin(), leg.destination());
    match leg.class() {
        ServiceClass::Express => path.map(Some).ok_or_else(|| LedgerError::MissingPath {
            from: leg.origin().clone(),
            to: leg.destination().clone(),
        }),
        ServiceClass::Local => Ok(path.filter(|p| p.len() > 2)),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Minute, Ride, ServiceId};
    use crate::network::DistanceGraph;
    use proptest::prelude::*;

    fn name(i: u8) -> Station {
        Station::parse(&format!("S{i}")).unwrap()
    }

    /// Chain S0..S5, every pair of the chain enhanced.
    fn chain_network() -> Network {
        let mut graph = DistanceGraph::new();
        for i in 0..5u8 {
            graph.insert(name(i), name(i + 1), f64::from(i + 1));
        }
        let mut network = Network::new(graph);
        let pairs = (0..6u8).flat_map(|a| (0..6u8).map(move |b| (name(a), name(b))));
        network.enhance(pairs);
        network
    }

    fn leg(a: u8, b: u8, class: ServiceClass, network: &Network) -> Leg {
        let ride = Ride::new(
            name(a),
            name(b),
            Minute::new(0),
            Minute::new(1),
            class,
            ServiceId::new("p").unwrap(),
        )
        .unwrap();
        Leg::new(ride, network.distance(&name(a), &name(b)).unwrap()).unwrap()
    }

    fn class_strategy() -> impl Strategy<Value = ServiceClass> {
        prop_oneof![Just(ServiceClass::Local), Just(ServiceClass::Express)]
    }

    proptest! {
        /// Property: repeating one section with one class credits it in
        /// full on the first two local rides, or the first express ride,
        /// and never again.
        #[test]
        fn single_class_credit_is_non_increasing(
            a in 0u8..5,
            class in class_strategy(),
            repeats in 1usize..6,
        ) {
            let network = chain_network();
            let forward = leg(a, a + 1, class, &network);
            let full = forward.distance_km();
            let free = match class {
                ServiceClass::Local => 2,
                ServiceClass::Express => 1,
            };

            let mut ledger = Ledger::new();
            for i in 0..repeats {
                let km = ledger.countable_distance(&forward, &network).unwrap();
                let expected = if i < free { full } else { 0.0 };
                prop_assert_eq!(km, expected);
                ledger.record(&forward, &network).unwrap();
            }
        }

        /// Property: recording more traversals never increases what any
        /// leg can still be credited.
        #[test]
        fn recording_never_increases_credit(
            history in prop::collection::vec((0u8..6, 0u8..6, class_strategy()), 0..12),
            probe in (0u8..6, 0u8..6, class_strategy()),
        ) {
            let network = chain_network();
            prop_assume!(probe.0 != probe.1);
            let probe = leg(probe.0, probe.1, probe.2, &network);

            let mut ledger = Ledger::new();
            let mut previous = ledger.countable_distance(&probe, &network).unwrap();
            prop_assert!(previous <= probe.distance_km() + 1e-9);

            for (a, b, class) in history {
                if a == b {
                    continue;
                }
                ledger.record(&leg(a, b, class, &network), &network).unwrap();
                let now = ledger.countable_distance(&probe, &network).unwrap();
                prop_assert!(now <= previous + 1e-9);
                previous = now;
            }
        }
    }
}
