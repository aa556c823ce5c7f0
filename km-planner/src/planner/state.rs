//! Search states and the incumbent best route.

use std::sync::Arc;

use tracing::info;

use crate::domain::{Leg, Minute, ServiceId, Station};
use crate::network::Network;

use super::ledger::{Ledger, LedgerError};

/// One leg of a route, with what it cost and what it earned.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    /// The leg ridden.
    pub leg: Arc<Leg>,
    /// Minutes spent waiting at the origin before departure.
    pub waiting_mins: i64,
    /// Kilometres credited for this leg.
    pub counted_km: f64,
}

/// Snapshot of one branch of the search.
///
/// Every branch owns its state. Forking clones the ledger and route, so
/// nothing mutable is shared between branches.
#[derive(Debug, Clone)]
pub struct SearchState {
    clock: Minute,
    station: Station,
    previous_service: Option<ServiceId>,
    counted_km: f64,
    ledger: Ledger,
    route: Vec<RouteLeg>,
}

impl SearchState {
    /// A state standing at `station` at `clock`, with nothing ridden yet.
    pub fn seed(station: Station, clock: Minute) -> Self {
        Self {
            clock,
            station,
            previous_service: None,
            counted_km: 0.0,
            ledger: Ledger::new(),
            route: Vec::new(),
        }
    }

    /// Current time: the start time, or the arrival of the last leg.
    pub fn clock(&self) -> Minute {
        self.clock
    }

    /// Current station.
    pub fn station(&self) -> &Station {
        &self.station
    }

    /// Service of the last leg ridden, if any.
    pub fn previous_service(&self) -> Option<&ServiceId> {
        self.previous_service.as_ref()
    }

    /// Kilometres credited so far.
    pub fn counted_km(&self) -> f64 {
        self.counted_km
    }

    /// Traversals recorded along this branch.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Legs ridden so far.
    pub fn route(&self) -> &[RouteLeg] {
        &self.route
    }

    /// Take `leg` from this state, producing an independent child.
    pub fn fork(
        &self,
        leg: Arc<Leg>,
        counted_km: f64,
        network: &Network,
    ) -> Result<Self, LedgerError> {
        let mut ledger = self.ledger.clone();
        ledger.record(&leg, network)?;

        let mut route = Vec::with_capacity(self.route.len() + 1);
        route.extend(self.route.iter().cloned());
        route.push(RouteLeg {
            leg: leg.clone(),
            waiting_mins: leg.departure() - self.clock,
            counted_km,
        });

        Ok(Self {
            clock: leg.arrival(),
            station: leg.destination().clone(),
            previous_service: Some(leg.service().clone()),
            counted_km: self.counted_km + counted_km,
            ledger,
            route,
        })
    }
}

/// The best state seen so far.
#[derive(Debug, Clone)]
pub struct Incumbent {
    best: SearchState,
    improvements: usize,
}

impl Incumbent {
    /// Start from the seed state.
    pub fn new(seed: SearchState) -> Self {
        Self {
            best: seed,
            improvements: 0,
        }
    }

    /// Replace the incumbent if `candidate` has strictly more credited
    /// kilometres. Returns whether it was replaced.
    pub fn offer(&mut self, candidate: &SearchState) -> bool {
        if candidate.counted_km <= self.best.counted_km {
            return false;
        }

        let gain = candidate.counted_km - self.best.counted_km;
        self.best = candidate.clone();
        self.improvements += 1;

        info!(
            km = self.best.counted_km,
            gain,
            legs = self.best.route.len(),
            station = %self.best.station,
            clock = %self.best.clock,
            "New best route"
        );
        true
    }

    /// The best state.
    pub fn best(&self) -> &SearchState {
        &self.best
    }

    /// Number of times the incumbent was replaced.
    pub fn improvements(&self) -> usize {
        self.improvements
    }

    /// Consume into the best state.
    pub fn into_best(self) -> SearchState {
        self.best
    }
}
