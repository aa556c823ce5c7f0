//! Search driver.
//!
//! Runs a [`Frontier`] to exhaustion: take a state, expand it into its
//! best-scoring children, hand them back to the frontier. The incumbent
//! best route is kept up to date throughout, so the run can be stopped at
//! any point and still report a result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::domain::{Minute, Station};
use crate::network::Network;
use crate::timetable::TimetableIndex;

use super::config::SearchConfig;
use super::expand::expand;
use super::ledger::LedgerError;
use super::state::{Incumbent, SearchState};
use super::strategy::Frontier;

/// Error from route search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The network does not cover a leg of the timetable
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Start station is not part of the network
    #[error("unknown start station: {0}")]
    UnknownStartStation(Station),
}

/// Shared stop request.
///
/// Cloning shares the flag. The search checks it between expansions.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the search to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether a stop was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best state found (the seed if nothing improved on it).
    pub best: SearchState,

    /// Number of states expanded.
    pub iterations: u64,

    /// Number of times a better route was found.
    pub improvements: usize,

    /// Whether the run was stopped before the frontier was exhausted.
    pub interrupted: bool,
}

/// Route planner over a prepared timetable and network.
pub struct Planner<'a> {
    index: &'a TimetableIndex,
    network: &'a Network,
    config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(index: &'a TimetableIndex, network: &'a Network, config: &'a SearchConfig) -> Self {
        Self {
            index,
            network,
            config,
        }
    }

    /// Initial state at `station` and `start`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownStartStation`] if the station is not
    /// in the network.
    pub fn seed(&self, station: Station, start: Minute) -> Result<SearchState, SearchError> {
        if !self.network.contains(&station) {
            return Err(SearchError::UnknownStartStation(station));
        }
        Ok(SearchState::seed(station, start))
    }

    /// Children of `state`, best first.
    pub fn expand(&self, state: &SearchState) -> Result<Vec<SearchState>, SearchError> {
        Ok(expand(state, self.index, self.network, self.config)?)
    }

    /// Explore from `seed` until the frontier is empty or `cancel` is set.
    pub fn run(
        &self,
        seed: SearchState,
        frontier: &mut dyn Frontier,
        cancel: &CancelFlag,
    ) -> Result<SearchOutcome, SearchError> {
        info!(
            station = %seed.station(),
            start = %seed.clock(),
            end = %self.config.end_time,
            branching_factor = self.config.branching_factor,
            "Starting search"
        );

        let mut incumbent = Incumbent::new(seed.clone());
        frontier.extend(vec![seed], &mut incumbent);

        let mut iterations: u64 = 0;
        let mut interrupted = false;

        loop {
            if cancel.is_cancelled() {
                info!(iterations, "Search interrupted");
                interrupted = true;
                break;
            }

            let Some(state) = frontier.next(&mut incumbent) else {
                break;
            };
            iterations += 1;

            let children = self.expand(&state)?;
            if children.is_empty() {
                debug!(
                    station = %state.station(),
                    clock = %state.clock(),
                    km = state.counted_km(),
                    legs = state.route().len(),
                    "Branch terminated"
                );
            }
            frontier.extend(children, &mut incumbent);

            if self.config.progress_interval > 0 && iterations % self.config.progress_interval == 0
            {
                info!(
                    iterations,
                    frontier = frontier.len(),
                    best_km = incumbent.best().counted_km(),
                    "Search progress"
                );
            }
        }

        let improvements = incumbent.improvements();
        let best = incumbent.into_best();

        info!(
            iterations,
            improvements,
            km = best.counted_km(),
            legs = best.route().len(),
            interrupted,
            "Search finished"
        );

        Ok(SearchOutcome {
            best,
            iterations,
            improvements,
            interrupted,
        })
    }
}
