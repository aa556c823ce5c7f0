//! Candidate scoring and forking, shared by every strategy.

use std::sync::Arc;

use crate::domain::Leg;
use crate::network::Network;
use crate::timetable::TimetableIndex;

use super::config::SearchConfig;
use super::ledger::LedgerError;
use super::state::SearchState;

/// An eligible next leg, scored from a given state.
#[derive(Debug, Clone)]
struct Candidate {
    leg: Arc<Leg>,
    counted_km: f64,
    score: f64,
}

/// Credited kilometres per minute spent, counting the wait before boarding.
fn score(counted_km: f64, waiting_mins: i64, duration_mins: i64) -> f64 {
    counted_km / (waiting_mins + duration_mins) as f64
}

/// Children of `state`: the `branching_factor` best-scoring eligible legs,
/// best first. Equal scores keep departure order.
pub(crate) fn expand(
    state: &SearchState,
    index: &TimetableIndex,
    network: &Network,
    config: &SearchConfig,
) -> Result<Vec<SearchState>, LedgerError> {
    let legs = index.eligible(state.station(), state.clock(), state.previous_service(), config);

    let mut candidates = legs
        .into_iter()
        .map(|leg| {
            let counted_km = state.ledger().countable_distance(&leg, network)?;
            let waiting_mins = leg.departure() - state.clock();
            Ok(Candidate {
                score: score(counted_km, waiting_mins, leg.duration_mins()),
                counted_km,
                leg,
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(config.branching_factor);

    candidates
        .into_iter()
        .map(|c| state.fork(c.leg, c.counted_km, network))
        .collect()
}
