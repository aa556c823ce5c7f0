//! Rule checks for a finished route.
//!
//! The search only ever produces routes that pass these checks. They are
//! run once more on the final route before it is saved, so a broken
//! route is reported instead of silently written out.

use crate::domain::{Minute, ServiceId, Station};

use super::config::SearchConfig;
use super::state::RouteLeg;

/// A rule a route breaks. `leg` is the zero-based position in the route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplianceError {
    /// First leg leaves from somewhere other than the start
    #[error("route starts at {found}, expected {expected}")]
    WrongStart { expected: Station, found: Station },

    /// Leg departs from a different station than the previous one arrived at
    #[error("leg {leg} departs from {departs_from} but the route is at {arrived_at}")]
    Broken {
        leg: usize,
        arrived_at: Station,
        departs_from: Station,
    },

    /// Wait before a leg is outside the transfer window
    #[error("leg {leg} waits {waiting_mins} minutes, outside the transfer window")]
    TransferWindow { leg: usize, waiting_mins: i64 },

    /// Leg arrives after the end of the run
    #[error("leg {leg} arrives at {arrival}, after the end time")]
    AfterEnd { leg: usize, arrival: Minute },
}

/// Check a route ridden from `start_station` at `start_time`.
///
/// Verifies that legs chain station to station, that every wait fits the
/// transfer window (staying on the same service may leave at once), and
/// that nothing arrives after the end time.
pub fn check_route(
    route: &[RouteLeg],
    config: &SearchConfig,
    start_station: &Station,
    start_time: Minute,
) -> Result<(), ComplianceError> {
    let mut station = start_station;
    let mut clock = start_time;
    let mut previous: Option<&ServiceId> = None;

    for (i, entry) in route.iter().enumerate() {
        let leg = &entry.leg;

        if leg.origin() != station {
            return Err(if i == 0 {
                ComplianceError::WrongStart {
                    expected: station.clone(),
                    found: leg.origin().clone(),
                }
            } else {
                ComplianceError::Broken {
                    leg: i,
                    arrived_at: station.clone(),
                    departs_from: leg.origin().clone(),
                }
            });
        }

        let waiting_mins = leg.departure() - clock;
        let same_service = previous == Some(leg.service());
        if !config.allows_wait(waiting_mins, same_service) {
            return Err(ComplianceError::TransferWindow {
                leg: i,
                waiting_mins,
            });
        }

        if leg.arrival() > config.end_time {
            return Err(ComplianceError::AfterEnd {
                leg: i,
                arrival: leg.arrival(),
            });
        }

        station = leg.destination();
        clock = leg.arrival();
        previous = Some(leg.service());
    }

    Ok(())
}
