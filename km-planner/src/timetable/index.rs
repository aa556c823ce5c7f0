//! Departure index answering "which legs can I take next from here?".

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Leg, Minute, ServiceId, Station};
use crate::planner::SearchConfig;

/// Legs grouped by origin station, each group sorted by departure.
///
/// Sorting is stable, so legs departing in the same minute keep their
/// timetable order.
#[derive(Debug, Default)]
pub struct TimetableIndex {
    departures: HashMap<Station, Vec<Arc<Leg>>>,
    leg_count: usize,
}

impl TimetableIndex {
    /// Build an index over every leg.
    pub fn new(legs: impl IntoIterator<Item = Leg>) -> Self {
        let mut departures: HashMap<Station, Vec<Arc<Leg>>> = HashMap::new();
        let mut leg_count = 0;

        for leg in legs {
            departures
                .entry(leg.origin().clone())
                .or_default()
                .push(Arc::new(leg));
            leg_count += 1;
        }

        for group in departures.values_mut() {
            group.sort_by_key(|leg| leg.departure());
        }

        Self {
            departures,
            leg_count,
        }
    }

    /// Build an index over the legs that fall inside the run window:
    /// departing at or after `start` and arriving no later than `end`.
    pub fn prefiltered(legs: impl IntoIterator<Item = Leg>, start: Minute, end: Minute) -> Self {
        Self::new(
            legs.into_iter()
                .filter(|leg| leg.departure() >= start && leg.arrival() <= end),
        )
    }

    /// Legs that can be taken from `station` after arriving at `now`.
    ///
    /// A leg qualifies when it departs within `[now + min, now + max]`, or
    /// within `[now, now + max]` if it continues `previous`. Its arrival
    /// must not be after the configured end time. Results are in
    /// departure order.
    pub fn eligible(
        &self,
        station: &Station,
        now: Minute,
        previous: Option<&ServiceId>,
        config: &SearchConfig,
    ) -> Vec<Arc<Leg>> {
        let Some(group) = self.departures.get(station) else {
            return Vec::new();
        };

        let earliest_transfer = config.earliest_transfer(now);
        let latest = config.latest_departure(now);

        let start = group.partition_point(|leg| leg.departure() < now);
        group[start..]
            .iter()
            .take_while(|leg| leg.departure() <= latest)
            .filter(|leg| {
                leg.departure() >= earliest_transfer || previous == Some(leg.service())
            })
            .filter(|leg| leg.arrival() <= config.end_time)
            .cloned()
            .collect()
    }

    /// Number of stations with at least one departure.
    pub fn station_count(&self) -> usize {
        self.departures.len()
    }

    /// Total number of legs.
    pub fn leg_count(&self) -> usize {
        self.leg_count
    }
}
