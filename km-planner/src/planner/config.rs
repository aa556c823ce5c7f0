//! Search configuration for the route planner.

use crate::domain::Minute;

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Minimum time between arriving and boarding a different train (minutes).
    pub min_transfer_mins: i64,

    /// Maximum time to wait for the next leg (minutes).
    /// Staying on the same train is allowed from zero minutes up to this.
    pub max_transfer_mins: i64,

    /// Number of best-scoring candidates forked from each state.
    pub branching_factor: usize,

    /// Every leg must arrive no later than this.
    pub end_time: Minute,

    /// Log a progress line every this many expansions. Zero disables it.
    pub progress_interval: u64,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        min_transfer_mins: i64,
        max_transfer_mins: i64,
        branching_factor: usize,
        end_time: Minute,
        progress_interval: u64,
    ) -> Self {
        Self {
            min_transfer_mins,
            max_transfer_mins,
            branching_factor,
            end_time,
            progress_interval,
        }
    }

    /// Earliest departure for boarding a different train after arriving at `now`.
    pub fn earliest_transfer(&self, now: Minute) -> Minute {
        now + self.min_transfer_mins
    }

    /// Latest departure for any next leg after arriving at `now`.
    pub fn latest_departure(&self, now: Minute) -> Minute {
        now + self.max_transfer_mins
    }

    /// Whether waiting `waiting_mins` before the next leg is allowed.
    ///
    /// Continuing on the same service may happen immediately; changing
    /// trains needs at least the minimum transfer time.
    pub fn allows_wait(&self, waiting_mins: i64, same_service: bool) -> bool {
        let min = if same_service {
            0
        } else {
            self.min_transfer_mins
        };
        (min..=self.max_transfer_mins).contains(&waiting_mins)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_transfer_mins: 3,
            max_transfer_mins: 15,
            branching_factor: 2,
            end_time: Minute::MAX,
            progress_interval: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.min_transfer_mins, 3);
        assert_eq!(config.max_transfer_mins, 15);
        assert_eq!(config.branching_factor, 2);
        assert_eq!(config.end_time, Minute::MAX);
        assert_eq!(config.progress_interval, 10_000);
    }

    #[test]
    fn window_methods() {
        let config = SearchConfig::default();
        let now = Minute::new(600);

        assert_eq!(config.earliest_transfer(now), Minute::new(603));
        assert_eq!(config.latest_departure(now), Minute::new(615));
    }

    #[test]
    fn allows_wait_bounds() {
        let config = SearchConfig::default();

        assert!(config.allows_wait(0, true));
        assert!(!config.allows_wait(0, false));
        assert!(!config.allows_wait(2, false));
        assert!(config.allows_wait(3, false));
        assert!(config.allows_wait(15, false));
        assert!(!config.allows_wait(16, true));
        assert!(!config.allows_wait(-1, true));
    }

    #[test]
    fn custom_config() {
        let config = SearchConfig::new(2, 10, 3, Minute::new(900), 50);

        assert_eq!(config.min_transfer_mins, 2);
        assert_eq!(config.max_transfer_mins, 10);
        assert_eq!(config.branching_factor, 3);
        assert_eq!(config.end_time, Minute::new(900));
        assert_eq!(config.progress_interval, 50);
    }
}
