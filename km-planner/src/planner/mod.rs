//! Route search.
//!
//! This module answers: "starting here at this time, which sequence of
//! trains earns the most countable kilometres before the end time?"
//!
//! Each step queries the timetable for legs reachable within the transfer
//! window, scores them by credited kilometres per minute spent, and forks
//! the best few into new branches. Each branch carries its own traversal
//! ledger so section credits are tracked per route. Exploration order is
//! pluggable: greedy depth-first or best-first over credited distance.

mod compliance;
mod config;
mod expand;
mod ledger;
mod search;
mod state;
mod strategy;


pub use compliance::{ComplianceError, check_route};
pub use config::SearchConfig;
pub use ledger::{Ledger, LedgerError};
pub use search::{CancelFlag, Planner, SearchError, SearchOutcome};
pub use state::{Incumbent, RouteLeg, SearchState};
pub use strategy::{BestFirst, DepthFirst, Frontier, Strategy};
