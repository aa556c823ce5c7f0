//! Timetable loading and the departure index.
//!
//! The timetable arrives as a `;`-delimited CSV of single-stop rides. Rides
//! are read, annotated with distances from the enhanced network, and put
//! into a [`TimetableIndex`] that the search queries for its next moves.

mod error;
mod index;
mod load;

pub use error::TimetableError;
pub use index::TimetableIndex;
pub use load::{annotate, read_rides, station_pairs};
