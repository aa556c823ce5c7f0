//! Kilometre-maximising train route planner.
//!
//! Answers: "starting from this station at this time, which sequence of
//! trains covers the most countable kilometres before the end time?"
//! A section of track counts for at most two traversals, and an express
//! train only earns credit on sections not already ridden.

pub mod config;
pub mod domain;
pub mod network;
pub mod planner;
pub mod run;
pub mod store;
pub mod telemetry;
pub mod timetable;
