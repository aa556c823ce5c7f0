//! Domain types for the route planner.
//!
//! This module contains the core value types that represent validated
//! timetable data. All types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod error;
mod leg;
mod service;
mod station;
mod time;

pub use error::DomainError;
pub use leg::{Leg, Ride};
pub use service::{ServiceClass, ServiceId};
pub use station::{InvalidStation, Station};
pub use time::{Minute, TimeError};
