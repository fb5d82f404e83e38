//! Domain types for the transit itinerary planner.
//!
//! This module contains the core domain model types: stops, the paths that
//! join them, and the itineraries the planner produces. All types enforce
//! their invariants at construction time, so code that receives these types
//! can trust their validity.

mod crowding;
mod error;
mod itinerary;
mod leg;
mod path;
mod stop;
mod time;

pub use crowding::{Crowdedness, InvalidCrowdedness};
pub use error::DomainError;
pub use itinerary::Itinerary;
pub use leg::{BusLeg, Leg, WalkLeg};
pub use path::{Path, PathId, Route, WALKING_SPEED_M_PER_MIN, Walk};
pub use stop::{GeoPoint, Stop, StopId};
pub use time::{ClockTime, MINUTES_PER_DAY, Minutes, TimeError, at_minutes};
