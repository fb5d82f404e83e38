//! Itinerary planner using A* search.
//!
//! This module implements the core planning algorithm that answers:
//! "I'm at this stop now - what is the fastest way to reach my destination?"
//!
//! A network-wide `CostMatrix` of lower-bound travel times guides a
//! best-first search over timed arcs, which are priced against the real
//! schedule as the search reaches each stop.

mod arc;
mod config;
mod cost;
mod crowding;
mod search;


pub use arc::TimedArc;
pub use config::SearchConfig;
pub use cost::{CostError, CostMatrix, UNCONNECTED};
pub use crowding::{
    CrowdednessOracle, CrowdednessTable, UniformCrowdedness, itinerary_crowdedness,
    leg_crowdedness,
};
pub use search::{ItineraryFinder, ItineraryRequest, SearchError, SearchResult};
