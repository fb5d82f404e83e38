//! Transit itinerary planner.
//!
//! Plans bus itineraries across a stop network with timetabled routes and
//! walking links: "I'm at this stop now, how do I get there soonest?"

pub mod cache;
pub mod dataset;
pub mod domain;
pub mod network;
pub mod planner;
pub mod timetable;
pub mod web;
