//! Web layer for the transit itinerary planner.
//!
//! Provides HTTP endpoints for listing stops and planning itineraries.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
