//! Data transfer objects for web requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{BusLeg, Crowdedness, Itinerary, Leg, Stop, StopId, WalkLeg};
use crate::network::Network;
use crate::planner::{CrowdednessOracle, leg_crowdedness};

/// Request to plan an itinerary.
#[derive(Debug, Deserialize)]
pub struct PlanItineraryRequest {
    /// Origin stop id
    pub origin: StopId,

    /// Destination stop id
    pub destination: StopId,

    /// Earliest departure, as "YYYY-MM-DDTHH:MM:SS"
    pub departure: NaiveDateTime,

    /// Number of alternatives wanted (defaults to 1)
    pub alternatives: Option<usize>,

    /// Most crowded tier to accept on any bus leg
    pub max_crowdedness: Option<Crowdedness>,
}

/// Response for itinerary planning.
#[derive(Debug, Serialize)]
pub struct PlanItineraryResponse {
    /// Found itineraries, in order of departure
    pub itineraries: Vec<ItineraryResult>,

    /// Number of stops expanded
    pub stops_expanded: usize,
}

/// An itinerary option.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    pub legs: Vec<LegResult>,

    /// Departure time from origin (HH:MM)
    pub departure_time: String,

    /// Arrival time at destination (HH:MM)
    pub arrival_time: String,

    pub duration_mins: i64,
    pub walk_mins: i64,

    /// Number of changes between buses
    pub changes: usize,

    /// Worst crowdedness over all bus legs
    pub crowdedness: Crowdedness,
}

/// A leg of an itinerary.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum LegResult {
    Bus(BusResult),
    Walk(WalkResult),
}

/// A bus ride.
#[derive(Debug, Serialize)]
pub struct BusResult {
    /// Line name
    pub route: String,

    /// Scheduled run id
    pub run: u32,

    pub from: StopInfo,
    pub to: StopInfo,

    /// Worst crowdedness while on board
    pub crowdedness: Crowdedness,
}

/// A walk between stops.
#[derive(Debug, Serialize)]
pub struct WalkResult {
    pub from: StopInfo,
    pub to: StopInfo,
    pub duration_mins: i64,
}

/// Stop information for display.
#[derive(Debug, Serialize)]
pub struct StopInfo {
    pub id: StopId,
    pub name: String,

    /// Time at this stop (HH:MM)
    pub time: String,
}

/// A stop in the stop listing.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub id: StopId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Response for the stop listing.
#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub stops: Vec<StopResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StopResult {
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            id: stop.id,
            name: stop.name.clone(),
            lat: stop.location.lat,
            lon: stop.location.lon,
        }
    }
}

impl ItineraryResult {
    /// Create from a domain Itinerary.
    pub fn from_itinerary<O: CrowdednessOracle + ?Sized>(
        itinerary: &Itinerary,
        network: &Network,
        crowding: &O,
    ) -> Self {
        let legs: Vec<LegResult> = itinerary
            .legs()
            .iter()
            .map(|leg| match leg {
                Leg::Bus(bus) => LegResult::Bus(BusResult::from_leg(bus, network, crowding)),
                Leg::Walk(walk) => LegResult::Walk(WalkResult::from_leg(walk, network)),
            })
            .collect();

        let crowdedness = legs
            .iter()
            .filter_map(|leg| match leg {
                LegResult::Bus(bus) => Some(bus.crowdedness),
                LegResult::Walk(_) => None,
            })
            .max()
            .unwrap_or(Crowdedness::Green);

        Self {
            legs,
            departure_time: format_time(&itinerary.departure_time()),
            arrival_time: format_time(&itinerary.arrival_time()),
            duration_mins: itinerary.total_duration().num_minutes(),
            walk_mins: itinerary.total_walk_duration().num_minutes(),
            changes: itinerary.change_count(),
            crowdedness,
        }
    }
}

impl BusResult {
    pub fn from_leg<O: CrowdednessOracle + ?Sized>(
        leg: &BusLeg,
        network: &Network,
        crowding: &O,
    ) -> Self {
        Self {
            route: leg.route_name.clone(),
            run: leg.run.0,
            from: StopInfo::at(network, leg.board, &leg.departs),
            to: StopInfo::at(network, leg.alight, &leg.arrives),
            crowdedness: leg_crowdedness(crowding, network, leg),
        }
    }
}

impl WalkResult {
    pub fn from_leg(leg: &WalkLeg, network: &Network) -> Self {
        Self {
            from: StopInfo::at(network, leg.from, &leg.starts),
            to: StopInfo::at(network, leg.to, &leg.ends),
            duration_mins: (leg.ends - leg.starts).num_minutes(),
        }
    }
}

impl StopInfo {
    fn at(network: &Network, id: StopId, time: &NaiveDateTime) -> Self {
        Self {
            id,
            name: network
                .stop(id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| id.to_string()),
            time: format_time(time),
        }
    }
}

/// Format a time as HH:MM.
fn format_time(time: &NaiveDateTime) -> String {
    time.format("%H:%M").to_string()
}
