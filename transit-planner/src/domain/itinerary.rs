//! Itinerary type.
//!
//! An `Itinerary` is a complete trip from origin to destination: bus legs
//! and walks in travel order, on a given query date.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::{BusLeg, DomainError, Leg, PathId, StopId, WalkLeg};

/// A complete itinerary from origin to destination.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (destination of one = origin of next)
/// - No leg arrives before it departs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    date: NaiveDate,
    legs: Vec<Leg>,
}

impl Itinerary {
    /// Constructs an itinerary, validating its legs.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the leg list is empty, a leg ends before it starts,
    /// or two consecutive legs don't share a stop.
    pub fn new(date: NaiveDate, legs: Vec<Leg>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for leg in &legs {
            if leg.arrival_time() < leg.departure_time() {
                return Err(DomainError::LegTimeReversed(leg.origin()));
            }
        }

        for window in legs.windows(2) {
            let prev_dest = window[0].destination();
            let next_origin = window[1].origin();
            if prev_dest != next_origin {
                return Err(DomainError::LegsNotConnected(prev_dest, next_origin));
            }
        }

        Ok(Itinerary { date, legs })
    }

    /// Returns the date the itinerary was planned for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Returns all bus legs in order.
    pub fn bus_legs(&self) -> impl Iterator<Item = &BusLeg> {
        self.legs.iter().filter_map(Leg::as_bus)
    }

    /// Returns all walks in order.
    pub fn walks(&self) -> impl Iterator<Item = &WalkLeg> {
        self.legs.iter().filter_map(Leg::as_walk)
    }

    /// Returns the paths used, in order.
    pub fn paths(&self) -> impl Iterator<Item = PathId> + '_ {
        self.legs.iter().map(Leg::path)
    }

    /// Number of vehicle changes (bus legs - 1, or 0 with at most one bus).
    pub fn change_count(&self) -> usize {
        self.bus_legs().count().saturating_sub(1)
    }

    pub fn origin(&self) -> StopId {
        self.legs[0].origin()
    }

    pub fn destination(&self) -> StopId {
        self.legs[self.legs.len() - 1].destination()
    }

    /// Departure time of the first leg.
    pub fn departure_time(&self) -> NaiveDateTime {
        self.legs[0].departure_time()
    }

    /// Arrival time of the last leg.
    pub fn arrival_time(&self) -> NaiveDateTime {
        self.legs[self.legs.len() - 1].arrival_time()
    }

    pub fn total_duration(&self) -> Duration {
        self.arrival_time()
            .signed_duration_since(self.departure_time())
    }

    pub fn total_walk_duration(&self) -> Duration {
        self.legs
            .iter()
            .filter(|leg| leg.is_walk())
            .map(Leg::duration)
            .sum()
    }

    /// True if two walks follow each other anywhere in the itinerary.
    pub fn has_consecutive_walks(&self) -> bool {
        self.legs
            .windows(2)
            .any(|pair| pair[0].is_walk() && pair[1].is_walk())
    }
}
