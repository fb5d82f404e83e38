//! Itinerary leg types.
//!
//! A `Leg` is one hop of an itinerary: riding one scheduled bus run between
//! two of its stops, or walking between two nearby stops.

use chrono::{Duration, NaiveDateTime};

use super::{PathId, StopId};
use crate::timetable::TimetableId;

/// A ride on one scheduled run of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusLeg {
    /// The scheduled run being ridden
    pub run: TimetableId,
    /// The route the run belongs to
    pub route: PathId,
    /// Line name shown to passengers
    pub route_name: String,
    /// Boarding stop
    pub board: StopId,
    /// Alighting stop
    pub alight: StopId,
    /// Scheduled departure from the boarding stop
    pub departs: NaiveDateTime,
    /// Scheduled arrival at the alighting stop
    pub arrives: NaiveDateTime,
}

/// A walk between two stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkLeg {
    /// The walk link used
    pub path: PathId,
    pub from: StopId,
    pub to: StopId,
    pub starts: NaiveDateTime,
    pub ends: NaiveDateTime,
}

/// One leg of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leg {
    Bus(BusLeg),
    Walk(WalkLeg),
}

impl Leg {
    /// Returns the stop the leg starts from.
    pub fn origin(&self) -> StopId {
        match self {
            Leg::Bus(bus) => bus.board,
            Leg::Walk(walk) => walk.from,
        }
    }

    /// Returns the stop the leg ends at.
    pub fn destination(&self) -> StopId {
        match self {
            Leg::Bus(bus) => bus.alight,
            Leg::Walk(walk) => walk.to,
        }
    }

    /// Returns the path (route or walk link) this leg travels along.
    pub fn path(&self) -> PathId {
        match self {
            Leg::Bus(bus) => bus.route,
            Leg::Walk(walk) => walk.path,
        }
    }

    pub fn departure_time(&self) -> NaiveDateTime {
        match self {
            Leg::Bus(bus) => bus.departs,
            Leg::Walk(walk) => walk.starts,
        }
    }

    pub fn arrival_time(&self) -> NaiveDateTime {
        match self {
            Leg::Bus(bus) => bus.arrives,
            Leg::Walk(walk) => walk.ends,
        }
    }

    pub fn duration(&self) -> Duration {
        self.arrival_time()
            .signed_duration_since(self.departure_time())
    }

    pub fn is_walk(&self) -> bool {
        matches!(self, Leg::Walk(_))
    }

    pub fn as_bus(&self) -> Option<&BusLeg> {
        match self {
            Leg::Bus(bus) => Some(bus),
            Leg::Walk(_) => None,
        }
    }

    pub fn as_walk(&self) -> Option<&WalkLeg> {
        match self {
            Leg::Bus(_) => None,
            Leg::Walk(walk) => Some(walk),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn bus() -> Leg {
        Leg::Bus(BusLeg {
            run: TimetableId(1),
            route: PathId(0),
            route_name: "L1".into(),
            board: StopId(1),
            alight: StopId(3),
            departs: at(6, 2),
            arrives: at(6, 25),
        })
    }

    fn walk() -> Leg {
        Leg::Walk(WalkLeg {
            path: PathId(7),
            from: StopId(3),
            to: StopId(5),
            starts: at(6, 25),
            ends: at(6, 27),
        })
    }

    #[test]
    fn bus_leg_accessors() {
        let leg = bus();
        assert_eq!(leg.origin(), StopId(1));
        assert_eq!(leg.destination(), StopId(3));
        assert_eq!(leg.path(), PathId(0));
        assert_eq!(leg.duration(), Duration::minutes(23));
        assert!(!leg.is_walk());
        assert!(leg.as_bus().is_some());
        assert!(leg.as_walk().is_none());
    }

    #[test]
    fn walk_leg_accessors() {
        let leg = walk();
        assert_eq!(leg.origin(), StopId(3));
        assert_eq!(leg.destination(), StopId(5));
        assert_eq!(leg.departure_time(), at(6, 25));
        assert_eq!(leg.arrival_time(), at(6, 27));
        assert!(leg.is_walk());
        assert!(leg.as_walk().is_some());
    }
}
