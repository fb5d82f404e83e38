//! Timed arcs: one hop along a path, fixed to a moment in time.

use chrono::{Days, NaiveDate};

use crate::domain::{MINUTES_PER_DAY, Minutes, Path, PathId, StopId};
use crate::timetable::{ScheduleProvider, TimetableId};

use super::cost::UNCONNECTED;

/// A hop from `start` to `end` along one path, taken by a traveller who is
/// at `start` at `query_time`.
///
/// Times are absolute minutes since midnight of the query date. For a route
/// the departure is the next run leaving `start`; for a walk the traveller
/// sets off at once. An arc with no usable run is unconnected: its times are
/// all `UNCONNECTED`.
#[derive(Debug, Clone)]
pub struct TimedArc {
    start: StopId,
    end: StopId,
    path: PathId,
    query_time: Minutes,
    run: Option<TimetableId>,
    departure: Minutes,
    arrival: Minutes,
}

impl TimedArc {
    /// Time the hop against the schedules in force on `date`.
    ///
    /// A query time past midnight looks at the schedules of the following
    /// date. A wait of a whole day or more leaves the arc unconnected.
    pub fn new<S: ScheduleProvider + ?Sized>(
        start: StopId,
        end: StopId,
        path: &Path,
        query_time: Minutes,
        schedules: &S,
        date: NaiveDate,
    ) -> Self {
        let mut arc = TimedArc {
            start,
            end,
            path: path.id(),
            query_time,
            run: None,
            departure: UNCONNECTED,
            arrival: UNCONNECTED,
        };

        match path {
            Path::Walk(walk) => {
                if walk.from() == start && walk.to() == end {
                    arc.departure = query_time;
                    arc.arrival = query_time.saturating_add(walk.duration());
                }
            }
            Path::Route(route) => {
                let day = query_time / MINUTES_PER_DAY;
                let Some(service_date) = date.checked_add_days(Days::new(u64::from(day))) else {
                    return arc;
                };
                let Some(dep) = schedules.next_departure(
                    service_date,
                    route,
                    start,
                    query_time % MINUTES_PER_DAY,
                ) else {
                    return arc;
                };
                let Some(travel) = route.travel_time(start, end, dep.rush_hour) else {
                    return arc;
                };
                let departure = day * MINUTES_PER_DAY + dep.departs;
                arc.run = Some(dep.run);
                arc.departure = departure;
                arc.arrival = departure.saturating_add(travel);
            }
        }

        if arc.arrival.saturating_sub(query_time) >= MINUTES_PER_DAY {
            arc.run = None;
            arc.departure = UNCONNECTED;
            arc.arrival = UNCONNECTED;
        }
        arc
    }

    pub fn start(&self) -> StopId {
        self.start
    }

    pub fn end(&self) -> StopId {
        self.end
    }

    pub fn path(&self) -> PathId {
        self.path
    }

    pub fn query_time(&self) -> Minutes {
        self.query_time
    }

    /// The run ridden, for arcs along a route.
    pub fn run(&self) -> Option<TimetableId> {
        self.run
    }

    pub fn is_connected(&self) -> bool {
        self.arrival < UNCONNECTED
    }

    pub fn departure_time(&self) -> Minutes {
        self.departure
    }

    pub fn arrival_time(&self) -> Minutes {
        self.arrival
    }

    /// Minutes spent moving, excluding the wait for the run.
    pub fn journey_time(&self) -> Minutes {
        if self.is_connected() {
            self.arrival - self.departure
        } else {
            UNCONNECTED
        }
    }

    /// Minutes from `query_time` to arrival at `end`, waiting included.
    ///
    /// Always below one day for connected arcs; `UNCONNECTED` otherwise.
    pub fn pi(&self) -> Minutes {
        if self.is_connected() {
            self.arrival - self.query_time
        } else {
            UNCONNECTED
        }
    }
}

impl PartialEq for TimedArc {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.end == other.end
            && self.path == other.path
            && self.query_time == other.query_time
    }
}

impl Eq for TimedArc {}
