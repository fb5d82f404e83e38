//! Timetables: dated schedules of route runs.
//!
//! A `Timetable` owns every `Schedule` and every `RouteTimetable` (one run of
//! a route). Run ids come from a sequence the timetable owns, so two
//! timetables never interfere with each other. The planner reads schedule
//! data only through the `ScheduleProvider` trait.

mod schedule;

use std::collections::HashMap;

use chrono::NaiveDate;

pub use schedule::{DayCategory, RouteTimetable, Schedule, ScheduleId, TimetableId};

use crate::domain::{ClockTime, Minutes, PathId, Route, StopId};
use crate::network::Network;

/// Errors raised while building a timetable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimetableError {
    /// Validity range ends before it starts
    #[error("schedule valid from {from} ends before it starts ({to})")]
    InvalidValidity { from: NaiveDate, to: NaiveDate },

    /// Run refers to a schedule that was never added
    #[error("unknown schedule {0:?}")]
    UnknownSchedule(ScheduleId),

    /// Run refers to a path that is not in the network
    #[error("unknown path {0}")]
    UnknownPath(PathId),

    /// Runs can only be scheduled on bus routes
    #[error("path {0} is a walk, not a route")]
    NotARoute(PathId),
}

/// The next run of a route leaving a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    pub run: TimetableId,
    /// Minutes since midnight of the service date. May exceed one day.
    pub departs: Minutes,
    pub rush_hour: bool,
}

/// Source of scheduled departures.
///
/// This abstraction allows the planner to be tested with hand-built
/// timetables or mock data.
pub trait ScheduleProvider {
    /// The earliest run of `route` that leaves `stop` at or after `after`
    /// (minutes since midnight) on `date`.
    ///
    /// Returns `None` when no run remains that day, or when no schedule
    /// covering `route` operates on `date`.
    fn next_departure(
        &self,
        date: NaiveDate,
        route: &Route,
        stop: StopId,
        after: Minutes,
    ) -> Option<Departure>;

    /// Look up a run by id.
    fn run(&self, id: TimetableId) -> Option<&RouteTimetable>;
}

/// Registry of schedules and the runs they own.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    schedules: Vec<Schedule>,
    /// Indexed by `TimetableId - 1`.
    runs: Vec<RouteTimetable>,
    by_route: HashMap<PathId, Vec<TimetableId>>,
}

impl Timetable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schedule valid from `valid_from` to `valid_to` inclusive.
    pub fn add_schedule(
        &mut self,
        valid_from: NaiveDate,
        valid_to: NaiveDate,
        days: DayCategory,
    ) -> Result<ScheduleId, TimetableError> {
        if valid_to < valid_from {
            return Err(TimetableError::InvalidValidity {
                from: valid_from,
                to: valid_to,
            });
        }

        let id = ScheduleId(self.schedules.len() as u32);
        self.schedules.push(Schedule {
            id,
            valid_from,
            valid_to,
            days,
            runs: Vec::new(),
        });
        Ok(id)
    }

    /// Add a run of `route` to a schedule, leaving the first stop at `start`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the schedule is unknown, or if `route` is not a bus
    /// route of `network`.
    pub fn add_run(
        &mut self,
        network: &Network,
        schedule: ScheduleId,
        route: PathId,
        start: ClockTime,
        rush_hour: bool,
    ) -> Result<TimetableId, TimetableError> {
        let path = network
            .path(route)
            .ok_or(TimetableError::UnknownPath(route))?;
        if path.as_route().is_none() {
            return Err(TimetableError::NotARoute(route));
        }
        let owner = self
            .schedules
            .get_mut(schedule.0 as usize)
            .ok_or(TimetableError::UnknownSchedule(schedule))?;

        let id = TimetableId(self.runs.len() as u32 + 1);
        owner.runs.push(id);
        self.runs.push(RouteTimetable {
            id,
            route,
            start,
            rush_hour,
            schedule,
        });
        self.by_route.entry(route).or_default().push(id);
        Ok(id)
    }

    pub fn schedule(&self, id: ScheduleId) -> Option<&Schedule> {
        self.schedules.get(id.0 as usize)
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// All runs, in id order.
    pub fn runs(&self) -> &[RouteTimetable] {
        &self.runs
    }

    /// Runs of one route, in id order.
    pub fn runs_of(&self, route: PathId) -> impl Iterator<Item = &RouteTimetable> + '_ {
        self.by_route
            .get(&route)
            .into_iter()
            .flatten()
            .filter_map(|id| self.get(*id))
    }

    fn get(&self, id: TimetableId) -> Option<&RouteTimetable> {
        let idx = (id.0 as usize).checked_sub(1)?;
        self.runs.get(idx)
    }
}

impl ScheduleProvider for Timetable {
    fn next_departure(
        &self,
        date: NaiveDate,
        route: &Route,
        stop: StopId,
        after: Minutes,
    ) -> Option<Departure> {
        self.runs_of(route.id())
            .filter(|run| {
                self.schedule(run.schedule)
                    .is_some_and(|s| s.operates_on(date))
            })
            .filter_map(|run| {
                let departs = run.time_at(route, stop)?;
                (departs >= after).then_some(Departure {
                    run: run.id,
                    departs,
                    rush_hour: run.rush_hour,
                })
            })
            .min_by_key(|dep| (dep.departs, dep.run))
    }

    fn run(&self, id: TimetableId) -> Option<&RouteTimetable> {
        self.get(id)
    }
}
