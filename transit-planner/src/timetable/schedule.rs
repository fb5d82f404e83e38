//! Schedules and the route runs they own.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::{ClockTime, Minutes, PathId, Route, StopId};

/// Identifier of one scheduled run of a route.
///
/// Ids are handed out in increasing order by the `Timetable` that owns the
/// run, starting from 1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TimetableId(pub u32);

impl fmt::Debug for TimetableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimetableId({})", self.0)
    }
}

impl fmt::Display for TimetableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a schedule within a `Timetable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleId(pub u32);

/// Which days of the week a schedule operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayCategory {
    /// Monday to Friday
    Weekdays,
    Saturday,
    Sunday,
}

impl DayCategory {
    /// The category a calendar date falls into.
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat => DayCategory::Saturday,
            Weekday::Sun => DayCategory::Sunday,
            _ => DayCategory::Weekdays,
        }
    }
}

/// A set of runs valid over a date range on one category of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub(super) id: ScheduleId,
    pub(super) valid_from: NaiveDate,
    pub(super) valid_to: NaiveDate,
    pub(super) days: DayCategory,
    /// Runs in insertion order.
    pub(super) runs: Vec<TimetableId>,
}

impl Schedule {
    pub fn id(&self) -> ScheduleId {
        self.id
    }

    pub fn valid_from(&self) -> NaiveDate {
        self.valid_from
    }

    pub fn valid_to(&self) -> NaiveDate {
        self.valid_to
    }

    pub fn days(&self) -> DayCategory {
        self.days
    }

    pub fn runs(&self) -> &[TimetableId] {
        &self.runs
    }

    /// True if the schedule operates on `date`: inside the validity range
    /// (both ends inclusive) and on a matching day of the week.
    pub fn operates_on(&self, date: NaiveDate) -> bool {
        self.valid_from <= date && date <= self.valid_to && DayCategory::of(date) == self.days
    }
}

/// One scheduled run of a route.
///
/// The run leaves the first stop of its route at `start` and reaches each
/// later stop after the cumulative duration its rush-hour flag selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTimetable {
    pub(super) id: TimetableId,
    pub(super) route: PathId,
    pub(super) start: ClockTime,
    pub(super) rush_hour: bool,
    pub(super) schedule: ScheduleId,
}

impl RouteTimetable {
    pub fn id(&self) -> TimetableId {
        self.id
    }

    pub fn route(&self) -> PathId {
        self.route
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    pub fn rush_hour(&self) -> bool {
        self.rush_hour
    }

    pub fn schedule(&self) -> ScheduleId {
        self.schedule
    }

    /// Minutes since midnight at which this run calls at `stop`.
    ///
    /// May exceed one day for runs that cross midnight. Returns `None` if
    /// `stop` is not on `route`.
    pub fn time_at(&self, route: &Route, stop: StopId) -> Option<Minutes> {
        debug_assert_eq!(route.id(), self.route);
        Some(self.start.minutes() + route.offset(stop, self.rush_hour)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_category_of_date() {
        // 2024-03-15 is a Friday.
        assert_eq!(DayCategory::of(date(2024, 3, 15)), DayCategory::Weekdays);
        assert_eq!(DayCategory::of(date(2024, 3, 16)), DayCategory::Saturday);
        assert_eq!(DayCategory::of(date(2024, 3, 17)), DayCategory::Sunday);
        assert_eq!(DayCategory::of(date(2024, 3, 18)), DayCategory::Weekdays);
    }

    #[test]
    fn day_category_serde() {
        let parsed: DayCategory = serde_json::from_str("\"saturday\"").unwrap();
        assert_eq!(parsed, DayCategory::Saturday);
        assert_eq!(
            serde_json::to_string(&DayCategory::Weekdays).unwrap(),
            "\"weekdays\""
        );
    }

    #[test]
    fn schedule_validity_is_inclusive() {
        let schedule = Schedule {
            id: ScheduleId(0),
            valid_from: date(2024, 3, 11),
            valid_to: date(2024, 3, 15),
            days: DayCategory::Weekdays,
            runs: Vec::new(),
        };

        assert!(schedule.operates_on(date(2024, 3, 11)));
        assert!(schedule.operates_on(date(2024, 3, 15)));
        assert!(!schedule.operates_on(date(2024, 3, 8)));
        assert!(!schedule.operates_on(date(2024, 3, 18)));
        // In range but a Saturday.
        assert!(!schedule.operates_on(date(2024, 3, 16)));
    }

    #[test]
    fn run_times_follow_rush_flag() {
        let route = Route::new(
            PathId(0),
            "L1",
            vec![StopId(1), StopId(2), StopId(3)],
            vec![10, 13],
            vec![12, 16],
        )
        .unwrap();
        let run = |rush_hour| RouteTimetable {
            id: TimetableId(1),
            route: PathId(0),
            start: ClockTime::from_hm(6, 2).unwrap(),
            rush_hour,
            schedule: ScheduleId(0),
        };

        assert_eq!(run(false).time_at(&route, StopId(1)), Some(362));
        assert_eq!(run(false).time_at(&route, StopId(3)), Some(385));
        assert_eq!(run(true).time_at(&route, StopId(3)), Some(390));
        assert_eq!(run(true).time_at(&route, StopId(9)), None);
    }

    #[test]
    fn run_crossing_midnight() {
        let route = Route::new(PathId(0), "N", vec![StopId(1), StopId(2)], vec![20], vec![25]).unwrap();
        let run = RouteTimetable {
            id: TimetableId(1),
            route: PathId(0),
            start: ClockTime::from_hm(23, 50).unwrap(),
            rush_hour: false,
            schedule: ScheduleId(0),
        };
        assert_eq!(run.time_at(&route, StopId(2)), Some(24 * 60 + 10));
    }
}
