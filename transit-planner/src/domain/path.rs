//! Paths through the network: scheduled bus routes and walks.
//!
//! A `Path` is an ordered sequence of stops together with a way of timing
//! travel between any two of them. Routes are timed per run (rush or
//! non-rush segment lists); walks take a fixed time regardless of the hour.

use std::cmp::Ordering;
use std::fmt;

use super::{DomainError, Minutes, Stop, StopId};

/// Assumed walking speed in metres per minute (4.8 km/h).
pub const WALKING_SPEED_M_PER_MIN: f64 = 80.0;

/// Identifier of a path, assigned by the network when the path is added.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(pub u32);

impl fmt::Debug for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PathId({})", self.0)
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scheduled bus line.
///
/// # Invariants
///
/// - At least two stops, none repeated
/// - `non_rush` and `rush` each hold one duration per consecutive stop pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    id: PathId,
    name: String,
    stops: Vec<StopId>,
    // Cumulative minutes from the first stop, one entry per stop.
    non_rush_offsets: Vec<Minutes>,
    rush_offsets: Vec<Minutes>,
}

impl Route {
    /// Construct a route, validating stop and duration lists.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - fewer than two stops are given
    /// - a stop appears twice
    /// - either duration list does not have `stops.len() - 1` entries
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::domain::{PathId, Route, StopId};
    ///
    /// let route = Route::new(
    ///     PathId(0),
    ///     "L1",
    ///     vec![StopId(1), StopId(2), StopId(3)],
    ///     vec![10, 13],
    ///     vec![12, 16],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(route.offset(StopId(3), false), Some(23));
    /// assert_eq!(route.offset(StopId(3), true), Some(28));
    /// ```
    pub fn new(
        id: PathId,
        name: impl Into<String>,
        stops: Vec<StopId>,
        non_rush: Vec<Minutes>,
        rush: Vec<Minutes>,
    ) -> Result<Self, DomainError> {
        if stops.len() < 2 {
            return Err(DomainError::InvalidRoute("route needs at least two stops"));
        }
        if non_rush.len() != stops.len() - 1 || rush.len() != stops.len() - 1 {
            return Err(DomainError::InvalidRoute(
                "need one duration per consecutive stop pair",
            ));
        }
        for (i, stop) in stops.iter().enumerate() {
            if stops[..i].contains(stop) {
                return Err(DomainError::InvalidRoute("route visits a stop twice"));
            }
        }

        Ok(Route {
            id,
            name: name.into(),
            stops,
            non_rush_offsets: cumulative(&non_rush),
            rush_offsets: cumulative(&rush),
        })
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    /// Returns the line name shown to passengers.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    /// Returns the position of `stop` along the route.
    pub fn position(&self, stop: StopId) -> Option<usize> {
        self.stops.iter().position(|s| *s == stop)
    }

    /// Minutes from the first stop to `stop`, using rush or non-rush timings.
    pub fn offset(&self, stop: StopId, rush_hour: bool) -> Option<Minutes> {
        let idx = self.position(stop)?;
        let offsets = if rush_hour {
            &self.rush_offsets
        } else {
            &self.non_rush_offsets
        };
        Some(offsets[idx])
    }

    /// Travel time from `from` to a later stop `to`.
    ///
    /// Returns `None` if either stop is not on the route or `to` is not
    /// after `from`.
    pub fn travel_time(&self, from: StopId, to: StopId, rush_hour: bool) -> Option<Minutes> {
        if self.compare_stops(from, to)? != Ordering::Less {
            return None;
        }
        Some(self.offset(to, rush_hour)? - self.offset(from, rush_hour)?)
    }

    /// Orders two stops by their position along the route.
    pub fn compare_stops(&self, a: StopId, b: StopId) -> Option<Ordering> {
        Some(self.position(a)?.cmp(&self.position(b)?))
    }
}

/// Prefix sums with a leading zero.
fn cumulative(segments: &[Minutes]) -> Vec<Minutes> {
    let mut offsets = Vec::with_capacity(segments.len() + 1);
    let mut total = 0;
    offsets.push(total);
    for segment in segments {
        total += segment;
        offsets.push(total);
    }
    offsets
}

/// A pedestrian link between two nearby stops.
///
/// Walks are one-directional; a two-way link is two walks, each the
/// geometric inverse of the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    id: PathId,
    stops: [StopId; 2],
    duration: Minutes,
}

impl Walk {
    /// Construct a walk with an explicit duration.
    pub fn new(id: PathId, from: StopId, to: StopId, duration: Minutes) -> Result<Self, DomainError> {
        if from == to {
            return Err(DomainError::InvalidWalk("walk must join two different stops"));
        }
        Ok(Walk {
            id,
            stops: [from, to],
            duration,
        })
    }

    /// Construct a walk timed from the great-circle distance between stops.
    ///
    /// Rounds up to whole minutes, and never returns less than one minute.
    pub fn between(id: PathId, from: &Stop, to: &Stop) -> Result<Self, DomainError> {
        let metres = from.location.distance_m(to.location);
        let minutes = (metres / WALKING_SPEED_M_PER_MIN).ceil().max(1.0) as Minutes;
        Self::new(id, from.id, to.id, minutes)
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn from(&self) -> StopId {
        self.stops[0]
    }

    pub fn to(&self) -> StopId {
        self.stops[1]
    }

    pub fn duration(&self) -> Minutes {
        self.duration
    }
}

/// A way of moving between stops: a bus route or a walk.
#[derive(Debug, Clone)]
pub enum Path {
    Route(Route),
    Walk(Walk),
}

impl Path {
    pub fn id(&self) -> PathId {
        match self {
            Path::Route(route) => route.id,
            Path::Walk(walk) => walk.id,
        }
    }

    /// Returns the stops in travel order.
    pub fn stops(&self) -> &[StopId] {
        match self {
            Path::Route(route) => &route.stops,
            Path::Walk(walk) => &walk.stops,
        }
    }

    /// Returns the position of `stop` along the path.
    pub fn position(&self, stop: StopId) -> Option<usize> {
        self.stops().iter().position(|s| *s == stop)
    }

    /// Returns the stops strictly after `stop`, or an empty slice if the
    /// stop is not on the path.
    pub fn stops_after(&self, stop: StopId) -> &[StopId] {
        match self.position(stop) {
            Some(idx) => &self.stops()[idx + 1..],
            None => &[],
        }
    }

    /// Orders two stops by their position along the path.
    pub fn compare_stops(&self, a: StopId, b: StopId) -> Option<Ordering> {
        Some(self.position(a)?.cmp(&self.position(b)?))
    }

    /// Travel time between two stops. The rush-hour flag has no effect on walks.
    pub fn travel_time(&self, from: StopId, to: StopId, rush_hour: bool) -> Option<Minutes> {
        match self {
            Path::Route(route) => route.travel_time(from, to, rush_hour),
            Path::Walk(walk) => (walk.from() == from && walk.to() == to).then_some(walk.duration),
        }
    }

    /// The fastest travel time between two stops over either timing list.
    pub fn fastest_time(&self, from: StopId, to: StopId) -> Option<Minutes> {
        let off_peak = self.travel_time(from, to, false)?;
        let peak = self.travel_time(from, to, true)?;
        Some(off_peak.min(peak))
    }

    /// True if `other` runs through the same stops in the opposite order.
    pub fn is_inverse_of(&self, other: &Path) -> bool {
        let mine = self.stops();
        let theirs = other.stops();
        mine.len() == theirs.len() && mine.iter().eq(theirs.iter().rev())
    }

    pub fn is_walk(&self) -> bool {
        matches!(self, Path::Walk(_))
    }

    pub fn as_route(&self) -> Option<&Route> {
        match self {
            Path::Route(route) => Some(route),
            Path::Walk(_) => None,
        }
    }

    pub fn as_walk(&self) -> Option<&Walk> {
        match self {
            Path::Route(_) => None,
            Path::Walk(walk) => Some(walk),
        }
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Path {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeoPoint;

    fn l1() -> Route {
        Route::new(
            PathId(0),
            "L1",
            vec![StopId(1), StopId(2), StopId(3)],
            vec![10, 13],
            vec![12, 16],
        )
        .unwrap()
    }

    #[test]
    fn route_offsets() {
        let route = l1();
        assert_eq!(route.offset(StopId(1), false), Some(0));
        assert_eq!(route.offset(StopId(2), false), Some(10));
        assert_eq!(route.offset(StopId(3), false), Some(23));
        assert_eq!(route.offset(StopId(3), true), Some(28));
        assert_eq!(route.offset(StopId(9), false), None);
    }

    #[test]
    fn route_travel_time_forward_only() {
        let route = l1();
        assert_eq!(route.travel_time(StopId(2), StopId(3), false), Some(13));
        assert_eq!(route.travel_time(StopId(1), StopId(3), true), Some(28));
        assert_eq!(route.travel_time(StopId(3), StopId(1), false), None);
        assert_eq!(route.travel_time(StopId(2), StopId(2), false), None);
    }

    #[test]
    fn route_compare_stops() {
        let route = l1();
        assert_eq!(route.compare_stops(StopId(1), StopId(3)), Some(Ordering::Less));
        assert_eq!(route.compare_stops(StopId(3), StopId(2)), Some(Ordering::Greater));
        assert_eq!(route.compare_stops(StopId(3), StopId(9)), None);
    }

    #[test]
    fn route_rejects_short_stop_list() {
        let result = Route::new(PathId(0), "X", vec![StopId(1)], vec![], vec![]);
        assert!(matches!(result, Err(DomainError::InvalidRoute(_))));
    }

    #[test]
    fn route_rejects_mismatched_durations() {
        let result = Route::new(
            PathId(0),
            "X",
            vec![StopId(1), StopId(2), StopId(3)],
            vec![5],
            vec![5, 6],
        );
        assert!(matches!(result, Err(DomainError::InvalidRoute(_))));
    }

    #[test]
    fn route_rejects_repeated_stop() {
        let result = Route::new(
            PathId(0),
            "X",
            vec![StopId(1), StopId(2), StopId(1)],
            vec![5, 5],
            vec![5, 5],
        );
        assert!(matches!(result, Err(DomainError::InvalidRoute(_))));
    }

    #[test]
    fn walk_rejects_same_stop() {
        let result = Walk::new(PathId(0), StopId(1), StopId(1), 3);
        assert!(matches!(result, Err(DomainError::InvalidWalk(_))));
    }

    #[test]
    fn walk_between_uses_distance() {
        // ~1112 m apart: 1112 / 80 = 13.9, rounded up to 14.
        let a = Stop::new(StopId(1), "A", GeoPoint::new(45.0, 7.0));
        let b = Stop::new(StopId(2), "B", GeoPoint::new(45.01, 7.0));
        let walk = Walk::between(PathId(0), &a, &b).unwrap();
        assert_eq!(walk.duration(), 14);
    }

    #[test]
    fn walk_between_colocated_is_one_minute() {
        let a = Stop::new(StopId(1), "A", GeoPoint::new(45.0, 7.0));
        let b = Stop::new(StopId(2), "B", GeoPoint::new(45.0, 7.0));
        assert_eq!(Walk::between(PathId(0), &a, &b).unwrap().duration(), 1);
    }

    #[test]
    fn walk_timing_ignores_rush() {
        let walk = Path::Walk(Walk::new(PathId(4), StopId(3), StopId(5), 2).unwrap());
        assert_eq!(walk.travel_time(StopId(3), StopId(5), true), Some(2));
        assert_eq!(walk.travel_time(StopId(3), StopId(5), false), Some(2));
        assert_eq!(walk.travel_time(StopId(5), StopId(3), false), None);
    }

    #[test]
    fn fastest_time_takes_quicker_list() {
        let path = Path::Route(l1());
        assert_eq!(path.fastest_time(StopId(1), StopId(3)), Some(23));

        let odd = Path::Route(
            Route::new(PathId(1), "X", vec![StopId(1), StopId(2)], vec![9], vec![7]).unwrap(),
        );
        assert_eq!(odd.fastest_time(StopId(1), StopId(2)), Some(7));
    }

    #[test]
    fn stops_after() {
        let path = Path::Route(l1());
        assert_eq!(path.stops_after(StopId(1)), &[StopId(2), StopId(3)]);
        assert_eq!(path.stops_after(StopId(3)), &[] as &[StopId]);
        assert_eq!(path.stops_after(StopId(9)), &[] as &[StopId]);
    }

    #[test]
    fn inverse_detection() {
        let forward = Path::Walk(Walk::new(PathId(1), StopId(4), StopId(7), 1).unwrap());
        let back = Path::Walk(Walk::new(PathId(2), StopId(7), StopId(4), 1).unwrap());
        let route = Path::Route(l1());
        let reversed = Path::Route(
            Route::new(
                PathId(3),
                "L1R",
                vec![StopId(3), StopId(2), StopId(1)],
                vec![13, 10],
                vec![16, 12],
            )
            .unwrap(),
        );

        assert!(forward.is_inverse_of(&back));
        assert!(back.is_inverse_of(&forward));
        assert!(route.is_inverse_of(&reversed));
        assert!(!route.is_inverse_of(&forward));
        assert!(!route.is_inverse_of(&route));
    }

    #[test]
    fn path_equality_by_id() {
        let a = Path::Walk(Walk::new(PathId(1), StopId(4), StopId(7), 1).unwrap());
        let b = Path::Walk(Walk::new(PathId(1), StopId(4), StopId(7), 9).unwrap());
        let c = Path::Walk(Walk::new(PathId(2), StopId(4), StopId(7), 1).unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
