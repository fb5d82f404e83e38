//! A* itinerary search.
//!
//! Finds the earliest-arriving itinerary between two stops, starting at a
//! given time. Stops are expanded in order of `f' = g' + h'`, where `g'` is
//! the minutes elapsed since the query time (waiting included) and `h'` is
//! the lower bound from the `CostMatrix`. Every hop is timed against the
//! real schedule through a `TimedArc`.
//!
//! An itinerary never rides a path twice, never rides the inverse of a path
//! it has already used, and never takes two walks in a row. Both rules are
//! checked against the itinerary leading to the stop being expanded.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, trace};

use crate::domain::{
    BusLeg, ClockTime, Crowdedness, DomainError, Itinerary, Leg, MINUTES_PER_DAY, Minutes,
    PathId, StopId, WalkLeg, at_minutes,
};
use crate::network::Network;
use crate::timetable::ScheduleProvider;

use super::arc::TimedArc;
use super::config::SearchConfig;
use super::cost::{CostError, CostMatrix, UNCONNECTED};
use super::crowding::{CrowdednessOracle, itinerary_crowdedness};

/// Error from itinerary search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Origin or destination is not in the network
    #[error("unknown stop {0}")]
    UnknownStop(StopId),

    /// Origin and destination are the same stop
    #[error("origin and destination are both stop {0}")]
    SameStop(StopId),

    /// Search expanded more stops than the configuration allows
    #[error("search gave up after expanding {limit} stops")]
    ExpansionLimit { limit: usize },

    /// Cost matrix was built for a different network
    #[error(transparent)]
    Cost(#[from] CostError),

    /// Found route did not form a valid itinerary
    #[error("could not assemble itinerary: {0}")]
    Itinerary(#[from] DomainError),
}

/// Request for itinerary search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItineraryRequest {
    pub origin: StopId,
    pub destination: StopId,

    /// When the traveller is ready to leave the origin.
    pub departure: NaiveDateTime,

    /// Overrides `SearchConfig::max_crowdedness` when set.
    pub max_crowdedness: Option<Crowdedness>,
}

impl ItineraryRequest {
    /// Create a new search request.
    pub fn new(origin: StopId, destination: StopId, departure: NaiveDateTime) -> Self {
        Self {
            origin,
            destination,
            departure,
            max_crowdedness: None,
        }
    }

    pub fn with_max_crowdedness(mut self, level: Crowdedness) -> Self {
        self.max_crowdedness = Some(level);
        self
    }

    /// Validate the request against a network.
    pub fn validate(&self, network: &Network) -> Result<(), SearchError> {
        for stop in [self.origin, self.destination] {
            if !network.contains_stop(stop) {
                return Err(SearchError::UnknownStop(stop));
            }
        }
        if self.origin == self.destination {
            return Err(SearchError::SameStop(self.origin));
        }
        Ok(())
    }
}

/// Result of itinerary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Found itineraries, in order of first departure.
    pub itineraries: Vec<Itinerary>,

    /// Number of stops expanded over all searches run.
    pub stops_expanded: usize,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self {
            itineraries: Vec::new(),
            stops_expanded: 0,
        }
    }
}

/// Outcome of one least-time search.
struct SingleSearch {
    found: Option<Found>,
    expanded: usize,
}

struct Found {
    itinerary: Itinerary,
    /// Departure of the first leg, in minutes since midnight of the query date.
    first_departure: Minutes,
}

/// Open-set entry: `(f', continues, stop, g')`.
///
/// `continues` is false only for the destination, so among equal `f'` the
/// destination is selected first. Entries whose `g'` no longer matches the
/// best known value are stale and skipped.
type OpenEntry = Reverse<(Minutes, bool, StopId, Minutes)>;

/// Itinerary finder using A*.
pub struct ItineraryFinder<'a, S: ScheduleProvider> {
    network: &'a Network,
    schedules: &'a S,
    costs: &'a CostMatrix,
    config: &'a SearchConfig,
    crowding: Option<&'a dyn CrowdednessOracle>,
}

impl<'a, S: ScheduleProvider> ItineraryFinder<'a, S> {
    /// Create a new finder. The cost matrix must have been built from
    /// `network`.
    pub fn new(
        network: &'a Network,
        schedules: &'a S,
        costs: &'a CostMatrix,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            network,
            schedules,
            costs,
            config,
            crowding: None,
        }
    }

    /// Filter itineraries by crowdedness using `oracle`.
    ///
    /// Without an oracle no itinerary is filtered out.
    pub fn with_crowdedness(mut self, oracle: &'a dyn CrowdednessOracle) -> Self {
        self.crowding = Some(oracle);
        self
    }

    /// Find the earliest-arriving itinerary.
    ///
    /// Returns `Ok(None)` when the destination cannot be reached that day.
    pub fn find_best_itinerary(
        &self,
        request: &ItineraryRequest,
    ) -> Result<Option<Itinerary>, SearchError> {
        let result = self.find_best_itineraries(request, 1)?;
        Ok(result.itineraries.into_iter().next())
    }

    /// Find up to `k` alternative itineraries.
    ///
    /// The first is the earliest-arriving itinerary. Each further search
    /// starts one minute after the first leg of the previous one departs,
    /// so first-leg departures strictly increase. This is a restart
    /// heuristic rather than a true k-shortest-paths enumeration.
    /// Itineraries more crowded than the threshold are skipped. Fewer than
    /// `k` results are returned when the day runs out, or when a later
    /// search hits the expansion limit after some have been found.
    pub fn find_best_itineraries(
        &self,
        request: &ItineraryRequest,
        k: usize,
    ) -> Result<SearchResult, SearchError> {
        request.validate(self.network)?;

        let date = request.departure.date();
        let threshold = request
            .max_crowdedness
            .unwrap_or(self.config.max_crowdedness);
        let mut start = ClockTime::of(request.departure.time()).minutes();

        let mut result = SearchResult::empty();

        while result.itineraries.len() < k && start < MINUTES_PER_DAY {
            let search =
                match self.least_time_path(request.origin, request.destination, date, start) {
                    Ok(search) => search,
                    Err(e) if !result.itineraries.is_empty() => {
                        debug!(
                            error = %e,
                            start,
                            found = result.itineraries.len(),
                            "stopping alternatives early"
                        );
                        break;
                    }
                    Err(e) => return Err(e),
                };
            result.stops_expanded += search.expanded;

            let Some(found) = search.found else {
                break;
            };
            start = found.first_departure + 1;

            if let Some(oracle) = self.crowding {
                let level = itinerary_crowdedness(oracle, self.network, &found.itinerary);
                if level > threshold {
                    debug!(%level, %threshold, "itinerary too crowded");
                    continue;
                }
            }
            result.itineraries.push(found.itinerary);
        }

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            requested = k,
            found = result.itineraries.len(),
            stops_expanded = result.stops_expanded,
            "itinerary search complete"
        );

        Ok(result)
    }

    /// One A* search from `origin` at `start` minutes past midnight of `date`.
    fn least_time_path(
        &self,
        origin: StopId,
        destination: StopId,
        date: NaiveDate,
        start: Minutes,
    ) -> Result<SingleSearch, SearchError> {
        let mut expanded = 0;

        let h_origin = self.costs.h_prime(origin, destination)?;
        if h_origin >= UNCONNECTED {
            trace!(%origin, %destination, "no path between stops");
            return Ok(SingleSearch {
                found: None,
                expanded,
            });
        }

        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        let mut closed: HashSet<StopId> = HashSet::new();
        let mut g: HashMap<StopId, Minutes> = HashMap::new();
        let mut pre: HashMap<StopId, TimedArc> = HashMap::new();

        g.insert(origin, 0);
        open.push(Reverse((h_origin, true, origin, 0)));

        while let Some(Reverse((_, _, stop, cost))) = open.pop() {
            if closed.contains(&stop) || g.get(&stop) != Some(&cost) {
                continue;
            }
            closed.insert(stop);

            if stop == destination {
                let found = self.assemble(date, destination, &pre)?;
                trace!(expanded, arrival = cost + start, "reached destination");
                return Ok(SingleSearch {
                    found: Some(found),
                    expanded,
                });
            }

            expanded += 1;
            if expanded > self.config.max_expansions {
                return Err(SearchError::ExpansionLimit {
                    limit: self.config.max_expansions,
                });
            }

            let now = start.saturating_add(cost);
            let (used, walked_last) = self.itinerary_so_far(stop, &pre);

            for path in self.network.paths_serving(stop) {
                if path.is_walk() && walked_last {
                    continue;
                }
                let reused = used
                    .iter()
                    .filter_map(|id| self.network.path(*id))
                    .any(|used| used == path || used.is_inverse_of(path));
                if reused {
                    continue;
                }

                for next in path.stops_after(stop) {
                    if closed.contains(next) {
                        continue;
                    }
                    let arc = TimedArc::new(stop, *next, path, now, self.schedules, date);
                    if !arc.is_connected() {
                        continue;
                    }
                    let h = self.costs.h_prime(*next, destination)?;
                    if h >= UNCONNECTED {
                        continue;
                    }

                    let candidate = cost + arc.pi();
                    if candidate < g.get(next).copied().unwrap_or(UNCONNECTED) {
                        trace!(from = %stop, to = %next, path = %path.id(), g = candidate, h, "improved");
                        g.insert(*next, candidate);
                        pre.insert(*next, arc);
                        open.push(Reverse((candidate + h, *next != destination, *next, candidate)));
                    }
                }
            }
        }

        trace!(expanded, %origin, %destination, "open set exhausted");
        Ok(SingleSearch {
            found: None,
            expanded,
        })
    }

    /// Paths used on the way to `stop`, and whether the last hop was a walk.
    fn itinerary_so_far(
        &self,
        stop: StopId,
        pre: &HashMap<StopId, TimedArc>,
    ) -> (Vec<PathId>, bool) {
        let mut used = Vec::new();
        let mut current = stop;
        while let Some(arc) = pre.get(&current) {
            used.push(arc.path());
            current = arc.start();
        }
        let walked_last = used
            .first()
            .and_then(|id| self.network.path(*id))
            .is_some_and(|path| path.is_walk());
        (used, walked_last)
    }

    /// Follow predecessor arcs back from `destination` and build the itinerary.
    fn assemble(
        &self,
        date: NaiveDate,
        destination: StopId,
        pre: &HashMap<StopId, TimedArc>,
    ) -> Result<Found, SearchError> {
        let mut arcs = Vec::new();
        let mut current = destination;
        while let Some(arc) = pre.get(&current) {
            arcs.push(arc);
            current = arc.start();
        }
        arcs.reverse();

        let first_departure = arcs
            .first()
            .map(|arc| arc.departure_time())
            .unwrap_or(UNCONNECTED);
        let legs = arcs.iter().map(|arc| self.leg(date, arc)).collect();
        let itinerary = Itinerary::new(date, legs)?;

        Ok(Found {
            itinerary,
            first_departure,
        })
    }

    fn leg(&self, date: NaiveDate, arc: &TimedArc) -> Leg {
        let departs = at_minutes(date, arc.departure_time());
        let arrives = at_minutes(date, arc.arrival_time());
        match (self.network.route(arc.path()), arc.run()) {
            (Some(route), Some(run)) => Leg::Bus(BusLeg {
                run,
                route: route.id(),
                route_name: route.name().to_string(),
                board: arc.start(),
                alight: arc.end(),
                departs,
                arrives,
            }),
            _ => Leg::Walk(WalkLeg {
                path: arc.path(),
                from: arc.start(),
                to: arc.end(),
                starts: departs,
                ends: arrives,
            }),
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

    #[test]
    fn request_defaults() {
        let request = ItineraryRequest::new(StopId(1), StopId(5), at(6, 2));
        assert_eq!(request.max_crowdedness, None);

        let request = request.with_max_crowdedness(Crowdedness::Orange);
        assert_eq!(request.max_crowdedness, Some(Crowdedness::Orange));
    }

    #[test]
    fn empty_result() {
        let result = SearchResult::empty();
        assert!(result.itineraries.is_empty());
        assert_eq!(result.stops_expanded, 0);
    }

    #[test]
    fn error_messages() {
        assert_eq!(SearchError::UnknownStop(StopId(9)).to_string(), "unknown stop 9");
        assert_eq!(
            SearchError::ExpansionLimit { limit: 10 }.to_string(),
            "search gave up after expanding 10 stops"
        );
    }
}
