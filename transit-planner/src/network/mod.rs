//! The transit network registry.
//!
//! Holds every stop and every path (bus routes and walks) of a network.
//! The registry is built once at ingestion time, owned by the caller, and
//! passed by reference to the cost estimator and the itinerary finder.
//! Uniqueness of stop ids and route names is enforced at insertion.

use std::collections::HashMap;

use crate::domain::{DomainError, Minutes, Path, PathId, Route, Stop, StopId, Walk};

/// Errors raised while building a network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// A stop with this id was already added
    #[error("duplicate stop id {0}")]
    DuplicateStop(StopId),

    /// A path refers to a stop that was never added
    #[error("unknown stop {0}")]
    UnknownStop(StopId),

    /// A route with this name was already added
    #[error("duplicate route name {0:?}")]
    DuplicateRoute(String),

    /// The path itself is malformed
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Stops and paths of a transit network.
#[derive(Debug, Clone, Default)]
pub struct Network {
    stops: Vec<Stop>,
    /// Stop id to its dense index in `stops`.
    stop_index: HashMap<StopId, usize>,
    /// Indexed by `PathId`.
    paths: Vec<Path>,
    serving: HashMap<StopId, Vec<PathId>>,
    route_names: HashMap<String, PathId>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stop.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a stop with the same id already exists.
    pub fn add_stop(&mut self, stop: Stop) -> Result<(), NetworkError> {
        if self.stop_index.contains_key(&stop.id) {
            return Err(NetworkError::DuplicateStop(stop.id));
        }
        self.stop_index.insert(stop.id, self.stops.len());
        self.stops.push(stop);
        Ok(())
    }

    /// Add a bus route through existing stops.
    ///
    /// `non_rush` and `rush` give the minutes between each consecutive pair
    /// of stops.
    pub fn add_route(
        &mut self,
        name: &str,
        stops: Vec<StopId>,
        non_rush: Vec<Minutes>,
        rush: Vec<Minutes>,
    ) -> Result<PathId, NetworkError> {
        if self.route_names.contains_key(name) {
            return Err(NetworkError::DuplicateRoute(name.to_string()));
        }
        self.check_stops(&stops)?;

        let id = self.next_path_id();
        let route = Route::new(id, name, stops, non_rush, rush)?;
        self.route_names.insert(name.to_string(), id);
        Ok(self.insert_path(Path::Route(route)))
    }

    /// Add a one-way walk between two existing stops.
    ///
    /// With `duration` of `None` the walk is timed from the great-circle
    /// distance between the stops.
    pub fn add_walk(
        &mut self,
        from: StopId,
        to: StopId,
        duration: Option<Minutes>,
    ) -> Result<PathId, NetworkError> {
        self.check_stops(&[from, to])?;

        let id = self.next_path_id();
        let walk = match duration {
            Some(minutes) => Walk::new(id, from, to, minutes)?,
            None => {
                let (a, b) = (&self.stops[self.stop_index[&from]], &self.stops[self.stop_index[&to]]);
                Walk::between(id, a, b)?
            }
        };
        Ok(self.insert_path(Path::Walk(walk)))
    }

    /// Add a walk in each direction between two stops.
    pub fn add_walk_both_ways(
        &mut self,
        a: StopId,
        b: StopId,
        duration: Option<Minutes>,
    ) -> Result<(PathId, PathId), NetworkError> {
        let there = self.add_walk(a, b, duration)?;
        let back = self.add_walk(b, a, duration)?;
        Ok((there, back))
    }

    fn check_stops(&self, stops: &[StopId]) -> Result<(), NetworkError> {
        match stops.iter().find(|s| !self.stop_index.contains_key(s)) {
            Some(missing) => Err(NetworkError::UnknownStop(*missing)),
            None => Ok(()),
        }
    }

    fn next_path_id(&self) -> PathId {
        PathId(self.paths.len() as u32)
    }

    fn insert_path(&mut self, path: Path) -> PathId {
        let id = path.id();
        for stop in path.stops() {
            self.serving.entry(*stop).or_default().push(id);
        }
        self.paths.push(path);
        id
    }

    /// Get a stop by id.
    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stop_index.get(&id).map(|&idx| &self.stops[idx])
    }

    pub fn contains_stop(&self, id: StopId) -> bool {
        self.stop_index.contains_key(&id)
    }

    /// All stops, in insertion order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// The dense index of a stop (its insertion order).
    pub fn stop_position(&self, id: StopId) -> Option<usize> {
        self.stop_index.get(&id).copied()
    }

    /// Get a path by id.
    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.get(id.0 as usize)
    }

    /// All paths, in insertion order.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Get a route by id. Returns `None` for walks.
    pub fn route(&self, id: PathId) -> Option<&Route> {
        self.path(id).and_then(Path::as_route)
    }

    /// Look up a route by its line name.
    pub fn route_by_name(&self, name: &str) -> Option<&Route> {
        self.route_names.get(name).and_then(|id| self.route(*id))
    }

    /// Every path that includes `stop`, in insertion order.
    pub fn paths_serving(&self, stop: StopId) -> impl Iterator<Item = &Path> + '_ {
        self.serving
            .get(&stop)
            .into_iter()
            .flatten()
            .filter_map(|id| self.path(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeoPoint;

    fn stop(id: u32) -> Stop {
        Stop::new(StopId(id), format!("N{id}"), GeoPoint::new(45.0, 7.0 + f64::from(id) * 0.001))
    }

    fn small_network() -> Network {
        let mut network = Network::new();
        for id in 1..=4 {
            network.add_stop(stop(id)).unwrap();
        }
        network
    }

    #[test]
    fn empty_network() {
        let network = Network::new();
        assert_eq!(network.stop_count(), 0);
        assert!(network.paths().is_empty());
        assert!(network.stop(StopId(1)).is_none());
    }

    #[test]
    fn duplicate_stop_rejected() {
        let mut network = small_network();
        let result = network.add_stop(stop(2));
        assert_eq!(result, Err(NetworkError::DuplicateStop(StopId(2))));
        assert_eq!(network.stop_count(), 4);
    }

    #[test]
    fn stop_lookup() {
        let network = small_network();
        assert_eq!(network.stop(StopId(3)).map(|s| s.name.as_str()), Some("N3"));
        assert_eq!(network.stop_position(StopId(1)), Some(0));
        assert_eq!(network.stop_position(StopId(4)), Some(3));
        assert!(network.contains_stop(StopId(2)));
        assert!(!network.contains_stop(StopId(9)));
    }

    #[test]
    fn add_route_assigns_sequential_ids() {
        let mut network = small_network();
        let l1 = network
            .add_route("L1", vec![StopId(1), StopId(2)], vec![5], vec![6])
            .unwrap();
        let l2 = network
            .add_route("L2", vec![StopId(2), StopId(3)], vec![5], vec![6])
            .unwrap();

        assert_eq!(l1, PathId(0));
        assert_eq!(l2, PathId(1));
        assert_eq!(network.route_by_name("L2").map(Route::id), Some(l2));
        assert!(network.route(l1).is_some());
    }

    #[test]
    fn duplicate_route_name_rejected() {
        let mut network = small_network();
        network
            .add_route("L1", vec![StopId(1), StopId(2)], vec![5], vec![6])
            .unwrap();
        let result = network.add_route("L1", vec![StopId(3), StopId(4)], vec![5], vec![6]);
        assert_eq!(result, Err(NetworkError::DuplicateRoute("L1".into())));
    }

    #[test]
    fn route_with_unknown_stop_rejected() {
        let mut network = small_network();
        let result = network.add_route("L1", vec![StopId(1), StopId(9)], vec![5], vec![6]);
        assert_eq!(result, Err(NetworkError::UnknownStop(StopId(9))));
        // A failed insertion leaves the name free.
        assert!(network.route_by_name("L1").is_none());
    }

    #[test]
    fn malformed_route_rejected() {
        let mut network = small_network();
        let result = network.add_route("L1", vec![StopId(1), StopId(2)], vec![], vec![6]);
        assert!(matches!(result, Err(NetworkError::Domain(_))));
    }

    #[test]
    fn walks_both_ways() {
        let mut network = small_network();
        let (there, back) = network
            .add_walk_both_ways(StopId(1), StopId(2), Some(3))
            .unwrap();

        let there = network.path(there).unwrap();
        let back = network.path(back).unwrap();
        assert!(there.is_walk());
        assert!(there.is_inverse_of(back));
        assert_eq!(there.travel_time(StopId(1), StopId(2), false), Some(3));
        assert_eq!(back.travel_time(StopId(2), StopId(1), false), Some(3));
        assert!(network.route(there.id()).is_none());
    }

    #[test]
    fn walk_timed_from_distance() {
        let mut network = small_network();
        let id = network.add_walk(StopId(1), StopId(2), None).unwrap();
        let walk = network.path(id).and_then(Path::as_walk).unwrap();
        // ~79 m apart at 80 m/min.
        assert_eq!(walk.duration(), 1);
    }

    #[test]
    fn paths_serving_stop() {
        let mut network = small_network();
        network
            .add_route("L1", vec![StopId(1), StopId(2), StopId(3)], vec![5, 5], vec![6, 6])
            .unwrap();
        network.add_walk(StopId(3), StopId(4), Some(2)).unwrap();

        let at_three: Vec<PathId> = network.paths_serving(StopId(3)).map(Path::id).collect();
        assert_eq!(at_three, vec![PathId(0), PathId(1)]);

        let at_one: Vec<PathId> = network.paths_serving(StopId(1)).map(Path::id).collect();
        assert_eq!(at_one, vec![PathId(0)]);

        assert_eq!(network.paths_serving(StopId(9)).count(), 0);
    }
}
