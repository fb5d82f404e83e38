//! Loading a network and its timetable from a JSON document.
//!
//! The document lists stops, routes, walks and schedules:
//!
//! ```json
//! {
//!   "stops": [{ "id": 1, "name": "Porta Nuova", "lat": 45.062, "lon": 7.678 }],
//!   "routes": [{ "name": "L1", "stops": [1, 2], "non_rush": [10], "rush": [12] }],
//!   "walks": [{ "from": 2, "to": 3, "minutes": 4, "both_ways": true }],
//!   "schedules": [{
//!     "valid_from": "2024-01-01", "valid_to": "2024-12-31", "days": "weekdays",
//!     "runs": [{ "route": "L1", "start": "06:02", "rush_hour": false,
//!                "crowdedness": [{ "stop": 1, "level": "ORANGE" }] }]
//!   }]
//! }
//! ```
//!
//! Walks without `minutes` are timed from the distance between their stops.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::domain::{ClockTime, Crowdedness, GeoPoint, Minutes, Stop, StopId, TimeError};
use crate::network::{Network, NetworkError};
use crate::planner::CrowdednessTable;
use crate::timetable::{DayCategory, Timetable, TimetableError};

/// Errors that can occur when loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Could not read the file
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Document is not valid JSON or doesn't match the format
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Timetable(#[from] TimetableError),

    /// Run start time is not HH:MM
    #[error("run of {route}: {source}")]
    StartTime { route: String, source: TimeError },

    /// Run refers to a route name that was never defined
    #[error("unknown route {0:?}")]
    UnknownRoute(String),

    /// Crowdedness given for a stop the route doesn't serve
    #[error("route {route} does not call at stop {stop}")]
    CrowdingStop { route: String, stop: StopId },
}

#[derive(Debug, Deserialize)]
struct Document {
    stops: Vec<StopRecord>,
    #[serde(default)]
    routes: Vec<RouteRecord>,
    #[serde(default)]
    walks: Vec<WalkRecord>,
    #[serde(default)]
    schedules: Vec<ScheduleRecord>,
}

#[derive(Debug, Deserialize)]
struct StopRecord {
    id: StopId,
    name: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RouteRecord {
    name: String,
    stops: Vec<StopId>,
    non_rush: Vec<Minutes>,
    rush: Vec<Minutes>,
}

#[derive(Debug, Deserialize)]
struct WalkRecord {
    from: StopId,
    to: StopId,
    minutes: Option<Minutes>,
    #[serde(default)]
    both_ways: bool,
}

#[derive(Debug, Deserialize)]
struct ScheduleRecord {
    valid_from: NaiveDate,
    valid_to: NaiveDate,
    days: DayCategory,
    runs: Vec<RunRecord>,
}

#[derive(Debug, Deserialize)]
struct RunRecord {
    route: String,
    start: String,
    #[serde(default)]
    rush_hour: bool,
    #[serde(default)]
    crowdedness: Vec<CrowdingRecord>,
}

#[derive(Debug, Deserialize)]
struct CrowdingRecord {
    stop: StopId,
    level: Crowdedness,
}

/// A network with its timetable and crowdedness estimates.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub network: Network,
    pub timetable: Timetable,
    pub crowding: CrowdednessTable,
}

impl Dataset {
    /// Parse and validate a dataset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let document: Document = serde_json::from_str(json)?;
        Self::build(document)
    }

    fn build(document: Document) -> Result<Self, LoadError> {
        let mut network = Network::new();
        for stop in document.stops {
            network.add_stop(Stop::new(stop.id, stop.name, GeoPoint::new(stop.lat, stop.lon)))?;
        }
        for route in document.routes {
            network.add_route(&route.name, route.stops, route.non_rush, route.rush)?;
        }
        for walk in document.walks {
            if walk.both_ways {
                network.add_walk_both_ways(walk.from, walk.to, walk.minutes)?;
            } else {
                network.add_walk(walk.from, walk.to, walk.minutes)?;
            }
        }

        let mut timetable = Timetable::new();
        let mut crowding = CrowdednessTable::new();
        for schedule in document.schedules {
            let id = timetable.add_schedule(schedule.valid_from, schedule.valid_to, schedule.days)?;
            for run in schedule.runs {
                let route = network
                    .route_by_name(&run.route)
                    .ok_or_else(|| LoadError::UnknownRoute(run.route.clone()))?;
                let start = ClockTime::parse_hhmm(&run.start).map_err(|source| {
                    LoadError::StartTime {
                        route: run.route.clone(),
                        source,
                    }
                })?;
                let run_id = timetable.add_run(&network, id, route.id(), start, run.rush_hour)?;

                for entry in run.crowdedness {
                    if route.position(entry.stop).is_none() {
                        return Err(LoadError::CrowdingStop {
                            route: run.route,
                            stop: entry.stop,
                        });
                    }
                    crowding.insert(run_id, entry.stop, entry.level);
                }
            }
        }

        info!(
            stops = network.stop_count(),
            paths = network.paths().len(),
            runs = timetable.runs().len(),
            "loaded dataset"
        );

        Ok(Self {
            network,
            timetable,
            crowding,
        })
    }
}

/// Read and parse a dataset file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Dataset::from_json(&json)
}
