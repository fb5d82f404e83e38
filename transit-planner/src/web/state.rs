//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, ItineraryCache};
use crate::dataset::Dataset;
use crate::network::Network;
use crate::planner::{CostMatrix, CrowdednessTable, SearchConfig};
use crate::timetable::Timetable;

/// Shared application state.
///
/// Contains everything needed to handle requests. The network data is
/// read-only, so it is shared between handlers and blocking search tasks.
#[derive(Clone)]
pub struct AppState {
    pub network: Arc<Network>,
    pub timetable: Arc<Timetable>,
    pub crowding: Arc<CrowdednessTable>,

    /// Lower-bound matrix for `network`
    pub costs: Arc<CostMatrix>,

    /// Planner configuration
    pub config: Arc<SearchConfig>,

    /// Cached search results
    pub cache: ItineraryCache,
}

impl AppState {
    /// Create a new app state, building the cost matrix for the dataset.
    pub fn new(dataset: Dataset, config: SearchConfig, cache_config: &CacheConfig) -> Self {
        let costs = CostMatrix::build(&dataset.network);
        Self {
            network: Arc::new(dataset.network),
            timetable: Arc::new(dataset.timetable),
            crowding: Arc::new(dataset.crowding),
            costs: Arc::new(costs),
            config: Arc::new(config),
            cache: ItineraryCache::new(cache_config),
        }
    }
}
