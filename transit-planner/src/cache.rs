//! Caching layer for itinerary search results.
//!
//! The network and timetable are fixed for the life of the process, so a
//! search result depends only on the request. Results are cached per
//! request and number of alternatives, with a TTL bounding memory held by
//! rarely repeated queries.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::planner::{ItineraryRequest, SearchResult};

/// Cache key: the request plus the number of alternatives asked for.
type PlanKey = (ItineraryRequest, usize);

/// Cached search result.
type PlanEntry = Arc<SearchResult>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 1000,
        }
    }
}

/// Cache of itinerary search results.
#[derive(Clone)]
pub struct ItineraryCache {
    plans: MokaCache<PlanKey, PlanEntry>,
}

impl ItineraryCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let plans = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { plans }
    }

    /// Get a cached result.
    pub async fn get(&self, request: &ItineraryRequest, alternatives: usize) -> Option<PlanEntry> {
        self.plans.get(&(request.clone(), alternatives)).await
    }

    /// Insert a result into the cache.
    pub async fn insert(&self, request: ItineraryRequest, alternatives: usize, entry: PlanEntry) {
        self.plans.insert((request, alternatives), entry).await;
    }

    /// Get cache statistics (for monitoring).
    ///
    /// Moka updates this lazily; call `run_pending_tasks` first for an
    /// exact figure.
    pub fn entry_count(&self) -> u64 {
        self.plans.entry_count()
    }

    /// Flush moka's pending maintenance so counts are current.
    pub async fn run_pending_tasks(&self) {
        self.plans.run_pending_tasks().await;
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.plans.invalidate_all();
    }
}
