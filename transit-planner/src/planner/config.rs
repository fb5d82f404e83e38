//! Search configuration for the itinerary planner.

use crate::domain::Crowdedness;

/// Configuration parameters for itinerary search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of stops a single search may expand.
    /// Searches that exceed this fail with `SearchError::ExpansionLimit`.
    pub max_expansions: usize,

    /// Maximum number of alternatives a caller may ask for.
    pub max_alternatives: usize,

    /// Most crowded tier an itinerary may include on any bus leg.
    pub max_crowdedness: Crowdedness,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_expansions: usize,
        max_alternatives: usize,
        max_crowdedness: Crowdedness,
    ) -> Self {
        Self {
            max_expansions,
            max_alternatives,
            max_crowdedness,
        }
    }

    /// Clamp a requested number of alternatives to `1..=max_alternatives`.
    pub fn alternatives(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(1)
            .clamp(1, self.max_alternatives.max(1))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_expansions: 50_000,
            max_alternatives: 5,
            max_crowdedness: Crowdedness::Red,
        }
    }
}
