//! All-pairs lower-bound travel times.
//!
//! The `CostMatrix` holds, for every ordered pair of stops, the fastest time
//! any sequence of paths could take between them if every connection were
//! made without waiting. It never overestimates, so the itinerary search can
//! use it as an admissible heuristic. The matrix depends only on the network
//! and is built once, then shared between queries.

use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use crate::domain::{Minutes, StopId};
use crate::network::Network;

/// Cost of a pair with no connection at all.
pub const UNCONNECTED: Minutes = 1_000_000;

/// Error from a cost matrix lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CostError {
    #[error("stop {0} is not in the cost matrix")]
    UnknownStop(StopId),
}

/// Lower-bound travel time between every pair of stops.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    index: HashMap<StopId, usize>,
    size: usize,
    /// Row-major `size * size` costs.
    costs: Vec<Minutes>,
}

impl CostMatrix {
    /// Build the matrix for a network.
    ///
    /// Every path contributes its fastest timing for each ordered pair of its
    /// stops; Floyd-Warshall then relaxes the matrix over all intermediate
    /// stops. Runs in O(S³) for S stops.
    pub fn build(network: &Network) -> Self {
        let started = Instant::now();
        let size = network.stop_count();
        let index: HashMap<StopId, usize> = network
            .stops()
            .iter()
            .enumerate()
            .map(|(i, stop)| (stop.id, i))
            .collect();

        let mut costs = vec![UNCONNECTED; size * size];
        for i in 0..size {
            costs[i * size + i] = 0;
        }

        for path in network.paths() {
            let stops = path.stops();
            for (a, from) in stops.iter().enumerate() {
                for to in &stops[a + 1..] {
                    let Some(minutes) = path.fastest_time(*from, *to) else {
                        continue;
                    };
                    let cell = &mut costs[index[from] * size + index[to]];
                    *cell = (*cell).min(minutes);
                }
            }
        }

        for k in 0..size {
            for i in 0..size {
                let ik = costs[i * size + k];
                if ik >= UNCONNECTED {
                    continue;
                }
                for j in 0..size {
                    let kj = costs[k * size + j];
                    if kj >= UNCONNECTED {
                        continue;
                    }
                    let through = ik + kj;
                    if through < costs[i * size + j] {
                        costs[i * size + j] = through;
                    }
                }
            }
        }

        debug!(
            stops = size,
            paths = network.paths().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built cost matrix"
        );

        Self { index, size, costs }
    }

    /// Lower bound on the minutes needed to reach `destination` from `stop`.
    ///
    /// Returns `UNCONNECTED` if no sequence of paths joins them.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either stop was not in the network the matrix was
    /// built from.
    pub fn h_prime(&self, stop: StopId, destination: StopId) -> Result<Minutes, CostError> {
        let i = *self
            .index
            .get(&stop)
            .ok_or(CostError::UnknownStop(stop))?;
        let j = *self
            .index
            .get(&destination)
            .ok_or(CostError::UnknownStop(destination))?;
        Ok(self.costs[i * self.size + j])
    }

    /// Number of stops covered.
    pub fn stop_count(&self) -> usize {
        self.size
    }
}
