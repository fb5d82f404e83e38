//! Domain error types.
//!
//! These errors represent validation failures when building network
//! elements and itineraries. They are distinct from search and I/O errors.

use super::StopId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Route construction rejected (too few stops, mismatched durations, ...)
    #[error("invalid route: {0}")]
    InvalidRoute(&'static str),

    /// Walk construction rejected
    #[error("invalid walk: {0}")]
    InvalidWalk(&'static str),

    /// Consecutive legs don't share a stop
    #[error("legs do not connect: arrival at stop {0} but next leg leaves stop {1}")]
    LegsNotConnected(StopId, StopId),

    /// A leg ends before it starts
    #[error("leg from stop {0} arrives before it departs")]
    LegTimeReversed(StopId),

    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidRoute("route needs at least two stops");
        assert_eq!(
            err.to_string(),
            "invalid route: route needs at least two stops"
        );

        let err = DomainError::LegsNotConnected(StopId(3), StopId(5));
        assert_eq!(
            err.to_string(),
            "legs do not connect: arrival at stop 3 but next leg leaves stop 5"
        );

        let err = DomainError::EmptyItinerary;
        assert_eq!(err.to_string(), "itinerary must have at least one leg");
    }
}
