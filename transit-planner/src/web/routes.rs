//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{debug, error, warn};

use crate::planner::{ItineraryFinder, ItineraryRequest, SearchError, SearchResult};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stops", get(list_stops))
        .route("/itinerary/plan", post(plan_itinerary))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List every stop in the network.
async fn list_stops(State(state): State<AppState>) -> Json<StopsResponse> {
    let stops = state
        .network
        .stops()
        .iter()
        .map(StopResult::from_stop)
        .collect();
    Json(StopsResponse { stops })
}

/// Plan itineraries between two stops.
async fn plan_itinerary(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PlanItineraryResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: PlanItineraryRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid plan request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let mut request = ItineraryRequest::new(req.origin, req.destination, req.departure);
    if let Some(level) = req.max_crowdedness {
        request = request.with_max_crowdedness(level);
    }
    request.validate(&state.network)?;
    let alternatives = state.config.alternatives(req.alternatives);

    let result = match state.cache.get(&request, alternatives).await {
        Some(cached) => {
            debug!(origin = %request.origin, destination = %request.destination, "plan cache hit");
            cached
        }
        None => {
            let result = Arc::new(run_search(&state, request.clone(), alternatives).await?);
            state
                .cache
                .insert(request, alternatives, result.clone())
                .await;
            result
        }
    };

    let itineraries = result
        .itineraries
        .iter()
        .map(|itinerary| {
            ItineraryResult::from_itinerary(itinerary, &state.network, state.crowding.as_ref())
        })
        .collect();

    Ok(Json(PlanItineraryResponse {
        itineraries,
        stops_expanded: result.stops_expanded,
    }))
}

/// Run the CPU-bound search off the async runtime.
async fn run_search(
    state: &AppState,
    request: ItineraryRequest,
    alternatives: usize,
) -> Result<SearchResult, AppError> {
    let network = state.network.clone();
    let timetable = state.timetable.clone();
    let crowding = state.crowding.clone();
    let costs = state.costs.clone();
    let config = state.config.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        ItineraryFinder::new(&network, timetable.as_ref(), &costs, &config)
            .with_crowdedness(crowding.as_ref())
            .find_best_itineraries(&request, alternatives)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("search task failed: {e}"),
    })?;

    Ok(outcome?)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::UnknownStop(_) | SearchError::SameStop(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
