use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use skyline_store::{FlightFilter, PricedFlight, SortOrder};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FlightQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

#[derive(Debug, Serialize)]
struct AirportsResponse {
    airports: Vec<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/flights", get(search_flights))
        .route("/v1/airports", get(list_airports))
}

/// GET /v1/flights?origin=..&destination=..&sort_by=price&sort_order=asc|desc
/// Priced flight list; exact-match label filter, no fuzzy matching.
async fn search_flights(
    State(state): State<AppState>,
    Query(query): Query<FlightQuery>,
) -> Result<Json<Vec<PricedFlight>>, AppError> {
    // Price is the only sortable column.
    if let Some(key) = query.sort_by.as_deref() {
        if key != "price" {
            return Err(AppError::Validation(format!("unsupported sort key: {key}")));
        }
    }
    let order = match query.sort_order.as_deref() {
        Some("desc") => SortOrder::Desc,
        _ => SortOrder::Asc,
    };
    let filter = FlightFilter {
        origin: query.origin,
        destination: query.destination,
    };

    let flights = state.inventory.list(&filter, order).await;
    if flights.is_empty() {
        return Err(AppError::NotFound(
            "no flights found for the given criteria".to_string(),
        ));
    }
    Ok(Json(flights))
}

/// GET /v1/airports
/// Distinct origin/destination labels; the trip-advisor collaborator
/// grounds its suggestions on this list.
async fn list_airports(State(state): State<AppState>) -> Json<AirportsResponse> {
    Json(AirportsResponse {
        airports: state.inventory.distinct_labels().await,
    })
}
