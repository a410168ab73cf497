use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use skyline_store::ledger::{ReceiptData, TicketData};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tickets/{pnr}", get(ticket_data))
        .route("/v1/receipts/{pnr}", get(receipt_data))
}

/// GET /v1/tickets/{pnr}
/// Plain ticket payload for the external report generator; the core does
/// no rendering.
async fn ticket_data(
    State(state): State<AppState>,
    Path(pnr): Path<String>,
) -> Result<Json<TicketData>, AppError> {
    Ok(Json(state.ledger.ticket_data(&pnr).await?))
}

/// GET /v1/receipts/{pnr}
/// Cancellation receipt payload from the archive.
async fn receipt_data(
    State(state): State<AppState>,
    Path(pnr): Path<String>,
) -> Result<Json<ReceiptData>, AppError> {
    Ok(Json(state.ledger.receipt_data(&pnr).await?))
}
