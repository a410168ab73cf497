use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use skyline_store::ledger::{
    CancelledBookingView, ConfirmationReceipt, ConfirmedBookingView, ReservationReceipt,
    RefundReceipt,
};

use crate::error::AppError;
use crate::middleware::auth::CustomerClaims;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Passenger {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub flight_number: String,
    pub passenger: Passenger,
}

#[derive(Debug, Serialize)]
struct ReserveResponse {
    message: String,
    #[serde(flatten)]
    receipt: ReservationReceipt,
}

#[derive(Debug, Serialize)]
struct PaymentResponse {
    message: String,
    #[serde(flatten)]
    receipt: ConfirmationReceipt,
}

#[derive(Debug, Serialize)]
struct CancelResponse {
    message: String,
    #[serde(flatten)]
    receipt: RefundReceipt,
}

#[derive(Debug, Serialize)]
struct HistoryResponse<T> {
    account_id: i64,
    total: usize,
    history: Vec<T>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/{pnr}/pay", post(pay_booking))
        .route("/v1/bookings/{pnr}", delete(cancel_booking))
        .route("/v1/bookings/history", get(confirmed_history))
        .route("/v1/bookings/cancelled", get(cancelled_history))
}

/// POST /v1/bookings
/// Reserve: soft hold with the price locked in; no seat committed yet.
async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ReserveResponse>), AppError> {
    let account_id = claims.account_id()?;
    let passenger_name = format!(
        "{} {}",
        req.passenger.first_name.trim(),
        req.passenger.last_name.trim()
    );

    let receipt = state
        .ledger
        .reserve(&req.flight_number, &passenger_name, account_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReserveResponse {
            message: "Booking created. Proceed to payment.".to_string(),
            receipt,
        }),
    ))
}

/// POST /v1/bookings/{pnr}/pay
/// Simulated payment: atomically re-checks and commits the seat.
async fn pay_booking(
    State(state): State<AppState>,
    Path(pnr): Path<String>,
) -> Result<Json<PaymentResponse>, AppError> {
    let receipt = state.ledger.confirm_payment(&pnr).await?;

    Ok(Json(PaymentResponse {
        message: format!("Payment successful. Seat committed and PNR {} confirmed.", receipt.pnr),
        receipt,
    }))
}

/// DELETE /v1/bookings/{pnr}
/// Cancel a confirmed booking: archive, partial refund, seat restored.
async fn cancel_booking(
    State(state): State<AppState>,
    Path(pnr): Path<String>,
) -> Result<Json<CancelResponse>, AppError> {
    let receipt = state.ledger.cancel(&pnr).await?;

    Ok(Json(CancelResponse {
        message: format!("Booking {} cancelled successfully.", receipt.pnr),
        receipt,
    }))
}

/// GET /v1/bookings/history
async fn confirmed_history(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<HistoryResponse<ConfirmedBookingView>>, AppError> {
    let account_id = claims.account_id()?;
    let history = state.ledger.confirmed_history(account_id).await;

    Ok(Json(HistoryResponse {
        account_id,
        total: history.len(),
        history,
    }))
}

/// GET /v1/bookings/cancelled
async fn cancelled_history(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<HistoryResponse<CancelledBookingView>>, AppError> {
    let account_id = claims.account_id()?;
    let history = state.ledger.cancelled_history(account_id).await;

    Ok(Json(HistoryResponse {
        account_id,
        total: history.len(),
        history,
    }))
}
