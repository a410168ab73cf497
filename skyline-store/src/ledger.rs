use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use skyline_core::booking::{new_pnr, Booking, BookingStatus, CancelledBooking};
use skyline_core::pricing::round2;
use skyline_core::{CoreError, CoreResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::accounts::AccountStore;
use crate::inventory::FlightInventory;

/// Share of the locked-in price returned on cancellation; the remainder
/// is the cancellation fee.
pub const DEFAULT_REFUND_RATE: f64 = 0.80;

/// Booking lifecycle owner: PENDING_PAYMENT -> CONFIRMED -> archived.
///
/// Reservation is a soft hold (no seat committed); the seat decrement
/// happens atomically at payment confirmation via the inventory's
/// check-and-decrement, so concurrent payments can never oversell.
pub struct BookingLedger {
    inventory: Arc<FlightInventory>,
    accounts: Arc<AccountStore>,
    refund_rate: f64,
    state: RwLock<Ledger>,
}

struct Ledger {
    /// Live bookings, keyed by PNR.
    live: HashMap<String, Booking>,
    /// Immutable cancellation archive. A PNR is never in both maps.
    cancelled: HashMap<String, CancelledBooking>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationReceipt {
    pub pnr: String,
    pub status: BookingStatus,
    pub price_due: f64,
    pub flight_number: String,
    pub passenger_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationReceipt {
    pub pnr: String,
    pub status: BookingStatus,
    pub price_paid: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefundReceipt {
    pub pnr: String,
    pub price_paid: f64,
    pub refund_amount: f64,
    pub cancellation_fee: f64,
    pub refund_rate: f64,
}

/// Confirmed-booking history row, joined with flight and account display
/// fields.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmedBookingView {
    pub pnr: String,
    pub price_paid: f64,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub passenger_name: String,
    pub flight_number: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub username: String,
}

/// Cancellation history row from the archive.
#[derive(Debug, Clone, Serialize)]
pub struct CancelledBookingView {
    pub pnr: String,
    pub price_paid: f64,
    pub refund_amount: f64,
    pub cancellation_date: DateTime<Utc>,
    pub passenger_name: String,
    pub flight_number: String,
    pub airline: String,
    pub username: String,
}

/// Everything the external report generator needs to render a ticket.
/// The core has no rendering responsibility.
#[derive(Debug, Clone, Serialize)]
pub struct TicketData {
    pub pnr: String,
    pub passenger_name: String,
    pub flight_number: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub price_paid: f64,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub username: String,
}

/// Cancellation receipt payload for the external report generator.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptData {
    pub pnr: String,
    pub passenger_name: String,
    pub flight_number: String,
    pub airline: String,
    pub price_paid: f64,
    pub refund_amount: f64,
    pub cancellation_fee: f64,
    pub cancellation_date: DateTime<Utc>,
    pub username: String,
}

impl BookingLedger {
    pub fn new(inventory: Arc<FlightInventory>, accounts: Arc<AccountStore>) -> Self {
        Self {
            inventory,
            accounts,
            refund_rate: DEFAULT_REFUND_RATE,
            state: RwLock::new(Ledger {
                live: HashMap::new(),
                cancelled: HashMap::new(),
            }),
        }
    }

    pub fn with_refund_rate(mut self, refund_rate: f64) -> Self {
        self.refund_rate = refund_rate;
        self
    }

    /// Create a PENDING_PAYMENT booking with the price locked in from the
    /// flight's current state. Soft hold: seats are checked but not
    /// committed, so the later confirmation must re-check.
    pub async fn reserve(
        &self,
        flight_number: &str,
        passenger_name: &str,
        account_id: i64,
    ) -> CoreResult<ReservationReceipt> {
        let passenger_name = passenger_name.trim();
        if passenger_name.is_empty() {
            return Err(CoreError::Validation(
                "passenger name must not be empty".into(),
            ));
        }

        let flight = self.inventory.get_by_number(flight_number).await?;
        if flight.seats_remaining == 0 {
            return Err(CoreError::SeatUnavailable(format!(
                "no seats available for reservation on flight {flight_number}"
            )));
        }

        let price_due = flight.current_price();

        let mut state = self.state.write().await;
        let pnr = loop {
            let candidate = new_pnr();
            if !state.live.contains_key(&candidate) && !state.cancelled.contains_key(&candidate) {
                break candidate;
            }
        };

        let booking = Booking {
            pnr: pnr.clone(),
            account_id,
            flight_id: flight.id,
            passenger_name: passenger_name.to_string(),
            price_paid: price_due,
            booking_date: Utc::now(),
            status: BookingStatus::PendingPayment,
        };
        state.live.insert(pnr.clone(), booking);

        tracing::info!(
            %pnr,
            flight_number,
            account_id,
            price_due,
            "reservation created, awaiting payment"
        );

        Ok(ReservationReceipt {
            pnr,
            status: BookingStatus::PendingPayment,
            price_due,
            flight_number: flight.flight_number,
            passenger_name: passenger_name.to_string(),
        })
    }

    /// Simulated payment: the one correctness-critical transaction.
    ///
    /// Holding the ledger write lock, the inventory's atomic
    /// check-and-decrement either commits the seat or fails with
    /// SeatUnavailable; the status flip to CONFIRMED happens only after a
    /// successful decrement, and a failed decrement mutates nothing.
    pub async fn confirm_payment(&self, pnr: &str) -> CoreResult<ConfirmationReceipt> {
        let pnr = pnr.trim().to_uppercase();
        let mut state = self.state.write().await;

        let booking = state
            .live
            .get_mut(&pnr)
            .ok_or_else(|| CoreError::NotFound(format!("pending booking {pnr} not found")))?;

        if booking.status == BookingStatus::Confirmed {
            return Err(CoreError::Conflict(format!(
                "booking {pnr} is already confirmed"
            )));
        }

        // Seats may have been exhausted since the soft hold was taken.
        let remaining = self.inventory.decrement_seat(booking.flight_id).await.map_err(|e| {
            match e {
                CoreError::SeatUnavailable(_) => CoreError::SeatUnavailable(
                    "payment failed: seat sold out during delay".into(),
                ),
                other => other,
            }
        })?;

        booking.status = BookingStatus::Confirmed;

        tracing::info!(%pnr, seats_remaining = remaining, "payment confirmed, seat committed");

        Ok(ConfirmationReceipt {
            pnr,
            status: BookingStatus::Confirmed,
            price_paid: booking.price_paid,
        })
    }

    /// Cancel a CONFIRMED booking: archive first (the record of intent),
    /// then delete the live row, then restore the seat. Runs under the
    /// ledger write lock as one atomic unit; a failed seat restore rolls
    /// the archive move back before surfacing the error.
    pub async fn cancel(&self, pnr: &str) -> CoreResult<RefundReceipt> {
        let pnr = pnr.trim().to_uppercase();
        let mut state = self.state.write().await;

        match state.live.get(&pnr) {
            Some(b) if b.status == BookingStatus::Confirmed => {}
            _ => {
                return Err(CoreError::NotFound(format!(
                    "booking {pnr} not found or not confirmed"
                )))
            }
        }

        let booking = state
            .live
            .remove(&pnr)
            .ok_or_else(|| CoreError::Internal(format!("booking {pnr} vanished mid-cancel")))?;

        let refund_amount = round2(booking.price_paid * self.refund_rate);
        let archive = CancelledBooking {
            pnr: pnr.clone(),
            account_id: booking.account_id,
            flight_id: booking.flight_id,
            passenger_name: booking.passenger_name.clone(),
            price_paid: booking.price_paid,
            refund_amount,
            cancellation_date: Utc::now(),
        };
        state.cancelled.insert(pnr.clone(), archive);

        if let Err(e) = self.inventory.increment_seat(booking.flight_id).await {
            // Roll back the archive move so no partial write survives.
            state.cancelled.remove(&pnr);
            state.live.insert(pnr.clone(), booking);
            tracing::error!(%pnr, error = %e, "seat restore failed, cancellation rolled back");
            return Err(e);
        }

        let price_paid = booking.price_paid;
        tracing::info!(%pnr, refund_amount, "booking cancelled and archived");

        Ok(RefundReceipt {
            pnr,
            price_paid,
            refund_amount,
            cancellation_fee: round2(price_paid - refund_amount),
            refund_rate: self.refund_rate,
        })
    }

    /// Confirmed bookings for an account, newest first.
    pub async fn confirmed_history(&self, account_id: i64) -> Vec<ConfirmedBookingView> {
        let username = self.accounts.username(account_id).await;
        let state = self.state.read().await;

        let mut rows = Vec::new();
        for booking in state.live.values() {
            if booking.account_id != account_id || booking.status != BookingStatus::Confirmed {
                continue;
            }
            let flight = match self.inventory.get(booking.flight_id).await {
                Ok(f) => f,
                Err(e) => {
                    tracing::warn!(pnr = %booking.pnr, error = %e, "dangling flight reference in history");
                    continue;
                }
            };
            rows.push(ConfirmedBookingView {
                pnr: booking.pnr.clone(),
                price_paid: booking.price_paid,
                booking_date: booking.booking_date,
                status: booking.status,
                passenger_name: booking.passenger_name.clone(),
                flight_number: flight.flight_number,
                airline: flight.airline,
                origin: flight.origin,
                destination: flight.destination,
                username: username.clone(),
            });
        }
        rows.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
        rows
    }

    /// Cancellation/refund history for an account, newest first.
    pub async fn cancelled_history(&self, account_id: i64) -> Vec<CancelledBookingView> {
        let username = self.accounts.username(account_id).await;
        let state = self.state.read().await;

        let mut rows = Vec::new();
        for record in state.cancelled.values() {
            if record.account_id != account_id {
                continue;
            }
            let flight = match self.inventory.get(record.flight_id).await {
                Ok(f) => f,
                Err(e) => {
                    tracing::warn!(pnr = %record.pnr, error = %e, "dangling flight reference in archive");
                    continue;
                }
            };
            rows.push(CancelledBookingView {
                pnr: record.pnr.clone(),
                price_paid: record.price_paid,
                refund_amount: record.refund_amount,
                cancellation_date: record.cancellation_date,
                passenger_name: record.passenger_name.clone(),
                flight_number: flight.flight_number,
                airline: flight.airline,
                username: username.clone(),
            });
        }
        rows.sort_by(|a, b| b.cancellation_date.cmp(&a.cancellation_date));
        rows
    }

    /// Ticket payload for a live booking.
    pub async fn ticket_data(&self, pnr: &str) -> CoreResult<TicketData> {
        let pnr = pnr.trim().to_uppercase();
        let state = self.state.read().await;
        let booking = state
            .live
            .get(&pnr)
            .ok_or_else(|| CoreError::NotFound(format!("booking {pnr} not found")))?;

        let flight = self.inventory.get(booking.flight_id).await?;
        let username = self.accounts.username(booking.account_id).await;

        Ok(TicketData {
            pnr,
            passenger_name: booking.passenger_name.clone(),
            flight_number: flight.flight_number,
            airline: flight.airline,
            origin: flight.origin,
            destination: flight.destination,
            price_paid: booking.price_paid,
            booking_date: booking.booking_date,
            status: booking.status,
            username,
        })
    }

    /// Receipt payload for an archived cancellation.
    pub async fn receipt_data(&self, pnr: &str) -> CoreResult<ReceiptData> {
        let pnr = pnr.trim().to_uppercase();
        let state = self.state.read().await;
        let record = state
            .cancelled
            .get(&pnr)
            .ok_or_else(|| CoreError::NotFound(format!("cancellation record {pnr} not found")))?;

        let flight = self.inventory.get(record.flight_id).await?;
        let username = self.accounts.username(record.account_id).await;

        Ok(ReceiptData {
            pnr,
            passenger_name: record.passenger_name.clone(),
            flight_number: flight.flight_number,
            airline: flight.airline,
            price_paid: record.price_paid,
            refund_amount: record.refund_amount,
            cancellation_fee: round2(record.price_paid - record.refund_amount),
            cancellation_date: record.cancellation_date,
            username,
        })
    }

    /// Drop PENDING_PAYMENT bookings older than `max_age`. The soft-hold
    /// design lets abandoned reservations pile up on nearly-sold-out
    /// flights; this sweep keeps the ledger bounded. Returns the number
    /// of bookings removed.
    pub async fn purge_stale_pending(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut state = self.state.write().await;
        let before = state.live.len();

        state.live.retain(|pnr, booking| {
            let stale = booking.status == BookingStatus::PendingPayment
                && booking.booking_date < cutoff;
            if stale {
                tracing::info!(%pnr, "purging stale pending booking");
            }
            !stale
        });

        before - state.live.len()
    }

    /// Live-set probe used by tests and diagnostics.
    pub async fn booking(&self, pnr: &str) -> Option<Booking> {
        let pnr = pnr.trim().to_uppercase();
        self.state.read().await.live.get(&pnr).cloned()
    }

    /// Archive probe used by tests and diagnostics.
    pub async fn cancelled_record(&self, pnr: &str) -> Option<CancelledBooking> {
        let pnr = pnr.trim().to_uppercase();
        self.state.read().await.cancelled.get(&pnr).cloned()
    }
}
