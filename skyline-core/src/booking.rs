use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A live booking row. `price_paid` is the quote locked in at reservation
/// time; the flight's live price may drift afterwards and this field never
/// follows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Short unique human-presentable code, e.g. "PNR3F9A21C".
    pub pnr: String,
    pub account_id: i64,
    pub flight_id: Uuid,
    pub passenger_name: String,
    pub price_paid: f64,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    PendingPayment,
    Confirmed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::PendingPayment => write!(f, "PENDING_PAYMENT"),
            BookingStatus::Confirmed => write!(f, "CONFIRMED"),
        }
    }
}

/// Immutable archival copy created exactly once per cancellation. A PNR
/// lives either here or in the live set, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelledBooking {
    pub pnr: String,
    pub account_id: i64,
    pub flight_id: Uuid,
    pub passenger_name: String,
    pub price_paid: f64,
    pub refund_amount: f64,
    pub cancellation_date: DateTime<Utc>,
}

/// Draw a fresh PNR candidate: "PNR" + 7 uppercase hex characters.
///
/// The code space is large enough that collisions are negligible, but the
/// ledger still checks candidates against existing records and re-draws.
pub fn new_pnr() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("PNR{}", hex[..7].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pnr_shape() {
        let pnr = new_pnr();
        assert_eq!(pnr.len(), 10);
        assert!(pnr.starts_with("PNR"));
        assert!(pnr[3..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(pnr, pnr.to_uppercase());
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(BookingStatus::PendingPayment.to_string(), "PENDING_PAYMENT");
        assert_eq!(BookingStatus::Confirmed.to_string(), "CONFIRMED");
        let json = serde_json::to_string(&BookingStatus::PendingPayment).unwrap();
        assert_eq!(json, "\"PENDING_PAYMENT\"");
    }
}
