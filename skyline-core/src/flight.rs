use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{pricing, CoreError, CoreResult};

/// A sellable flight. `seats_remaining` is mutated only through the
/// inventory's atomic commit/release operations; `demand_factor` only by
/// the demand simulator sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    /// Human-facing unique identifier, e.g. "SK101".
    pub flight_number: String,
    pub airline: String,
    /// Free-text city/country label, e.g. "London, UK".
    pub origin: String,
    pub destination: String,
    pub base_price: f64,
    /// Immutable after creation.
    pub total_seats: u32,
    pub seats_remaining: u32,
    /// Nominal range [0.9, 1.1], perturbed periodically.
    pub demand_factor: f64,
}

impl Flight {
    /// Create a fully-open flight, validating the data-integrity
    /// preconditions the pricing engine relies on.
    pub fn new(
        flight_number: impl Into<String>,
        airline: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        base_price: f64,
        total_seats: u32,
    ) -> CoreResult<Self> {
        let flight_number = flight_number.into();
        if flight_number.trim().is_empty() {
            return Err(CoreError::Validation("flight number must not be empty".into()));
        }
        if !(base_price > 0.0) {
            return Err(CoreError::Validation(format!(
                "base price must be positive, got {base_price}"
            )));
        }
        if total_seats == 0 {
            return Err(CoreError::Validation(
                "flight must hold at least one seat".into(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            flight_number,
            airline: airline.into(),
            origin: origin.into(),
            destination: destination.into(),
            base_price,
            total_seats,
            seats_remaining: total_seats,
            demand_factor: 1.0,
        })
    }

    /// Seed helper: start with some seats already sold.
    pub fn with_seats_remaining(mut self, seats_remaining: u32) -> CoreResult<Self> {
        if seats_remaining > self.total_seats {
            return Err(CoreError::Validation(format!(
                "seats_remaining {seats_remaining} exceeds capacity {}",
                self.total_seats
            )));
        }
        self.seats_remaining = seats_remaining;
        Ok(self)
    }

    /// Live quote for this flight's current state.
    pub fn current_price(&self) -> f64 {
        pricing::final_price(
            self.base_price,
            self.seats_remaining,
            self.total_seats,
            self.demand_factor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_flights() {
        assert!(Flight::new("SK1", "Skyline", "A", "B", 0.0, 100).is_err());
        assert!(Flight::new("SK1", "Skyline", "A", "B", -5.0, 100).is_err());
        assert!(Flight::new("SK1", "Skyline", "A", "B", 100.0, 0).is_err());
        assert!(Flight::new("  ", "Skyline", "A", "B", 100.0, 100).is_err());
    }

    #[test]
    fn new_flight_starts_fully_open() {
        let flight = Flight::new("SK1", "Skyline", "A", "B", 100.0, 180).unwrap();
        assert_eq!(flight.seats_remaining, 180);
        assert_eq!(flight.demand_factor, 1.0);
    }

    #[test]
    fn seed_seats_bounded_by_capacity() {
        let flight = Flight::new("SK1", "Skyline", "A", "B", 100.0, 100).unwrap();
        assert!(flight.clone().with_seats_remaining(101).is_err());
        let flight = flight.with_seats_remaining(20).unwrap();
        assert_eq!(flight.current_price(), 135.00);
    }
}
