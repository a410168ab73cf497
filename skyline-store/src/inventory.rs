use serde::{Deserialize, Serialize};
use skyline_core::flight::Flight;
use skyline_core::{CoreError, CoreResult};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory flight store; the single source of truth for seats_remaining.
///
/// Seat mutation happens under the write guard, so the check-and-decrement
/// used at payment time is atomic with respect to concurrent confirmations
/// on the same flight.
pub struct FlightInventory {
    flights: RwLock<HashMap<Uuid, Flight>>,
}

/// Exact-match filter on the free-text origin/destination labels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightFilter {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// A flight together with its live quote, as served to searchers.
#[derive(Debug, Clone, Serialize)]
pub struct PricedFlight {
    #[serde(flatten)]
    pub flight: Flight,
    pub final_price: f64,
}

impl FlightInventory {
    pub fn new() -> Self {
        Self {
            flights: RwLock::new(HashMap::new()),
        }
    }

    /// Load a flight at data-load time. Flight numbers are unique.
    pub async fn insert(&self, flight: Flight) -> CoreResult<()> {
        let mut flights = self.flights.write().await;
        if flights
            .values()
            .any(|f| f.flight_number == flight.flight_number)
        {
            return Err(CoreError::Conflict(format!(
                "flight {} already exists",
                flight.flight_number
            )));
        }
        flights.insert(flight.id, flight);
        Ok(())
    }

    /// Flights matching the filter, priced at read time and sorted by the
    /// live quote. Callers decide whether an empty result is an error.
    pub async fn list(&self, filter: &FlightFilter, order: SortOrder) -> Vec<PricedFlight> {
        let flights = self.flights.read().await;
        let mut results: Vec<PricedFlight> = flights
            .values()
            .filter(|f| {
                filter
                    .origin
                    .as_deref()
                    .map_or(true, |o| f.origin == o.trim())
                    && filter
                        .destination
                        .as_deref()
                        .map_or(true, |d| f.destination == d.trim())
            })
            .map(|f| PricedFlight {
                final_price: f.current_price(),
                flight: f.clone(),
            })
            .collect();

        results.sort_by(|a, b| {
            let ordering = a
                .final_price
                .partial_cmp(&b.final_price)
                .unwrap_or(std::cmp::Ordering::Equal);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        results
    }

    pub async fn get(&self, flight_id: Uuid) -> CoreResult<Flight> {
        let flights = self.flights.read().await;
        flights
            .get(&flight_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("flight {flight_id} not found")))
    }

    pub async fn get_by_number(&self, flight_number: &str) -> CoreResult<Flight> {
        let flights = self.flights.read().await;
        flights
            .values()
            .find(|f| f.flight_number == flight_number)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("flight {flight_number} not found")))
    }

    /// Atomic check-and-decrement: the only place a seat is committed.
    /// Returns the new remaining count.
    pub async fn decrement_seat(&self, flight_id: Uuid) -> CoreResult<u32> {
        let mut flights = self.flights.write().await;
        let flight = flights
            .get_mut(&flight_id)
            .ok_or_else(|| CoreError::NotFound(format!("flight {flight_id} not found")))?;

        if flight.seats_remaining == 0 {
            return Err(CoreError::SeatUnavailable(format!(
                "flight {} is sold out",
                flight.flight_number
            )));
        }
        flight.seats_remaining -= 1;
        Ok(flight.seats_remaining)
    }

    /// Restore exactly one seat, never exceeding capacity.
    pub async fn increment_seat(&self, flight_id: Uuid) -> CoreResult<u32> {
        let mut flights = self.flights.write().await;
        let flight = flights
            .get_mut(&flight_id)
            .ok_or_else(|| CoreError::NotFound(format!("flight {flight_id} not found")))?;

        if flight.seats_remaining >= flight.total_seats {
            return Err(CoreError::Internal(format!(
                "seat restore on flight {} would exceed capacity",
                flight.flight_number
            )));
        }
        flight.seats_remaining += 1;
        Ok(flight.seats_remaining)
    }

    /// Unconditional overwrite, used by the demand simulator sweep.
    pub async fn update_demand_factor(&self, flight_id: Uuid, value: f64) -> CoreResult<()> {
        let mut flights = self.flights.write().await;
        let flight = flights
            .get_mut(&flight_id)
            .ok_or_else(|| CoreError::NotFound(format!("flight {flight_id} not found")))?;
        flight.demand_factor = value;
        Ok(())
    }

    pub async fn flight_ids(&self) -> Vec<Uuid> {
        self.flights.read().await.keys().copied().collect()
    }

    /// Sorted union of origin and destination labels, consumed by the
    /// external trip-advisor collaborator.
    pub async fn distinct_labels(&self) -> Vec<String> {
        let flights = self.flights.read().await;
        let mut labels: Vec<String> = flights
            .values()
            .flat_map(|f| [f.origin.clone(), f.destination.clone()])
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }
}

impl Default for FlightInventory {
    fn default() -> Self {
        Self::new()
    }
}
