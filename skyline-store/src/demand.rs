use rand::Rng;
use skyline_core::pricing::round2;
use std::sync::Arc;
use std::time::Duration;

use crate::inventory::FlightInventory;

/// Periodic market-volatility proxy: every interval, each flight's demand
/// factor is re-drawn uniformly from the configured range, independent per
/// flight. Owned by the composition root and injected with the inventory
/// handle, so tests can drive `tick` directly.
pub struct DemandSimulator {
    inventory: Arc<FlightInventory>,
    interval: Duration,
    min_factor: f64,
    max_factor: f64,
}

impl DemandSimulator {
    pub fn new(
        inventory: Arc<FlightInventory>,
        interval: Duration,
        min_factor: f64,
        max_factor: f64,
    ) -> Self {
        Self {
            inventory,
            interval,
            min_factor,
            max_factor,
        }
    }

    /// One best-effort sweep over the inventory. A failure on one flight
    /// is logged and skipped; it never blocks the rest of the sweep or
    /// the host process.
    pub async fn tick(&self) {
        let flight_ids = self.inventory.flight_ids().await;
        let mut updated = 0usize;

        for flight_id in flight_ids {
            let factor = {
                let mut rng = rand::thread_rng();
                round2(rng.gen_range(self.min_factor..=self.max_factor))
            };
            match self.inventory.update_demand_factor(flight_id, factor).await {
                Ok(()) => updated += 1,
                Err(e) => {
                    tracing::warn!(%flight_id, error = %e, "demand factor update skipped");
                }
            }
        }

        tracing::debug!(updated, "demand sweep complete");
    }

    /// Run forever on the configured wall-clock interval.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        // The first tick of a tokio interval fires immediately; that gives
        // freshly seeded flights a live factor right away.
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }
}
