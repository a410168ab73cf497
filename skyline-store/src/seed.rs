use skyline_core::flight::Flight;
use skyline_core::CoreResult;

use crate::inventory::FlightInventory;

/// Demo flight catalog, loaded at startup. Some flights start partially
/// sold so scarcity pricing is visible out of the box.
pub fn demo_flights() -> CoreResult<Vec<Flight>> {
    Ok(vec![
        Flight::new("SK101", "Skyline Air", "London, UK", "Paris, France", 120.0, 150)?
            .with_seats_remaining(120)?,
        Flight::new("SK102", "Skyline Air", "Paris, France", "London, UK", 115.0, 150)?
            .with_seats_remaining(95)?,
        Flight::new("SK201", "Skyline Air", "London, UK", "Rome, Italy", 140.0, 180)?
            .with_seats_remaining(60)?,
        Flight::new("AT310", "Atlas Wings", "Rome, Italy", "Athens, Greece", 95.0, 120)?
            .with_seats_remaining(25)?,
        Flight::new("AT311", "Atlas Wings", "Athens, Greece", "Rome, Italy", 95.0, 120)?
            .with_seats_remaining(110)?,
        Flight::new("NV550", "Nova Jet", "New York, USA", "London, UK", 420.0, 240)?
            .with_seats_remaining(200)?,
        Flight::new("NV551", "Nova Jet", "London, UK", "New York, USA", 435.0, 240)?
            .with_seats_remaining(40)?,
        Flight::new("NV720", "Nova Jet", "New York, USA", "Tokyo, Japan", 780.0, 260)?
            .with_seats_remaining(255)?,
    ])
}

/// Populate an inventory with the demo catalog.
pub async fn load_demo_catalog(inventory: &FlightInventory) -> CoreResult<usize> {
    let flights = demo_flights()?;
    let count = flights.len();
    for flight in flights {
        inventory.insert(flight).await?;
    }
    tracing::info!(count, "demo flight catalog loaded");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_catalog_loads_cleanly() {
        let inventory = FlightInventory::new();
        let count = load_demo_catalog(&inventory).await.unwrap();
        assert_eq!(count, 8);

        for id in inventory.flight_ids().await {
            let flight = inventory.get(id).await.unwrap();
            assert!(flight.seats_remaining <= flight.total_seats);
            assert!(flight.total_seats >= 1);
        }
    }
}
