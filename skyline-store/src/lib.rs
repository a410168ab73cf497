pub mod accounts;
pub mod app_config;
pub mod demand;
pub mod inventory;
pub mod ledger;
pub mod seed;

pub use accounts::AccountStore;
pub use demand::DemandSimulator;
pub use inventory::{FlightFilter, FlightInventory, PricedFlight, SortOrder};
pub use ledger::BookingLedger;
