use skyline_store::{AccountStore, BookingLedger, FlightInventory};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<FlightInventory>,
    pub accounts: Arc<AccountStore>,
    pub ledger: Arc<BookingLedger>,
    pub auth: AuthConfig,
}
