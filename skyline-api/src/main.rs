use skyline_api::{app, state::AuthConfig, AppState};
use skyline_store::app_config::Config;
use skyline_store::{seed, AccountStore, BookingLedger, DemandSimulator, FlightInventory};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyline_api=debug,skyline_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting Skyline API on port {}", config.server.port);

    let inventory = Arc::new(FlightInventory::new());
    seed::load_demo_catalog(&inventory).await?;

    let accounts = Arc::new(AccountStore::new());
    let ledger = Arc::new(
        BookingLedger::new(inventory.clone(), accounts.clone())
            .with_refund_rate(config.business_rules.refund_rate),
    );

    // Periodic market-volatility sweep, owned here and injected with the
    // inventory handle.
    let simulator = DemandSimulator::new(
        inventory.clone(),
        Duration::from_secs(config.business_rules.demand_interval_seconds),
        config.business_rules.demand_factor_min,
        config.business_rules.demand_factor_max,
    );
    tokio::spawn(simulator.run());

    // Garbage-collect abandoned PENDING_PAYMENT bookings.
    let pending_ttl = chrono::Duration::seconds(config.business_rules.pending_ttl_seconds as i64);
    let sweep_ledger = ledger.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        loop {
            ticker.tick().await;
            let purged = sweep_ledger.purge_stale_pending(pending_ttl).await;
            if purged > 0 {
                tracing::info!(purged, "stale pending bookings purged");
            }
        }
    });

    let app_state = AppState {
        inventory,
        accounts,
        ledger,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
