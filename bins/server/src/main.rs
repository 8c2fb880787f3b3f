//! Payreport API Server
//!
//! Main entry point for the reporting service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payreport_api::upstream::{HttpLedgerClient, PagingPolicy};
use payreport_api::{AppState, create_router};
use payreport_core::calendar::{BankingCalendar, HolidayCalendar, parse_timezone};
use payreport_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payreport=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Build the banking calendar
    let (holidays, rejected) = HolidayCalendar::parse_lenient(config.calendar.holiday_entries());
    for entry in &rejected {
        warn!(entry = %entry, "Skipping unparseable holiday entry");
    }
    let timezone = parse_timezone(&config.calendar.timezone)?;
    let calendar = BankingCalendar::new(holidays, timezone)
        .with_cutoff_hour(config.calendar.cutoff_hour)?;
    info!(
        timezone = %config.calendar.timezone,
        holidays = calendar.holidays().len(),
        cutoff = %calendar.cutoff(),
        "Banking calendar configured"
    );

    // Create upstream ledger client
    let ledger = HttpLedgerClient::new(&config.upstream)?;
    info!(data_uri = %config.upstream.data_uri, "Upstream ledger configured");

    // Create application state
    let state = AppState {
        ledger: Arc::new(ledger),
        calendar: Arc::new(calendar),
        paging: PagingPolicy::from_config(&config.upstream),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
