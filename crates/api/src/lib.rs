//! HTTP API layer with Axum routes and the upstream ledger client.
//!
//! This crate provides:
//! - REST API routes for calendars, exports and normative files
//! - The `LedgerSource` collaborator and its HTTP implementation
//! - JSON error responses

pub mod error;
pub mod routes;
pub mod upstream;

use std::sync::Arc;

use axum::Router;
use payreport_core::calendar::BankingCalendar;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use upstream::{LedgerSource, PagingPolicy};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upstream ledger.
    pub ledger: Arc<dyn LedgerSource>,
    /// Banking calendar for the configured timezone and holidays.
    pub calendar: Arc<BankingCalendar>,
    /// How movement pages are fetched.
    pub paging: PagingPolicy,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
