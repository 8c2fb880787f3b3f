//! API route definitions.

use axum::Router;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use payreport_core::calendar::DateRange;
use serde::Serialize;

use crate::AppState;
use crate::error::{ApiError, ApiResult};

pub mod calendar;
pub mod exports;
pub mod health;
pub mod normatives;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(calendar::routes())
        .merge(exports::routes())
        .merge(normatives::routes())
}

/// Caller's `Authorization` header, forwarded to the ledger.
fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// Parses a request date: `YYYY-MM-DD`, or an RFC 3339 timestamp read in the
/// calendar's timezone.
fn parse_date(field: &str, value: Option<&str>, timezone: Tz) -> ApiResult<NaiveDate> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(format!("Missing parameter: {field}")))?;

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| {
            DateTime::parse_from_rfc3339(value).map(|at| at.with_timezone(&timezone).date_naive())
        })
        .map_err(|_| ApiError::validation(format!("Invalid date for {field}: {value}")))
}

/// A range as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeResponse {
    /// Local start with offset.
    pub start_date: String,
    /// Local end with offset.
    pub end_date: String,
    /// UTC start as sent to the ledger.
    pub start_utc: String,
    /// UTC end as sent to the ledger.
    pub end_utc: String,
}

impl From<DateRange> for RangeResponse {
    fn from(range: DateRange) -> Self {
        const LOCAL: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";
        let (start_utc, end_utc) = range.to_utc_strings();
        Self {
            start_date: range.start_date.format(LOCAL).to_string(),
            end_date: range.end_date.format(LOCAL).to_string(),
            start_utc,
            end_utc,
        }
    }
}
