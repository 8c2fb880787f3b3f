//! Banking calendar routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{RangeResponse, parse_date};
use crate::AppState;
use crate::error::{ApiError, ApiResult};

/// Creates the calendar routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calendar/banking-day", get(get_banking_day))
        .route("/calendar/banking-month", get(get_banking_month))
}

/// Query parameters for the banking-day endpoint.
#[derive(Debug, Deserialize)]
pub struct BankingDayQuery {
    /// Reference date; defaults to today.
    pub date: Option<String>,
}

/// Query parameters for the banking-month endpoint.
#[derive(Debug, Deserialize)]
pub struct BankingMonthQuery {
    /// Month as `YYYY-MM`.
    pub month: Option<String>,
}

/// Response for the banking-day endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankingDayResponse {
    /// Reference date.
    pub date: NaiveDate,
    /// Whether the reference date is itself a banking day.
    pub is_banking_day: bool,
    /// Last banking day at or before the reference date.
    pub adjusted_date: NaiveDate,
    /// Reconciliation window.
    pub banking_day: RangeResponse,
    /// Cash-in/cash-out window.
    pub settlement_window: RangeResponse,
}

/// Response for the banking-month endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankingMonthResponse {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Banking month window.
    pub range: RangeResponse,
}

/// GET /calendar/banking-day
async fn get_banking_day(
    State(state): State<AppState>,
    Query(query): Query<BankingDayQuery>,
) -> ApiResult<Json<BankingDayResponse>> {
    let calendar = &state.calendar;
    let date = match query.date.as_deref() {
        None => Utc::now().with_timezone(&calendar.timezone()).date_naive(),
        Some(value) => parse_date("date", Some(value), calendar.timezone())?,
    };
    let (adjusted_date, _) = calendar.adjust_backward(date);

    Ok(Json(BankingDayResponse {
        date,
        is_banking_day: calendar.is_banking_day(date),
        adjusted_date,
        banking_day: calendar.banking_day_range(date).into(),
        settlement_window: calendar.settlement_window(date).into(),
    }))
}

/// GET /calendar/banking-month
async fn get_banking_month(
    State(state): State<AppState>,
    Query(query): Query<BankingMonthQuery>,
) -> ApiResult<Json<BankingMonthResponse>> {
    let month = parse_month(query.month.as_deref())?;

    Ok(Json(BankingMonthResponse {
        month: month.format("%Y-%m").to_string(),
        range: state.calendar.banking_month_range(month).into(),
    }))
}

/// Parses `YYYY-MM` (a full date is accepted too) into the first of the month.
pub(crate) fn parse_month(value: Option<&str>) -> ApiResult<NaiveDate> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation("Missing parameter: month"))?;

    let first = value.get(..7).map(|ym| format!("{ym}-01")).unwrap_or_default();
    NaiveDate::parse_from_str(&first, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("Invalid month: {value}")))
}
