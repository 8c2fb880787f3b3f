//! Regulatory file routes.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
    routing::post,
};
use payreport_core::normatives::{NormativeService, PaymentTotals};
use payreport_core::normatives::service::NORMATIVE_FILE_NAME;
use serde::Deserialize;
use tracing::info;

use super::calendar::parse_month;
use super::{authorization, parse_date};
use crate::AppState;
use crate::error::ApiResult;
use crate::upstream::PaymentClass;

/// Creates the normative routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/normatives/p41", post(normative_p41))
        .route("/normatives/balances", post(normative_balances))
}

/// P41 request body.
#[derive(Debug, Deserialize)]
pub struct P41Request {
    /// Month as `YYYY-MM`.
    pub month: Option<String>,
}

/// Balances request body.
#[derive(Debug, Deserialize)]
pub struct BalancesRequest {
    /// Request options.
    #[serde(default)]
    pub options: BalancesOptions,
}

/// Balances request options.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancesOptions {
    /// Accounts created up to the end of this day are counted.
    pub end_date: Option<String>,
}

fn text_attachment(body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={NORMATIVE_FILE_NAME}"),
            ),
        ],
        body,
    )
}

/// POST /normatives/p41
async fn normative_p41(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<P41Request>,
) -> ApiResult<impl IntoResponse> {
    let auth = authorization(&headers);
    let month = parse_month(request.month.as_deref())?;
    let range = state.calendar.calendar_month_range(month);

    info!(
        month = %month.format("%Y-%m"),
        start = %range.start_date,
        end = %range.end_date,
        "Building P41"
    );

    let (p2p, p2c) = tokio::try_join!(
        state.ledger.payment_amounts(PaymentClass::P2p, &range, auth),
        state.ledger.payment_amounts(PaymentClass::P2c, &range, auth),
    )?;

    let file = NormativeService::p41(
        PaymentTotals::from_amounts(&p2p),
        PaymentTotals::from_amounts(&p2c),
    );
    Ok(text_attachment(file))
}

/// POST /normatives/balances
async fn normative_balances(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<BalancesRequest>,
) -> ApiResult<impl IntoResponse> {
    let auth = authorization(&headers);
    let calendar = &state.calendar;
    let end_date = parse_date(
        "endDate",
        request.options.end_date.as_deref(),
        calendar.timezone(),
    )?;
    let end = calendar.calendar_day_range(end_date, end_date).end_utc();

    info!(%end_date, "Building balances file");

    let aggregates = state.ledger.balance_aggregates(end, auth).await?;
    Ok(text_attachment(NormativeService::balances(&aggregates)))
}
