//! Movement export routes.

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use payreport_core::reports::{AccountMovementRow, CommerceMovementsExport, ReportService};
use payreport_core::movement::group_by_source;
use payreport_shared::types::{AccountId, CommerceId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{authorization, parse_date};
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::upstream::{MovementQuery, fetch_all_movements};

/// Creates the export routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exports/movements/commerce", post(export_commerce_movements))
        .route("/exports/movements/account", post(export_account_movements))
}

/// Export request body.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    /// Export options.
    pub options: ExportOptions,
}

/// Export options.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// First day, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Last day, `YYYY-MM-DD`.
    pub end_date: Option<String>,
    /// Commerce to export (commerce export).
    pub commerce_id: Option<CommerceId>,
    /// Account the amounts are read from.
    pub profile_id: Option<AccountId>,
}

/// Response for the account export.
#[derive(Debug, Serialize)]
pub struct AccountExportResponse {
    /// One row per transaction.
    pub rows: Vec<AccountMovementRow>,
}

/// POST /exports/movements/commerce
async fn export_commerce_movements(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ExportRequest>,
) -> ApiResult<Json<CommerceMovementsExport>> {
    let options = request.options;
    let auth = authorization(&headers);
    let timezone = state.calendar.timezone();

    let Some(commerce_id) = options.commerce_id.as_ref() else {
        return Err(ApiError::validation("Missing parameters"));
    };
    let start = parse_date("startDate", options.start_date.as_deref(), timezone)?;
    let end = parse_date("endDate", options.end_date.as_deref(), timezone)?;

    info!(commerce_id = %commerce_id, %start, %end, "Commerce movements report start");

    let Some(commerce) = state.ledger.find_commerce(commerce_id, auth).await? else {
        warn!(commerce_id = %commerce_id, "Commerce not found");
        return Err(ApiError::not_found("Commerce not found"));
    };

    let range = state.calendar.calendar_day_range(start, end);
    let query = MovementQuery::for_range(commerce.primary_account_id.clone(), &range);
    let movements = fetch_all_movements(state.ledger.as_ref(), &query, state.paging, auth).await?;

    let export = ReportService::commerce_export(
        &commerce,
        start,
        end,
        movements,
        options.profile_id.as_ref(),
        timezone,
    )?;

    info!(
        commerce_id = %commerce_id,
        rows = export.rows.len(),
        file_name = %export.file_name,
        "Commerce movements report done"
    );
    Ok(Json(export))
}

/// POST /exports/movements/account
async fn export_account_movements(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ExportRequest>,
) -> ApiResult<Json<AccountExportResponse>> {
    let options = request.options;
    let auth = authorization(&headers);
    let timezone = state.calendar.timezone();

    let Some(profile_id) = options.profile_id else {
        return Err(ApiError::validation("Missing parameters"));
    };
    let start = parse_date("startDate", options.start_date.as_deref(), timezone)?;
    let end = parse_date("endDate", options.end_date.as_deref(), timezone)?;
    if start > end {
        return Err(ApiError::validation(format!(
            "Invalid date range: start {start} is after end {end}"
        )));
    }

    info!(account_id = %profile_id, %start, %end, "Account movements report start");

    let range = state.calendar.calendar_day_range(start, end);
    let query = MovementQuery::for_range(profile_id.clone(), &range);
    let movements = fetch_all_movements(state.ledger.as_ref(), &query, state.paging, auth).await?;

    let groups = group_by_source(movements);
    let rows = ReportService::account_rows(&groups, Some(&profile_id), timezone);

    Ok(Json(AccountExportResponse { rows }))
}
