//! Summary endpoints - HTMX partial responses
//!
//! Endpoints:
//! - htmx_summary_search: Account search, then the first account's summary
//! - htmx_summary_date: New forecast start date
//! - htmx_summary_range_toggle: Flip the custom date range

use super::page::render_summary;
use crate::{parse_form, AppState};
use axum::extract::{Query, State};
use axum::response::Html;
use cashflow_core::Notice;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SummarySearchQuery {
    pub field: Option<String>,
    #[serde(default)]
    pub value: String,
}

async fn summary_fragment(state: &AppState, notice: Option<Notice>) -> Html<String> {
    let dashboard = state.backoffice.dashboard().await;
    Html(render_summary(&dashboard, notice.as_ref()))
}

/// HTMX: Search accounts
pub async fn htmx_summary_search(
    State(state): State<AppState>,
    Query(query): Query<SummarySearchQuery>,
) -> Html<String> {
    let notice = state
        .backoffice
        .search_accounts(query.field.as_deref(), &query.value)
        .await;
    summary_fragment(&state, notice).await
}

/// HTMX: Forecast date picked
pub async fn htmx_summary_date(State(state): State<AppState>, body: String) -> Html<String> {
    let form = parse_form(&body);
    let date = form.get("date").map(String::as_str).unwrap_or("");
    let notice = state.backoffice.change_forecast_date(date).await;
    summary_fragment(&state, notice).await
}

/// HTMX: Toggle the date range for an account
pub async fn htmx_summary_range_toggle(State(state): State<AppState>, body: String) -> Html<String> {
    let form = parse_form(&body);
    let account = form
        .get("account")
        .map(|a| a.trim())
        .filter(|a| !a.is_empty());
    let notice = state.backoffice.toggle_date_range(account).await;
    summary_fragment(&state, notice).await
}
