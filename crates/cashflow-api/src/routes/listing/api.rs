//! Listing endpoints - JSON API and HTMX partial responses
//!
//! Every HTMX handler runs one back-office operation and answers with the
//! refreshed `#listing-content` fragment, notice included.

use super::page::render_listing;
use crate::{parse_form, ApiError, AppState};
use axum::extract::{Path, Query, State};
use axum::response::Html;
use cashflow_config::WorkflowStatus;
use cashflow_core::listing::ListingSnapshot;
use cashflow_core::Notice;
use cashflow_gateway::SearchField;
use std::collections::HashMap;

async fn fragment(state: &AppState, notice: Option<Notice>) -> Html<String> {
    let listing = state.backoffice.listing().await;
    Html(render_listing(&listing, notice.as_ref()))
}

/// Listing snapshot (JSON API)
pub async fn api_listing(State(state): State<AppState>) -> axum::Json<ListingSnapshot> {
    axum::Json(state.backoffice.listing_snapshot().await)
}

/// HTMX: Reload the current page
pub async fn htmx_listing_table(State(state): State<AppState>) -> Html<String> {
    let notice = state.backoffice.refresh().await;
    fragment(&state, notice).await
}

/// HTMX: Switch status tab
pub async fn htmx_listing_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Html<String>, ApiError> {
    let status: WorkflowStatus = status.parse().map_err(ApiError::bad_request)?;
    let notice = state.backoffice.switch_status(status).await;
    Ok(fragment(&state, notice).await)
}

pub async fn htmx_listing_next(State(state): State<AppState>) -> Html<String> {
    let notice = state.backoffice.next_page().await;
    fragment(&state, notice).await
}

pub async fn htmx_listing_previous(State(state): State<AppState>) -> Html<String> {
    let notice = state.backoffice.previous_page().await;
    fragment(&state, notice).await
}

/// HTMX: Field search, or `clear` to drop it
pub async fn htmx_listing_search(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let notice = if params.contains_key("clear") {
        state.backoffice.clear_search().await
    } else {
        let field = params
            .get("field")
            .and_then(|f| f.parse::<SearchField>().ok())
            .unwrap_or_default();
        let value = params.get("value").map(String::as_str).unwrap_or("");
        state.backoffice.search(field, value).await
    };
    fragment(&state, notice).await
}

/// HTMX: Toggle one row checkbox
pub async fn htmx_listing_select(State(state): State<AppState>, Path(id): Path<u64>) -> Html<String> {
    if state.backoffice.toggle_row(id).await.is_none() {
        log::debug!(target: "cashflow::api", "row {} is not on the current page", id);
    }
    fragment(&state, None).await
}

/// HTMX: Header checkbox
pub async fn htmx_listing_select_all(State(state): State<AppState>, body: String) -> Html<String> {
    let form = parse_form(&body);
    let checked = matches!(form.get("checked").map(String::as_str), Some("true" | "on" | "1"));
    state.backoffice.toggle_all(checked).await;
    fragment(&state, None).await
}

/// HTMX: Authorize the selection
pub async fn htmx_listing_authorize(State(state): State<AppState>) -> Html<String> {
    let notice = state.backoffice.authorize().await;
    fragment(&state, Some(notice)).await
}

/// HTMX: Authorize one row
pub async fn htmx_listing_authorize_single(State(state): State<AppState>, Path(id): Path<u64>) -> Html<String> {
    let notice = state.backoffice.authorize_single(id).await;
    fragment(&state, Some(notice)).await
}

/// HTMX: Open the reject dialog for the selection
pub async fn htmx_reject_dialog(State(state): State<AppState>) -> Html<String> {
    let notice = state.backoffice.open_reject_dialog(None).await;
    fragment(&state, notice).await
}

/// HTMX: Open the reject dialog for one row
pub async fn htmx_reject_dialog_single(State(state): State<AppState>, Path(id): Path<u64>) -> Html<String> {
    let notice = state.backoffice.open_reject_dialog(Some(id)).await;
    fragment(&state, notice).await
}

pub async fn htmx_reject_cancel(State(state): State<AppState>) -> Html<String> {
    state.backoffice.cancel_reject_dialog().await;
    fragment(&state, None).await
}

/// HTMX: Submit the reject dialog
pub async fn htmx_reject(State(state): State<AppState>, body: String) -> Html<String> {
    let form = parse_form(&body);
    let reason = form.get("reason").map(String::as_str).unwrap_or("");
    let notice = state.backoffice.reject(reason).await;
    fragment(&state, Some(notice)).await
}
