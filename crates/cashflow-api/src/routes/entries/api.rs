//! Entry editor endpoints - HTMX partial responses
//!
//! Endpoints:
//! - htmx_entry_field: Apply one changed input, re-render the editor
//! - htmx_entry_submit: Validate and send the update
//! - htmx_entry_cancel: Drop the unsaved form
//! - htmx_entry_corporates: Corporate picker, optionally filtered
//! - htmx_entry_corporate: Copy a picked corporate into the form

use super::page::{render_corporate_picker, render_editor};
use crate::{notice_html, parse_form, ApiError, AppState};
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use cashflow_core::editor::CorporateSearchField;
use cashflow_core::Notice;
use std::collections::HashMap;

const LISTING_PATH: &str = "/listing";

async fn editor_fragment(state: &AppState, id: u64, notice: Option<Notice>) -> Result<Html<String>, ApiError> {
    let editor = state.backoffice.editor(id).await.ok_or_else(|| ApiError::NotFound {
        resource: format!("entry {}", id),
    })?;
    Ok(Html(render_editor(&editor, notice.as_ref())))
}

/// HTMX: One input changed
pub async fn htmx_entry_field(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: String,
) -> Result<Html<String>, ApiError> {
    let mut notice = None;
    for (name, value) in parse_form(&body) {
        if let Some(n) = state.backoffice.edit_field(id, &name, &value).await {
            notice = Some(n);
        }
    }
    editor_fragment(&state, id, notice).await
}

/// HTMX: Submit; a saved entry sends the browser back to the listing
pub async fn htmx_entry_submit(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Response, ApiError> {
    let outcome = state.backoffice.submit_entry(id).await;
    if outcome.saved {
        return Ok(([("HX-Redirect", LISTING_PATH)], Html(notice_html(Some(&outcome.notice)))).into_response());
    }
    Ok(editor_fragment(&state, id, Some(outcome.notice)).await?.into_response())
}

/// HTMX: Cancel back to the listing
pub async fn htmx_entry_cancel(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    state.backoffice.cancel_entry(id).await;
    ([("HX-Redirect", LISTING_PATH)], Html(String::new())).into_response()
}

/// HTMX: Corporate picker; without a term the full directory is refreshed
pub async fn htmx_entry_corporates(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let notice = match params.get("term") {
        Some(term) => {
            let field = params
                .get("field")
                .and_then(|f| f.parse::<CorporateSearchField>().ok())
                .unwrap_or(CorporateSearchField::CorporateCode);
            state.backoffice.search_corporates(id, field, term).await
        }
        None => state.backoffice.refresh_directory(id).await,
    };
    let editor = state.backoffice.editor(id).await.ok_or_else(|| ApiError::NotFound {
        resource: format!("entry {}", id),
    })?;
    Ok(Html(render_corporate_picker(&editor, notice.as_ref())))
}

/// HTMX: Picker row selected
pub async fn htmx_entry_corporate(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: String,
) -> Result<Html<String>, ApiError> {
    let form = parse_form(&body);
    let corporate_id: u64 = form
        .get("corporateId")
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| ApiError::bad_request("corporateId is required"))?;
    let notice = state.backoffice.select_corporate(id, corporate_id).await;
    editor_fragment(&state, id, notice).await
}
