//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::listing: Pending / rejected / review listing, selection, authorize and reject
//! - routes::entries: Forecast entry editor and corporate picker
//! - routes::summary: Account summary dashboard
//! - routes::settings: Configuration display

pub mod error;
pub mod routes;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use cashflow_config::Config;
use cashflow_core::{Backoffice, Notice, NoticeLevel};
use cashflow_utils::escape_html;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub backoffice: Arc<Backoffice>,
    pub config: Config,
}

impl AppState {
    pub fn new(backoffice: Arc<Backoffice>) -> Self {
        let config = backoffice.config().clone();
        Self { backoffice, config }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::entries::{
        htmx_entry_cancel, htmx_entry_corporate, htmx_entry_corporates, htmx_entry_field,
        htmx_entry_submit, page_entry_edit,
    };
    use routes::listing::{
        api_listing, htmx_listing_authorize, htmx_listing_authorize_single, htmx_listing_next,
        htmx_listing_previous, htmx_listing_search, htmx_listing_select, htmx_listing_select_all,
        htmx_listing_status, htmx_listing_table, htmx_reject, htmx_reject_cancel,
        htmx_reject_dialog, htmx_reject_dialog_single, page_listing,
    };
    use routes::settings::{api_settings, page_settings};
    use routes::summary::{htmx_summary_date, htmx_summary_range_toggle, htmx_summary_search, page_summary};

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/settings", get(api_settings))
        .route("/api/listing", get(api_listing))
        // HTMX page routes
        .route("/", get(index_page))
        .route("/listing", get(page_listing))
        .route("/entries/:id/edit", get(page_entry_edit))
        .route("/summary", get(page_summary))
        .route("/settings", get(page_settings))
        // Listing partials
        .route("/listing/table", get(htmx_listing_table))
        .route("/listing/status/:status", post(htmx_listing_status))
        .route("/listing/next", post(htmx_listing_next))
        .route("/listing/previous", post(htmx_listing_previous))
        .route("/listing/search", get(htmx_listing_search))
        .route("/listing/select/:id", post(htmx_listing_select))
        .route("/listing/select-all", post(htmx_listing_select_all))
        .route("/listing/authorize", post(htmx_listing_authorize))
        .route("/listing/authorize/:id", post(htmx_listing_authorize_single))
        .route("/listing/reject/dialog", get(htmx_reject_dialog))
        .route("/listing/reject/dialog/:id", get(htmx_reject_dialog_single))
        .route("/listing/reject/cancel", post(htmx_reject_cancel))
        .route("/listing/reject", post(htmx_reject))
        // Entry editor partials
        .route("/entries/:id/field", post(htmx_entry_field))
        .route("/entries/:id/submit", post(htmx_entry_submit))
        .route("/entries/:id/cancel", post(htmx_entry_cancel))
        .route("/entries/:id/corporates", get(htmx_entry_corporates))
        .route("/entries/:id/corporate", post(htmx_entry_corporate))
        // Summary partials
        .route("/summary/search", get(htmx_summary_search))
        .route("/summary/date", post(htmx_summary_date))
        .route("/summary/range-toggle", post(htmx_summary_range_toggle))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Cash Flow</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/", "Home", "home"),
        ("/listing", "Forecast Entries", "listing"),
        ("/summary", "Summary", "summary"),
        ("/settings", "Settings", "settings"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Cash Flow</h1><p class='text-xs text-gray-500'>Forecast back office</p></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label, id) in &links {
        let is_active = if *path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path) || (*id == "listing" && current_path.starts_with("/entries"))
        };
        let active_class = if is_active { "bg-indigo-50 text-indigo-600" } else { "text-gray-600 hover:bg-gray-50" };
        let icon = match *id {
            "home" => "🏠",
            "listing" => "📋",
            "summary" => "📈",
            "settings" => "⚙️",
            _ => "📄",
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Check if request is from HTMX (partial page update)
fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, current_path: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!(
            r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            inner_content
        )
    } else {
        base_html(
            title,
            &format!(
                r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
                nav_sidebar(current_path),
                inner_content
            ),
        )
    }
}

/// Toast for a notice; empty when there is nothing to say
pub fn notice_html(notice: Option<&Notice>) -> String {
    let Some(notice) = notice else {
        return String::new();
    };
    let (box_class, icon) = match notice.level {
        NoticeLevel::Success => ("bg-green-50 border-green-200 text-green-800", "✓"),
        NoticeLevel::Info => ("bg-blue-50 border-blue-200 text-blue-800", "ℹ"),
        NoticeLevel::Warning => ("bg-yellow-50 border-yellow-200 text-yellow-800", "!"),
        NoticeLevel::Error => ("bg-red-50 border-red-200 text-red-800", "✗"),
    };
    format!(
        r#"<div class='notice notice-{} border rounded-lg p-4 mb-4 {}' role='alert'>
            <div class='flex items-center gap-2'><span>{}</span><span class='font-medium'>{}</span></div>
            <p class='text-sm mt-1'>{}</p>
        </div>"#,
        notice.level.as_str(),
        box_class,
        icon,
        escape_html(&notice.title),
        escape_html(&notice.message)
    )
}

/// Decode an `application/x-www-form-urlencoded` body
pub fn parse_form(body: &str) -> HashMap<String, String> {
    let decode = |raw: &str| {
        let spaced = raw.replace('+', " ");
        urlencoding::decode(&spaced)
            .map(|s| s.into_owned())
            .unwrap_or(spaced)
    };
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode(key), decode(value)),
            None => (decode(pair), String::new()),
        })
        .collect()
}

/// Index page with navigation
async fn index_page(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let listing = state.backoffice.listing_snapshot().await;

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Cash Flow Forecasting</h2></div>
        <div class='grid grid-cols-1 md:grid-cols-3 gap-4'>
            <a href='/listing' class='bg-white rounded-xl shadow-sm p-6 hover:shadow-md'>
                <p class='text-sm text-gray-500'>Forecast Entries</p>
                <p class='text-lg font-semibold text-indigo-600'>{} entries</p>
                <p class='text-xs text-gray-400 mt-1'>Authorize, reject and review entries</p>
            </a>
            <a href='/summary' class='bg-white rounded-xl shadow-sm p-6 hover:shadow-md'>
                <p class='text-sm text-gray-500'>Summary</p>
                <p class='text-lg font-semibold text-indigo-600'>Account balances</p>
                <p class='text-xs text-gray-400 mt-1'>Search accounts and chart their forecast window</p>
            </a>
            <a href='/settings' class='bg-white rounded-xl shadow-sm p-6 hover:shadow-md'>
                <p class='text-sm text-gray-500'>Settings</p>
                <p class='text-lg font-semibold text-indigo-600'>{}</p>
                <p class='text-xs text-gray-400 mt-1'>Remote API</p>
            </a>
        </div>"#,
        listing.status.label(),
        escape_html(&state.config.api.base_url)
    );

    axum::response::Html(page_response(&headers, "Home", "/", &inner_content))
}

/// Start the HTTP server
///
/// Binds `server.host:server.port` and serves until the process stops.
pub async fn start_server(config: Config, backoffice: Arc<Backoffice>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { backoffice, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    log::info!("Starting cash-flow back office on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /listing (Pending, rejected and review entries)");
    log::info!("  - /entries/:id/edit (Entry editor)");
    log::info!("  - /summary (Account summary)");
    log::info!("  - /settings (Configuration)");
    log::info!("  - /api/* (JSON endpoints)");

    axum::serve(listener, router).await.context("server error")?;
    log::info!("Server stopped gracefully");
    Ok(())
}
