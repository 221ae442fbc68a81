//! Settings page

use crate::AppState;
use cashflow_utils::escape_html;

pub async fn page_settings(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let config = &state.config;

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Settings</h2></div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Server</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Host</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Port</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Forecast API</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Base URL</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Timeout</p><p class='font-medium'>{}s</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Screens</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Listing page size</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Default status</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Default currency</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Corporate directory size</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Forecast months</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Log level</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <p class='text-sm text-gray-500'>Edit config.yaml and restart to change these values.</p>"#,
        escape_html(&config.server.host),
        config.server.port,
        escape_html(&config.api.base_url),
        config.api.timeout_secs,
        config.listing.page_size,
        config.listing.default_status.label(),
        escape_html(&config.entry.default_currency),
        config.entry.corporate_page_size,
        config.dashboard.forecast_months,
        escape_html(&config.logging.level)
    );

    axum::response::Html(crate::page_response(&headers, "Settings", "/settings", &inner_content))
}
