//! Summary page rendering
//!
//! Endpoints:
//! - page_summary: Account search, forecast window and charts
//!
//! Helper functions:
//! - render_summary: The `#summary-content` fragment
//! - chart_script: Chart.js bootstrap for one chart

use crate::{notice_html, AppState};
use cashflow_core::dashboard::{balance_chart, breakdown_chart, ChartData, DashboardState};
use cashflow_core::Notice;
use cashflow_gateway::{AccountSummary, TransactionSummary};
use cashflow_utils::{cell, escape_html, format_amount, format_money};

/// Summary page
pub async fn page_summary(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let dashboard = state.backoffice.dashboard().await;
    let (field, value) = match &dashboard.criteria {
        Some(c) => (c.field.param(), c.value.as_str()),
        None => ("", ""),
    };

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Summary</h2></div>
        <form hx-get='/summary/search' hx-target='#summary-content' class='flex items-center gap-2 mb-4'>
            <select name='field' class='px-3 py-2 border rounded-lg bg-white'>
                <option value=''>Select option</option>
                <option value='accountNumber' {}>Account Number</option>
                <option value='accountTitle' {}>Account Title</option>
            </select>
            <input type='text' name='value' value='{}' placeholder='Search value' class='px-3 py-2 border rounded-lg w-64'>
            <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Search</button>
        </form>
        <div id='summary-content'>{}</div>"#,
        if field == "accountNumber" { "selected" } else { "" },
        if field == "accountTitle" { "selected" } else { "" },
        escape_html(value),
        render_summary(&dashboard, None)
    );

    axum::response::Html(crate::page_response(&headers, "Summary", "/summary", &inner_content))
}

/// Everything inside `#summary-content`
pub fn render_summary(dashboard: &DashboardState, notice: Option<&Notice>) -> String {
    let mut html = notice_html(notice);
    html.push_str(&render_window_controls(dashboard));
    if let Some(error) = &dashboard.error {
        html.push_str(&format!(
            "<p class='summary-error text-sm text-red-600 mb-4'>{}</p>",
            escape_html(error)
        ));
    }
    html.push_str(&render_accounts(&dashboard.accounts));
    if let (Some(account), Some(summary)) = (&dashboard.summary_account, &dashboard.summary) {
        html.push_str(&render_balances(account, summary));
        html.push_str(&render_charts(summary));
    }
    html
}

fn render_window_controls(dashboard: &DashboardState) -> String {
    let date = dashboard
        .window
        .map(|w| w.start.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let account = dashboard.summary_account.as_deref().unwrap_or("");
    format!(
        r#"<div class='flex items-center gap-4 mb-4 p-3 bg-white rounded-lg border shadow-sm'>
            <form hx-post='/summary/date' hx-trigger='change' hx-target='#summary-content'>
                <label class='text-sm text-gray-600 mr-2'>Forecast from</label>
                <input type='date' name='date' value='{}' class='px-2 py-1.5 text-sm border rounded-lg'>
            </form>
            <span class='forecast-period text-sm font-medium'>{}</span>
            <div class='flex-1'></div>
            <button hx-post='/summary/range-toggle' hx-vals='{{"account": "{}"}}' hx-target='#summary-content' class='px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50'>Date range: {}</button>
        </div>"#,
        date,
        escape_html(&dashboard.forecast_period),
        escape_html(account),
        if dashboard.range_toggled { "On" } else { "Off" }
    )
}

fn render_accounts(accounts: &[AccountSummary]) -> String {
    if accounts.is_empty() {
        return String::new();
    }
    let rows: String = accounts
        .iter()
        .map(|a| {
            format!(
                "<tr><td class='px-3 py-2 font-medium'>{}</td><td class='px-3 py-2'>{}</td><td class='px-3 py-2'>{}</td><td class='px-3 py-2 text-right'>{}</td></tr>",
                cell(&a.account_number),
                cell(&a.account_title),
                cell(&a.account_type),
                format_money(a.balance, &a.currency)
            )
        })
        .collect();
    format!(
        r#"<div class='bg-white rounded-xl shadow-sm overflow-x-auto mb-6'>
            <table class='min-w-full text-sm'>
                <thead class='bg-gray-50 text-gray-600'><tr><th class='px-3 py-2 text-left'>Account Number</th><th class='px-3 py-2 text-left'>Account Title</th><th class='px-3 py-2 text-left'>Type</th><th class='px-3 py-2 text-right'>Balance</th></tr></thead>
                <tbody class='divide-y'>{}</tbody>
            </table>
        </div>"#,
        rows
    )
}

fn render_balances(account: &str, summary: &TransactionSummary) -> String {
    format!(
        r#"<h3 class='text-lg font-semibold mb-3'>{}</h3>
        <div class='grid grid-cols-2 md:grid-cols-4 gap-4 mb-6'>
            <div class='bg-blue-50 p-4 rounded-lg border border-blue-200'><p class='text-sm text-blue-600'>Opening Balance</p><p class='text-xl font-bold text-blue-700'>{}</p></div>
            <div class='bg-indigo-50 p-4 rounded-lg border border-indigo-200'><p class='text-sm text-indigo-600'>Closing Balance</p><p class='text-xl font-bold text-indigo-700'>{}</p></div>
            <div class='bg-green-50 p-4 rounded-lg border border-green-200'><p class='text-sm text-green-600'>Inflow</p><p class='text-xl font-bold text-green-700'>{}</p></div>
            <div class='bg-red-50 p-4 rounded-lg border border-red-200'><p class='text-sm text-red-600'>Outflow</p><p class='text-xl font-bold text-red-700'>{}</p></div>
        </div>"#,
        escape_html(account),
        format_amount(summary.opening_balance),
        format_amount(summary.closing_balance),
        format_money(summary.total_inflow, ""),
        format_money(summary.total_outflow, "")
    )
}

fn render_charts(summary: &TransactionSummary) -> String {
    let mut charts = vec![balance_chart(summary)];
    charts.extend(breakdown_chart("Collections", &summary.collections));
    charts.extend(breakdown_chart("Payments", &summary.payments));

    let cards: String = charts
        .iter()
        .enumerate()
        .map(|(i, chart)| {
            format!(
                "<div class='bg-white rounded-xl shadow-sm p-4'><canvas id='summary-chart-{}'></canvas>{}</div>",
                i,
                chart_script(&format!("summary-chart-{}", i), chart)
            )
        })
        .collect();
    format!("<div class='grid grid-cols-1 lg:grid-cols-3 gap-6'>{}</div>", cards)
}

/// Inline script drawing `chart` into the canvas with id `canvas_id`
pub fn chart_script(canvas_id: &str, chart: &ChartData) -> String {
    let json = serde_json::to_string(chart)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");
    format!(
        r#"<script>
        (function() {{
            const c = {};
            const el = document.getElementById('{}');
            if (!c || !el || typeof Chart === 'undefined') {{ return; }}
            new Chart(el, {{
                type: c.chartType,
                data: {{ labels: c.labels, datasets: c.datasets }},
                options: {{ plugins: {{ title: {{ display: true, text: c.title }} }} }}
            }});
        }})();
        </script>"#,
        json, canvas_id
    )
}
