//! Listing page rendering
//!
//! Endpoints:
//! - page_listing: Full listing page
//!
//! Helper functions:
//! - render_listing: The `#listing-content` fragment every listing action swaps in

use crate::{notice_html, AppState};
use cashflow_config::WorkflowStatus;
use cashflow_core::editor::ENTRY_TYPES;
use cashflow_core::listing::{ListingState, RejectDialog};
use cashflow_core::Notice;
use cashflow_gateway::{ListingRow, SearchField};
use cashflow_utils::{cell, escape_html, format_money};

/// Listing page - status tabs, search, table and pagination
pub async fn page_listing(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let notice = state.backoffice.refresh().await;
    let listing = state.backoffice.listing().await;

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Forecast Entries</h2>
            <span class='htmx-indicator text-sm text-gray-500'>Loading...</span>
        </div>
        <div id='listing-content'>{}</div>"#,
        render_listing(&listing, notice.as_ref())
    );

    axum::response::Html(crate::page_response(&headers, "Forecast Entries", "/listing", &inner_content))
}

/// Everything inside `#listing-content`
pub fn render_listing(listing: &ListingState, notice: Option<&Notice>) -> String {
    let mut html = notice_html(notice);
    html.push_str(&render_tabs(listing.status));
    html.push_str(&render_search(listing));
    if listing.columns.bulk_actions {
        html.push_str(&render_bulk_actions(listing.selection.selected_ids().len()));
    }
    html.push_str(&render_table(listing));
    html.push_str(&render_pagination(listing));
    if listing.reject.open {
        html.push_str(&render_reject_dialog(&listing.reject));
    }
    html
}

fn render_tabs(current: WorkflowStatus) -> String {
    let tabs: String = WorkflowStatus::ALL
        .iter()
        .map(|status| {
            let class = if *status == current {
                "border-indigo-600 text-indigo-600"
            } else {
                "border-transparent text-gray-500 hover:text-gray-700"
            };
            format!(
                r#"<button hx-post='/listing/status/{}' hx-target='#listing-content' class='px-4 py-2 border-b-2 font-medium {}'>{}</button>"#,
                status, class, status.label()
            )
        })
        .collect();
    format!("<div class='flex gap-2 border-b mb-4'>{}</div>", tabs)
}

fn render_search(listing: &ListingState) -> String {
    let (current_field, current_value) = match &listing.search {
        Some(search) => (search.field, search.value.as_str()),
        None => (SearchField::default(), ""),
    };
    let options: String = SearchField::ALL
        .iter()
        .map(|field| {
            format!(
                "<option value='{}' {}>{}</option>",
                field.param(),
                if *field == current_field { "selected" } else { "" },
                field.label()
            )
        })
        .collect();
    format!(
        r#"<form hx-get='/listing/search' hx-target='#listing-content' class='flex items-center gap-2 mb-4'>
            <select name='field' class='px-3 py-2 border rounded-lg bg-white'>{}</select>
            <input type='text' name='value' value='{}' placeholder='Search value' class='px-3 py-2 border rounded-lg w-64'>
            <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Search</button>
            <button type='button' hx-get='/listing/search?clear=true' hx-target='#listing-content' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Clear</button>
        </form>"#,
        options,
        escape_html(current_value)
    )
}

fn render_bulk_actions(selected: usize) -> String {
    format!(
        r#"<div class='flex items-center gap-2 mb-3'>
            <button hx-post='/listing/authorize' hx-target='#listing-content' class='px-4 py-2 bg-green-600 text-white rounded-lg hover:bg-green-700'>Authorize All</button>
            <button hx-get='/listing/reject/dialog' hx-target='#listing-content' class='px-4 py-2 bg-red-600 text-white rounded-lg hover:bg-red-700'>Reject All</button>
            <span class='text-sm text-gray-500'>{} selected</span>
        </div>"#,
        selected
    )
}

fn entry_type_label(code: &str) -> &str {
    ENTRY_TYPES
        .iter()
        .find(|(value, _)| *value == code)
        .map(|(_, text)| *text)
        .unwrap_or(code)
}

fn render_table(listing: &ListingState) -> String {
    let columns = listing.columns;
    let mut header = String::new();
    if columns.checkboxes {
        let next = if listing.selection.all_checked() { "false" } else { "true" };
        header.push_str(&format!(
            r#"<th class='px-3 py-2'><input type='checkbox' {} hx-post='/listing/select-all' hx-vals='{{"checked": "{}"}}' hx-target='#listing-content'></th>"#,
            if listing.selection.all_checked() { "checked" } else { "" },
            next
        ));
    }
    for title in ["Reference No", "Corporate Code", "Corporate Name", "Forecasting As", "Entry Type", "Amount", "Value Date"] {
        header.push_str(&format!("<th class='px-3 py-2 text-left'>{}</th>", title));
    }
    if columns.rejection_reason {
        header.push_str("<th class='px-3 py-2 text-left'>Rejection Reason</th>");
    }
    header.push_str("<th class='px-3 py-2 text-left'>Actions</th>");

    let body = if listing.rows.is_empty() {
        let message = if listing.loaded { "No records found" } else { "Loading..." };
        format!(
            "<tr><td colspan='11' class='px-3 py-6 text-center text-gray-500'>{}</td></tr>",
            message
        )
    } else {
        listing
            .rows
            .iter()
            .map(|row| render_row(listing, row))
            .collect::<String>()
    };

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm overflow-x-auto'>
            <table class='min-w-full text-sm'>
                <thead class='bg-gray-50 text-gray-600'><tr>{}</tr></thead>
                <tbody class='divide-y'>{}</tbody>
            </table>
        </div>"#,
        header, body
    )
}

fn render_row(listing: &ListingState, row: &ListingRow) -> String {
    let columns = listing.columns;
    let mut html = String::from("<tr class='hover:bg-gray-50'>");
    if columns.checkboxes {
        html.push_str(&format!(
            r#"<td class='px-3 py-2'><input type='checkbox' {} hx-post='/listing/select/{}' hx-target='#listing-content'></td>"#,
            if listing.selection.is_checked(row.id) { "checked" } else { "" },
            row.id
        ));
    }
    html.push_str(&format!(
        "<td class='px-3 py-2 font-medium'>{}</td><td class='px-3 py-2'>{}</td><td class='px-3 py-2'>{}</td><td class='px-3 py-2'>{}</td><td class='px-3 py-2'>{}</td><td class='px-3 py-2 text-right'>{}</td><td class='px-3 py-2'>{}</td>",
        cell(&row.reference_no),
        cell(&row.corporate_code),
        cell(&row.corporate_name),
        cell(&row.forecasting_as),
        cell(entry_type_label(&row.entry_type)),
        format_money(row.forecasted_amount, &row.currency),
        cell(&row.value_date)
    ));
    if columns.rejection_reason {
        html.push_str(&format!(
            "<td class='px-3 py-2 text-red-600'>{}</td>",
            cell(row.rejection_reason.as_deref().unwrap_or(""))
        ));
    }

    let mut actions = String::new();
    if columns.row_actions {
        actions.push_str(&format!(
            r#"<button hx-post='/listing/authorize/{id}' hx-target='#listing-content' title='Authorize' class='text-green-600 hover:text-green-800'>✓</button>
            <button hx-get='/listing/reject/dialog/{id}' hx-target='#listing-content' title='Reject' class='text-red-600 hover:text-red-800'>✗</button>"#,
            id = row.id
        ));
    }
    if columns.edit_link {
        actions.push_str(&format!(
            "<a href='/entries/{}/edit' class='text-indigo-600 hover:text-indigo-800'>Edit</a>",
            row.id
        ));
    }
    if columns.view_link {
        actions.push_str(&format!(
            "<a href='/entries/{}/edit?view=1' class='text-indigo-600 hover:text-indigo-800'>View</a>",
            row.id
        ));
    }
    html.push_str(&format!("<td class='px-3 py-2 flex items-center gap-3'>{}</td></tr>", actions));
    html
}

fn render_pagination(listing: &ListingState) -> String {
    let pagination = &listing.pagination;
    let disabled = |enabled: bool| if enabled { "" } else { "disabled" };
    format!(
        r#"<div class='flex items-center justify-between mt-4 text-sm'>
            <span class='text-gray-500'>{} records</span>
            <div class='flex items-center gap-3'>
                <button hx-post='/listing/previous' hx-target='#listing-content' {} class='px-3 py-1.5 border rounded-lg hover:bg-gray-50 disabled:opacity-50'>Previous</button>
                <span class='page-indicator'>{}</span>
                <button hx-post='/listing/next' hx-target='#listing-content' {} class='px-3 py-1.5 border rounded-lg hover:bg-gray-50 disabled:opacity-50'>Next</button>
            </div>
        </div>"#,
        pagination.total_elements,
        disabled(pagination.has_previous()),
        pagination.indicator(),
        disabled(pagination.has_next())
    )
}

fn render_reject_dialog(dialog: &RejectDialog) -> String {
    let target = match dialog.single_target {
        Some(id) => format!("Reject entry #{}", id),
        None => "Reject selected entries".to_string(),
    };
    format!(
        r#"<div id='reject-dialog' class='fixed inset-0 bg-black/40 flex items-center justify-center z-50'>
            <form hx-post='/listing/reject' hx-target='#listing-content' class='bg-white rounded-xl shadow-lg p-6 w-full max-w-md'>
                <h3 class='text-lg font-semibold mb-3'>{}</h3>
                <label class='block text-sm font-medium text-gray-700 mb-1'>Rejection reason</label>
                <textarea name='reason' rows='4' class='w-full px-3 py-2 border rounded-lg'>{}</textarea>
                <div class='flex justify-end gap-2 mt-4'>
                    <button type='button' hx-post='/listing/reject/cancel' hx-target='#listing-content' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Cancel</button>
                    <button type='submit' class='px-4 py-2 bg-red-600 text-white rounded-lg hover:bg-red-700'>Reject</button>
                </div>
            </form>
        </div>"#,
        target,
        escape_html(&dialog.reason)
    )
}
