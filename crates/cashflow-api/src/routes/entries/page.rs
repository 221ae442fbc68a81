//! Entry editor rendering
//!
//! Endpoints:
//! - page_entry_edit: Load an entry and show its form (`?view=1` shows it read-only)
//!
//! Helper functions:
//! - render_editor: The `#entry-editor` fragment
//! - render_entry_view: The same fragment with every input disabled
//! - render_corporate_picker: Corporate directory table with select buttons

use crate::{notice_html, ApiError, AppState};
use axum::extract::{Path, Query, State};
use cashflow_core::editor::{
    DateFields, EditorPhase, EditorState, SelectOption, ACCOUNT_TYPES, ENTRY_TYPES, FORECASTING_AS,
    RECURRENCE_PATTERNS,
};
use cashflow_core::Notice;
use cashflow_utils::{cell, escape_html};
use std::collections::HashMap;

/// Entry editor page - fetches the entry, its corporate directory and account numbers
pub async fn page_entry_edit(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Path(id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<axum::response::Html<String>, ApiError> {
    let view_only = params.get("view").map(|v| v == "1" || v == "true").unwrap_or(false);
    let notice = state.backoffice.load_entry(id).await;
    let editor = state.backoffice.editor(id).await.ok_or_else(|| ApiError::NotFound {
        resource: format!("entry {}", id),
    })?;

    let (title, fragment) = if view_only {
        ("View Entry", render_entry_view(&editor, notice.as_ref()))
    } else {
        ("Edit Entry", render_editor(&editor, notice.as_ref()))
    };
    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>{} #{}</h2>
            <a href='/listing' class='text-sm text-indigo-600 hover:underline'>Back to listing</a>
        </div>
        {}
        <div id='corporate-picker' class='mt-6'></div>"#,
        if view_only { "Forecast Entry" } else { "Edit Forecast Entry" },
        id,
        fragment
    );

    Ok(axum::response::Html(crate::page_response(
        &headers,
        title,
        &format!("/entries/{}/edit", id),
        &inner_content,
    )))
}

fn field_attrs(editor: &EditorState, name: &str, read_only: bool) -> String {
    if read_only {
        return format!("name='{}' disabled class='w-full px-3 py-2 border rounded-lg bg-gray-50'", name);
    }
    let disabled = if editor.phase.accepts_input() { "" } else { "disabled" };
    let invalid = match &editor.phase {
        EditorPhase::ValidationFailed(missing) if missing.iter().any(|m| m == name) => "border-red-500",
        _ => "",
    };
    format!(
        "name='{}' hx-post='/entries/{}/field' hx-trigger='change' hx-target='#entry-editor' hx-swap='outerHTML' {} class='w-full px-3 py-2 border rounded-lg {}'",
        name, editor.id, disabled, invalid
    )
}

fn text_input(editor: &EditorState, label: &str, name: &str, kind: &str, read_only: bool) -> String {
    let value = editor.form.get(name).unwrap_or("");
    format!(
        "<div><label class='block text-sm font-medium text-gray-700 mb-1'>{}</label><input type='{}' value='{}' {}></div>",
        label,
        kind,
        escape_html(value),
        field_attrs(editor, name, read_only)
    )
}

fn select_input(
    editor: &EditorState,
    label: &str,
    name: &str,
    options: &[SelectOption],
    read_only: bool,
) -> String {
    let current = editor.form.get(name).unwrap_or("");
    let mut html = format!(
        "<div><label class='block text-sm font-medium text-gray-700 mb-1'>{}</label><select {}><option value=''>Select</option>",
        label,
        field_attrs(editor, name, read_only)
    );
    for option in options {
        html.push_str(&format!(
            "<option value='{}' {}>{}</option>",
            escape_html(&option.value),
            if option.value == current { "selected" } else { "" },
            escape_html(&option.text)
        ));
    }
    html.push_str("</select></div>");
    html
}

fn pairs(items: &[(&str, &str)]) -> Vec<SelectOption> {
    items.iter().map(|(value, text)| SelectOption::new(value, text)).collect()
}

fn plain(items: &[&str]) -> Vec<SelectOption> {
    items.iter().map(|item| SelectOption::new(item, item)).collect()
}

fn render_date_fields(editor: &EditorState, read_only: bool) -> String {
    match editor.form.date_fields() {
        DateFields::ValueDate => text_input(editor, "Value Date", "valueDate", "date", read_only),
        DateFields::Recurrence => format!(
            "{}{}{}",
            text_input(editor, "Recurring From", "recurringFrom", "date", read_only),
            text_input(editor, "Recurring To", "recurringTo", "date", read_only),
            select_input(
                editor,
                "Recurrence Pattern",
                "recurrencePattern",
                &plain(&RECURRENCE_PATTERNS),
                read_only
            )
        ),
        DateFields::Hidden => String::new(),
    }
}

/// Everything inside `#entry-editor`
pub fn render_editor(editor: &EditorState, notice: Option<&Notice>) -> String {
    editor_fragment(editor, notice, false)
}

/// Read-only `#entry-editor`: nothing posts back and there is no Update button
pub fn render_entry_view(editor: &EditorState, notice: Option<&Notice>) -> String {
    editor_fragment(editor, notice, true)
}

fn editor_fragment(editor: &EditorState, notice: Option<&Notice>, read_only: bool) -> String {
    let id = editor.id;
    let body = match &editor.phase {
        EditorPhase::Loading => "<p class='text-gray-500'>Loading...</p>".to_string(),
        EditorPhase::Unavailable => format!(
            "<p class='text-gray-600'>Entry #{} could not be loaded.</p><a href='/listing' class='text-indigo-600 hover:underline'>Back to listing</a>",
            id
        ),
        EditorPhase::Saved => "<p class='text-green-700'>The entry was saved.</p><a href='/listing' class='text-indigo-600 hover:underline'>Back to listing</a>".to_string(),
        _ => render_form(editor, read_only),
    };

    format!(
        "<div id='entry-editor' class='bg-white rounded-xl shadow-sm p-6' data-phase='{}'{}>{}{}</div>",
        phase_name(&editor.phase),
        if read_only { " data-view='read-only'" } else { "" },
        notice_html(notice),
        body
    )
}

fn phase_name(phase: &EditorPhase) -> &'static str {
    match phase {
        EditorPhase::Loading => "loading",
        EditorPhase::Unavailable => "unavailable",
        EditorPhase::Loaded => "loaded",
        EditorPhase::Editing => "editing",
        EditorPhase::Submitting => "submitting",
        EditorPhase::Saved => "saved",
        EditorPhase::ValidationFailed(_) => "validation_failed",
    }
}

fn render_form(editor: &EditorState, read_only: bool) -> String {
    let id = editor.id;
    let lock_options = [SelectOption::new("true", "Yes"), SelectOption::new("false", "No")];
    let lock_current = if editor.form.lock_record { "true" } else { "false" };
    let lock_select = format!(
        "<div><label class='block text-sm font-medium text-gray-700 mb-1'>Lock Record</label><select {}>{}</select></div>",
        field_attrs(editor, "lockRecord", read_only),
        lock_options
            .iter()
            .map(|o| format!(
                "<option value='{}' {}>{}</option>",
                o.value,
                if o.value == lock_current { "selected" } else { "" },
                o.text
            ))
            .collect::<String>()
    );

    let picker_button = if read_only {
        String::new()
    } else {
        format!(
            "<button type='button' hx-get='/entries/{}/corporates' hx-target='#corporate-picker' class='px-3 py-2 border rounded-lg hover:bg-gray-50'>Select</button>",
            id
        )
    };
    let actions = if read_only {
        "<a href='/listing' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Back to listing</a>".to_string()
    } else {
        format!(
            r#"<button hx-post='/entries/{id}/submit' hx-target='#entry-editor' hx-swap='outerHTML' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Update</button>
            <button hx-post='/entries/{id}/cancel' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Cancel</button>"#,
            id = id
        )
    };

    format!(
        r#"<div class='grid grid-cols-1 md:grid-cols-3 gap-4'>
            <div>
                <label class='block text-sm font-medium text-gray-700 mb-1'>Corporate Code</label>
                <div class='flex gap-2'>
                    <input type='text' value='{}' {}>
                    {}
                </div>
            </div>
            {}
            {}
            {}
            {}
            {}
            {}
            {}
            {}
            {}
            {}
            {}
            {}
        </div>
        <div class='mt-4'>
            <label class='block text-sm font-medium text-gray-700 mb-1'>Description</label>
            <textarea rows='3' {}>{}</textarea>
        </div>
        <div class='flex items-center gap-3 mt-6 pt-4 border-t'>
            {}
        </div>"#,
        escape_html(&editor.form.corporate_code),
        field_attrs(editor, "corporateCode", read_only),
        picker_button,
        text_input(editor, "Corporate Name", "corporateName", "text", read_only),
        select_input(editor, "Forecasting As", "forecastingAs", &plain(&FORECASTING_AS), read_only),
        text_input(editor, "Currency", "currency", "text", read_only),
        select_input(editor, "Entry Type", "entryType", &pairs(&ENTRY_TYPES), read_only),
        render_date_fields(editor, read_only),
        text_input(editor, "Narration", "narration", "text", read_only),
        select_input(editor, "Mode", "mode", &editor.mode_options, read_only),
        text_input(editor, "Beneficiary / Payers", "beneficiaryPayers", "text", read_only),
        select_input(editor, "Account Type", "accountType", &pairs(&ACCOUNT_TYPES), read_only),
        select_input(editor, "Account Number", "accountNumber", &editor.account_options, read_only),
        text_input(editor, "Forecasted Amount", "forecastedAmount", "text", read_only),
        lock_select,
        field_attrs(editor, "description", read_only),
        escape_html(&editor.form.description),
        actions
    )
}

/// Picker table; selecting a row copies it into the form
pub fn render_corporate_picker(editor: &EditorState, notice: Option<&Notice>) -> String {
    let id = editor.id;
    let rows: String = if editor.corporates.is_empty() {
        "<tr><td colspan='3' class='px-3 py-4 text-center text-gray-500'>No corporates</td></tr>".to_string()
    } else {
        editor
            .corporates
            .iter()
            .map(|c| {
                format!(
                    r#"<tr class='hover:bg-gray-50'>
                        <td class='px-3 py-2'>{}</td><td class='px-3 py-2'>{}</td>
                        <td class='px-3 py-2'><button hx-post='/entries/{}/corporate' hx-vals='{{"corporateId": "{}"}}' hx-target='#entry-editor' hx-swap='outerHTML' class='text-indigo-600 hover:text-indigo-800'>Select</button></td>
                    </tr>"#,
                    cell(&c.corporate_code),
                    cell(&c.corporate_name),
                    id,
                    c.id
                )
            })
            .collect()
    };

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6'>
            {}
            <form hx-get='/entries/{}/corporates' hx-target='#corporate-picker' class='flex items-center gap-2 mb-3'>
                <select name='field' class='px-3 py-2 border rounded-lg bg-white'>
                    <option value='corporateCode'>Corporate Code</option>
                    <option value='corporateName'>Corporate Name</option>
                </select>
                <input type='text' name='term' placeholder='Search corporates' class='px-3 py-2 border rounded-lg w-64'>
                <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Search</button>
            </form>
            <table class='min-w-full text-sm'>
                <thead class='bg-gray-50 text-gray-600'><tr><th class='px-3 py-2 text-left'>Code</th><th class='px-3 py-2 text-left'>Name</th><th></th></tr></thead>
                <tbody class='divide-y'>{}</tbody>
            </table>
        </div>"#,
        notice_html(notice),
        id,
        rows
    )
}
