//! Entry routes - Forecast entry editor
//!
//! Features:
//! - Edit form with dependent selects (mode, account numbers, date inputs)
//! - Corporate picker with code / name search
//! - Update and cancel
//!
//! Structure:
//! - api.rs: HTMX endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    htmx_entry_cancel,
    htmx_entry_corporate,
    htmx_entry_corporates,
    htmx_entry_field,
    htmx_entry_submit,
};

pub use page::page_entry_edit;
