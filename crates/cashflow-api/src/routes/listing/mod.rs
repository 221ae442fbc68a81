//! Listing routes - Pending, rejected and review entries
//!
//! Features:
//! - Status tabs with paginated tables
//! - Field search
//! - Row selection, bulk and single authorize, reject dialog
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    api_listing,
    htmx_listing_authorize,
    htmx_listing_authorize_single,
    htmx_listing_next,
    htmx_listing_previous,
    htmx_listing_search,
    htmx_listing_select,
    htmx_listing_select_all,
    htmx_listing_status,
    htmx_listing_table,
    htmx_reject,
    htmx_reject_cancel,
    htmx_reject_dialog,
    htmx_reject_dialog_single,
};

pub use page::page_listing;
