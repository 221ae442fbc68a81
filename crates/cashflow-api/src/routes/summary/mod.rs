//! Summary routes - Account dashboard
//!
//! Structure:
//! - api.rs: HTMX endpoints
//! - page.rs: Full page rendering and Chart.js output

pub mod api;
pub mod page;

pub use api::{htmx_summary_date, htmx_summary_range_toggle, htmx_summary_search};
pub use page::page_summary;
