//! Route handlers, one module per screen
//!
//! Each module keeps page rendering in page.rs and HTMX / JSON endpoints in api.rs.

pub mod entries;
pub mod listing;
pub mod settings;
pub mod summary;
