//! HTTP layer for LinCode.
//!
//! Axum router serving the single-page UI, its static assets, and the
//! `/api` endpoints used by the page.

pub mod error;
pub mod handlers;
pub mod router;
