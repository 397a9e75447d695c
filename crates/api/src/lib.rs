//! HTTP API layer for notehub.
//!
//! This crate provides the public REST API and the admin surface:
//!
//! - **Endpoints**: catalog listings, note detail, comments/ratings/feedback
//!   creation, file delivery, stats, and the admin CRUD + bulk upload
//! - **Response shaping**: page-number pagination envelope
//!
//! Built on Axum 0.8 with Tower middleware stack. No route carries
//! authentication; open reads and open writes are part of the product's
//! documented contract.

pub mod endpoints;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
pub use response::{PAGE_SIZE, PageQuery, Paginated};
