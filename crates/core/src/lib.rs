//! Core business logic for notehub.

pub mod services;

pub use services::*;
