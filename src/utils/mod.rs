//! Shared utilities used throughout the application.
//!
//! - [`errors`]: Application error type and HTTP mapping
//! - [`pagination`]: Request pagination parameters and response metadata

pub mod errors;
pub mod pagination;
