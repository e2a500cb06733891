//! Configuration modules for the ScholarStream API.
//!
//! Each submodule loads one concern from environment variables with a
//! `from_env` constructor. Missing identity or payment configuration does
//! not abort startup: the provider stays in a "not configured" state and
//! the routes that need it answer 503 until an operator fixes the
//! environment.
//!
//! # Modules
//!
//! - [`cors`]: allowed origins for the browser frontend
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`identity`]: external token-verification endpoint
//! - [`payment`]: hosted-checkout provider credentials and redirect URLs
//! - [`server`]: bind address and ports

pub mod cors;
pub mod database;
pub mod identity;
pub mod payment;
pub mod server;
