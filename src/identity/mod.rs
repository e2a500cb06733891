//! Token verification against the external identity provider.
//!
//! The platform never issues or stores credentials. Clients obtain ID tokens
//! from the identity provider and send them as `Authorization: Bearer`
//! headers; [`TokenVerifier`] checks a token with the provider and returns
//! the claims it vouches for. Everything downstream (role resolution, access
//! guards) works from the [`VerifiedClaim`], never from the raw token.
//!
//! Two kinds of failure are kept distinct on purpose:
//!
//! - [`IdentityError::NotConfigured`]: the server has no verification
//!   endpoint configured. This is an operator fault and surfaces as
//!   503 Service Unavailable, not as a client error.
//! - [`IdentityError::InvalidToken`] / [`IdentityError::Unreachable`]: the
//!   credential could not be vouched for. Both surface as 401.

use async_trait::async_trait;

pub mod http;
#[cfg(feature = "test-utils")]
pub mod stub;

pub use http::HttpTokenVerifier;

/// Claims attested by the identity provider for a verified token.
#[derive(Debug, Clone)]
pub struct VerifiedClaim {
    /// Provider-scoped stable subject identifier.
    pub subject: String,
    /// Email address, lowercased.
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Identity verification service is not configured")]
    NotConfigured,
    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),
    #[error("Identity service unreachable: {0}")]
    Unreachable(String),
}

/// Verifies bearer tokens with the external identity provider.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedClaim, IdentityError>;
}
