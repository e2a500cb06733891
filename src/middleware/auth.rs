//! Bearer-token authentication extractor.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::identity::VerifiedClaim;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Extractor that parses the `Authorization: Bearer` header and verifies
/// the token with the identity provider.
///
/// Yields the provider-attested [`VerifiedClaim`] only; it never touches
/// the database. Routes that need the stored account and role use the
/// extractors in [`crate::middleware::role`] instead.
#[derive(Debug, Clone)]
pub struct AuthUser(pub VerifiedClaim);

impl AuthUser {
    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn subject(&self) -> &str {
        &self.0.subject
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claim = state.verifier.verify(token).await?;

        Ok(AuthUser(claim))
    }
}
