//! In-memory verifier for tests: a fixed token-to-claim table.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::identity::{IdentityError, TokenVerifier, VerifiedClaim};

#[derive(Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, VerifiedClaim>,
    configured: bool,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self {
            tokens: HashMap::new(),
            configured: true,
        }
    }

    /// A verifier that reports the not-configured fault for every token.
    pub fn unconfigured() -> Self {
        Self {
            tokens: HashMap::new(),
            configured: false,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>, claim: VerifiedClaim) -> Self {
        self.tokens.insert(token.into(), claim);
        self
    }

    pub fn insert(&mut self, token: impl Into<String>, claim: VerifiedClaim) {
        self.tokens.insert(token.into(), claim);
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedClaim, IdentityError> {
        if !self.configured {
            return Err(IdentityError::NotConfigured);
        }

        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::InvalidToken("unknown token".to_string()))
    }
}
