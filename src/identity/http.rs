use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::identity::IdentityConfig;
use crate::identity::{IdentityError, TokenVerifier, VerifiedClaim};

/// Response body of the provider's tokeninfo endpoint.
#[derive(Debug, Deserialize)]
struct TokenInfoResponse {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
    aud: Option<String>,
}

/// [`TokenVerifier`] backed by the provider's HTTP tokeninfo endpoint.
///
/// Verification is a `GET {verify_url}?id_token=<token>`: the provider
/// answers 200 with the token's claims when the token is valid, and a 4xx
/// with an error body otherwise.
pub struct HttpTokenVerifier {
    client: reqwest::Client,
    config: IdentityConfig,
}

impl HttpTokenVerifier {
    pub fn new(config: IdentityConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedClaim, IdentityError> {
        let verify_url = self
            .config
            .verify_url
            .as_deref()
            .ok_or(IdentityError::NotConfigured)?;

        let response = self
            .client
            .get(verify_url)
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Identity provider request failed");
                IdentityError::Unreachable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            debug!(status = %status, "Token rejected by identity provider");
            return Err(IdentityError::InvalidToken(format!(
                "provider returned {}: {}",
                status,
                detail.trim()
            )));
        }

        let info: TokenInfoResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::InvalidToken(format!("malformed provider response: {e}")))?;

        if let Some(expected) = &self.config.audience {
            if info.aud.as_deref() != Some(expected.as_str()) {
                return Err(IdentityError::InvalidToken(
                    "token audience mismatch".to_string(),
                ));
            }
        }

        let email = info
            .email
            .ok_or_else(|| IdentityError::InvalidToken("token has no email claim".to_string()))?
            .to_lowercase();

        Ok(VerifiedClaim {
            subject: info.sub,
            email,
            name: info.name,
            picture: info.picture,
        })
    }
}
