//! Identity provider configuration.

/// Settings for the external token-verification endpoint.
///
/// `verify_url` unset means the verifier is not configured; token checks
/// then fail with a 503 rather than a 401, so operators can tell a broken
/// deployment from bad credentials.
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    /// Tokeninfo-style endpoint, e.g. `https://oauth2.googleapis.com/tokeninfo`.
    pub verify_url: Option<String>,
    /// Expected `aud` claim; unset skips the audience check.
    pub audience: Option<String>,
    pub timeout_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            verify_url: None,
            audience: None,
            timeout_secs: 10,
        }
    }
}

impl IdentityConfig {
    pub fn from_env() -> Self {
        Self {
            verify_url: std::env::var("IDENTITY_VERIFY_URL").ok(),
            audience: std::env::var("IDENTITY_AUDIENCE").ok(),
            timeout_secs: std::env::var("IDENTITY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}
