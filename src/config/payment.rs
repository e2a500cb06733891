//! Payment gateway configuration.

const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Settings for the hosted-checkout provider.
///
/// `secret_key` unset leaves the gateway not configured; payment routes
/// answer 503. `api_base` is overridable so tests can point the client at
/// a local mock server.
#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub secret_key: Option<String>,
    pub api_base: String,
    /// Frontend origin used to build success/cancel redirect URLs.
    pub site_url: String,
    pub currency: String,
    pub timeout_secs: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            site_url: "http://localhost:5173".to_string(),
            currency: "usd".to_string(),
            timeout_secs: 15,
        }
    }
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        Self {
            secret_key: std::env::var("PAYMENT_SECRET_KEY").ok(),
            api_base: std::env::var("PAYMENT_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            site_url: std::env::var("SITE_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            currency: std::env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "usd".to_string()),
            timeout_secs: std::env::var("PAYMENT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
        }
    }

    pub fn success_url(&self) -> String {
        format!(
            "{}/payment/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.site_url
        )
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/payment/cancelled", self.site_url)
    }
}
