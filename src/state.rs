//! Shared application state.
//!
//! Everything handlers need hangs off [`AppState`]: the store and the two
//! outbound seams are trait objects so tests can swap in `MemStore`, a
//! static verifier, or a scripted gateway without touching the router.

use std::sync::Arc;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::identity::IdentityConfig;
use crate::config::payment::PaymentConfig;
use crate::config::server::ServerConfig;
use crate::gateway::{HttpPaymentGateway, PaymentGateway};
use crate::identity::{HttpTokenVerifier, TokenVerifier};
use crate::store::{PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub payment_config: PaymentConfig,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
}

pub async fn init_app_state() -> AppState {
    let pool = init_db_pool().await;
    let payment_config = PaymentConfig::from_env();

    AppState {
        store: Arc::new(PgStore::new(pool)),
        verifier: Arc::new(HttpTokenVerifier::new(IdentityConfig::from_env())),
        gateway: Arc::new(HttpPaymentGateway::new(payment_config.clone())),
        payment_config,
        cors_config: CorsConfig::from_env(),
        server_config: ServerConfig::from_env(),
    }
}
