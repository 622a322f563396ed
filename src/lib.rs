pub mod account;
pub mod api;
pub mod checkout;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod models;

use std::sync::Arc;
use std::time::Duration;

use api::appwrite::AppwriteClient;
use config::AppConfig;

/// Everything a screen needs to talk to the backend: the shared client (which
/// carries the session) plus the deployment's collection and function ids.
#[derive(Debug, Clone)]
pub struct AppState {
    pub appwrite: Arc<AppwriteClient>,
    pub database_id: String,
    pub movies_collection_id: String,
    pub metrics_collection_id: String,
    pub purchases_collection_id: String,
    pub profiles_collection_id: String,
    pub payment_create_fn_id: String,
    pub payment_status_fn_id: String,
    pub identity_verify_fn_id: String,
    pub password_reset_fn_id: String,
    pub poll_interval: Duration,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            appwrite: Arc::new(AppwriteClient::new(&config.endpoint, &config.project_id)),
            database_id: config.database_id,
            movies_collection_id: config.movies_collection_id,
            metrics_collection_id: config.metrics_collection_id,
            purchases_collection_id: config.purchases_collection_id,
            profiles_collection_id: config.profiles_collection_id,
            payment_create_fn_id: config.payment_create_fn_id,
            payment_status_fn_id: config.payment_status_fn_id,
            identity_verify_fn_id: config.identity_verify_fn_id,
            password_reset_fn_id: config.password_reset_fn_id,
            poll_interval: config.poll_interval,
        }
    }
}
