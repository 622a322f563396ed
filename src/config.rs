// src/config.rs

use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{name} must be set"),
            ConfigError::Invalid { name, value } => {
                write!(f, "invalid value for {name}: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Deployment configuration: backend endpoint, collection ids and function
/// ids. All of it comes from the environment (a local `.env` is honored).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: String,
    pub project_id: String,
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

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let poll_interval = match env::var("PAYMENT_POLL_INTERVAL_SECS") {
            Ok(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
                    name: "PAYMENT_POLL_INTERVAL_SECS",
                    value: raw.clone(),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        Ok(Self {
            endpoint: required("APPWRITE_ENDPOINT")?,
            project_id: required("APPWRITE_PROJECT_ID")?,
            database_id: required("APPWRITE_DATABASE_ID")?,
            movies_collection_id: required("MOVIES_COLLECTION_ID")?,
            metrics_collection_id: required("METRICS_COLLECTION_ID")?,
            purchases_collection_id: required("PURCHASES_COLLECTION_ID")?,
            profiles_collection_id: required("PROFILES_COLLECTION_ID")?,
            payment_create_fn_id: required("PAYMENT_CREATE_FUNCTION_ID")?,
            payment_status_fn_id: required("PAYMENT_STATUS_FUNCTION_ID")?,
            identity_verify_fn_id: required("IDENTITY_VERIFY_FUNCTION_ID")?,
            password_reset_fn_id: required("PASSWORD_RESET_FUNCTION_ID")?,
            poll_interval,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}
