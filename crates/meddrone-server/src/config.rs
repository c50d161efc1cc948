//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub data_service_url: String,
    pub fetch_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("MEDDRONE_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            data_service_url: env::var("MEDDRONE_DATA_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            fetch_timeout_secs: env::var("MEDDRONE_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }
}
