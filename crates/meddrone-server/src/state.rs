//! Shared application state.

use crate::config::Config;
use anyhow::Result;
use meddrone_core::PlannerConfig;
use meddrone_data::DataClient;
use std::time::Duration;

pub struct AppState {
    pub data: DataClient,
    pub planner: PlannerConfig,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let data = DataClient::with_timeout(
            config.data_service_url.clone(),
            Duration::from_secs(config.fetch_timeout_secs),
        )?;
        Ok(Self {
            data,
            planner: PlannerConfig::default(),
        })
    }
}
