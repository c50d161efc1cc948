//! HTTP client for the external reference-data service.
//!
//! The planner never caches: every planning invocation fetches drones,
//! service points, restricted areas and availability fresh. All calls
//! carry a request-scoped timeout so a slow upstream cannot block a
//! planning request indefinitely.

use meddrone_core::models::{
    DispatchRecord, Drone, ReferenceData, Region, RestrictedArea, ServicePoint, ServicePointDrones,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to data service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("data service returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Client for the reference-data service.
pub struct DataClient {
    client: Client,
    base_url: String,
}

impl DataClient {
    /// Create a client with the default 10 second request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
        })
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    pub async fn fetch_drones(&self) -> Result<Vec<Drone>, FetchError> {
        self.get_list("drones").await
    }

    pub async fn fetch_service_points(&self) -> Result<Vec<ServicePoint>, FetchError> {
        self.get_list("service-points").await
    }

    pub async fn fetch_restricted_areas(&self) -> Result<Vec<RestrictedArea>, FetchError> {
        self.get_list("restricted-areas").await
    }

    pub async fn fetch_regions(&self) -> Result<Vec<Region>, FetchError> {
        self.get_list("regions").await
    }

    pub async fn fetch_availability(&self) -> Result<Vec<ServicePointDrones>, FetchError> {
        self.get_list("drones-for-service-points").await
    }

    /// Dispatch records filed for one day ("2025-01-15").
    pub async fn fetch_dispatches(&self, date: &str) -> Result<Vec<DispatchRecord>, FetchError> {
        self.get_list(&format!("medDispatchRecs/{date}")).await
    }

    /// Liveness probe against the data service.
    pub async fn is_alive(&self) -> bool {
        let url = format!("{}/actuator/health/livenessState", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => {
                response.status().is_success()
                    && response
                        .text()
                        .await
                        .map(|body| body.contains("UP"))
                        .unwrap_or(false)
            }
            Err(_) => false,
        }
    }

    /// Fetch everything one planning invocation needs.
    ///
    /// Fails on the first upstream error; the boundary decides whether
    /// to substitute defaults (see [`fetch_reference_or_default`]).
    pub async fn fetch_reference(&self) -> Result<ReferenceData, FetchError> {
        Ok(ReferenceData {
            drones: self.fetch_drones().await?,
            service_points: self.fetch_service_points().await?,
            restricted_areas: self.fetch_restricted_areas().await?,
            availability: self.fetch_availability().await?,
        })
    }

    /// Boundary variant: any fetch failure is logged and substituted
    /// with empty reference data so planning proceeds on fallback
    /// defaults instead of failing the request.
    pub async fn fetch_reference_or_default(&self) -> ReferenceData {
        match self.fetch_reference().await {
            Ok(reference) => reference,
            Err(err) => {
                tracing::warn!(error = %err, "reference data unavailable, planning with defaults");
                ReferenceData::default()
            }
        }
    }
}
