use crate::config::GeocoderConfig;
use crate::core::{Candidate, Geocoder};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Forward geocoding against a Nominatim-compatible `/search` endpoint.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn lookup(&self, query: &str) -> Result<Vec<Candidate>> {
        tracing::debug!("Making geocoding request to: {} (q={})", self.endpoint, query);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await?;

        tracing::debug!("Geocoding response status: {}", response.status());
        let candidates = response.error_for_status()?.json::<Vec<Candidate>>().await?;
        tracing::debug!("Geocoder returned {} candidate(s)", candidates.len());
        Ok(candidates)
    }
}
