//! HTTP client for the hosted recommendation model
//!
//! One endpoint serves both variants; `use_gen_model` in the body selects
//! which one scores the request.

use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::RecommendError,
    models::{ModelInput, ModelOutput},
    services::providers::RecommendationModel,
};

#[derive(Clone)]
pub struct HostedModel {
    http_client: HttpClient,
    api_url: String,
}

impl HostedModel {
    /// Builds a client whose requests give up after `timeout`
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url,
        })
    }
}

#[async_trait::async_trait]
impl RecommendationModel for HostedModel {
    async fn predict(&self, input: &ModelInput) -> Result<ModelOutput, RecommendError> {
        let response = self
            .http_client
            .post(&self.api_url)
            .json(input)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RecommendError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let output: ModelOutput = serde_json::from_str(&body)
            .map_err(|e| RecommendError::MalformedResponse(e.to_string()))?;

        tracing::debug!(
            items = output.top_10_recommendations.len(),
            total_scored = output.total_products_scored,
            provider = self.name(),
            "Recommendation model responded"
        );

        Ok(output)
    }

    fn name(&self) -> &'static str {
        "hosted"
    }
}
