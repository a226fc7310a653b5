//! Client for invoking the Anxiety Severity Agent remotely

use crate::contracts::*;
use serde::Deserialize;
use std::time::Duration;

/// Anxiety Severity Agent client
pub struct SeverityClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl SeverityClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: Duration::from_millis(1500),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Classify readings (the agent emits a decision signal)
    pub async fn classify(
        &self,
        request: &ClassifyRequest,
    ) -> Result<ClientResponse<ClassificationOutput>, ClientError> {
        let url = format!("{}/api/v1/severity/classify", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let data: ApiResponse<ClassificationOutput> = Self::parse(response).await?;

        Ok(ClientResponse {
            success: data.success,
            data: data.data,
            request_id: data.request_id,
        })
    }

    /// Quick check (no telemetry)
    pub async fn check(&self, request: &ClassifyRequest) -> Result<CheckResult, ClientError> {
        let url = format!("{}/api/v1/severity/check", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Self::parse(response).await
    }

    /// Reading floors for a baseline
    pub async fn thresholds(&self, baseline_bpm: f64) -> Result<ThresholdsResponse, ClientError> {
        let url = format!("{}/api/v1/severity/thresholds", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("baseline_bpm", baseline_bpm)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| ClientError::Parse(e.to_string()))
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(ClientError::Server {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    request_id: uuid::Uuid,
}

/// Client response
#[derive(Debug)]
pub struct ClientResponse<T> {
    pub success: bool,
    pub data: T,
    pub request_id: uuid::Uuid,
}

/// Quick check result
#[derive(Debug, Deserialize)]
pub struct CheckResult {
    pub anxiety_detected: bool,
    pub peak_severity: String,
    pub event_count: usize,
    pub reading_count: usize,
    pub duration_ms: u64,
}

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },
}
