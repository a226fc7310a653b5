//! Signal emission
//!
//! Signals are queued on a bounded channel and delivered by one background
//! task. With no endpoint configured the emitter is disabled and signals are
//! only logged.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{Result, SeverityMetrics, TelemetryError};
use crate::config::TelemetryConfig;
use crate::contracts::AnxietySeveritySignal;

/// Non-blocking emitter for anxiety severity signals
pub struct SignalEmitter {
    sender: Option<mpsc::Sender<AnxietySeveritySignal>>,
}

impl SignalEmitter {
    /// Emitter that drops every signal after logging it
    fn disabled() -> Self {
        Self { sender: None }
    }

    /// Create an emitter from configuration.
    ///
    /// Spawns the delivery task, so when enabled this must be called from
    /// within a Tokio runtime.
    pub fn new(config: &TelemetryConfig, metrics: Arc<SeverityMetrics>) -> Self {
        let Some(endpoint) = config.endpoint.clone().filter(|_| config.is_enabled()) else {
            info!("Signal emission disabled (no telemetry endpoint configured)");
            return Self::disabled();
        };

        let client = SignalClient::new(endpoint, config.api_key.clone(), config.timeout_ms);
        let (sender, receiver) = mpsc::channel(config.max_queue_size);

        tokio::spawn(Self::background_emitter(receiver, client, metrics));

        Self {
            sender: Some(sender),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Queue a signal without waiting for delivery
    pub fn emit(&self, signal: AnxietySeveritySignal) -> Result<()> {
        let Some(sender) = &self.sender else {
            debug!(summary = %signal.summary(), "Signal not emitted (disabled)");
            return Ok(());
        };

        sender
            .try_send(signal)
            .map_err(|e| TelemetryError::QueueFull(e.to_string()))
    }

    async fn background_emitter(
        mut receiver: mpsc::Receiver<AnxietySeveritySignal>,
        client: SignalClient,
        metrics: Arc<SeverityMetrics>,
    ) {
        while let Some(signal) = receiver.recv().await {
            info!(
                event_id = %signal.event_id,
                signal_type = %signal.signal_type,
                peak = %signal.outputs.peak_severity,
                "Emitting anxiety severity signal"
            );

            match client.emit_signal(&signal).await {
                Ok(()) => metrics.record_signal(true),
                Err(e) => {
                    metrics.record_signal(false);
                    warn!(event_id = %signal.event_id, error = %e, "Failed to emit signal");
                }
            }
        }
    }
}

/// HTTP client for the signal sink
pub struct SignalClient {
    url: String,
    api_key: Option<String>,
    client: reqwest::Client,
    timeout: Duration,
}

impl SignalClient {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout_ms: u64) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// POST the signal to `{url}/api/v1/signals`
    pub async fn emit_signal(&self, signal: &AnxietySeveritySignal) -> Result<()> {
        let url = format!("{}/api/v1/signals", self.url);

        let mut request = self.client.post(&url).json(signal).timeout(self.timeout);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TelemetryError::HttpError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(TelemetryError::Rejected {
                status: response.status().as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::ClassifyRequest;
    use crate::engine::ClassificationEngine;

    fn signal() -> AnxietySeveritySignal {
        let input = ClassificationEngine::create_input(
            ClassifyRequest::new(70.0, [84.0]),
            "test".to_string(),
        );
        let output = ClassificationEngine::new().classify(&input).unwrap();
        AnxietySeveritySignal::from_classification(
            ClassificationEngine::compute_inputs_hash(&input),
            &output,
            input.request_id.to_string(),
        )
    }

    #[tokio::test]
    async fn test_no_endpoint_disables_emission() {
        let metrics = Arc::new(SeverityMetrics::new().unwrap());
        let emitter = SignalEmitter::new(&TelemetryConfig::default(), metrics);

        assert!(!emitter.is_enabled());
        assert!(emitter.emit(signal()).is_ok());
    }

    #[tokio::test]
    async fn test_blank_endpoint_disables_emission() {
        let metrics = Arc::new(SeverityMetrics::new().unwrap());
        let emitter = SignalEmitter::new(&TelemetryConfig::with_endpoint("  "), metrics);
        assert!(!emitter.is_enabled());
    }

    #[tokio::test]
    async fn test_endpoint_enables_emission() {
        let metrics = Arc::new(SeverityMetrics::new().unwrap());
        let emitter = SignalEmitter::new(
            &TelemetryConfig::with_endpoint("http://127.0.0.1:9"),
            metrics,
        );
        assert!(emitter.is_enabled());
    }
}
