//! Request dispatcher: sends a single prompt to a resolved model endpoint.
//!
//! Transport failures are recovered locally and reported as a sentinel
//! outcome rather than an error; the retry loop upstream decides what to
//! do with them.

use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::registry::{ModelFamily, ModelInfo};

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Outcome of a single dispatch. Never an error: transport failures are
/// absorbed here so the caller can retry without unwinding.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Decoded JSON body of a successful exchange.
    Response(Value),
    /// The HTTP exchange failed (network error, timeout, undecodable body).
    /// Details were already logged.
    RequestFailed,
    /// The model family has no dispatch path yet.
    NotImplemented,
}

impl DispatchOutcome {
    /// The decoded response, if any.
    pub fn response(&self) -> Option<&Value> {
        match self {
            Self::Response(value) => Some(value),
            _ => None,
        }
    }
}

/// The narrow seam between the retry loop and the transport.
#[allow(async_fn_in_trait)]
pub trait Dispatch {
    /// Send one prompt to the model described by `info`.
    async fn dispatch(&self, info: &ModelInfo, prompt: &str) -> DispatchOutcome;
}

/// HTTP client for model endpoints.
pub struct ModelClient {
    client: Client,
}

impl ModelClient {
    /// Create a client with the default request timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// POST a JSON body to `url` and decode the JSON response.
    /// Any transport or decode failure becomes the sentinel outcome.
    pub(crate) async fn post_json(&self, url: &str, body: &Value) -> DispatchOutcome {
        let result = async {
            let response = self.client.post(url).json(body).send().await?;
            response.json::<Value>().await
        }
        .await;

        match result {
            Ok(value) => DispatchOutcome::Response(value),
            Err(e) => {
                tracing::error!("request to {} failed: {}", url, e);
                DispatchOutcome::RequestFailed
            }
        }
    }
}

impl Default for ModelClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for ModelClient {
    async fn dispatch(&self, info: &ModelInfo, prompt: &str) -> DispatchOutcome {
        match info.family {
            ModelFamily::Llama => {
                let mut body = json!({
                    "model": info.name,
                    "prompt": prompt,
                });
                if let Value::Object(ref mut map) = body {
                    for (key, value) in &info.parameters {
                        map.insert(key.clone(), value.clone());
                    }
                }
                self.post_json(&info.url, &body).await
            }
            ModelFamily::HostedGpt => {
                tracing::warn!(
                    "dispatch for hosted model '{}' is not implemented",
                    info.name
                );
                DispatchOutcome::NotImplemented
            }
        }
    }
}
