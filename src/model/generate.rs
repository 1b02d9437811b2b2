//! Validated generation loop: drives repeated dispatch attempts through
//! caller-supplied validation and clean-up callbacks.
//!
//! Transport failures and validation failures are absorbed here; the caller
//! only ever sees a cleaned value or the fail-safe value. The structured
//! [`FailSafeReason`] records what actually went wrong on exhaustion, since
//! the returned value alone cannot distinguish "endpoint unreachable" from
//! "every response was malformed".

use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

use super::dispatch::{Dispatch, DispatchOutcome, ModelClient};
use super::registry::ModelRegistry;

/// Default number of generation attempts.
pub const DEFAULT_REPEAT: u32 = 5;

/// Caller-supplied predicate deciding whether a raw response is acceptable.
/// `Ok(false)` means the response was rejected; `Err` means the validator
/// itself crashed. Both consume the attempt, but they are logged and counted
/// separately.
pub type ValidateFn = Box<dyn Fn(&Value, &str) -> anyhow::Result<bool> + Send + Sync>;

/// Caller-supplied transform extracting the final value from a validated
/// response. An `Err` consumes the attempt and the loop continues.
pub type CleanUpFn<T> = Box<dyn Fn(&Value, &str) -> anyhow::Result<T> + Send + Sync>;

/// Generation errors that fail fast instead of being absorbed by the loop.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Why the fail-safe value was returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailSafeReason {
    /// The repeat budget was zero; no attempt was made.
    NoAttempts,
    /// The model family has no dispatch path; retrying cannot help.
    Unsupported,
    /// Every attempt in the budget failed.
    Exhausted {
        transport_failures: u32,
        rejections: u32,
        validator_errors: u32,
        clean_up_errors: u32,
    },
}

/// Result of a generation run.
#[derive(Debug)]
pub enum GenerationOutcome<T> {
    /// A response passed validation; `attempt` is 1-based.
    Generated { value: T, attempt: u32 },
    /// The retry budget was exhausted without a validated response.
    FailSafe { value: T, reason: FailSafeReason },
}

impl<T> GenerationOutcome<T> {
    /// Collapse to the plain value contract: the cleaned value on success,
    /// the fail-safe value otherwise.
    pub fn into_value(self) -> T {
        match self {
            Self::Generated { value, .. } => value,
            Self::FailSafe { value, .. } => value,
        }
    }

    /// Whether a response passed validation.
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }
}

/// A single generation request.
///
/// Built with the `with_*` methods; `validate` and `clean_up` are required
/// and their absence is rejected by [`Generator::generate`] up front.
pub struct GenerationRequest<T> {
    model_name: String,
    prompt: String,
    parameters: Option<HashMap<String, Value>>,
    repeat: u32,
    fail_safe: T,
    retry_delay: Option<Duration>,
    validate: Option<ValidateFn>,
    clean_up: Option<CleanUpFn<T>>,
}

impl<T> GenerationRequest<T> {
    /// Create a request with the default repeat budget and no retry delay.
    pub fn new(
        model_name: impl Into<String>,
        prompt: impl Into<String>,
        fail_safe: T,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            prompt: prompt.into(),
            parameters: None,
            repeat: DEFAULT_REPEAT,
            fail_safe,
            retry_delay: None,
            validate: None,
            clean_up: None,
        }
    }

    /// Set generation parameter overrides merged into the resolved model.
    pub fn with_parameters(mut self, parameters: HashMap<String, Value>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Set the number of attempts. Zero means no attempt is made and the
    /// fail-safe value is returned immediately.
    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Sleep between attempts. Off by default.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Set the validator predicate.
    pub fn with_validator(
        mut self,
        validate: impl Fn(&Value, &str) -> anyhow::Result<bool> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    /// Set the clean-up transform.
    pub fn with_clean_up(
        mut self,
        clean_up: impl Fn(&Value, &str) -> anyhow::Result<T> + Send + Sync + 'static,
    ) -> Self {
        self.clean_up = Some(Box::new(clean_up));
        self
    }
}

/// Orchestrates registry resolution and the retry loop over a dispatcher.
pub struct Generator<D = ModelClient> {
    registry: ModelRegistry,
    dispatcher: D,
}

impl Generator<ModelClient> {
    /// Create a generator backed by the HTTP dispatcher with its default
    /// request timeout.
    pub fn new(registry: ModelRegistry) -> Self {
        Self::with_dispatcher(registry, ModelClient::new())
    }
}

impl<D: Dispatch> Generator<D> {
    /// Create a generator with a custom dispatcher.
    pub fn with_dispatcher(registry: ModelRegistry, dispatcher: D) -> Self {
        Self {
            registry,
            dispatcher,
        }
    }

    /// The registry backing this generator.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub(crate) fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Run the validated generation loop.
    ///
    /// Attempts are strictly sequential. The first response accepted by
    /// `validate` is passed through `clean_up` and returned; no further
    /// attempts are made. If the budget runs out, the fail-safe value is
    /// returned with a [`FailSafeReason`] describing the failures.
    pub async fn generate<T>(
        &self,
        request: GenerationRequest<T>,
    ) -> Result<GenerationOutcome<T>, GenerateError> {
        let GenerationRequest {
            model_name,
            prompt,
            parameters,
            repeat,
            fail_safe,
            retry_delay,
            validate,
            clean_up,
        } = request;

        let validate = validate
            .ok_or(GenerateError::InvalidArgument("validator callback is required"))?;
        let clean_up = clean_up
            .ok_or(GenerateError::InvalidArgument("clean-up callback is required"))?;

        let info = self.registry.resolve(&model_name, parameters.as_ref());
        tracing::info!("prompt: {}", prompt);
        tracing::info!("resolved model info: {:?}", info);

        let mut transport_failures = 0u32;
        let mut rejections = 0u32;
        let mut validator_errors = 0u32;
        let mut clean_up_errors = 0u32;

        for attempt in 1..=repeat {
            if attempt > 1 {
                if let Some(delay) = retry_delay {
                    sleep(delay).await;
                }
            }

            let response = match self.dispatcher.dispatch(&info, &prompt).await {
                DispatchOutcome::Response(value) => value,
                DispatchOutcome::RequestFailed => {
                    transport_failures += 1;
                    continue;
                }
                DispatchOutcome::NotImplemented => {
                    tracing::error!(
                        "fail-safe triggered: no dispatch path for model '{}'",
                        info.name
                    );
                    return Ok(GenerationOutcome::FailSafe {
                        value: fail_safe,
                        reason: FailSafeReason::Unsupported,
                    });
                }
            };

            match validate(&response, &prompt) {
                Ok(true) => match clean_up(&response, &prompt) {
                    Ok(value) => {
                        tracing::info!("attempt {}/{} validated: {}", attempt, repeat, response);
                        return Ok(GenerationOutcome::Generated { value, attempt });
                    }
                    Err(e) => {
                        clean_up_errors += 1;
                        tracing::warn!("clean-up failed on attempt {}: {}", attempt, e);
                    }
                },
                Ok(false) => {
                    rejections += 1;
                    tracing::debug!("validator rejected response on attempt {}", attempt);
                }
                Err(e) => {
                    validator_errors += 1;
                    tracing::warn!("validator crashed on attempt {}: {}", attempt, e);
                }
            }
        }

        tracing::error!("fail-safe triggered after {} attempts", repeat);
        let reason = if repeat == 0 {
            FailSafeReason::NoAttempts
        } else {
            FailSafeReason::Exhausted {
                transport_failures,
                rejections,
                validator_errors,
                clean_up_errors,
            }
        };

        Ok(GenerationOutcome::FailSafe {
            value: fail_safe,
            reason,
        })
    }
}
