//! # llm-bridge
//!
//! Thin client for invoking text-generation backends over HTTP, with
//! retry-on-validation-failure semantics and simple prompt templating.
//!
//! Model parameters live in a JSON config file loaded into a
//! [`ModelRegistry`]; a [`Generator`] drives repeated dispatch attempts
//! through caller-supplied validation and clean-up callbacks, falling back
//! to a caller-supplied value when the retry budget runs out.
//!
//! ```rust,no_run
//! use llm_bridge::{GenerationRequest, Generator, ModelRegistry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let _ = llm_bridge::init_logging();
//!
//!     let registry = ModelRegistry::load("model_info.json", "llama3_8b")?;
//!     let generator = Generator::new(registry);
//!
//!     let prompt = llm_bridge::build_prompt(&["a friendly greeting"], "prompts/greet.txt")?;
//!     let request = GenerationRequest::new("llama3_8b", prompt, "error".to_string())
//!         .with_validator(|response, _| Ok(response.get("response").is_some()))
//!         .with_clean_up(|response, _| {
//!             Ok(response["response"].as_str().unwrap_or_default().to_string())
//!         });
//!
//!     let outcome = generator.generate(request).await?;
//!     println!("{}", outcome.into_value());
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod model;
pub mod prompt;

pub use logging::init_logging;
pub use model::{
    Dispatch, DispatchOutcome, FailSafeReason, GenerateError, GenerationOutcome,
    GenerationRequest, Generator, ModelClient, ModelFamily, ModelInfo, ModelRegistry,
    RegistryError,
};
pub use prompt::{build_prompt, fill_template, PromptError, COMMENT_BLOCK_MARKER};
