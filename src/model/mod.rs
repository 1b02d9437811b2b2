//! Model access: registry lookup, request dispatch, and the validated
//! generation loop.

mod dispatch;
mod embedding;
mod generate;
mod registry;

pub use dispatch::{Dispatch, DispatchOutcome, ModelClient, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use generate::{
    CleanUpFn, FailSafeReason, GenerateError, GenerationOutcome, GenerationRequest, Generator,
    ValidateFn, DEFAULT_REPEAT,
};
pub use registry::{ModelFamily, ModelInfo, ModelRegistry, RegistryError};
