// core/src/flow/error.rs
use thiserror::Error;

/// Failures raised by the workflow engine itself, as opposed to the handlers it runs.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Step not found in workflow definition: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No workflow registered for context type {context_type}")]
  NotRegistered { context_type: String },

  #[error("Context type mismatch (expected {expected_type})")]
  TypeMismatch { expected_type: String },
}
