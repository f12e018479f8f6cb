// core/src/flow/mod.rs

//! A small asynchronous step-pipeline engine.
//!
//! Workflows are ordered, named steps over a shared `ContextData<T>`. Each
//! step can carry `before`, `on` and `after` handlers; a handler either lets
//! the run continue, stops it, or fails it with the workflow's error type.

pub mod context_data;
pub mod control;
pub mod error;
pub mod execution;
pub mod pipeline;
pub mod registry;
pub mod step;

pub use context_data::ContextData;
pub use control::{FlowOutcome, StepControl};
pub use error::FlowError;
pub use pipeline::{Handler, Phase, Pipeline};
pub use registry::Workflows;
pub use step::{SkipCondition, StepDef};
