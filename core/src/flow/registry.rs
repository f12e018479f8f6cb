// core/src/flow/registry.rs

//! `Workflows<E>`: pipelines keyed by the type of context data they run over.

use super::context_data::ContextData;
use super::control::FlowOutcome;
use super::error::FlowError;
use super::pipeline::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait ErasedWorkflow<E>: Send + Sync
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// `ctx` must hold a `ContextData<T>` for the `T` this workflow was registered with.
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<FlowOutcome, E>;
}

#[async_trait]
impl<T, E> ErasedWorkflow<E> for Pipeline<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<FlowOutcome, E> {
    let ctx_data = ctx.downcast::<ContextData<T>>().map_err(|_| {
      E::from(FlowError::TypeMismatch {
        expected_type: std::any::type_name::<ContextData<T>>().to_string(),
      })
    })?;
    self.run(*ctx_data).await
  }
}

/// Registry of the workflows an application runs.
///
/// One pipeline per context data type; registering a second one for the
/// same type replaces the first.
pub struct Workflows<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  registry: RwLock<HashMap<TypeId, Arc<dyn ErasedWorkflow<E>>>>,
}

impl<E> Workflows<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      registry: RwLock::new(HashMap::new()),
    }
  }

  pub fn register<T>(&self, pipeline: Pipeline<T, E>)
  where
    T: Send + Sync + 'static,
  {
    event!(
      Level::DEBUG,
      workflow = %pipeline.name(),
      context_type = %std::any::type_name::<T>(),
      "Registering workflow."
    );
    self.registry.write().insert(TypeId::of::<T>(), Arc::new(pipeline));
  }

  pub fn is_registered<T: Send + Sync + 'static>(&self) -> bool {
    self.registry.read().contains_key(&TypeId::of::<T>())
  }

  /// Runs the workflow registered for `T` against `ctx_data`.
  pub async fn run<T>(&self, ctx_data: ContextData<T>) -> Result<FlowOutcome, E>
  where
    T: Send + Sync + 'static,
  {
    let runner = self.registry.read().get(&TypeId::of::<T>()).cloned();
    let runner = runner.ok_or_else(|| {
      let context_type = std::any::type_name::<T>();
      event!(Level::ERROR, context_type, "No workflow registered for context type.");
      E::from(FlowError::NotRegistered {
        context_type: context_type.to_string(),
      })
    })?;
    runner.run_erased(Box::new(ctx_data)).await
  }
}

impl<E> Default for Workflows<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
