// core/src/flow/execution.rs

//! `Pipeline::run`: walks the steps in order and drives their handlers.

use super::context_data::ContextData;
use super::control::{FlowOutcome, StepControl};
use super::error::FlowError;
use super::pipeline::{Phase, Pipeline};
use tracing::{event, instrument, Instrument, Level};

impl<T, E> Pipeline<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// The first handler error aborts the run and is returned as-is; later
  /// steps never see the context.
  #[instrument(
    name = "workflow_run",
    skip_all,
    fields(workflow = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<T>) -> Result<FlowOutcome, E> {
    event!(Level::DEBUG, "Workflow run starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx_data.clone()) {
          event!(Level::DEBUG, step = step_name, "Step skipped by its skip condition.");
          continue;
        }
      }

      let has_handlers = Phase::ALL
        .iter()
        .any(|phase| !self.handlers_for(step_name, *phase).is_empty());
      if !has_handlers {
        if step_def.optional {
          event!(Level::DEBUG, step = step_name, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, step = step_name, "Non-optional step has no handlers.");
        return Err(E::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let step_span = tracing::info_span!("workflow_step", step = step_name, step_index = step_idx);
      let control = self.run_step(step_name, ctx_data.clone()).instrument(step_span).await?;
      if control == StepControl::Stop {
        event!(Level::INFO, step = step_name, "Workflow stopped by a handler.");
        return Ok(FlowOutcome::Stopped);
      }
    }

    event!(Level::DEBUG, "Workflow run completed.");
    Ok(FlowOutcome::Completed)
  }

  async fn run_step(&self, step_name: &str, ctx_data: ContextData<T>) -> Result<StepControl, E> {
    for phase in Phase::ALL {
      for handler_fn in self.handlers_for(step_name, phase) {
        match handler_fn(ctx_data.clone()).await {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Stop) => return Ok(StepControl::Stop),
          Err(e) => {
            event!(Level::WARN, phase = phase.label(), error = %e, "Step handler failed.");
            return Err(e);
          }
        }
      }
    }
    Ok(StepControl::Continue)
  }
}
