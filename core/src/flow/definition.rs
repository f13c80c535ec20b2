// bikeshop/src/flow/definition.rs

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use super::control::FlowControl;
use super::state::SharedState;
use super::step::{SkipCondition, StepDef};
use crate::error::FlowError;

/// A boxed async step handler.
///
/// Handlers receive a clone of the flow's [`SharedState`] and must release any
/// lock guard before awaiting.
pub type Handler<T, E> =
  Box<dyn Fn(SharedState<T>) -> Pin<Box<dyn Future<Output = Result<FlowControl, E>> + Send>> + Send + Sync>;

pub struct Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) name: &'static str,
  pub(crate) steps: Vec<StepDef<T>>,
  pub(crate) handlers: HashMap<&'static str, Handler<T, E>>,
}

impl<T, E> Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Declares a flow and its steps, in execution order.
  pub fn new(name: &'static str, steps: &[(&'static str, Option<SkipCondition<T>>)]) -> Self {
    let steps = steps
      .iter()
      .map(|(step, skip_if)| StepDef {
        name: *step,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      name,
      steps,
      handlers: HashMap::new(),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn step_names(&self) -> Vec<&'static str> {
    self.steps.iter().map(|s| s.name).collect()
  }

  /// Registers the handler for `step`. Each declared step takes exactly one.
  pub fn on<F, Fut, HandlerErr>(&mut self, step: &str, handler_fn: F) -> Result<(), FlowError>
  where
    F: Fn(SharedState<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<E> + Send + 'static,
  {
    let declared = self
      .steps
      .iter()
      .find(|s| s.name == step)
      .map(|s| s.name)
      .ok_or_else(|| FlowError::UnknownStep {
        flow: self.name,
        step: step.to_string(),
      })?;

    if self.handlers.contains_key(declared) {
      return Err(FlowError::DuplicateHandler {
        flow: self.name,
        step: step.to_string(),
      });
    }

    let handler: Handler<T, E> = Box::new(
      move |state: SharedState<T>| -> Pin<Box<dyn Future<Output = Result<FlowControl, E>> + Send>> {
        let fut = handler_fn(state);
        Box::pin(async move { fut.await.map_err(Into::into) })
      },
    );
    self.handlers.insert(declared, handler);
    Ok(())
  }
}

