// bikeshop/src/flow/step.rs

use std::sync::Arc;

use super::SharedState;

/// Evaluated right before a step runs; `true` skips it.
pub type SkipCondition<T> = Arc<dyn Fn(&T) -> bool + Send + Sync + 'static>;

#[derive(Clone)]
pub struct StepDef<T: 'static + Send + Sync> {
  pub name: &'static str,
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: 'static + Send + Sync> StepDef<T> {
  pub(crate) fn should_skip(&self, state: &SharedState<T>) -> bool {
    match &self.skip_if {
      Some(condition) => condition(&state.read()),
      None => false,
    }
  }
}

impl<T: 'static + Send + Sync> std::fmt::Debug for StepDef<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("has_skip_condition", &self.skip_if.is_some())
      .finish()
  }
}
