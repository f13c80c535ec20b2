// bikeshop/src/flow/execution.rs

use tracing::{event, instrument, Instrument, Level};

use super::control::{FlowControl, FlowResult};
use super::definition::Flow;
use super::state::SharedState;
use crate::error::FlowError;

impl<T, E> Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step in order against `state`.
  ///
  /// Stops at the first handler error or [`FlowControl::Halt`]. A declared step
  /// without a handler is a [`FlowError::HandlerMissing`], checked before any
  /// handler runs so a half-wired flow never touches the backend.
  #[instrument(name = "Flow::run", skip_all, fields(flow = self.name, num_steps = self.steps.len()), err(Display))]
  pub async fn run(&self, state: SharedState<T>) -> Result<FlowResult, E> {
    if let Some(step) = self.steps.iter().find(|s| !self.handlers.contains_key(s.name)) {
      return Err(E::from(FlowError::HandlerMissing {
        flow: self.name,
        step: step.name.to_string(),
      }));
    }

    for (index, step) in self.steps.iter().enumerate() {
      if step.should_skip(&state) {
        event!(Level::DEBUG, step = step.name, "Step skipped.");
        continue;
      }

      let Some(handler) = self.handlers.get(step.name) else {
        continue;
      };

      let span = tracing::info_span!("flow_step", step = step.name, index);
      match handler(state.clone()).instrument(span).await {
        Ok(FlowControl::Continue) => {}
        Ok(FlowControl::Halt) => {
          event!(Level::INFO, step = step.name, "Flow halted by step.");
          return Ok(FlowResult::Halted);
        }
        Err(e) => {
          event!(Level::WARN, step = step.name, error = %e, "Flow step failed.");
          return Err(e);
        }
      }
    }

    Ok(FlowResult::Completed)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use crate::error::{FlowError, StoreError};
  use crate::flow::{Flow, FlowControl, FlowResult, SharedState, SkipCondition};

  #[derive(Debug, Default)]
  struct Trace {
    visited: Vec<&'static str>,
    skip_middle: bool,
  }

  fn visit(name: &'static str) -> impl Fn(SharedState<Trace>) -> std::future::Ready<Result<FlowControl, StoreError>> {
    move |state| {
      state.write().visited.push(name);
      std::future::ready(Ok(FlowControl::Continue))
    }
  }

  #[tokio::test]
  async fn runs_steps_in_declared_order_and_honours_skip_conditions() {
    let mut flow = Flow::<Trace, StoreError>::new(
      "trace",
      &[
        ("first", None),
        ("middle", Some(Arc::new(|t: &Trace| t.skip_middle) as SkipCondition<Trace>)),
        ("last", None),
      ],
    );
    flow.on("first", visit("first")).unwrap();
    flow.on("middle", visit("middle")).unwrap();
    flow.on("last", visit("last")).unwrap();

    let state = SharedState::new(Trace::default());
    assert_eq!(flow.run(state.clone()).await.unwrap(), FlowResult::Completed);
    assert_eq!(state.read().visited, vec!["first", "middle", "last"]);

    let skipping = SharedState::new(Trace {
      skip_middle: true,
      ..Trace::default()
    });
    flow.run(skipping.clone()).await.unwrap();
    assert_eq!(skipping.read().visited, vec!["first", "last"]);
  }

  #[tokio::test]
  async fn halt_stops_remaining_steps() {
    let mut flow = Flow::<Trace, StoreError>::new("halting", &[("stop", None), ("never", None)]);
    flow
      .on("stop", |state: SharedState<Trace>| async move {
        state.write().visited.push("stop");
        Ok::<_, StoreError>(FlowControl::Halt)
      })
      .unwrap();
    flow.on("never", visit("never")).unwrap();

    let state = SharedState::new(Trace::default());
    assert_eq!(flow.run(state.clone()).await.unwrap(), FlowResult::Halted);
    assert_eq!(state.read().visited, vec!["stop"]);
  }

  #[tokio::test]
  async fn missing_handler_fails_before_any_step_runs() {
    let mut flow = Flow::<Trace, StoreError>::new("partial", &[("wired", None), ("unwired", None)]);
    flow.on("wired", visit("wired")).unwrap();

    let state = SharedState::new(Trace::default());
    let err = flow.run(state.clone()).await.unwrap_err();
    assert!(matches!(
      err,
      StoreError::Flow {
        source: FlowError::HandlerMissing { .. }
      }
    ));
    assert!(state.read().visited.is_empty());
  }

  #[test]
  fn registration_rejects_unknown_and_duplicate_steps() {
    let mut flow = Flow::<Trace, StoreError>::new("strict", &[("only", None)]);
    assert!(matches!(flow.on("typo", visit("typo")), Err(FlowError::UnknownStep { .. })));
    flow.on("only", visit("only")).unwrap();
    assert!(matches!(flow.on("only", visit("only")), Err(FlowError::DuplicateHandler { .. })));
  }
}
