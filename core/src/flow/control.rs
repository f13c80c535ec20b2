// bikeshop/src/flow/control.rs

/// Returned by a step handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
  Continue,
  /// Skip every remaining step.
  Halt,
}

/// How a whole flow run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowResult {
  Completed,
  Halted,
}
