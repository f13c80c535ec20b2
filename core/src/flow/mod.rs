// bikeshop/src/flow/mod.rs

//! A small step engine for controller actions that need several backend round trips.
//!
//! A [`Flow`] is an ordered list of named steps, each with one async handler
//! operating on a [`SharedState`]. Steps can be skipped by a condition and any
//! handler can halt the rest of the flow.

pub mod control;
pub mod definition;
pub mod execution;
pub mod state;
pub mod step;

pub use control::{FlowControl, FlowResult};
pub use definition::{Flow, Handler};
pub use state::SharedState;
pub use step::{SkipCondition, StepDef};
