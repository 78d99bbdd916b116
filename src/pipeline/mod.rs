//! The step itself: argument building, elevation, execution, exit-code
//! classification and the controller that ties them together.

pub mod args;
pub mod classify;
pub mod controller;
pub mod executor;
pub mod privilege;
pub mod report;

pub use args::CommandKind;
pub use classify::{classify, Classification};
pub use controller::{run_step, Pipeline, RunState, Verdict};
pub use executor::{Executor, Invocation};
pub use privilege::requires_elevation;
