//! Breakpoint engine and instrumentation adapter.
//!
//! [`BreakpointEngine`] registers breakpoints and watch expressions and
//! decides whether an execution step should suspend. [`Instrumenter`] wraps
//! an external [`ExecutionHost`], emitting trace lifecycle events into the
//! shared store and consulting the engine at step boundaries.
//! [`StepSessions`] carries advisory step-through commands to a cooperating
//! host.

pub mod breakpoints;
pub mod error;
pub mod instrument;
pub mod stepper;

pub use breakpoints::{
    BreakDecision, BreakpointEngine, BreakpointSpec, EngineConfig, WatchSample,
};
pub use error::EngineError;
pub use instrument::{
    ExecutionHost, HostError, HostMetrics, HostOutcome, InstrumentedOutcome, Instrumenter,
    TaskRequest,
};
pub use stepper::StepSessions;
