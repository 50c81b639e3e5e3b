//! carbongate-gate — turning an estimate into a decision.
//!
//! The decision engine is a pure function over a single transition: an
//! emissions estimate with its uncertainty, plus the monthly budget
//! state, maps to one of five graduated statuses and a ranked list of
//! remediation options. No state is persisted between evaluations.

pub mod decision;
pub mod options;

pub use decision::{GateInputs, decide};
