//! carbongate-estimator — the orchestrator.
//!
//! Sequences the physics models over one job, selecting live versus
//! fallback data sources along the way, and assembles the final
//! [`carbongate_core::GateReport`]. Every evaluation is a clean
//! function of its inputs: no caching, no persisted state, and no
//! failure path that aborts — degraded inputs degrade the confidence
//! of the answer, not its existence.

pub mod diff;
pub mod estimator;

pub use diff::run_diff;
pub use estimator::evaluate_job;
