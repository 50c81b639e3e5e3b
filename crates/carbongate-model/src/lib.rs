//! carbongate-model — the physics half of the estimation pipeline.
//!
//! Every function here is pure and reentrant: profiles and parameters
//! in, numbers out, no I/O and no shared state. Physically implausible
//! inputs are clamped at the model boundary rather than propagated or
//! raised — the pipeline's contract is to always return a usable,
//! appropriately-uncertain estimate.
//!
//! Modules:
//! - [`cooling`] — Carnot-bounded PUE from ambient temperature
//! - [`thermal`] — coupled junction-temperature ODE for throttled draw
//! - [`ode`] — embedded adaptive Runge–Kutta used by `thermal`
//! - [`embodied`] — manufacturing-carbon amortization
//! - [`forcing`] — CO₂ mass to marginal radiative forcing
//! - [`lifecycle`] — deployment-lifetime projection with inference load
//! - [`uncertainty`] — independent-error quadrature

pub mod cooling;
pub mod embodied;
pub mod forcing;
pub mod lifecycle;
pub mod ode;
pub mod thermal;
pub mod uncertainty;

pub use cooling::{PueEstimate, compute_pue};
pub use embodied::{EmbodiedEstimate, amortized_embodied};
pub use forcing::marginal_forcing;
pub use lifecycle::project_lifecycle;
pub use thermal::{ThrottleResult, solve_throttle};
pub use uncertainty::{combine_quadrature, operational_sigma};
