//! Embodied carbon amortization.
//!
//! Manufacturing emissions are charged to jobs linearly over the
//! accelerator's expected productive lifetime:
//!
//! ```text
//! rate = footprint / (lifetime_hours × utilization)
//! ```
//!
//! The ±30% band reflects variance across lifecycle-assessment
//! literature (fab process, packaging, supply chain) — a systematic
//! spread, not statistical sampling error.

use carbongate_core::AcceleratorProfile;

/// Relative uncertainty on manufacturing-footprint figures.
const EMBODIED_RELATIVE_SIGMA: f64 = 0.30;

/// Amortized embodied carbon for one job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbodiedEstimate {
    pub kg: f64,
    pub sigma: f64,
}

/// This job's share of the accelerator's manufacturing footprint.
pub fn amortized_embodied(profile: &AcceleratorProfile, hours: f64) -> EmbodiedEstimate {
    let productive_hours = (profile.lifetime_hours * profile.utilization).max(1.0);
    let kg = profile.embodied_kg / productive_hours * hours;
    EmbodiedEstimate {
        kg,
        sigma: kg * EMBODIED_RELATIVE_SIGMA,
    }
}
