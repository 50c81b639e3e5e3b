//! Graduated response logic.
//!
//! Four tiers keyed on overage as a fraction of the monthly budget:
//!
//! ```text
//! pass        under budget
//! warn        over by ≤ warn threshold (default 10%) — advisory only
//! soft_block  over by ≤ soft threshold (default 20%) — pick an option
//! hard_block  beyond that — manual escalation
//! ```
//!
//! A fifth status, `uncertain`, fires when the ±σ interval straddles
//! the budget boundary: the lower bound implies no overage while the
//! upper bound implies one, so forcing any of the four tiers would be
//! an arbitrary call. This check is intentionally applied only at the
//! overage=0 boundary, not between tiers — an estimate whose interval
//! sits entirely over budget gets a deterministic tier even when σ
//! spans the warn/soft line.

use carbongate_core::config::ThresholdConfig;
use carbongate_core::{ForecastWindow, GateDecision, GateStatus};
use tracing::debug;

use crate::options::build_options;

/// Everything the decision engine looks at. Pure input: the same
/// values always produce the same decision.
#[derive(Debug, Clone)]
pub struct GateInputs<'a> {
    /// Combined point estimate for the job (kg CO₂e).
    pub estimate_kg: f64,
    /// One-sigma uncertainty on the estimate.
    pub sigma_kg: f64,
    pub monthly_budget_kg: f64,
    pub monthly_used_kg: f64,
    pub thresholds: ThresholdConfig,
    /// Best scheduling window, when the forecaster produced one.
    pub forecast: Option<&'a ForecastWindow>,
    /// Whether the low-carbon alternative infrastructure can take the
    /// job, and what it would emit there.
    pub alternate_available: bool,
    pub alternate_kg: f64,
}

/// Apply the graduated response rules.
pub fn decide(inputs: &GateInputs) -> GateDecision {
    let remaining = inputs.monthly_budget_kg - inputs.monthly_used_kg;
    let overage_kg = (inputs.estimate_kg - remaining).max(0.0);
    let overage_fraction = if inputs.monthly_budget_kg > 0.0 {
        overage_kg / inputs.monthly_budget_kg
    } else if overage_kg > 0.0 {
        // No budget at all: any overage is total overage.
        1.0
    } else {
        0.0
    };

    let sigma = inputs.sigma_kg.max(0.0);
    let lower_overage = ((inputs.estimate_kg - sigma) - remaining).max(0.0);
    let upper_overage = ((inputs.estimate_kg + sigma) - remaining).max(0.0);

    let status = if lower_overage == 0.0 && upper_overage > 0.0 {
        GateStatus::Uncertain
    } else if overage_fraction == 0.0 {
        GateStatus::Pass
    } else if overage_fraction <= inputs.thresholds.warn_fraction {
        GateStatus::Warn
    } else if overage_fraction <= inputs.thresholds.soft_block_fraction {
        GateStatus::SoftBlock
    } else {
        GateStatus::HardBlock
    };

    let options = build_options(
        status,
        inputs.forecast,
        inputs.alternate_available,
        inputs.alternate_kg,
        inputs.estimate_kg,
    );

    let message = match status {
        GateStatus::Pass => {
            format!("Under budget; {remaining:.1} kg remaining this month.")
        }
        GateStatus::Warn => format!(
            "{overage_kg:.2} kg over budget (+{:.0}%). Consider rescheduling or rerouting.",
            overage_fraction * 100.0
        ),
        GateStatus::SoftBlock => format!(
            "Blocked; {overage_kg:.2} kg over budget. Pick a remediation option to proceed."
        ),
        GateStatus::HardBlock => format!(
            "Hard block; {overage_kg:.2} kg over budget ({:.0}%). Escalation required.",
            overage_fraction * 100.0
        ),
        GateStatus::Uncertain => format!(
            "Estimate spans the budget threshold (±{sigma:.2} kg); not forcing a call."
        ),
    };

    debug!(
        ?status,
        overage_kg,
        overage_fraction,
        n_options = options.len(),
        "gate decision"
    );

    GateDecision {
        status,
        overage_kg,
        overage_fraction,
        options,
        message,
    }
}
