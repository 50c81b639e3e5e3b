//! Domain types for a gate evaluation.
//!
//! These are plain immutable value objects: constructed once by the
//! estimator or decision engine, serialized into the report payload,
//! never mutated afterwards. No behavior lives here beyond construction
//! helpers.

use serde::{Deserialize, Serialize};

// ── Gate decision ─────────────────────────────────────────────────

/// Categorical outcome of a gate check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    /// Under budget.
    Pass,
    /// Over budget by at most the warn threshold — advisory only.
    Warn,
    /// Over budget by at most the soft-block threshold — blocked, but
    /// resolvable by picking a remediation option.
    SoftBlock,
    /// Over budget beyond the soft-block threshold — escalation required.
    HardBlock,
    /// The ±σ interval straddles the budget boundary; no call is forced.
    Uncertain,
}

impl GateStatus {
    /// Whether this status blocks the job outright.
    pub fn is_blocking(self) -> bool {
        matches!(self, GateStatus::SoftBlock | GateStatus::HardBlock)
    }
}

/// How much work a remediation option asks of the submitter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EffortTier {
    None,
    Low,
    Medium,
    High,
}

/// A single ranked remediation option attached to a gate decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemediationOption {
    /// Stable machine identifier ("wait", "geothermal", ...).
    pub id: String,
    /// Short human label.
    pub label: String,
    /// One-line explanation with the concrete numbers filled in.
    pub description: String,
    /// Estimated carbon savings relative to the current plan.
    pub savings_pct: f64,
    /// Hourly cost delta in USD (0 when the option is free).
    pub cost_delta_usd_hour: f64,
    pub effort: EffortTier,
}

/// Outcome of the graduated decision engine.
///
/// Derived deterministically from an [`EmissionsEstimate`] and the
/// monthly budget state; immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateDecision {
    pub status: GateStatus,
    /// Kilograms over the remaining monthly budget (0 when under).
    pub overage_kg: f64,
    /// Overage as a fraction of the total monthly budget.
    pub overage_fraction: f64,
    /// Remediation options, sorted by descending savings.
    pub options: Vec<RemediationOption>,
    pub message: String,
}

// ── Intensity ─────────────────────────────────────────────────────

/// Which path produced the grid intensity used for the estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntensitySourceTag {
    /// Real-time marginal intensity from the live data source.
    Live,
    /// Caller-supplied spot value (flat relative σ applied).
    Provided,
    /// Static regional estimate; the live source was unavailable.
    StaticFallback,
}

// ── Forecast ──────────────────────────────────────────────────────

/// Which model produced the scheduling forecast.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ForecastSourceTag {
    /// Hourly series from the live forecast feed.
    LiveFeed,
    /// Harmonic regression over the supplied history.
    Harmonic,
}

/// Fit diagnostics and provenance for a forecast window.
///
/// Partial R² fields are `None` when the live feed was used (there is
/// no fit to characterize) or when the corresponding harmonic group was
/// dropped for lack of history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastMeta {
    pub source: ForecastSourceTag,
    pub r2_daily: Option<f64>,
    pub r2_weekly: Option<f64>,
    pub r2_biweekly: Option<f64>,
    pub r2_total: Option<f64>,
    pub residual_std: Option<f64>,
    /// Std-dev of the historical series itself (g CO₂/kWh).
    pub volatility: f64,
    /// Confidence reduction applied for grid volatility, 0..=0.4.
    pub vol_discount: f64,
    /// Confidence before the volatility discount.
    pub base_confidence: f64,
    pub confidence_label: String,
    /// Max − min of the projected series (g CO₂/kWh).
    pub forecast_range_g: f64,
    /// Lowest projected intensity in the window (g CO₂/kWh).
    pub min_intensity_g: f64,
}

/// The lowest-carbon scheduling window found in the lookahead horizon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastWindow {
    /// Hours to wait for the best window (0 = now is best).
    pub wait_hours: f64,
    /// 0..=1, volatility-discounted.
    pub confidence: f64,
    /// Carbon savings at the window relative to current intensity.
    pub savings_pct: f64,
    pub meta: ForecastMeta,
}

/// Result of the scheduling forecast.
///
/// Too little history is the one condition surfaced explicitly rather
/// than defaulted — it changes what scheduling advice is trustworthy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ForecastOutcome {
    Window(ForecastWindow),
    InsufficientHistory { samples: usize, required: usize },
}

impl ForecastOutcome {
    /// The window, if one was produced.
    pub fn window(&self) -> Option<&ForecastWindow> {
        match self {
            ForecastOutcome::Window(w) => Some(w),
            ForecastOutcome::InsufficientHistory { .. } => None,
        }
    }
}

// ── Emissions estimate ────────────────────────────────────────────

/// Full output of the physics pipeline for a single job evaluation.
///
/// Created fresh per evaluation; never mutated and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmissionsEstimate {
    /// Training-time emissions from grid electricity.
    pub operational_kg: f64,
    /// Amortized manufacturing emissions for the job's share of the
    /// accelerator lifetime.
    pub embodied_kg: f64,
    /// operational + embodied.
    pub combined_kg: f64,
    /// One-sigma uncertainty on `combined_kg`.
    pub sigma_kg: f64,
    /// Power usage effectiveness applied to compute energy.
    pub pue: f64,
    pub pue_sigma: f64,
    /// Percent reduction vs nameplate × hours from thermal throttling.
    pub throttle_pct: f64,
    /// Compute energy after throttling, before the PUE multiplier.
    pub energy_kwh: f64,
    /// Facility energy: `energy_kwh × pue`.
    pub facility_energy_kwh: f64,
    /// Training + embodied + projected inference-serving emissions.
    pub lifecycle_kg: f64,
    /// Marginal radiative forcing contribution of `combined_kg`.
    pub radiative_forcing_w_m2: f64,
    /// Combined emissions if the job ran on the alternative
    /// low-carbon infrastructure instead.
    pub alternate_kg: f64,
    /// Grid intensity used for the operational term (g CO₂/kWh).
    pub intensity_g_kwh: f64,
    pub intensity_sigma: f64,
    pub intensity_source: IntensitySourceTag,
    /// Share of current generation that is carbon-free (live only).
    pub percent_clean: Option<f64>,
    /// Std-dev of the intensity history (g CO₂/kWh).
    pub volatility_g_kwh: f64,
    pub forecast: ForecastOutcome,
}

// ── Run diff ──────────────────────────────────────────────────────

/// Direction of change relative to the previous evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiffDirection {
    /// No usable previous estimate — this run sets the baseline.
    Baseline,
    Increase,
    Decrease,
}

/// Delta between this evaluation and the previous one for the same job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDiff {
    pub delta_kg: f64,
    pub delta_pct: f64,
    pub direction: DiffDirection,
}

// ── Report ────────────────────────────────────────────────────────

/// The complete payload returned to the orchestration/CI layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateReport {
    pub accelerator: String,
    pub region: String,
    pub estimate: EmissionsEstimate,
    pub gate: GateDecision,
    pub diff: RunDiff,
    /// Monthly budget left after this job, may be negative.
    pub budget_remaining_kg: f64,
}

// ── Ground-truth measurement ──────────────────────────────────────

/// Measured (not estimated) emissions for a running job, in the same
/// units as the estimator output. Produced by an instrumentation hook
/// when one is available; used to recalibrate the physics model, never
/// consumed by the estimator itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasuredEmissions {
    pub emissions_kg: f64,
    pub energy_kwh: f64,
    pub duration_s: f64,
    pub cpu_power_w: f64,
    pub gpu_power_w: f64,
    pub ram_power_w: f64,
    /// Which instrumentation produced the measurement.
    pub source: String,
}
