//! Remediation option generation and ranking.
//!
//! Options are generated conditionally and then stable-sorted by
//! descending savings. The ordering is a user-facing contract: the most
//! impactful lever appears first, and ties keep their generation order.

use carbongate_core::{EffortTier, ForecastWindow, GateStatus, RemediationOption};

/// Forecast savings below this are not worth a wait suggestion.
const WAIT_SAVINGS_FLOOR_PCT: f64 = 5.0;

/// Hourly cost premium for the geothermal reroute (USD).
const GEOTHERMAL_COST_DELTA_USD_HOUR: f64 = 2.20;

/// Assumed savings from halving training epochs.
const REDUCE_SCOPE_SAVINGS_PCT: f64 = 44.0;

pub(crate) fn build_options(
    status: GateStatus,
    forecast: Option<&ForecastWindow>,
    alternate_available: bool,
    alternate_kg: f64,
    estimate_kg: f64,
) -> Vec<RemediationOption> {
    let mut options = Vec::new();

    if let Some(window) = forecast
        && window.wait_hours > 0.0
        && window.savings_pct > WAIT_SAVINGS_FLOOR_PCT
    {
        let confidence = if window.confidence > 0.7 {
            "high"
        } else {
            "moderate"
        };
        options.push(RemediationOption {
            id: "wait".to_string(),
            label: format!("Wait {:.0}h", window.wait_hours),
            description: format!(
                "Carbon drops {:.0}%; forecast confidence: {confidence}",
                window.savings_pct
            ),
            savings_pct: window.savings_pct,
            cost_delta_usd_hour: 0.0,
            effort: EffortTier::None,
        });
    }

    if alternate_available && estimate_kg > 0.0 && alternate_kg < estimate_kg {
        let savings_pct = (1.0 - alternate_kg / estimate_kg) * 100.0;
        options.push(RemediationOption {
            id: "geothermal".to_string(),
            label: "Reroute to geothermal site".to_string(),
            description: format!("{savings_pct:.0}% cleaner; fixed-temperature ground loop cooling"),
            savings_pct,
            cost_delta_usd_hour: GEOTHERMAL_COST_DELTA_USD_HOUR,
            effort: EffortTier::Low,
        });
    }

    options.push(RemediationOption {
        id: "reduce_scope".to_string(),
        label: "Reduce training scope".to_string(),
        description: "Halving epochs saves ~44% carbon and cuts runtime proportionally"
            .to_string(),
        savings_pct: REDUCE_SCOPE_SAVINGS_PCT,
        cost_delta_usd_hour: 0.0,
        effort: EffortTier::Medium,
    });

    if !matches!(status, GateStatus::Pass | GateStatus::Warn) {
        options.push(RemediationOption {
            id: "override".to_string(),
            label: "Override (justify)".to_string(),
            description: "Apply the override label and comment your reason".to_string(),
            savings_pct: 0.0,
            cost_delta_usd_hour: 0.0,
            effort: EffortTier::High,
        });
    }

    // Vec::sort_by is stable: equal savings keep generation order.
    options.sort_by(|a, b| {
        b.savings_pct
            .partial_cmp(&a.savings_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    options
}
