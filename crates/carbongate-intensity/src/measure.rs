//! Ground-truth measurement feed contract.
//!
//! When a job is actually running, an instrumentation hook can measure
//! real energy draw and emissions in the estimator's units. The gap
//! between predicted and measured is worth logging: a consistent gap
//! says the nameplate or throttling parameters need recalibration for
//! that hardware/environment combination. The estimator itself never
//! reads measurements — this path exists to validate the physics model,
//! not to feed it.

use carbongate_core::MeasuredEmissions;

/// An optional instrumentation hook for running jobs.
///
/// Returns `None` when no instrumentation is installed, so callers
/// don't need to branch on availability.
pub trait MeasurementFeed {
    fn measure(
        &self,
        region: &str,
        accelerator: &str,
    ) -> impl Future<Output = Option<MeasuredEmissions>> + Send;
}

/// Relative gap between a predicted and a measured emissions figure,
/// as a signed percentage of the measurement. Positive means the model
/// over-predicted.
pub fn calibration_gap(predicted_kg: f64, measured: &MeasuredEmissions) -> Option<f64> {
    if measured.emissions_kg <= 0.0 {
        return None;
    }
    Some((predicted_kg - measured.emissions_kg) / measured.emissions_kg * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(kg: f64) -> MeasuredEmissions {
        MeasuredEmissions {
            emissions_kg: kg,
            energy_kwh: 1.5,
            duration_s: 3600.0,
            cpu_power_w: 120.0,
            gpu_power_w: 380.0,
            ram_power_w: 15.0,
            source: "telemetry".to_string(),
        }
    }

    #[test]
    fn over_prediction_is_positive() {
        let gap = calibration_gap(1.2, &measured(1.0)).unwrap();
        assert!((gap - 20.0).abs() < 1e-9);
    }

    #[test]
    fn under_prediction_is_negative() {
        let gap = calibration_gap(0.8, &measured(1.0)).unwrap();
        assert!((gap + 20.0).abs() < 1e-9);
    }

    #[test]
    fn zero_measurement_yields_none() {
        assert!(calibration_gap(1.0, &measured(0.0)).is_none());
    }
}
