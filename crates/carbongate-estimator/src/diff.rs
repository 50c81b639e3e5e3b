//! Run-over-run emissions delta.

use carbongate_core::{DiffDirection, RunDiff};

/// Delta between this gate check and the previous one for the same
/// job. A missing, zero, or negative previous estimate marks this run
/// as the baseline instead of dividing by it.
pub fn run_diff(current_kg: f64, previous_kg: Option<f64>) -> RunDiff {
    let Some(previous) = previous_kg.filter(|&p| p > 0.0) else {
        return RunDiff {
            delta_kg: 0.0,
            delta_pct: 0.0,
            direction: DiffDirection::Baseline,
        };
    };

    let delta_kg = current_kg - previous;
    RunDiff {
        delta_kg,
        delta_pct: delta_kg / previous * 100.0,
        direction: if delta_kg > 0.0 {
            DiffDirection::Increase
        } else {
            DiffDirection::Decrease
        },
    }
}
