//! Lifecycle projection — training plus deployment-lifetime serving.
//!
//! Inference energy is assumed to scale linearly with model parameter
//! count per query (~1e-6 kWh per billion parameters, from published
//! benchmarks). A first-order estimate by design: when measured
//! inference telemetry exists it should replace this entirely.

use carbongate_core::LifecycleParams;

/// Empirical inference energy per billion parameters per query (kWh).
const KWH_PER_BILLION_PARAMS_QUERY: f64 = 1e-6;

const DAYS_PER_MONTH: f64 = 30.0;

/// Total lifecycle emissions: training + embodied + projected
/// inference serving, converted via the serving-region intensity.
pub fn project_lifecycle(
    operational_kg: f64,
    embodied_kg: f64,
    params: &LifecycleParams,
    serving_intensity_g_kwh: f64,
) -> f64 {
    let kwh_per_query = params.model_params_billions * KWH_PER_BILLION_PARAMS_QUERY;
    let inference_kwh =
        kwh_per_query * params.queries_per_day * params.deployment_months * DAYS_PER_MONTH;
    let inference_kg = inference_kwh * serving_intensity_g_kwh / 1000.0;
    operational_kg + embodied_kg + inference_kg
}
