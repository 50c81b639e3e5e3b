//! Cooling efficiency model — PUE from first principles.
//!
//! Rather than assuming a flat facility overhead, PUE is derived from
//! the Carnot limit between the cold reservoir (ambient air, or a fixed
//! ground loop for geothermal sites) and the hot-aisle setpoint:
//!
//! ```text
//! COP_carnot = T_cold / (T_hot − T_cold)        [Kelvin]
//! COP_actual = η × COP_carnot
//! PUE        = 1 + 1 / COP_actual
//! ```
//!
//! Geothermal sites run against a ~12 °C ground loop that holds steady
//! year-round, decoupling their PUE from weather entirely; the real
//! carbon advantage of those sites comes from that stability combined
//! with their near-zero grid intensity.

/// Hot-aisle setpoint (°C).
pub const T_HOT_C: f64 = 35.0;

/// Fraction of the Carnot COP that real chiller systems reach. 0.60 is
/// conservative; ground loops with variable-speed compressors can hit
/// ~0.72.
pub const ETA_COOLING: f64 = 0.60;

/// Geothermal ground loop temperature, ~12 °C year-round.
pub const GEOTHERMAL_LOOP_TEMP_K: f64 = 285.0;

/// Grid intensity assumed for the geothermal alternative (g CO₂/kWh).
pub const GEOTHERMAL_INTENSITY_G_KWH: f64 = 50.0;

const KELVIN_OFFSET: f64 = 273.15;

/// Ambient temperature forecast error used for the σ band (°C).
const FORECAST_ERROR_C: f64 = 2.0;

/// PUE and its one-sigma band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PueEstimate {
    pub pue: f64,
    pub sigma: f64,
}

/// Derive PUE from ambient temperature.
///
/// σ is produced by re-evaluating at `T_cold ± 2 °C` (ambient forecast
/// error) and taking half the spread. With `geothermal` set the ambient
/// temperature is ignored entirely in favor of the ground loop.
pub fn compute_pue(ambient_temp_c: f64, geothermal: bool) -> PueEstimate {
    let t_hot_k = T_HOT_C + KELVIN_OFFSET;
    let t_cold_k = if geothermal {
        GEOTHERMAL_LOOP_TEMP_K
    } else {
        ambient_temp_c + KELVIN_OFFSET
    };

    let pue = pue_at(t_cold_k, t_hot_k);
    let pue_hi = pue_at(t_cold_k + FORECAST_ERROR_C, t_hot_k);
    let pue_lo = pue_at(t_cold_k - FORECAST_ERROR_C, t_hot_k);
    let sigma = (pue_hi - pue_lo).abs() / 2.0;

    PueEstimate { pue, sigma }
}

/// PUE at a given cold-reservoir temperature.
///
/// The cold side is clamped at least 1 K below the hot aisle. A cold
/// reservoir at or above the hot aisle is physically impossible for a
/// chiller, not a data error, so the clamp applies here at the model
/// boundary and every caller (including the ±2 °C σ evaluations)
/// inherits it.
fn pue_at(t_cold_k: f64, t_hot_k: f64) -> f64 {
    let t_cold_k = t_cold_k.min(t_hot_k - 1.0);
    let cop_carnot = t_cold_k / (t_hot_k - t_cold_k);
    let cop_actual = ETA_COOLING * cop_carnot;
    1.0 + 1.0 / cop_actual
}
