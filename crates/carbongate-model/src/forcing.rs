//! Radiative forcing translator.
//!
//! Expresses a mass of emitted CO₂ as a marginal change in the
//! atmosphere's energy balance, using the IPCC AR6 logarithmic forcing
//! law `F = α · ln(C / C₀)`. The reported value is the *delta* from
//! adding this job's emissions to the current atmospheric stock, not an
//! absolute forcing — individually tiny (order 1e-16 W/m² per kg) but
//! additive across a fleet.

/// AR6 logarithmic forcing coefficient (W/m²).
const ALPHA_FORCING: f64 = 5.35;

/// Pre-industrial atmospheric CO₂ concentration (ppm).
const CO2_PREINDUSTRIAL_PPM: f64 = 280.0;

/// Current atmospheric CO₂ concentration (ppm). Update periodically
/// from the NOAA Mauna Loa record.
const CO2_CURRENT_PPM: f64 = 422.0;

/// Total mass of CO₂ currently in the atmosphere (kg).
const ATMOSPHERIC_CO2_KG: f64 = 3.16e15;

/// Marginal forcing contribution of `emissions_kg` of CO₂ (W/m²).
pub fn marginal_forcing(emissions_kg: f64) -> f64 {
    let ppm_per_kg = CO2_CURRENT_PPM / ATMOSPHERIC_CO2_KG;
    let c_new = CO2_CURRENT_PPM + emissions_kg * ppm_per_kg;
    ALPHA_FORCING * (c_new / CO2_PREINDUSTRIAL_PPM).ln()
        - ALPHA_FORCING * (CO2_CURRENT_PPM / CO2_PREINDUSTRIAL_PPM).ln()
}
