//! Independent-error propagation.
//!
//! The cooling model, the grid-intensity reading, and the embodied
//! estimate are modeled as independent error sources, so they combine
//! in quadrature with no covariance terms.

/// √(a² + b²). Inputs are clamped non-negative first; a σ can never be
/// negative.
pub fn combine_quadrature(a: f64, b: f64) -> f64 {
    let a = a.max(0.0);
    let b = b.max(0.0);
    (a * a + b * b).sqrt()
}

/// One-sigma uncertainty on the operational emissions term.
///
/// Relative PUE and intensity errors combine in quadrature and scale
/// by the operational emissions themselves:
///
/// ```text
/// σ_op = (E_facility / 1000) × I × √((σ_pue/pue)² + (σ_I/I)²)
/// ```
///
/// Degenerate denominators (pue or intensity ≤ 0 never escape the
/// upstream clamps, but a zero intensity can be supplied directly)
/// contribute zero relative error rather than a NaN.
pub fn operational_sigma(
    facility_energy_kwh: f64,
    pue: f64,
    pue_sigma: f64,
    intensity_g_kwh: f64,
    intensity_sigma: f64,
) -> f64 {
    let rel_pue = if pue > 0.0 { pue_sigma / pue } else { 0.0 };
    let rel_intensity = if intensity_g_kwh > 0.0 {
        intensity_sigma / intensity_g_kwh
    } else {
        0.0
    };
    let rel = combine_quadrature(rel_pue, rel_intensity);
    (facility_energy_kwh / 1000.0 * intensity_g_kwh * rel).max(0.0)
}
