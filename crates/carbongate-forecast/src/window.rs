//! Optimal-window search and confidence scoring.
//!
//! Confidence starts from how well the model fits relative to the
//! spread it forecasts, then gets discounted for the grid's own
//! volatility: a stable hydro/nuclear grid (σ ~ 20 g/kWh) keeps most
//! of its confidence, a volatile fossil-gas grid (σ ~ 100 g/kWh) loses
//! up to 40%. Stated confidence reflects real predictability, not just
//! model fit — we are more comfortable telling you to wait 3 hours on
//! the Swedish grid than on PJM East.

use carbongate_core::{ForecastMeta, ForecastOutcome, ForecastSourceTag, ForecastWindow};
use tracing::debug;

use crate::fit::{fit_harmonics, std_dev};

/// Below this many hourly samples the forecaster refuses to fabricate
/// a forecast and reports insufficient history instead.
pub const MIN_HISTORY_SAMPLES: usize = 48;

/// Historical volatility (g/kWh) at which the discount saturates.
const VOLATILITY_CEILING: f64 = 100.0;

/// Maximum confidence reduction for a fully volatile grid.
const VOLATILITY_WEIGHT: f64 = 0.40;

/// Base confidence when the projected series is flat and the residual
/// ratio is undefined.
const DEGENERATE_CONFIDENCE: f64 = 0.5;

/// Confidence assigned to a live weather-aware forecast feed.
const LIVE_FEED_CONFIDENCE: f64 = 0.90;

/// Find the lowest-carbon window in the next `lookahead_hours`.
///
/// Requires [`MIN_HISTORY_SAMPLES`] points of hourly history; with
/// fewer it returns an explicit insufficient-history outcome with zero
/// wait, confidence, and savings.
pub fn forecast_optimal_window(
    history: &[f64],
    current_intensity: f64,
    lookahead_hours: u32,
    n_daily: usize,
    n_weekly: usize,
) -> ForecastOutcome {
    if history.len() < MIN_HISTORY_SAMPLES {
        debug!(
            samples = history.len(),
            required = MIN_HISTORY_SAMPLES,
            "history too short for harmonic forecast"
        );
        return ForecastOutcome::InsufficientHistory {
            samples: history.len(),
            required: MIN_HISTORY_SAMPLES,
        };
    }

    let fit = fit_harmonics(history, n_daily, n_weekly);

    let n = history.len() as f64;
    let projected: Vec<f64> = (0..lookahead_hours)
        .map(|h| fit.predict(n + h as f64))
        .collect();

    let (min_idx, min_g) = projected
        .iter()
        .copied()
        .enumerate()
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0, current_intensity));
    let max_g = projected.iter().copied().fold(f64::MIN, f64::max);
    let forecast_range = max_g - min_g;

    let savings_pct = if current_intensity > 0.0 {
        ((current_intensity - min_g) / current_intensity * 100.0).max(0.0)
    } else {
        0.0
    };

    // Ranges at fp-noise scale are degenerate, not informative.
    let base_confidence = if forecast_range > 1e-9 {
        (1.0 - fit.residual_std / forecast_range).clamp(0.0, 1.0)
    } else {
        DEGENERATE_CONFIDENCE
    };

    let volatility = std_dev(history);
    let vol_discount = VOLATILITY_WEIGHT * (volatility / VOLATILITY_CEILING).min(1.0);
    let confidence = (base_confidence * (1.0 - vol_discount)).max(0.0);

    debug!(
        wait_hours = min_idx,
        confidence,
        savings_pct,
        r2_total = fit.r2_total,
        volatility,
        "harmonic forecast complete"
    );

    ForecastOutcome::Window(ForecastWindow {
        wait_hours: min_idx as f64,
        confidence,
        savings_pct,
        meta: ForecastMeta {
            source: ForecastSourceTag::Harmonic,
            r2_daily: Some(fit.r2_daily),
            r2_weekly: fit.r2_weekly,
            r2_biweekly: fit.r2_biweekly,
            r2_total: Some(fit.r2_total),
            residual_std: Some(fit.residual_std),
            volatility,
            vol_discount,
            base_confidence,
            confidence_label: confidence_label(confidence).to_string(),
            forecast_range_g: forecast_range,
            min_intensity_g: min_g,
        },
    })
}

/// Build a window directly from a live hourly forecast series.
///
/// The live feed has weather and dispatch-schedule visibility our
/// harmonic fit cannot match, so it gets a fixed high confidence and no
/// fit diagnostics.
pub fn live_feed_window(series: &[f64], current_intensity: f64) -> ForecastWindow {
    let (min_idx, min_g) = series
        .iter()
        .copied()
        .enumerate()
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0, current_intensity));
    let max_g = series.iter().copied().fold(f64::MIN, f64::max);

    let savings_pct = if current_intensity > 0.0 {
        ((current_intensity - min_g) / current_intensity * 100.0).max(0.0)
    } else {
        0.0
    };

    ForecastWindow {
        wait_hours: min_idx as f64,
        confidence: LIVE_FEED_CONFIDENCE,
        savings_pct,
        meta: ForecastMeta {
            source: ForecastSourceTag::LiveFeed,
            r2_daily: None,
            r2_weekly: None,
            r2_biweekly: None,
            r2_total: None,
            residual_std: None,
            volatility: std_dev(series),
            vol_discount: 0.0,
            base_confidence: LIVE_FEED_CONFIDENCE,
            confidence_label: confidence_label(LIVE_FEED_CONFIDENCE).to_string(),
            forecast_range_g: max_g - min_g,
            min_intensity_g: min_g,
        },
    }
}

fn confidence_label(confidence: f64) -> &'static str {
    if confidence >= 0.75 {
        "high"
    } else if confidence >= 0.50 {
        "moderate"
    } else if confidence >= 0.25 {
        "low"
    } else {
        "very low (volatile grid)"
    }
}
