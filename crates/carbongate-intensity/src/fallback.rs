//! Static regional estimate used when the live feed is unreachable.

use carbongate_core::{IntensitySourceTag, RegionProfile};

use crate::source::IntensityReading;

/// Where in the regional swing the static estimate sits. Grids spend
/// more time below the midpoint of their p5–p95 band than above it.
const RANGE_POSITION: f64 = 0.4;

/// σ as a fraction of the regional swing.
const RANGE_SIGMA_FRACTION: f64 = 0.15;

/// Static estimate for a region: baseline plus a fixed position within
/// the observed swing, with σ scaled to that swing.
pub fn static_reading(region: &RegionProfile) -> IntensityReading {
    IntensityReading {
        intensity_g_kwh: region.baseline_g_kwh + region.range_g_kwh * RANGE_POSITION,
        sigma_g_kwh: region.range_g_kwh * RANGE_SIGMA_FRACTION,
        percent_clean: None,
        tag: IntensitySourceTag::StaticFallback,
    }
}
