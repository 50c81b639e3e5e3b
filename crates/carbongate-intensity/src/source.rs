//! The data-source contract and its explicit outcome type.

use carbongate_core::{IntensitySourceTag, RegionProfile};

/// One grid-intensity reading, whatever path produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityReading {
    pub intensity_g_kwh: f64,
    pub sigma_g_kwh: f64,
    /// Share of current generation that is carbon-free; only the live
    /// feed knows this.
    pub percent_clean: Option<f64>,
    pub tag: IntensitySourceTag,
}

/// Why the live path was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No API token configured.
    MissingCredentials,
    /// No live endpoint configured.
    MissingEndpoint,
    /// The region has no balancing-authority mapping.
    NoBalancingAuthority,
    /// The live source was disabled (offline mode).
    Disabled,
    /// Network failure, timeout, bad status, or bad payload.
    Unavailable(String),
}

/// Result of a lookup: live data, or the static estimate with the
/// reason the live path was skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Live(IntensityReading),
    Fallback {
        reading: IntensityReading,
        reason: FallbackReason,
    },
}

impl SourceOutcome {
    pub fn reading(&self) -> &IntensityReading {
        match self {
            SourceOutcome::Live(reading) => reading,
            SourceOutcome::Fallback { reading, .. } => reading,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, SourceOutcome::Live(_))
    }
}

/// A region-keyed grid intensity source.
///
/// `lookup` must resolve within the implementation's configured
/// deadline and never error — unavailability is a [`SourceOutcome`],
/// not an `Err`. `forecast` returns an hourly series for the bounded
/// horizon, or an empty series on any failure, so the caller can decide
/// to run the harmonic model instead.
pub trait IntensitySource {
    fn lookup(&self, region: &RegionProfile) -> impl Future<Output = SourceOutcome> + Send;

    fn forecast(
        &self,
        region: &RegionProfile,
        hours_ahead: u32,
    ) -> impl Future<Output = Vec<f64>> + Send;
}

/// Source for offline mode and tests: always the static estimate,
/// never any I/O.
#[derive(Debug, Clone, Default)]
pub struct StaticSource;

impl IntensitySource for StaticSource {
    async fn lookup(&self, region: &RegionProfile) -> SourceOutcome {
        SourceOutcome::Fallback {
            reading: crate::fallback::static_reading(region),
            reason: FallbackReason::Disabled,
        }
    }

    async fn forecast(&self, _region: &RegionProfile, _hours_ahead: u32) -> Vec<f64> {
        Vec::new()
    }
}
