//! carbongate-intensity — where the grid numbers come from.
//!
//! Marginal operating emissions rate (MOER) is the right signal for
//! scheduling decisions: it measures the generator that responds to
//! *additional* load, not the average of everything already running,
//! and the two can differ by 2–3× during peak fossil dispatch.
//!
//! The live feed is treated as unreliable by contract. Missing
//! credentials, missing endpoint, network failure, timeout, and
//! non-success responses all collapse into the same fallback outcome,
//! carried explicitly in [`SourceOutcome`] so callers and tests can
//! distinguish "live data used" from "defaulted" without string
//! sniffing. There are no retries: one bounded attempt, then the
//! static regional estimate.

pub mod client;
pub mod error;
pub mod fallback;
pub mod measure;
pub mod source;

pub use client::MoerClient;
pub use error::SourceError;
pub use fallback::static_reading;
pub use measure::{MeasurementFeed, calibration_gap};
pub use source::{FallbackReason, IntensityReading, IntensitySource, SourceOutcome, StaticSource};
