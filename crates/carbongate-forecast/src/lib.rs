//! carbongate-forecast — finding the lowest-carbon scheduling window.
//!
//! Grid carbon intensity has strong periodic structure: the 24 h solar
//! and demand cycle, the 168 h Mon–Fri industrial load pattern, and a
//! 336 h fortnightly maintenance rhythm. This crate fits those periods
//! simultaneously by ordinary least squares and projects the fit
//! forward to recommend when a job should run.
//!
//! The weekly and biweekly terms typically explain an extra 10–25% of
//! variance on fossil-heavy grids, where a daily-only model will
//! mis-schedule jobs that span a weekend transition. They activate only
//! once the history is long enough to support them (336 and 672 hourly
//! samples respectively); shorter histories silently drop them.
//!
//! This model is strictly the fallback: when a live, weather-aware
//! forecast feed is available the orchestrator uses it instead (see
//! [`live_feed_window`]).

pub mod design;
pub mod fit;
pub mod window;

pub use fit::{HarmonicFit, fit_harmonics, std_dev};
pub use window::{MIN_HISTORY_SAMPLES, forecast_optimal_window, live_feed_window};
