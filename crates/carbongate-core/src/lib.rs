//! carbongate-core — shared domain types and reference data.
//!
//! Everything downstream crates agree on lives here: the value objects
//! produced by an evaluation ([`EmissionsEstimate`], [`GateDecision`],
//! [`GateReport`]), the immutable reference profiles for accelerators
//! and grid regions ([`ProfileCatalog`]), and the TOML-backed
//! [`GateConfig`] / [`JobSpec`] pair the CLI feeds into the estimator.
//!
//! Reference data is injected, never global: components take a
//! `&ProfileCatalog` so tests can supply synthetic profiles.

pub mod config;
pub mod error;
pub mod profiles;
pub mod types;

pub use config::{GateConfig, JobSpec, LifecycleParams};
pub use error::{ConfigError, ConfigResult};
pub use profiles::{AcceleratorProfile, ProfileCatalog, RegionProfile};
pub use types::*;
