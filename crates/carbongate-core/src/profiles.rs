//! Reference profiles for accelerators and grid regions.
//!
//! Pure data: nameplate and thermal specs per accelerator, intensity
//! baselines per region. The catalog is passed explicitly into every
//! component that needs it — there is no global table — so unit tests
//! can run against synthetic profiles.
//!
//! Embodied-carbon figures come from lifecycle assessment literature
//! (Gupta et al. 2022, Patterson et al. 2021) and carry the ±30%
//! uncertainty applied by the embodied model. Regional baselines are
//! approximate p5 observed intensity; ranges are p95 − p5.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Static per-accelerator specification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AcceleratorProfile {
    pub id: String,
    /// Nameplate sustained power draw (W).
    pub tdp_w: f64,
    /// Junction temperature at which throttling starts (°C).
    pub throttle_threshold_c: f64,
    /// Width of the linear throttle band (°C).
    pub throttle_band_c: f64,
    /// Maximum fraction of nameplate shed at full throttle.
    pub max_throttle_fraction: f64,
    /// Steady-state thermal resistance of the cooling solution (K/W).
    pub thermal_resistance_k_w: f64,
    /// Manufacturing footprint (kg CO₂e).
    pub embodied_kg: f64,
    /// Expected operational lifetime (hours).
    pub lifetime_hours: f64,
    /// Expected utilization over that lifetime, 0..=1.
    pub utilization: f64,
}

/// Static per-region grid profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionProfile {
    pub id: String,
    /// Approximate p5 observed intensity (g CO₂/kWh).
    pub baseline_g_kwh: f64,
    /// Observed p95 − p5 swing (g CO₂/kWh).
    pub range_g_kwh: f64,
    /// Balancing-authority slug for the live data source, when mapped.
    pub balancing_authority: Option<String>,
}

/// Injected lookup table for reference data.
///
/// Unknown identifiers fall back to the catalog's default profiles
/// rather than failing — partial input never aborts an evaluation.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    accelerators: HashMap<String, AcceleratorProfile>,
    regions: HashMap<String, RegionProfile>,
    default_accelerator: AcceleratorProfile,
    default_region: RegionProfile,
}

impl ProfileCatalog {
    /// Build a catalog from explicit tables and defaults.
    pub fn new(
        accelerators: Vec<AcceleratorProfile>,
        regions: Vec<RegionProfile>,
        default_accelerator: AcceleratorProfile,
        default_region: RegionProfile,
    ) -> Self {
        Self {
            accelerators: accelerators
                .into_iter()
                .map(|a| (a.id.clone(), a))
                .collect(),
            regions: regions.into_iter().map(|r| (r.id.clone(), r)).collect(),
            default_accelerator,
            default_region,
        }
    }

    /// The built-in catalog of manufacturer specs and cloud regions.
    pub fn builtin() -> Self {
        let accelerators = vec![
            accel("H100", 700.0, 83.0, 0.20, 0.08, 150.0),
            accel("A100", 400.0, 85.0, 0.18, 0.09, 100.0),
            accel("V100", 300.0, 88.0, 0.15, 0.10, 75.0),
            accel("A10", 150.0, 90.0, 0.12, 0.12, 50.0),
            accel("A10G", 150.0, 90.0, 0.12, 0.12, 50.0),
            accel("T4", 70.0, 88.0, 0.10, 0.15, 30.0),
            accel("L40", 300.0, 85.0, 0.18, 0.09, 90.0),
            accel("L40S", 350.0, 85.0, 0.18, 0.09, 100.0),
        ];
        let regions = vec![
            region("us-east-1", 150.0, 350.0, Some("PJM_ROANOKE")),
            region("us-east-2", 130.0, 320.0, Some("PJM_OHIO")),
            region("us-west-1", 80.0, 180.0, Some("CAISO_NORTH")),
            region("us-west-2", 50.0, 100.0, Some("NW_PACIF")),
            region("eu-west-1", 80.0, 250.0, Some("IE")),
            region("eu-west-2", 100.0, 220.0, Some("GB")),
            region("eu-central-1", 150.0, 250.0, Some("DE")),
            region("eu-north-1", 10.0, 40.0, Some("SE")),
            region("ap-southeast-1", 350.0, 150.0, Some("SG")),
            region("ap-northeast-1", 300.0, 200.0, Some("JP_TK")),
        ];

        let default_accelerator = accelerators[1].clone(); // A100
        let default_region = RegionProfile {
            id: "unknown".to_string(),
            baseline_g_kwh: 200.0,
            range_g_kwh: 250.0,
            balancing_authority: None,
        };

        Self::new(accelerators, regions, default_accelerator, default_region)
    }

    /// Look up an accelerator, falling back to the default profile.
    pub fn accelerator(&self, id: &str) -> &AcceleratorProfile {
        match self.accelerators.get(id) {
            Some(profile) => profile,
            None => {
                debug!(
                    accelerator = id,
                    fallback = %self.default_accelerator.id,
                    "unknown accelerator, using default profile"
                );
                &self.default_accelerator
            }
        }
    }

    /// Look up a region, falling back to the unknown-region default.
    pub fn region(&self, id: &str) -> &RegionProfile {
        match self.regions.get(id) {
            Some(profile) => profile,
            None => {
                debug!(region = id, "unknown region, using default profile");
                &self.default_region
            }
        }
    }

}

fn accel(
    id: &str,
    tdp_w: f64,
    threshold_c: f64,
    alpha: f64,
    r_thermal: f64,
    embodied_kg: f64,
) -> AcceleratorProfile {
    AcceleratorProfile {
        id: id.to_string(),
        tdp_w,
        throttle_threshold_c: threshold_c,
        throttle_band_c: 10.0,
        max_throttle_fraction: alpha,
        thermal_resistance_k_w: r_thermal,
        embodied_kg,
        lifetime_hours: 35_000.0,
        utilization: 0.70,
    }
}

fn region(id: &str, baseline: f64, range: f64, ba: Option<&str>) -> RegionProfile {
    RegionProfile {
        id: id.to_string(),
        baseline_g_kwh: baseline,
        range_g_kwh: range,
        balancing_authority: ba.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_known_accelerator() {
        let catalog = ProfileCatalog::builtin();
        let h100 = catalog.accelerator("H100");
        assert_eq!(h100.tdp_w, 700.0);
        assert_eq!(h100.throttle_threshold_c, 83.0);
    }

    #[test]
    fn unknown_accelerator_falls_back_to_default() {
        let catalog = ProfileCatalog::builtin();
        let profile = catalog.accelerator("B300-ultra");
        assert_eq!(profile.id, "A100");
        assert_eq!(profile.tdp_w, 400.0);
    }

    #[test]
    fn unknown_region_falls_back_to_default() {
        let catalog = ProfileCatalog::builtin();
        let profile = catalog.region("mars-north-1");
        assert_eq!(profile.id, "unknown");
        assert_eq!(profile.baseline_g_kwh, 200.0);
        assert_eq!(profile.range_g_kwh, 250.0);
        assert!(profile.balancing_authority.is_none());
    }

    #[test]
    fn known_region_has_balancing_authority() {
        let catalog = ProfileCatalog::builtin();
        let region = catalog.region("us-east-1");
        assert_eq!(region.balancing_authority.as_deref(), Some("PJM_ROANOKE"));
    }

    #[test]
    fn synthetic_catalog_uses_supplied_defaults() {
        let default_acc = AcceleratorProfile {
            id: "test-accel".to_string(),
            tdp_w: 100.0,
            throttle_threshold_c: 80.0,
            throttle_band_c: 10.0,
            max_throttle_fraction: 0.1,
            thermal_resistance_k_w: 0.1,
            embodied_kg: 10.0,
            lifetime_hours: 10_000.0,
            utilization: 0.5,
        };
        let default_region = RegionProfile {
            id: "test-region".to_string(),
            baseline_g_kwh: 100.0,
            range_g_kwh: 50.0,
            balancing_authority: None,
        };
        let catalog = ProfileCatalog::new(
            vec![],
            vec![],
            default_acc.clone(),
            default_region,
        );
        assert_eq!(catalog.accelerator("anything").id, "test-accel");
        assert_eq!(catalog.region("anywhere").id, "test-region");
    }
}
