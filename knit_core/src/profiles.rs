//! # Profile Resolution
//!
//! Stored gauge and yarn profiles live in the application's database, which
//! this crate never touches. [`ProfileSource`] is the seam: the host hands in
//! whatever lookup it has, and the calculation code resolves references
//! through it.
//!
//! ## Example
//!
//! ```rust
//! use knit_core::model::{GaugeData, GaugeProfile};
//! use knit_core::profiles::{InMemoryProfiles, ProfileSource};
//!
//! let profiles = InMemoryProfiles::new().with_gauge(GaugeProfile {
//!     id: "g-1".to_string(),
//!     name: "Worsted stockinette".to_string(),
//!     gauge: GaugeData::new(18.0, 24.0),
//! });
//! assert!(profiles.gauge_profile("g-1").is_some());
//! ```

use std::collections::HashMap;

use crate::errors::{PatternError, PatternResult};
use crate::model::gauge::{GaugeData, GaugeProfile, GaugeSwatch};
use crate::model::yarn::{YarnInfo, YarnProfile};

/// Lookup for stored profiles.
pub trait ProfileSource {
    fn gauge_profile(&self, id: &str) -> Option<GaugeProfile>;
    fn yarn_profile(&self, id: &str) -> Option<YarnProfile>;
}

/// A source with nothing in it; every reference fails to resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProfiles;

impl ProfileSource for NoProfiles {
    fn gauge_profile(&self, _id: &str) -> Option<GaugeProfile> {
        None
    }

    fn yarn_profile(&self, _id: &str) -> Option<YarnProfile> {
        None
    }
}

/// Profiles held in memory, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfiles {
    gauges: HashMap<String, GaugeProfile>,
    yarns: HashMap<String, YarnProfile>,
}

impl InMemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gauge(mut self, profile: GaugeProfile) -> Self {
        self.gauges.insert(profile.id.clone(), profile);
        self
    }

    pub fn with_yarn(mut self, profile: YarnProfile) -> Self {
        self.yarns.insert(profile.id.clone(), profile);
        self
    }
}

impl ProfileSource for InMemoryProfiles {
    fn gauge_profile(&self, id: &str) -> Option<GaugeProfile> {
        self.gauges.get(id).cloned()
    }

    fn yarn_profile(&self, id: &str) -> Option<YarnProfile> {
        self.yarns.get(id).cloned()
    }
}

/// Pick a gauge: inline values first, then a swatch, then a stored profile.
pub fn resolve_gauge(
    inline: Option<&GaugeData>,
    swatch: Option<&GaugeSwatch>,
    profile_id: Option<&str>,
    source: &dyn ProfileSource,
) -> PatternResult<GaugeData> {
    if let Some(gauge) = inline {
        return Ok(*gauge);
    }
    if let Some(swatch) = swatch {
        return swatch.to_gauge_data();
    }
    match profile_id {
        Some(id) => source
            .gauge_profile(id)
            .map(|p| p.gauge)
            .ok_or_else(|| PatternError::resolution_failed("gauge", format!("gauge profile '{}' not found", id))),
        None => Err(PatternError::resolution_failed(
            "gauge",
            "no inline gauge or gauge profile reference supplied",
        )),
    }
}

/// Pick yarn: inline info first, then a stored profile.
pub fn resolve_yarn(
    inline: Option<&YarnInfo>,
    profile_id: Option<&str>,
    source: &dyn ProfileSource,
) -> PatternResult<YarnInfo> {
    if let Some(yarn) = inline {
        return Ok(yarn.clone());
    }
    match profile_id {
        Some(id) => source
            .yarn_profile(id)
            .map(|p| p.yarn)
            .ok_or_else(|| PatternError::resolution_failed("yarn", format!("yarn profile '{}' not found", id))),
        None => Err(PatternError::resolution_failed(
            "yarn",
            "no inline yarn information or yarn profile reference supplied",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::yarn::YarnWeightCategory;
    use crate::units::LengthUnit;

    fn profiles() -> InMemoryProfiles {
        InMemoryProfiles::new()
            .with_gauge(GaugeProfile {
                id: "g-1".to_string(),
                name: "DK".to_string(),
                gauge: GaugeData::new(22.0, 30.0),
            })
            .with_yarn(YarnProfile {
                id: "y-1".to_string(),
                name: "House DK".to_string(),
                yarn: YarnInfo::new(YarnWeightCategory::Light),
            })
    }

    #[test]
    fn test_inline_gauge_wins() {
        let inline = GaugeData::new(18.0, 24.0);
        let gauge = resolve_gauge(Some(&inline), None, Some("g-1"), &profiles()).unwrap();
        assert_eq!(gauge.stitches_per_10cm, 18.0);
    }

    #[test]
    fn test_swatch_before_profile() {
        let swatch = GaugeSwatch {
            stitches: 10.0,
            rows: 12.0,
            width: 5.0,
            height: 5.0,
            unit: LengthUnit::Cm,
        };
        let gauge = resolve_gauge(None, Some(&swatch), Some("g-1"), &profiles()).unwrap();
        assert!((gauge.stitches_per_10cm - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_profile_lookup() {
        let gauge = resolve_gauge(None, None, Some("g-1"), &profiles()).unwrap();
        assert_eq!(gauge.rows_per_10cm, 30.0);
        let yarn = resolve_yarn(None, Some("y-1"), &profiles()).unwrap();
        assert_eq!(yarn.weight_category, YarnWeightCategory::Light);
    }

    #[test]
    fn test_unresolvable_references() {
        let err = resolve_gauge(None, None, None, &NoProfiles).unwrap_err();
        assert_eq!(err.error_code(), "RESOLUTION_FAILED");
        let err = resolve_yarn(None, Some("missing"), &profiles()).unwrap_err();
        assert!(err.to_string().contains("'missing' not found"));
    }
}
