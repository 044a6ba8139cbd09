//! # Calculation Settings
//!
//! Tunable defaults for the calculation pipeline, loadable from a TOML file.
//! Every key is optional; anything left out keeps its default.
//!
//! ```toml
//! yarn_buffer_percentage = 15.0
//! adjust_to_full_repeats = false
//!
//! [warning_ranges]
//! max_stitch_repeat = 64
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PatternError, PatternResult};

/// Extra yarn added on top of the computed length, in percent
pub const DEFAULT_BUFFER_PERCENTAGE: f64 = 10.0;

/// Soft boundaries. Values outside them produce warnings, never errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningRanges {
    /// Stitches per 10 cm
    pub gauge_stitches: (f64, f64),
    /// Rows per 10 cm
    pub gauge_rows: (f64, f64),
    pub max_stitch_repeat: u32,
    pub max_row_repeat: u32,
    /// Chest circumference, cm
    pub chest_circumference_cm: (f64, f64),
    /// Any other measurement or component dimension, cm
    pub measurement_cm: (f64, f64),
    /// Shawl wingspan, cm
    pub shawl_wingspan_cm: (f64, f64),
    /// Shawl depth, cm
    pub shawl_depth_cm: (f64, f64),
}

impl Default for WarningRanges {
    fn default() -> Self {
        WarningRanges {
            gauge_stitches: (5.0, 100.0),
            gauge_rows: (5.0, 150.0),
            max_stitch_repeat: 50,
            max_row_repeat: 100,
            chest_circumference_cm: (50.0, 200.0),
            measurement_cm: (1.0, 300.0),
            shawl_wingspan_cm: (60.0, 300.0),
            shawl_depth_cm: (20.0, 150.0),
        }
    }
}

/// Settings shared by every calculation in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationSettings {
    /// Yarn estimate safety margin, percent
    pub yarn_buffer_percentage: f64,

    /// Adopt the repeat integrator's suggested stitch count for patterned components
    pub adjust_to_full_repeats: bool,

    /// Edge stitches each side when a silhouette does not specify its own
    pub default_edge_stitches: u32,

    /// Pattern stitches cast on at the centre of a top-down shawl
    pub shawl_center_cast_on: u32,

    /// Pattern stitches at a shawl's point or wing tip
    pub shawl_tip_stitches: u32,

    pub warning_ranges: WarningRanges,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        CalculationSettings {
            yarn_buffer_percentage: DEFAULT_BUFFER_PERCENTAGE,
            adjust_to_full_repeats: true,
            default_edge_stitches: 2,
            shawl_center_cast_on: 3,
            shawl_tip_stitches: 1,
            warning_ranges: WarningRanges::default(),
        }
    }
}

impl CalculationSettings {
    /// Parse settings from TOML text and validate them
    pub fn from_toml_str(text: &str) -> PatternResult<Self> {
        let settings: CalculationSettings =
            toml::from_str(text).map_err(|e| PatternError::SerializationError {
                reason: format!("Invalid settings TOML: {}", e),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would make calculations meaningless.
    pub fn validate(&self) -> PatternResult<()> {
        if !(0.0..=100.0).contains(&self.yarn_buffer_percentage) {
            return Err(PatternError::invalid_input(
                "yarn_buffer_percentage",
                self.yarn_buffer_percentage.to_string(),
                "Buffer must be between 0 and 100 percent",
            ));
        }
        if self.shawl_center_cast_on == 0 {
            return Err(PatternError::invalid_input(
                "shawl_center_cast_on",
                "0",
                "A top-down shawl needs at least one cast-on stitch",
            ));
        }
        if self.shawl_tip_stitches == 0 {
            return Err(PatternError::invalid_input(
                "shawl_tip_stitches",
                "0",
                "A shawl point needs at least one stitch",
            ));
        }

        let ranges = &self.warning_ranges;
        let ordered = [
            ("warning_ranges.gauge_stitches", ranges.gauge_stitches),
            ("warning_ranges.gauge_rows", ranges.gauge_rows),
            ("warning_ranges.chest_circumference_cm", ranges.chest_circumference_cm),
            ("warning_ranges.measurement_cm", ranges.measurement_cm),
            ("warning_ranges.shawl_wingspan_cm", ranges.shawl_wingspan_cm),
            ("warning_ranges.shawl_depth_cm", ranges.shawl_depth_cm),
        ];
        for (field, (min, max)) in ordered {
            if min > max {
                return Err(PatternError::invalid_input(
                    field,
                    format!("[{}, {}]", min, max),
                    "Range minimum exceeds maximum",
                ));
            }
        }
        Ok(())
    }
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> PatternResult<CalculationSettings> {
    let text = fs::read_to_string(path)
        .map_err(|e| PatternError::file_error("read", path.display().to_string(), e.to_string()))?;
    let settings = CalculationSettings::from_toml_str(&text)?;
    tracing::debug!(path = %path.display(), "loaded calculation settings");
    Ok(settings)
}
