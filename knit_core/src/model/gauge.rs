//! Gauge definitions.
//!
//! [`GaugeData`] is the normalised form every calculation consumes: stitches
//! and rows per 10 cm. [`GaugeSwatch`] is what a knitter actually measures
//! (a count over some swatch width/height) and normalises into `GaugeData`.

use serde::{Deserialize, Serialize};

use crate::errors::{PatternError, PatternResult};
use crate::units::LengthUnit;

/// Reference length gauge counts are expressed over, in centimetres
pub const GAUGE_REFERENCE_CM: f64 = 10.0;

/// Stitches and rows per 10 cm.
///
/// `unit` records the unit the swatch was measured in and is informational
/// only. The counts are always per 10 cm, and dimensions are resolved in
/// the pattern's own unit.
///
/// ## JSON Example
///
/// ```json
/// { "stitches_per_10cm": 22.0, "rows_per_10cm": 30.0, "unit": "cm" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeData {
    pub stitches_per_10cm: f64,
    pub rows_per_10cm: f64,
    #[serde(default)]
    pub unit: LengthUnit,
}

impl GaugeData {
    pub fn new(stitches_per_10cm: f64, rows_per_10cm: f64) -> Self {
        GaugeData {
            stitches_per_10cm,
            rows_per_10cm,
            unit: LengthUnit::Cm,
        }
    }

    pub fn with_unit(mut self, unit: LengthUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn stitches_per_cm(&self) -> f64 {
        self.stitches_per_10cm / GAUGE_REFERENCE_CM
    }

    pub fn rows_per_cm(&self) -> f64 {
        self.rows_per_10cm / GAUGE_REFERENCE_CM
    }

    /// Reject gauges no calculation can use (non-positive or non-finite counts)
    pub fn ensure_usable(&self) -> PatternResult<()> {
        if !(self.stitches_per_10cm.is_finite() && self.stitches_per_10cm > 0.0) {
            return Err(PatternError::invalid_input(
                "gauge.stitches_per_10cm",
                self.stitches_per_10cm.to_string(),
                "Stitch gauge must be positive",
            ));
        }
        if !(self.rows_per_10cm.is_finite() && self.rows_per_10cm > 0.0) {
            return Err(PatternError::invalid_input(
                "gauge.rows_per_10cm",
                self.rows_per_10cm.to_string(),
                "Row gauge must be positive",
            ));
        }
        Ok(())
    }
}

/// A measured gauge swatch: `stitches` across `width` and `rows` over `height`.
///
/// ## JSON Example
///
/// ```json
/// { "stitches": 20, "rows": 28, "width": 4.0, "height": 4.0, "unit": "inch" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeSwatch {
    pub stitches: f64,
    pub rows: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: LengthUnit,
}

impl GaugeSwatch {
    /// Normalise the swatch to stitches/rows per 10 cm.
    pub fn to_gauge_data(&self) -> PatternResult<GaugeData> {
        if self.width <= 0.0 {
            return Err(PatternError::invalid_input(
                "swatch.width",
                self.width.to_string(),
                "Swatch width must be positive",
            ));
        }
        if self.height <= 0.0 {
            return Err(PatternError::invalid_input(
                "swatch.height",
                self.height.to_string(),
                "Swatch height must be positive",
            ));
        }
        let width_cm = self.unit.to_cm(self.width);
        let height_cm = self.unit.to_cm(self.height);
        let gauge = GaugeData {
            stitches_per_10cm: self.stitches / width_cm * GAUGE_REFERENCE_CM,
            rows_per_10cm: self.rows / height_cm * GAUGE_REFERENCE_CM,
            unit: self.unit,
        };
        gauge.ensure_usable()?;
        Ok(gauge)
    }
}

/// A stored gauge record as handed over by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeProfile {
    pub id: String,
    pub name: String,
    pub gauge: GaugeData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_cm_rates() {
        let gauge = GaugeData::new(22.0, 30.0);
        assert!((gauge.stitches_per_cm() - 2.2).abs() < 1e-12);
        assert!((gauge.rows_per_cm() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_swatch_in_cm() {
        let swatch = GaugeSwatch {
            stitches: 11.0,
            rows: 15.0,
            width: 5.0,
            height: 5.0,
            unit: LengthUnit::Cm,
        };
        let gauge = swatch.to_gauge_data().unwrap();
        assert!((gauge.stitches_per_10cm - 22.0).abs() < 1e-9);
        assert!((gauge.rows_per_10cm - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_swatch_in_inches() {
        // 20 sts x 28 rows over 4 inches (10.16 cm)
        let swatch = GaugeSwatch {
            stitches: 20.0,
            rows: 28.0,
            width: 4.0,
            height: 4.0,
            unit: LengthUnit::Inch,
        };
        let gauge = swatch.to_gauge_data().unwrap();
        assert!((gauge.stitches_per_10cm - 19.685).abs() < 0.001);
        assert_eq!(gauge.unit, LengthUnit::Inch);
    }

    #[test]
    fn test_zero_width_swatch_rejected() {
        let swatch = GaugeSwatch {
            stitches: 20.0,
            rows: 28.0,
            width: 0.0,
            height: 4.0,
            unit: LengthUnit::Cm,
        };
        assert!(swatch.to_gauge_data().is_err());
    }

    #[test]
    fn test_unit_defaults_to_cm() {
        let gauge: GaugeData =
            serde_json::from_str(r#"{"stitches_per_10cm": 18, "rows_per_10cm": 24}"#).unwrap();
        assert_eq!(gauge.unit, LengthUnit::Cm);
        assert!(gauge.ensure_usable().is_ok());
        assert!(GaugeData::new(0.0, 24.0).ensure_usable().is_err());
    }
}
