//! # Dimension to Stitch Conversion
//!
//! Converts a physical length into stitch and row counts using gauge:
//!
//! ```text
//! stitches = round(d_cm / 10 * stitches_per_10cm)
//! rows     = round(d_cm / 10 * rows_per_10cm)
//! ```
//!
//! Ties round half up ([`STITCH_ROUNDING`]). Every downstream stitch count
//! goes through [`round_count`], so changing the rule here changes it
//! everywhere.
//!
//! ## Example
//!
//! ```rust
//! use knit_core::calculations::conversion::convert_dimension;
//! use knit_core::model::GaugeData;
//! use knit_core::units::LengthUnit;
//!
//! let counts = convert_dimension(50.0, LengthUnit::Cm, &GaugeData::new(22.0, 30.0)).unwrap();
//! assert_eq!(counts.stitches, 110);
//! assert_eq!(counts.rows, 150);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{PatternError, PatternResult};
use crate::model::gauge::{GaugeData, GAUGE_REFERENCE_CM};
use crate::units::{Centimeters, LengthUnit};

/// Tie-breaking rule for converting fractional counts to whole stitches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingRule {
    /// 2.5 -> 3, 3.5 -> 4
    HalfUp,
    /// 2.5 -> 2, 3.5 -> 4
    HalfEven,
}

/// The rule applied to every stitch and row count
pub const STITCH_ROUNDING: RoundingRule = RoundingRule::HalfUp;

/// Values this close to a .5 tie are treated as the tie
const TIE_TOLERANCE: f64 = 1e-9;

impl RoundingRule {
    pub fn apply(self, value: f64) -> f64 {
        let floor = value.floor();
        let frac = value - floor;
        let is_tie = (frac - 0.5).abs() < TIE_TOLERANCE;
        match self {
            RoundingRule::HalfUp => {
                if is_tie {
                    floor + 1.0
                } else {
                    value.round()
                }
            }
            RoundingRule::HalfEven => {
                if is_tie {
                    if floor % 2.0 == 0.0 {
                        floor
                    } else {
                        floor + 1.0
                    }
                } else {
                    value.round()
                }
            }
        }
    }
}

/// Round a fractional count to a whole, non-negative count.
pub fn round_count(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let rounded = STITCH_ROUNDING.apply(value);
    if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Stitch and row counts for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StitchRowCount {
    pub stitches: u32,
    pub rows: u32,
}

/// Stitches spanning `length` at this gauge
pub fn stitches_for(length: Centimeters, gauge: &GaugeData) -> u32 {
    round_count(length.0 / GAUGE_REFERENCE_CM * gauge.stitches_per_10cm)
}

/// Rows spanning `length` at this gauge
pub fn rows_for(length: Centimeters, gauge: &GaugeData) -> u32 {
    round_count(length.0 / GAUGE_REFERENCE_CM * gauge.rows_per_10cm)
}

/// `body` stitches plus `edge` plain stitches on each side, or `None` when the
/// total does not fit a stitch count
pub fn with_edges(body: u32, edge: u32) -> Option<u32> {
    edge.checked_mul(2).and_then(|both| body.checked_add(both))
}

/// Convert a dimension in `unit` to stitch and row counts.
///
/// # Errors
///
/// `InvalidInput` when the dimension is negative or not finite, or the gauge
/// is unusable.
pub fn convert_dimension(dimension: f64, unit: LengthUnit, gauge: &GaugeData) -> PatternResult<StitchRowCount> {
    gauge.ensure_usable()?;
    if !dimension.is_finite() || dimension < 0.0 {
        return Err(PatternError::invalid_input(
            "dimension",
            dimension.to_string(),
            "Dimension must be a non-negative length",
        ));
    }
    let length = Centimeters::from_unit(dimension, unit);
    let counts = StitchRowCount {
        stitches: stitches_for(length, gauge),
        rows: rows_for(length, gauge),
    };
    tracing::trace!(dimension, %unit, stitches = counts.stitches, rows = counts.rows, "converted dimension");
    Ok(counts)
}

/// Actual width of a stitch count at this gauge
pub fn stitches_to_length_cm(stitches: u32, gauge: &GaugeData) -> Centimeters {
    Centimeters(stitches as f64 / gauge.stitches_per_10cm * GAUGE_REFERENCE_CM)
}

/// Actual length of a row count at this gauge
pub fn rows_to_length_cm(rows: u32, gauge: &GaugeData) -> Centimeters {
    Centimeters(rows as f64 / gauge.rows_per_10cm * GAUGE_REFERENCE_CM)
}
