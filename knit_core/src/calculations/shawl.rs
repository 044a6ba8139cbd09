//! # Triangular Shawl Calculation
//!
//! Derives cast-on, row count and shaping schedule for a triangular shawl
//! from its wingspan, depth, construction method and work style.
//!
//! ## Construction Methods
//!
//! | Method                | Rows span | Start            | Shaping                        |
//! |-----------------------|-----------|------------------|--------------------------------|
//! | `top_down_center_out` | depth     | centre cast-on   | +4 per shaping row (edges, spine) |
//! | `side_to_side`        | wingspan  | one wing tip     | +1 to the depth-derived peak, then -1 |
//! | `bottom_up`           | depth     | full wingspan    | -2 per shaping row (one each edge) |
//!
//! Border stitches are added to every row and never take part in shaping.
//! Worked in the round, only every other round carries shaping, halving the
//! rows available to the schedule.
//!
//! ## Example
//!
//! ```rust
//! use knit_core::calculations::shawl::calculate_shawl;
//! use knit_core::model::{ConstructionMethod, GaugeData, TriangularShawlAttributes, WorkStyle};
//! use knit_core::settings::CalculationSettings;
//!
//! let attrs = TriangularShawlAttributes {
//!     target_wingspan_cm: 160.0,
//!     target_depth_cm: 70.0,
//!     construction_method: ConstructionMethod::BottomUp,
//!     work_style: WorkStyle::Flat,
//!     border_stitches_each_side: 3,
//! };
//! let shawl = calculate_shawl(&attrs, &GaugeData::new(20.0, 30.0), &CalculationSettings::default()).unwrap();
//! assert_eq!(shawl.cast_on_stitches, 326);
//! assert_eq!(shawl.final_stitch_count, 7);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::conversion::{rows_for, rows_to_length_cm, stitches_for, stitches_to_length_cm, with_edges};
use crate::calculations::shaping::{plan_shaping, ShapingKind, ShapingRequest, ShapingStep};
use crate::errors::{PatternError, PatternResult};
use crate::model::garment::{ConstructionMethod, TriangularShawlAttributes, WorkStyle};
use crate::model::gauge::GaugeData;
use crate::settings::CalculationSettings;
use crate::units::Centimeters;

/// Stitches added per shaping row, top-down (2 at the edges, 2 at the spine)
const TOP_DOWN_INCREASES_PER_ROW: u32 = 4;
/// Stitches removed per shaping row, bottom-up (one at each edge)
const BOTTOM_UP_DECREASES_PER_ROW: u32 = 2;
/// Stitches changed per shaping row when worked side to side
const SIDE_TO_SIDE_SHAPING_PER_ROW: u32 = 1;

/// Triangle area thresholds (cm²) for the complexity estimate
const LOW_COMPLEXITY_MAX_AREA_CM2: f64 = 3000.0;
const MEDIUM_COMPLEXITY_MAX_AREA_CM2: f64 = 8000.0;

/// How long the written instructions are likely to be. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShawlComplexity {
    Low,
    Medium,
    High,
}

impl ShawlComplexity {
    fn bumped(self) -> Self {
        match self {
            ShawlComplexity::Low => ShawlComplexity::Medium,
            ShawlComplexity::Medium | ShawlComplexity::High => ShawlComplexity::High,
        }
    }
}

/// Estimate instruction complexity from triangle area and construction.
pub fn estimate_complexity(wingspan_cm: f64, depth_cm: f64, method: ConstructionMethod) -> ShawlComplexity {
    let area = wingspan_cm * depth_cm / 2.0;
    let base = if area < LOW_COMPLEXITY_MAX_AREA_CM2 {
        ShawlComplexity::Low
    } else if area < MEDIUM_COMPLEXITY_MAX_AREA_CM2 {
        ShawlComplexity::Medium
    } else {
        ShawlComplexity::High
    };
    match method {
        // Mirrored increase/decrease halves double the instruction text
        ConstructionMethod::SideToSide => base.bumped(),
        ConstructionMethod::TopDownCenterOut | ConstructionMethod::BottomUp => base,
    }
}

/// Calculated shawl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShawlCalculation {
    pub cast_on_stitches: u32,
    pub total_rows: u32,
    pub final_stitch_count: u32,
    /// Widest row, borders included
    pub peak_stitch_count: u32,
    /// Rows that may carry shaping after the work-style adjustment
    pub effective_shaping_rows: u32,
    pub shaping: Vec<ShapingStep>,
    pub construction_notes: Vec<String>,
    pub complexity: ShawlComplexity,
    pub width_cm: f64,
    pub length_cm: f64,
}

/// Rows available for shaping and the spacing between them
fn shaping_rows(total_rows: u32, style: WorkStyle) -> (u32, u32) {
    match style {
        WorkStyle::Flat => (total_rows, 1),
        WorkStyle::InTheRound => (total_rows.div_ceil(2), 2),
    }
}

/// Calculate a triangular shawl.
///
/// # Errors
///
/// `InvalidInput` for non-positive dimensions or an unusable gauge;
/// `CalculationFailed` when the shawl is too small to hold a single row.
pub fn calculate_shawl(
    attrs: &TriangularShawlAttributes,
    gauge: &GaugeData,
    settings: &CalculationSettings,
) -> PatternResult<ShawlCalculation> {
    gauge.ensure_usable()?;
    if !(attrs.target_wingspan_cm.is_finite() && attrs.target_wingspan_cm > 0.0) {
        return Err(PatternError::invalid_input(
            "target_wingspan_cm",
            attrs.target_wingspan_cm.to_string(),
            "Wingspan must be positive",
        ));
    }
    if !(attrs.target_depth_cm.is_finite() && attrs.target_depth_cm > 0.0) {
        return Err(PatternError::invalid_input(
            "target_depth_cm",
            attrs.target_depth_cm.to_string(),
            "Depth must be positive",
        ));
    }

    let wingspan = Centimeters(attrs.target_wingspan_cm);
    let depth = Centimeters(attrs.target_depth_cm);
    let border = attrs.border_stitches_each_side;
    let bordered = |pattern: u32| {
        with_edges(pattern, border).ok_or_else(|| {
            PatternError::invalid_input(
                "border_stitches_each_side",
                border.to_string(),
                "Border stitches exceed the largest supported stitch count",
            )
        })
    };
    let borders = bordered(0)?;
    let style = attrs.work_style;
    let row_word = style.row_word();
    let tip = settings.shawl_tip_stitches;

    let mut notes = Vec::new();
    let mut shaping = Vec::new();
    let mut compressed = false;

    let (cast_on, total_rows, final_count, peak, effective) = match attrs.construction_method {
        ConstructionMethod::TopDownCenterOut => {
            let center = settings.shawl_center_cast_on;
            let cast_on = bordered(center)?;
            let total_rows = rows_for(depth, gauge);
            let target = stitches_for(wingspan, gauge).max(center);
            let (eligible, stride) = shaping_rows(total_rows, style);
            let plan = plan_shaping(&ShapingRequest {
                kind: ShapingKind::Increase,
                starting_count: cast_on,
                total_change: target - center,
                stitches_per_row: TOP_DOWN_INCREASES_PER_ROW,
                eligible_rows: eligible,
                row_stride: stride,
                row_offset: 0,
                row_word,
                placement: "(one inside each border, one each side of the centre spine)",
            })?;
            compressed |= plan.compressed;
            shaping.extend(plan.steps);
            notes.push(format!(
                "Cast on {} stitches at the centre of the top edge ({} border stitches each side)",
                cast_on,
                attrs.border_stitches_each_side
            ));
            let last = plan.final_stitch_count;
            (cast_on, total_rows, last, last, eligible)
        }
        ConstructionMethod::SideToSide => {
            let total_rows = rows_for(wingspan, gauge);
            let half_rows = total_rows / 2;
            let peak_pattern = stitches_for(depth, gauge).max(tip);
            let (eligible, stride) = shaping_rows(half_rows, style);
            let change = peak_pattern - tip;
            let cast_on = bordered(tip)?;

            let growing = plan_shaping(&ShapingRequest {
                kind: ShapingKind::Increase,
                starting_count: cast_on,
                total_change: change,
                stitches_per_row: SIDE_TO_SIDE_SHAPING_PER_ROW,
                eligible_rows: eligible,
                row_stride: stride,
                row_offset: 0,
                row_word,
                placement: "at the lower edge",
            })?;
            let shrinking = plan_shaping(&ShapingRequest {
                kind: ShapingKind::Decrease,
                starting_count: growing.final_stitch_count,
                total_change: change,
                stitches_per_row: SIDE_TO_SIDE_SHAPING_PER_ROW,
                eligible_rows: eligible,
                row_stride: stride,
                row_offset: half_rows,
                row_word,
                placement: "at the lower edge",
            })?;
            compressed |= growing.compressed || shrinking.compressed;
            let peak = growing.final_stitch_count;
            shaping.extend(growing.steps);
            shaping.extend(shrinking.steps);
            notes.push(format!(
                "Worked from wing tip to wing tip; the widest {} ({} stitches) is the centre depth",
                row_word, peak
            ));
            if total_rows % 2 == 1 {
                notes.push(format!("Work the final {} even", row_word));
            }
            (cast_on, total_rows, shrinking.final_stitch_count, peak, eligible)
        }
        ConstructionMethod::BottomUp => {
            let total_rows = rows_for(depth, gauge);
            let start_pattern = stitches_for(wingspan, gauge).max(tip);
            let start = bordered(start_pattern)?;
            let (eligible, stride) = shaping_rows(total_rows, style);
            let plan = plan_shaping(&ShapingRequest {
                kind: ShapingKind::Decrease,
                starting_count: start,
                total_change: start_pattern - tip,
                stitches_per_row: BOTTOM_UP_DECREASES_PER_ROW,
                eligible_rows: eligible,
                row_stride: stride,
                row_offset: 0,
                row_word,
                placement: "(one inside each border)",
            })?;
            compressed |= plan.compressed;
            shaping.extend(plan.steps);
            notes.push(format!(
                "Cast on the full wingspan: {} stitches including {} border stitches each side",
                start,
                attrs.border_stitches_each_side
            ));
            (start, total_rows, plan.final_stitch_count, start, eligible)
        }
    };

    if total_rows == 0 {
        return Err(PatternError::calculation_failed(
            "triangular_shawl",
            "shawl is smaller than a single row at this gauge",
        ));
    }

    if compressed {
        notes.push(format!(
            "Not enough {}s for the requested shaping rate; the finished shawl will be shallower than {:.0} cm",
            row_word, attrs.target_depth_cm
        ));
        tracing::warn!(
            method = attrs.construction_method.as_str(),
            "shawl shaping compressed to fit available rows"
        );
    }
    if style == WorkStyle::InTheRound {
        notes.push("Worked in the round: shaping falls on every other round".to_string());
    }
    if borders > 0 {
        notes.push(format!(
            "Keep {} border stitches at each edge in pattern throughout; they are not shaped",
            attrs.border_stitches_each_side
        ));
    }

    let complexity = estimate_complexity(attrs.target_wingspan_cm, attrs.target_depth_cm, attrs.construction_method);
    if complexity == ShawlComplexity::High {
        notes.push("Large shawl: expect long row-by-row instructions".to_string());
    }

    let (width_cm, length_cm) = match attrs.construction_method {
        ConstructionMethod::SideToSide => (
            rows_to_length_cm(total_rows, gauge).0,
            stitches_to_length_cm(peak.saturating_sub(borders), gauge).0,
        ),
        ConstructionMethod::TopDownCenterOut | ConstructionMethod::BottomUp => (
            stitches_to_length_cm(peak.saturating_sub(borders), gauge).0,
            rows_to_length_cm(total_rows, gauge).0,
        ),
    };

    tracing::debug!(
        method = attrs.construction_method.as_str(),
        style = style.as_str(),
        cast_on,
        total_rows,
        final_count,
        peak,
        "calculated triangular shawl"
    );

    Ok(ShawlCalculation {
        cast_on_stitches: cast_on,
        total_rows,
        final_stitch_count: final_count,
        peak_stitch_count: peak,
        effective_shaping_rows: effective,
        shaping,
        construction_notes: notes,
        complexity,
        width_cm,
        length_cm,
    })
}
