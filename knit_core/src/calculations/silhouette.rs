//! # Silhouette Component Calculation
//!
//! Turns a generic panel (bottom width, optional top width, length) into a
//! cast-on count, row count and an edge-shaping schedule.
//!
//! ## Steps
//!
//! 1. Resolve each [`Dimension`](crate::model::Dimension) to centimetres
//! 2. `cast_on = stitches(bottom_width) + 2 * edge_stitches`
//! 3. If the component carries the stitch motif, fit its repeat and (per
//!    settings) adopt the suggested count
//! 4. Shape symmetrically toward the top width, 2 stitches per shaping row

use crate::calculations::conversion::{rows_for, rows_to_length_cm, stitches_for, stitches_to_length_cm, with_edges};
use crate::calculations::pattern::{ComponentCalculation, ComponentDetails, FinishedDimensions, SchematicDimensions};
use crate::calculations::repeat::{integrate_repeat, IntegrationOptionType, RepeatIntegrationInput};
use crate::calculations::shaping::{plan_shaping, ShapingKind, ShapingRequest};
use crate::errors::{PatternError, PatternResult};
use crate::model::garment::{ComponentDefinition, Measurements, SilhouetteAttributes};
use crate::model::gauge::GaugeData;
use crate::model::stitch_pattern::StitchPatternDefinition;
use crate::settings::CalculationSettings;
use crate::units::LengthUnit;

/// Stitches removed or added per shaping row: one at each edge
const EDGE_SHAPING_STITCHES: u32 = 2;

/// Shared, read-only context for calculating one garment's components.
#[derive(Debug, Clone, Copy)]
pub struct SilhouetteContext<'a> {
    pub unit: LengthUnit,
    pub gauge: &'a GaugeData,
    pub measurements: Option<&'a Measurements>,
    pub stitch_pattern: Option<&'a StitchPatternDefinition>,
    pub settings: &'a CalculationSettings,
}

/// Calculate a silhouette component.
pub fn calculate_silhouette(
    component: &ComponentDefinition,
    attrs: &SilhouetteAttributes,
    ctx: &SilhouetteContext<'_>,
) -> PatternResult<ComponentCalculation> {
    let key = component.component_key.as_str();
    let field = |name: &str| format!("components.{}.{}", key, name);

    let bottom = attrs
        .bottom_width
        .resolve_cm(&field("bottom_width"), ctx.unit, ctx.measurements)?;
    let length = attrs.length.resolve_cm(&field("length"), ctx.unit, ctx.measurements)?;
    let top = attrs
        .top_width
        .as_ref()
        .map(|dim| dim.resolve_cm(&field("top_width"), ctx.unit, ctx.measurements))
        .transpose()?;

    let edge = attrs.edge_stitches.unwrap_or(ctx.settings.default_edge_stitches);
    let edged = |stitches: u32| {
        with_edges(stitches, edge).ok_or_else(|| {
            PatternError::invalid_input(
                field("edge_stitches"),
                edge.to_string(),
                "Edge stitches exceed the largest supported stitch count",
            )
        })
    };
    let original_cast_on = edged(stitches_for(bottom, ctx.gauge))?;
    let mut cast_on = original_cast_on;
    let length_in_rows = rows_for(length, ctx.gauge);
    let mut notes = Vec::new();
    let mut repeat_layout = None;

    if length_in_rows == 0 {
        return Err(PatternError::calculation_failed(
            "silhouette",
            format!("component '{}' is shorter than one row at this gauge", key),
        ));
    }

    if attrs.use_stitch_pattern {
        let pattern = ctx
            .stitch_pattern
            .ok_or_else(|| PatternError::missing_field("stitch_pattern"))?;
        let layout = integrate_repeat(&RepeatIntegrationInput::new(
            cast_on,
            pattern.stitch_repeat_width,
            edge,
            pattern.name.clone(),
        ))?;

        let adjusted = layout.suggested_adjusted_stitch_count;
        if ctx.settings.adjust_to_full_repeats && adjusted != cast_on {
            notes.push(format!(
                "Cast-on adjusted from {} to {} stitches so {} fits in full repeats",
                cast_on, adjusted, pattern.name
            ));
            cast_on = adjusted;
        } else if let Some(center) = layout.option(IntegrationOptionType::CenterWithStockinette) {
            notes.push(center.description.clone());
        } else if let Some(first) = layout.options.first() {
            notes.push(first.description.clone());
        }

        let vertical = pattern.full_row_repeats(length_in_rows);
        let leftover = length_in_rows - vertical * pattern.row_repeat_height;
        if leftover > 0 {
            notes.push(format!(
                "{} full vertical repeats of {} ({} rows each) leave {} plain rows",
                vertical, pattern.name, pattern.row_repeat_height, leftover
            ));
        }
        repeat_layout = Some(layout);
    }

    // The top keeps the same edge allowance and any repeat adjustment
    let target_top = match top {
        Some(top_cm) => {
            let base_top = edged(stitches_for(top_cm, ctx.gauge))?;
            let shifted = (u64::from(base_top) + u64::from(cast_on))
                .saturating_sub(u64::from(original_cast_on))
                .max(2 * u64::from(edge) + 1);
            u32::try_from(shifted).map_err(|_| {
                PatternError::calculation_failed(
                    "silhouette",
                    format!("top of component '{}' exceeds the largest supported stitch count", key),
                )
            })?
        }
        None => cast_on,
    };

    let (kind, change) = if target_top >= cast_on {
        (ShapingKind::Increase, target_top - cast_on)
    } else {
        (ShapingKind::Decrease, cast_on - target_top)
    };
    let plan = plan_shaping(&ShapingRequest {
        kind,
        starting_count: cast_on,
        total_change: change,
        stitches_per_row: EDGE_SHAPING_STITCHES,
        eligible_rows: length_in_rows,
        row_stride: 1,
        row_offset: 0,
        row_word: "row",
        placement: "evenly at both edges",
    })?;
    if plan.compressed {
        notes.push(format!(
            "Shaping from {} to {} stitches is steeper than one {} per edge per row",
            cast_on,
            target_top,
            kind.verb()
        ));
    }

    let final_stitch_count = plan.final_stitch_count;
    let finished = FinishedDimensions {
        width_cm: stitches_to_length_cm(cast_on, ctx.gauge).0,
        length_cm: rows_to_length_cm(length_in_rows, ctx.gauge).0,
    };
    let schematic = SchematicDimensions {
        bottom_width: finished.width_cm,
        top_width: stitches_to_length_cm(final_stitch_count, ctx.gauge).0,
        length: finished.length_cm,
    };

    tracing::debug!(
        component = key,
        cast_on,
        rows = length_in_rows,
        final_stitch_count,
        "calculated silhouette"
    );

    Ok(ComponentCalculation {
        component_key: component.component_key.clone(),
        display_name: component.display_name.clone(),
        cast_on_stitches: cast_on,
        length_in_rows,
        final_stitch_count,
        finished_dimensions: finished,
        shaping: plan.steps,
        construction_notes: notes,
        schematic,
        details: ComponentDetails::Silhouette {
            edge_stitches_each_side: edge,
            repeat_layout,
        },
    })
}
