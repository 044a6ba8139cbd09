//! Component checks: unique keys, per-kind attribute checks and the edge
//! stitch precondition of the repeat integrator.

use std::collections::HashSet;

use crate::calculations::conversion::{rows_for, stitches_for, with_edges};
use crate::calculations::shawl::{estimate_complexity, ShawlComplexity};
use crate::model::garment::{ComponentAttributes, Dimension, SilhouetteAttributes, TriangularShawlAttributes};
use crate::model::gauge::GaugeData;
use crate::model::pattern::PatternDefinition;
use crate::settings::CalculationSettings;
use crate::units::Centimeters;
use crate::validation::inputs::{check_positive, check_range};
use crate::validation::ValidationReport;

const OVERSIZED_COUNT: &str = "Exceeds the largest supported stitch count";

pub fn check_components(report: &mut ValidationReport, definition: &PatternDefinition, settings: &CalculationSettings) {
    if definition.components.is_empty() {
        report.error("components", "At least one component is required");
        return;
    }

    let mut seen = HashSet::new();
    for (index, component) in definition.components.iter().enumerate() {
        let key = component.component_key.trim();
        if key.is_empty() {
            report.error(format!("components[{}].component_key", index), "Must not be empty");
            continue;
        }
        let prefix = format!("components.{}", key);
        if !seen.insert(key) {
            report.error(prefix.clone(), "Duplicate component key");
            continue;
        }
        if component.display_name.trim().is_empty() {
            report.warn(format!("{}.display_name", prefix), "Component has no display name");
        }

        match &component.attributes {
            ComponentAttributes::Silhouette(attrs) => check_silhouette(report, &prefix, attrs, definition, settings),
            ComponentAttributes::TriangularShawl(attrs) => {
                check_shawl(report, &prefix, attrs, definition.gauge.as_ref(), settings)
            }
        }
    }
}

fn check_dimension(report: &mut ValidationReport, field: &str, dimension: &Dimension, definition: &PatternDefinition) -> bool {
    match dimension {
        Dimension::Fixed { value } => check_positive(report, &format!("{}.value", field), *value),
        Dimension::FromMeasurement {
            measurement, fraction, ..
        } => {
            let fraction_ok = check_positive(report, &format!("{}.fraction", field), *fraction);
            let present = definition
                .measurements
                .as_ref()
                .is_some_and(|m| m.values.contains_key(measurement));
            if !present {
                report.missing(format!("measurements.{}", measurement));
            }
            fraction_ok && present
        }
    }
}

fn check_silhouette(
    report: &mut ValidationReport,
    prefix: &str,
    attrs: &SilhouetteAttributes,
    definition: &PatternDefinition,
    settings: &CalculationSettings,
) {
    if attrs.use_stitch_pattern && definition.stitch_pattern.is_none() {
        report.missing("stitch_pattern");
    }

    let edge = attrs.edge_stitches.unwrap_or(settings.default_edge_stitches);
    let edge_field = format!("{}.edge_stitches", prefix);
    if with_edges(0, edge).is_none() {
        report.error(edge_field.clone(), OVERSIZED_COUNT);
    }

    let mut dimensions = vec![("bottom_width", &attrs.bottom_width), ("length", &attrs.length)];
    if let Some(top) = &attrs.top_width {
        dimensions.push(("top_width", top));
    }

    let mut resolved = Vec::new();
    for (name, dimension) in dimensions {
        let field = format!("{}.{}", prefix, name);
        if !check_dimension(report, &field, dimension, definition) {
            continue;
        }
        match dimension.resolve_cm(&field, definition.unit, definition.measurements.as_ref()) {
            Ok(cm) => {
                check_range(report, &field, cm.0, settings.warning_ranges.measurement_cm, "Dimension (cm)");
                resolved.push((name, cm));
            }
            Err(e) => report.record(&e),
        }
    }

    // Count checks need a usable gauge; gauge errors are reported elsewhere
    let Some(gauge) = definition.gauge.filter(|g| g.ensure_usable().is_ok()) else {
        return;
    };
    for (name, cm) in resolved {
        let field = format!("{}.{}", prefix, name);
        match name {
            "length" if rows_for(cm, &gauge) == 0 => {
                report.error(field, "Shorter than one row at this gauge");
            }
            "bottom_width" if stitches_for(cm, &gauge) == 0 => {
                report.error(
                    field,
                    format!("Narrower than one stitch; {} edge stitches each side leave no room for the body", edge),
                );
            }
            "bottom_width" | "top_width"
                if with_edges(0, edge).is_some() && with_edges(stitches_for(cm, &gauge), edge).is_none() =>
            {
                report.error(edge_field.clone(), format!("{} together with {}", OVERSIZED_COUNT, name));
            }
            _ => {}
        }
    }
}

fn check_shawl(
    report: &mut ValidationReport,
    prefix: &str,
    attrs: &TriangularShawlAttributes,
    gauge: Option<&GaugeData>,
    settings: &CalculationSettings,
) {
    let ranges = &settings.warning_ranges;
    let border_field = format!("{}.border_stitches_each_side", prefix);
    let border = attrs.border_stitches_each_side;
    if with_edges(0, border).is_none() {
        report.error(border_field.clone(), OVERSIZED_COUNT);
    }

    let wingspan_field = format!("{}.target_wingspan_cm", prefix);
    let depth_field = format!("{}.target_depth_cm", prefix);

    let wingspan_ok = check_positive(report, &wingspan_field, attrs.target_wingspan_cm);
    if wingspan_ok {
        check_range(report, &wingspan_field, attrs.target_wingspan_cm, ranges.shawl_wingspan_cm, "Wingspan (cm)");
    }
    let depth_ok = check_positive(report, &depth_field, attrs.target_depth_cm);
    if depth_ok {
        check_range(report, &depth_field, attrs.target_depth_cm, ranges.shawl_depth_cm, "Depth (cm)");
    }
    if !(wingspan_ok && depth_ok) {
        return;
    }

    if let Some(gauge) = gauge.filter(|g| g.ensure_usable().is_ok()) {
        let widest = stitches_for(Centimeters(attrs.target_wingspan_cm), gauge)
            .max(stitches_for(Centimeters(attrs.target_depth_cm), gauge));
        if with_edges(0, border).is_some() && with_edges(widest, border).is_none() {
            report.error(border_field, format!("{} together with the widest row", OVERSIZED_COUNT));
        }
    }

    if attrs.target_depth_cm > attrs.target_wingspan_cm {
        report.warn(depth_field, "Depth exceeds wingspan; the shawl will be a tall, narrow triangle");
    }
    if estimate_complexity(attrs.target_wingspan_cm, attrs.target_depth_cm, attrs.construction_method)
        == ShawlComplexity::High
    {
        report.warn(prefix, "High complexity: expect long row-by-row instructions");
    }
}
