//! Checks for the shared inputs of a pattern: metadata, gauge, yarn, stitch
//! pattern, measurements and the yarn-estimate project.

use chrono::DateTime;
use uuid::Uuid;

use crate::calculations::yarn_estimate::{ProjectSpec, ProjectType};
use crate::file_io::validate_version;
use crate::model::garment::{MeasurementKey, Measurements};
use crate::model::gauge::{GaugeData, GaugeSwatch};
use crate::model::pattern::PatternMetadata;
use crate::model::stitch_pattern::StitchPatternDefinition;
use crate::model::yarn::YarnInfo;
use crate::settings::CalculationSettings;
use crate::validation::ValidationReport;

/// Error unless `value` is a finite number above zero. Returns whether it passed.
pub fn check_positive(report: &mut ValidationReport, field: &str, value: f64) -> bool {
    if value.is_finite() && value > 0.0 {
        true
    } else {
        report.error(field, format!("Must be a positive number (got {})", value));
        false
    }
}

/// Warn when `value` falls outside `[min, max]`
pub fn check_range(report: &mut ValidationReport, field: &str, value: f64, (min, max): (f64, f64), what: &str) {
    if value < min || value > max {
        report.warn(
            field,
            format!("{} of {} is outside the usual range {}-{}", what, value, min, max),
        );
    }
}

pub fn check_metadata(report: &mut ValidationReport, metadata: &PatternMetadata) {
    if let Some(id) = &metadata.pattern_id {
        if Uuid::parse_str(id).is_err() {
            report.error("metadata.pattern_id", format!("'{}' is not a valid UUID", id));
        }
    }
    if let Some(version) = &metadata.schema_version {
        match semver::Version::parse(version) {
            Err(e) => report.error(
                "metadata.schema_version",
                format!("'{}' is not a valid version: {}", version, e),
            ),
            Ok(_) => {
                if let Err(e) = validate_version(version) {
                    report.error("metadata.schema_version", e.to_string());
                }
            }
        }
    }

    let mut parse_time = |field: &str, value: &Option<String>| {
        let raw = value.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(time) => Some(time),
            Err(e) => {
                report.error(field, format!("'{}' is not an RFC 3339 timestamp: {}", raw, e));
                None
            }
        }
    };
    let created = parse_time("metadata.created_at", &metadata.created_at);
    let updated = parse_time("metadata.updated_at", &metadata.updated_at);
    if let (Some(created), Some(updated)) = (created, updated) {
        if updated < created {
            report.error("metadata.updated_at", "Update time is earlier than creation time");
        }
    }
}

pub fn check_gauge(report: &mut ValidationReport, prefix: &str, gauge: &GaugeData, settings: &CalculationSettings) {
    let ranges = &settings.warning_ranges;
    let stitches_field = format!("{}.stitches_per_10cm", prefix);
    let rows_field = format!("{}.rows_per_10cm", prefix);

    if check_positive(report, &stitches_field, gauge.stitches_per_10cm) {
        check_range(
            report,
            &stitches_field,
            gauge.stitches_per_10cm,
            ranges.gauge_stitches,
            "Stitch gauge",
        );
    }
    if check_positive(report, &rows_field, gauge.rows_per_10cm) {
        check_range(report, &rows_field, gauge.rows_per_10cm, ranges.gauge_rows, "Row gauge");
    }
}

pub fn check_swatch(report: &mut ValidationReport, swatch: &GaugeSwatch, settings: &CalculationSettings) {
    let ok = [
        check_positive(report, "swatch.stitches", swatch.stitches),
        check_positive(report, "swatch.rows", swatch.rows),
        check_positive(report, "swatch.width", swatch.width),
        check_positive(report, "swatch.height", swatch.height),
    ];
    if ok.iter().all(|passed| *passed) {
        match swatch.to_gauge_data() {
            Ok(gauge) => check_gauge(report, "swatch", &gauge, settings),
            Err(e) => report.record(&e),
        }
    }
}

pub fn check_yarn(report: &mut ValidationReport, prefix: &str, yarn: &YarnInfo) {
    let optional = [
        ("skein_meterage", yarn.skein_meterage),
        ("skein_weight_grams", yarn.skein_weight_grams),
    ];
    for (name, value) in optional {
        let field = format!("{}.{}", prefix, name);
        match value {
            Some(v) if !v.is_finite() || v < 0.0 => {
                report.error(field, format!("Must not be negative (got {})", v));
            }
            Some(v) if v == 0.0 => {
                report.warn(field, "Zero is treated as unknown");
            }
            _ => {}
        }
    }
}

pub fn check_stitch_pattern(
    report: &mut ValidationReport,
    prefix: &str,
    pattern: &StitchPatternDefinition,
    settings: &CalculationSettings,
) {
    let ranges = &settings.warning_ranges;
    if pattern.name.trim().is_empty() {
        report.warn(format!("{}.name", prefix), "Stitch pattern has no name");
    }

    let width_field = format!("{}.stitch_repeat_width", prefix);
    if pattern.stitch_repeat_width == 0 {
        report.error(width_field, "Must be at least 1");
    } else if pattern.stitch_repeat_width > ranges.max_stitch_repeat {
        report.warn(
            width_field,
            format!(
                "A {}-stitch repeat is unusually wide (over {})",
                pattern.stitch_repeat_width, ranges.max_stitch_repeat
            ),
        );
    }

    let height_field = format!("{}.row_repeat_height", prefix);
    if pattern.row_repeat_height == 0 {
        report.error(height_field, "Must be at least 1");
    } else if pattern.row_repeat_height > ranges.max_row_repeat {
        report.warn(
            height_field,
            format!(
                "A {}-row repeat is unusually tall (over {})",
                pattern.row_repeat_height, ranges.max_row_repeat
            ),
        );
    }
}

pub fn check_measurements(report: &mut ValidationReport, measurements: &Measurements, settings: &CalculationSettings) {
    let ranges = &settings.warning_ranges;
    for (key, value) in &measurements.values {
        let field = format!("measurements.{}", key);
        if !check_positive(report, &field, *value) {
            continue;
        }
        let cm = measurements.unit.to_cm(*value);
        let range = match key {
            MeasurementKey::ChestCircumference => ranges.chest_circumference_cm,
            _ => ranges.measurement_cm,
        };
        check_range(report, &field, cm, range, "Measurement (cm)");
    }
}

pub fn check_project(report: &mut ValidationReport, prefix: &str, project: &ProjectSpec) {
    let kind = project.project_type;
    if kind.requires_size() && project.garment_size.is_none() {
        report.missing(format!("{}.garment_size", prefix));
    }
    if !kind.requires_dimensions() {
        return;
    }

    let Some(dims) = &project.dimensions else {
        report.missing(format!("{}.dimensions", prefix));
        return;
    };
    let fields = if kind == ProjectType::Custom {
        vec![("area_m2", dims.area_m2)]
    } else {
        vec![("width", dims.width), ("length", dims.length)]
    };
    for (name, value) in fields {
        let field = format!("{}.dimensions.{}", prefix, name);
        match value {
            Some(v) => {
                check_positive(report, &field, v);
            }
            None => report.missing(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::yarn_estimate::ProjectDimensions;
    use crate::model::yarn::YarnWeightCategory;
    use crate::units::LengthUnit;

    fn settings() -> CalculationSettings {
        CalculationSettings::default()
    }

    #[test]
    fn test_gauge_errors_and_warnings() {
        let mut report = ValidationReport::new();
        check_gauge(&mut report, "gauge", &GaugeData::new(0.0, 200.0), &settings());
        let report = report.finish();
        assert!(!report.is_valid);
        assert_eq!(report.errors[0].field, "gauge.stitches_per_10cm");
        assert_eq!(report.warnings[0].field, "gauge.rows_per_10cm");
    }

    #[test]
    fn test_gauge_range_boundaries_inclusive() {
        let mut report = ValidationReport::new();
        check_gauge(&mut report, "gauge", &GaugeData::new(5.0, 150.0), &settings());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_metadata_formats() {
        let metadata = PatternMetadata {
            pattern_id: Some("not-a-uuid".to_string()),
            schema_version: Some("one".to_string()),
            name: Some("Test".to_string()),
            created_at: Some("2024-03-01T10:00:00Z".to_string()),
            updated_at: Some("yesterday".to_string()),
        };
        let mut report = ValidationReport::new();
        check_metadata(&mut report, &metadata);
        let fields: Vec<&str> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["metadata.pattern_id", "metadata.schema_version", "metadata.updated_at"]
        );
    }

    #[test]
    fn test_metadata_schema_version_compatibility() {
        let mut metadata = PatternMetadata::new("Future");
        metadata.schema_version = Some("0.9.0".to_string());
        let mut report = ValidationReport::new();
        check_metadata(&mut report, &metadata);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].field, "metadata.schema_version");

        metadata.schema_version = Some("0.1.2".to_string());
        let mut report = ValidationReport::new();
        check_metadata(&mut report, &metadata);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_metadata_time_order() {
        let mut metadata = PatternMetadata::new("Ordered");
        metadata.created_at = Some("2024-05-02T00:00:00+02:00".to_string());
        metadata.updated_at = Some("2024-05-01T00:00:00Z".to_string());
        let mut report = ValidationReport::new();
        check_metadata(&mut report, &metadata);
        assert_eq!(report.errors.len(), 1);

        let mut report = ValidationReport::new();
        check_metadata(&mut report, &PatternMetadata::new("Fresh"));
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_zero_skein_values_warn() {
        let yarn = YarnInfo::new(YarnWeightCategory::Medium).with_skein(Some(0.0), Some(-5.0));
        let mut report = ValidationReport::new();
        check_yarn(&mut report, "yarn", &yarn);
        assert_eq!(report.warnings[0].field, "yarn.skein_meterage");
        assert_eq!(report.errors[0].field, "yarn.skein_weight_grams");
    }

    #[test]
    fn test_stitch_pattern_checks() {
        let mut report = ValidationReport::new();
        check_stitch_pattern(
            &mut report,
            "stitch_pattern",
            &StitchPatternDefinition::new("Panel", 60, 0),
            &settings(),
        );
        assert_eq!(report.warnings[0].field, "stitch_pattern.stitch_repeat_width");
        assert_eq!(report.errors[0].field, "stitch_pattern.row_repeat_height");
    }

    #[test]
    fn test_chest_range_in_working_unit() {
        // 90 inches is 228.6 cm, above the usual chest range
        let measurements = Measurements::new(LengthUnit::Inch)
            .with(MeasurementKey::ChestCircumference, 90.0)
            .with(MeasurementKey::FinishedLength, 24.0);
        let mut report = ValidationReport::new();
        check_measurements(&mut report, &measurements, &settings());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].field, "measurements.chest_circumference");
    }

    #[test]
    fn test_non_positive_measurement() {
        let measurements = Measurements::new(LengthUnit::Cm).with(MeasurementKey::SleeveLength, -3.0);
        let mut report = ValidationReport::new();
        check_measurements(&mut report, &measurements, &settings());
        assert_eq!(report.errors[0].field, "measurements.sleeve_length");
    }

    #[test]
    fn test_project_requirements() {
        let mut report = ValidationReport::new();
        let scarf = ProjectSpec {
            project_type: ProjectType::Scarf,
            garment_size: None,
            dimensions: Some(ProjectDimensions {
                width: Some(20.0),
                length: None,
                area_m2: None,
                unit: LengthUnit::Cm,
            }),
        };
        check_project(&mut report, "project", &scarf);
        assert_eq!(report.missing_fields, vec!["project.dimensions.length".to_string()]);

        let mut report = ValidationReport::new();
        let custom = ProjectSpec {
            project_type: ProjectType::Custom,
            garment_size: None,
            dimensions: Some(ProjectDimensions {
                area_m2: Some(0.0),
                ..Default::default()
            }),
        };
        check_project(&mut report, "project", &custom);
        assert_eq!(report.errors[0].field, "project.dimensions.area_m2");
    }

    #[test]
    fn test_swatch_checks() {
        let swatch = GaugeSwatch {
            stitches: 20.0,
            rows: 0.0,
            width: 10.0,
            height: 10.0,
            unit: LengthUnit::Cm,
        };
        let mut report = ValidationReport::new();
        check_swatch(&mut report, &swatch, &settings());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].field, "swatch.rows");
    }
}
