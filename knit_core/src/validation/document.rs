//! Validation of raw JSON pattern documents.
//!
//! Serde rejects an unknown enum value with a message about the whole
//! document. Before deserializing, the closed-set fields are checked on the
//! raw `serde_json::Value` so each bad value is reported against its own
//! field path.

use serde_json::Value;

use crate::calculations::yarn_estimate::{GarmentSize, ProjectType};
use crate::errors::{PatternError, PatternResult};
use crate::model::garment::{ConstructionMethod, MeasurementKey, WorkStyle};
use crate::model::pattern::PatternDefinition;
use crate::model::yarn::YarnWeightCategory;
use crate::settings::CalculationSettings;
use crate::units::LengthUnit;
use crate::validation::{validate_pattern, ValidationReport};

const COMPONENT_TYPES: [&str; 2] = ["silhouette", "triangular_shawl"];
const DIMENSION_KINDS: [&str; 2] = ["fixed", "from_measurement"];

fn allowed<T: serde::Serialize>(values: &[T]) -> Vec<String> {
    values
        .iter()
        .filter_map(|v| match serde_json::to_value(v) {
            Ok(Value::String(s)) => Some(s),
            _ => None,
        })
        .collect()
}

/// Report `value` at `path` unless it is one of `choices`
fn check_enum(report: &mut ValidationReport, value: Option<&Value>, path: &str, choices: &[String]) {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return;
    };
    let ok = value.as_str().is_some_and(|s| choices.iter().any(|c| c == s));
    if !ok {
        report.error(
            path,
            format!("Unknown value {}; expected one of: {}", value, choices.join(", ")),
        );
    }
}

fn check_dimension_kind(report: &mut ValidationReport, dimension: Option<&Value>, path: &str, measurement_keys: &[String]) {
    let Some(dimension) = dimension else {
        return;
    };
    let kinds: Vec<String> = DIMENSION_KINDS.iter().map(|k| k.to_string()).collect();
    check_enum(report, dimension.get("kind"), &format!("{}.kind", path), &kinds);
    check_enum(
        report,
        dimension.get("measurement"),
        &format!("{}.measurement", path),
        measurement_keys,
    );
}

/// Check every closed-set field in a raw pattern document.
pub fn check_enumerations(root: &Value) -> ValidationReport {
    let mut report = ValidationReport::new();
    let units = allowed(&LengthUnit::ALL);
    let measurement_keys = allowed(&MeasurementKey::ALL);

    check_enum(&mut report, root.get("unit"), "unit", &units);
    check_enum(&mut report, root.pointer("/gauge/unit"), "gauge.unit", &units);
    check_enum(&mut report, root.pointer("/measurements/unit"), "measurements.unit", &units);
    check_enum(
        &mut report,
        root.pointer("/yarn/weight_category"),
        "yarn.weight_category",
        &allowed(&YarnWeightCategory::ALL),
    );

    if let Some(values) = root.pointer("/measurements/values").and_then(Value::as_object) {
        for key in values.keys() {
            if !measurement_keys.contains(key) {
                report.error(
                    format!("measurements.{}", key),
                    format!("Unknown measurement; expected one of: {}", measurement_keys.join(", ")),
                );
            }
        }
    }

    if let Some(project) = root.get("yarn_project") {
        check_enum(
            &mut report,
            project.get("project_type"),
            "yarn_project.project_type",
            &allowed(&ProjectType::ALL),
        );
        check_enum(
            &mut report,
            project.get("garment_size"),
            "yarn_project.garment_size",
            &allowed(&GarmentSize::ALL),
        );
        check_enum(
            &mut report,
            project.pointer("/dimensions/unit"),
            "yarn_project.dimensions.unit",
            &units,
        );
    }

    let component_types: Vec<String> = COMPONENT_TYPES.iter().map(|t| t.to_string()).collect();
    let methods = allowed(&ConstructionMethod::ALL);
    let styles = allowed(&WorkStyle::ALL);
    let components = root.get("components").and_then(Value::as_array);
    for (index, component) in components.into_iter().flatten().enumerate() {
        let key = component
            .get("component_key")
            .and_then(Value::as_str)
            .filter(|k| !k.trim().is_empty())
            .map(|k| format!("components.{}", k))
            .unwrap_or_else(|| format!("components[{}]", index));
        let Some(attributes) = component.get("attributes") else {
            continue;
        };
        let prefix = format!("{}.attributes", key);

        check_enum(&mut report, attributes.get("type"), &format!("{}.type", prefix), &component_types);
        check_enum(
            &mut report,
            attributes.get("construction_method"),
            &format!("{}.construction_method", prefix),
            &methods,
        );
        check_enum(
            &mut report,
            attributes.get("work_style"),
            &format!("{}.work_style", prefix),
            &styles,
        );
        for name in ["bottom_width", "top_width", "length"] {
            check_dimension_kind(
                &mut report,
                attributes.get(name),
                &format!("{}.{}", prefix, name),
                &measurement_keys,
            );
        }
    }

    report
}

/// Structural pass: JSON syntax, closed-set values and required fields.
fn parse_structure(text: &str) -> (ValidationReport, Option<PatternDefinition>) {
    let root: Value = match serde_json::from_str(text) {
        Ok(root) => root,
        Err(e) => {
            let mut report = ValidationReport::new();
            report.error("document", format!("Not valid JSON: {}", e));
            return (report, None);
        }
    };

    let mut report = check_enumerations(&root);
    if !report.errors.is_empty() {
        return (report, None);
    }

    match serde_json::from_value::<PatternDefinition>(root) {
        Ok(definition) => (report, Some(definition)),
        Err(e) => {
            let message = e.to_string();
            // serde names the missing field in backticks
            match message.strip_prefix("missing field `").and_then(|rest| rest.split('`').next()) {
                Some(field) => report.missing(field.to_string()),
                None => report.error("document", message),
            }
            (report, None)
        }
    }
}

/// Parse a pattern document, reporting structural problems per field.
///
/// Unknown enum values, missing fields and malformed JSON all come back as
/// `ValidationFailed`. Semantic checks are left to [`validate_pattern`].
pub fn parse_pattern(text: &str) -> PatternResult<PatternDefinition> {
    match parse_structure(text) {
        (_, Some(definition)) => Ok(definition),
        (report, None) => Err(PatternError::ValidationFailed { errors: report.errors }),
    }
}

/// Validate a pattern document given as JSON text.
///
/// Returns the report and, when the document is structurally sound, the
/// parsed definition.
pub fn validate_json(text: &str, settings: &CalculationSettings) -> (ValidationReport, Option<PatternDefinition>) {
    match parse_structure(text) {
        (_, Some(definition)) => (validate_pattern(&definition, settings), Some(definition)),
        (report, None) => (report.finish(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAWL: &str = r#"{
        "metadata": {"name": "Crescent"},
        "gauge": {"stitches_per_10cm": 20, "rows_per_10cm": 30},
        "components": [{
            "component_key": "body",
            "display_name": "Body",
            "attributes": {
                "type": "triangular_shawl",
                "target_wingspan_cm": 160,
                "target_depth_cm": 70,
                "construction_method": "top_down_center_out",
                "work_style": "flat",
                "border_stitches_each_side": 3
            }
        }]
    }"#;

    #[test]
    fn test_valid_document() {
        let (report, definition) = validate_json(SHAWL, &CalculationSettings::default());
        assert!(report.is_valid, "{:?}", report.errors);
        assert_eq!(definition.map(|d| d.components.len()), Some(1));
    }

    #[test]
    fn test_unknown_construction_method() {
        let text = SHAWL.replace("top_down_center_out", "cornerwise");
        let (report, definition) = validate_json(&text, &CalculationSettings::default());
        assert!(!report.is_valid);
        assert!(definition.is_none());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].field, "components.body.attributes.construction_method");
        assert!(report.errors[0].message.contains("side_to_side"));
    }

    #[test]
    fn test_unknown_unit_and_work_style() {
        let text = SHAWL
            .replace("\"work_style\": \"flat\"", "\"work_style\": \"spiral\"")
            .replace("\"rows_per_10cm\": 30", "\"rows_per_10cm\": 30, \"unit\": \"furlong\"");
        let (report, _) = validate_json(&text, &CalculationSettings::default());
        let fields: Vec<&str> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["gauge.unit", "components.body.attributes.work_style"]);
    }

    #[test]
    fn test_missing_required_attribute() {
        let text = SHAWL.replace("\"target_depth_cm\": 70,", "");
        let (report, _) = validate_json(&text, &CalculationSettings::default());
        assert_eq!(report.missing_fields, vec!["target_depth_cm".to_string()]);
    }

    #[test]
    fn test_parse_pattern_errors_name_the_field() {
        assert!(parse_pattern(SHAWL).is_ok());

        let text = SHAWL.replace("top_down_center_out", "cornerwise");
        match parse_pattern(&text).unwrap_err() {
            PatternError::ValidationFailed { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "components.body.attributes.construction_method");
            }
            other => panic!("expected validation failure, got {:?}", other),
        }

        let err = parse_pattern("{ nope").unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_not_json() {
        let (report, definition) = validate_json("{ nope", &CalculationSettings::default());
        assert!(!report.is_valid);
        assert!(definition.is_none());
        assert_eq!(report.errors[0].field, "document");
    }
}
