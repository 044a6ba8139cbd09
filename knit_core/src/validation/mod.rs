//! # Input Validation
//!
//! The gate in front of every calculation. Validation never fails fast: it
//! walks the whole input and collects field-scoped issues in two severities.
//!
//! - **Errors** block calculation. Missing required fields are also listed
//!   in `missingFields`.
//! - **Warnings** flag values that are well-formed but unusual (a gauge of
//!   120 sts/10cm, a 60-stitch repeat). Calculation proceeds.
//!
//! Soft ranges come from [`WarningRanges`](crate::settings::WarningRanges).
//!
//! ## Example
//!
//! ```rust
//! use knit_core::model::GaugeData;
//! use knit_core::settings::CalculationSettings;
//! use knit_core::validation::inputs::check_gauge;
//! use knit_core::validation::ValidationReport;
//!
//! let mut report = ValidationReport::new();
//! check_gauge(&mut report, "gauge", &GaugeData::new(120.0, 30.0), &CalculationSettings::default());
//! let report = report.finish();
//! assert!(report.is_valid);
//! assert_eq!(report.warnings.len(), 1);
//! ```

pub mod components;
pub mod document;
pub mod inputs;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::repeat::RepeatIntegrationInput;
use crate::calculations::yarn_estimate::YarnEstimateInput;
use crate::errors::{PatternError, PatternResult};
use crate::model::pattern::PatternDefinition;
use crate::settings::CalculationSettings;

pub use document::{parse_pattern, validate_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// A single finding, scoped to a dotted field path like `gauge.rows_per_10cm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        ValidationIssue {
            field: field.into(),
            message: message.into(),
            severity,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub missing_fields: Vec<String>,
}

impl ValidationReport {
    /// An empty, not yet finished report
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(field, message, Severity::Error));
    }

    pub fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::new(field, message, Severity::Warning));
    }

    /// Record a required field that is absent. Counts as an error.
    pub fn missing(&mut self, field: impl Into<String>) {
        let field = field.into();
        if !self.missing_fields.contains(&field) {
            self.error(field.clone(), "Required field is missing");
            self.missing_fields.push(field);
        }
    }

    /// Fold a calculation-layer error into the report
    pub fn record(&mut self, error: &PatternError) {
        match error {
            PatternError::MissingField { field } => self.missing(field.clone()),
            PatternError::InvalidInput { field, reason, .. } => self.error(field.clone(), reason.clone()),
            PatternError::ValidationFailed { errors } => self.errors.extend(errors.iter().cloned()),
            other => self.error("input", other.to_string()),
        }
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        for field in other.missing_fields {
            if !self.missing_fields.contains(&field) {
                self.missing_fields.push(field);
            }
        }
    }

    /// Settle `is_valid` once every check has run
    pub fn finish(mut self) -> Self {
        self.is_valid = self.errors.is_empty();
        self
    }

    /// Errors become `ValidationFailed`; warnings are handed back.
    pub fn into_result(self) -> PatternResult<Vec<ValidationIssue>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(PatternError::ValidationFailed { errors: self.errors })
        }
    }
}

/// Validate a complete pattern document.
///
/// Gauge and yarn given only by profile reference are not checked here; they
/// are validated once the orchestrator has resolved them.
pub fn validate_pattern(definition: &PatternDefinition, settings: &CalculationSettings) -> ValidationReport {
    let mut report = ValidationReport::new();

    inputs::check_metadata(&mut report, &definition.metadata);

    match (&definition.gauge, &definition.gauge_profile_id) {
        (Some(gauge), _) => {
            inputs::check_gauge(&mut report, "gauge", gauge, settings);
            if gauge.unit != definition.unit {
                report.warn(
                    "gauge.unit",
                    format!(
                        "Gauge unit {} differs from pattern unit {}; counts are per 10 cm and dimensions use the pattern unit",
                        gauge.unit.abbreviation(),
                        definition.unit.abbreviation()
                    ),
                );
            }
        }
        (None, Some(_)) => {}
        (None, None) => report.missing("gauge"),
    }

    if let Some(yarn) = &definition.yarn {
        inputs::check_yarn(&mut report, "yarn", yarn);
    }
    if let Some(pattern) = &definition.stitch_pattern {
        inputs::check_stitch_pattern(&mut report, "stitch_pattern", pattern, settings);
    }
    if let Some(measurements) = &definition.measurements {
        inputs::check_measurements(&mut report, measurements, settings);
    }

    components::check_components(&mut report, definition, settings);

    if let Some(project) = &definition.yarn_project {
        if definition.yarn.is_none() && definition.yarn_profile_id.is_none() {
            report.missing("yarn");
        }
        inputs::check_project(&mut report, "yarn_project", project);
    }

    let report = report.finish();
    if !report.warnings.is_empty() {
        tracing::warn!(
            pattern = definition.display_name(),
            warnings = report.warnings.len(),
            "pattern validated with warnings"
        );
    }
    tracing::debug!(
        pattern = definition.display_name(),
        errors = report.errors.len(),
        "validated pattern"
    );
    report
}

/// Validate a standalone repeat-integration request.
pub fn validate_repeat_request(input: &RepeatIntegrationInput, settings: &CalculationSettings) -> ValidationReport {
    let mut report = ValidationReport::new();
    if input.target_stitch_count == 0 {
        report.error("targetStitchCount", "Must be greater than zero");
    }
    if input.stitch_repeat_width == 0 {
        report.error("stitchRepeatWidth", "Must be at least 1");
    } else if input.stitch_repeat_width > settings.warning_ranges.max_stitch_repeat {
        report.warn(
            "stitchRepeatWidth",
            format!(
                "A {}-stitch repeat is unusually wide (over {})",
                input.stitch_repeat_width, settings.warning_ranges.max_stitch_repeat
            ),
        );
    }
    if input.stitch_repeat_width > 0
        && u64::from(input.target_stitch_count) + u64::from(input.stitch_repeat_width) > u64::from(u32::MAX)
    {
        report.error(
            "stitchRepeatWidth",
            "Target plus one repeat exceeds the largest supported stitch count",
        );
    }
    if input.target_stitch_count > 0
        && 2 * u64::from(input.desired_edge_stitches) >= u64::from(input.target_stitch_count)
    {
        report.error(
            "desiredEdgeStitches",
            format!(
                "Edge stitches ({} each side) leave no room for the pattern in {} stitches",
                input.desired_edge_stitches, input.target_stitch_count
            ),
        );
    }
    report.finish()
}

/// Validate a standalone yarn-estimate request.
pub fn validate_yarn_estimate(input: &YarnEstimateInput, settings: &CalculationSettings) -> ValidationReport {
    let mut report = ValidationReport::new();

    if let Some(gauge) = &input.gauge {
        inputs::check_gauge(&mut report, "gauge", gauge, settings);
    } else if let Some(swatch) = &input.swatch {
        inputs::check_swatch(&mut report, swatch, settings);
    } else if input.gauge_profile_id.is_none() {
        report.missing("gauge");
    }

    match (&input.yarn, &input.yarn_profile_id) {
        (Some(yarn), _) => inputs::check_yarn(&mut report, "yarn", yarn),
        (None, Some(_)) => {}
        (None, None) => report.missing("yarn"),
    }

    inputs::check_project(&mut report, "project", &input.project);
    report.finish()
}
