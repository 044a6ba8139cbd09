//! # Pattern Calculation
//!
//! Runs a whole pattern definition through the pipeline:
//!
//! 1. Resolve gauge and yarn profile references
//! 2. Validate; any error stops here with [`PatternError::ValidationFailed`]
//! 3. Calculate every component in declaration order
//! 4. Estimate yarn when the definition asks for it
//!
//! Validator warnings are carried through to the result.
//!
//! ## Example
//!
//! ```rust
//! use knit_core::calculations::pattern::calculate_pattern;
//! use knit_core::model::*;
//! use knit_core::settings::CalculationSettings;
//!
//! let definition = PatternDefinition::new("Plain scarf", GaugeData::new(22.0, 30.0)).with_component(
//!     ComponentDefinition::new(
//!         "body",
//!         "Body",
//!         ComponentAttributes::Silhouette(SilhouetteAttributes {
//!             bottom_width: Dimension::fixed(20.0),
//!             top_width: None,
//!             length: Dimension::fixed(150.0),
//!             edge_stitches: Some(3),
//!             use_stitch_pattern: false,
//!         }),
//!     ),
//! );
//! let details = calculate_pattern(&definition, &CalculationSettings::default()).unwrap();
//! assert_eq!(details.components["body"].cast_on_stitches, 50);
//! ```
//!
//! ## JSON Output (one component)
//!
//! ```json
//! {
//!   "componentKey": "body",
//!   "displayName": "Body",
//!   "castOnStitches": 50,
//!   "lengthInRows": 450,
//!   "finalStitchCount": 50,
//!   "finishedDimensions": { "width_cm": 22.727272727272727, "length_cm": 150.0 },
//!   "shaping": [],
//!   "constructionNotes": [],
//!   "schematic": { "bottomWidth": 22.727272727272727, "topWidth": 22.727272727272727, "length": 150.0 },
//!   "details": { "type": "silhouette", "edgeStitchesEachSide": 3 }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calculations::conversion::stitches_to_length_cm;
use crate::calculations::repeat::RepeatIntegration;
use crate::calculations::shaping::ShapingStep;
use crate::calculations::shawl::{calculate_shawl, ShawlComplexity};
use crate::calculations::silhouette::{calculate_silhouette, SilhouetteContext};
use crate::calculations::yarn_estimate::{estimate_resolved, YarnEstimateResult};
use crate::errors::{PatternError, PatternResult};
use crate::model::garment::{ComponentAttributes, ComponentDefinition, ConstructionMethod, WorkStyle};
use crate::model::gauge::GaugeData;
use crate::model::pattern::PatternDefinition;
use crate::profiles::{resolve_gauge, resolve_yarn, NoProfiles, ProfileSource};
use crate::settings::CalculationSettings;
use crate::validation::{validate_pattern, ValidationIssue};

/// Finished size of a component, from its rounded stitch and row counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinishedDimensions {
    pub width_cm: f64,
    pub length_cm: f64,
}

/// What the schematic generator draws. `bottom_width` is the cast-on edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchematicDimensions {
    pub bottom_width: f64,
    pub top_width: f64,
    pub length: f64,
}

/// Kind-specific output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ComponentDetails {
    Silhouette {
        edge_stitches_each_side: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        repeat_layout: Option<RepeatIntegration>,
    },
    TriangularShawl {
        construction_method: ConstructionMethod,
        work_style: WorkStyle,
        complexity: ShawlComplexity,
        peak_stitch_count: u32,
        effective_shaping_rows: u32,
    },
}

/// Calculated numbers for one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCalculation {
    pub component_key: String,
    pub display_name: String,
    pub cast_on_stitches: u32,
    pub length_in_rows: u32,
    pub final_stitch_count: u32,
    pub finished_dimensions: FinishedDimensions,
    pub shaping: Vec<ShapingStep>,
    pub construction_notes: Vec<String>,
    pub schematic: SchematicDimensions,
    pub details: ComponentDetails,
}

/// Everything calculated for a pattern, keyed by component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedPatternDetails {
    pub pattern_name: String,
    pub components: BTreeMap<String, ComponentCalculation>,
    pub schematics: BTreeMap<String, SchematicDimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yarn_estimate: Option<YarnEstimateResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationIssue>,
}

impl CalculatedPatternDetails {
    pub fn component(&self, key: &str) -> Option<&ComponentCalculation> {
        self.components.get(key)
    }
}

/// Calculate a pattern whose gauge and yarn are given inline.
pub fn calculate_pattern(
    definition: &PatternDefinition,
    settings: &CalculationSettings,
) -> PatternResult<CalculatedPatternDetails> {
    calculate_pattern_with_profiles(definition, settings, &NoProfiles)
}

/// Calculate a pattern, resolving profile references through `profiles`.
///
/// # Errors
///
/// - `ResolutionFailed` when a referenced profile does not exist
/// - `ValidationFailed` with every field-scoped error when validation fails
/// - `CalculationFailed` when a component cannot be worked at this gauge
pub fn calculate_pattern_with_profiles(
    definition: &PatternDefinition,
    settings: &CalculationSettings,
    profiles: &dyn ProfileSource,
) -> PatternResult<CalculatedPatternDetails> {
    settings.validate()?;
    let resolved = resolve_references(definition, profiles)?;

    let warnings = validate_pattern(&resolved, settings).into_result()?;
    for warning in &warnings {
        tracing::warn!(field = %warning.field, "{}", warning.message);
    }

    let gauge = resolved
        .gauge
        .ok_or_else(|| PatternError::missing_field("gauge"))?;

    let mut components = BTreeMap::new();
    let mut schematics = BTreeMap::new();
    for component in &resolved.components {
        let calculation = calculate_component(component, &resolved, &gauge, settings)?;
        schematics.insert(component.component_key.clone(), calculation.schematic);
        components.insert(component.component_key.clone(), calculation);
    }

    let yarn_estimate = match &resolved.yarn_project {
        Some(project) => {
            let yarn = resolved
                .yarn
                .as_ref()
                .ok_or_else(|| PatternError::missing_field("yarn"))?;
            Some(estimate_resolved(&gauge, yarn, project, settings)?)
        }
        None => None,
    };

    tracing::info!(
        pattern = resolved.display_name(),
        components = components.len(),
        warnings = warnings.len(),
        yarn_estimate = yarn_estimate.is_some(),
        "calculated pattern"
    );

    Ok(CalculatedPatternDetails {
        pattern_name: resolved.display_name().to_string(),
        components,
        schematics,
        yarn_estimate,
        warnings,
    })
}

/// Replace profile references with the profiles' values
fn resolve_references(definition: &PatternDefinition, profiles: &dyn ProfileSource) -> PatternResult<PatternDefinition> {
    let mut resolved = definition.clone();
    if resolved.gauge.is_none() {
        if let Some(id) = resolved.gauge_profile_id.as_deref() {
            resolved.gauge = Some(resolve_gauge(None, None, Some(id), profiles)?);
        }
    }
    if resolved.yarn.is_none() {
        if let Some(id) = resolved.yarn_profile_id.as_deref() {
            resolved.yarn = Some(resolve_yarn(None, Some(id), profiles)?);
        }
    }
    Ok(resolved)
}

fn calculate_component(
    component: &ComponentDefinition,
    definition: &PatternDefinition,
    gauge: &GaugeData,
    settings: &CalculationSettings,
) -> PatternResult<ComponentCalculation> {
    match &component.attributes {
        ComponentAttributes::Silhouette(attrs) => {
            let ctx = SilhouetteContext {
                unit: definition.unit,
                gauge,
                measurements: definition.measurements.as_ref(),
                stitch_pattern: definition.stitch_pattern.as_ref(),
                settings,
            };
            calculate_silhouette(component, attrs, &ctx)
        }
        ComponentAttributes::TriangularShawl(attrs) => {
            let shawl = calculate_shawl(attrs, gauge, settings)?;
            let schematic = SchematicDimensions {
                bottom_width: stitches_to_length_cm(shawl.cast_on_stitches, gauge).0,
                top_width: stitches_to_length_cm(shawl.final_stitch_count, gauge).0,
                length: shawl.length_cm,
            };
            Ok(ComponentCalculation {
                component_key: component.component_key.clone(),
                display_name: component.display_name.clone(),
                cast_on_stitches: shawl.cast_on_stitches,
                length_in_rows: shawl.total_rows,
                final_stitch_count: shawl.final_stitch_count,
                finished_dimensions: FinishedDimensions {
                    width_cm: shawl.width_cm,
                    length_cm: shawl.length_cm,
                },
                shaping: shawl.shaping,
                construction_notes: shawl.construction_notes,
                schematic,
                details: ComponentDetails::TriangularShawl {
                    construction_method: attrs.construction_method,
                    work_style: attrs.work_style,
                    complexity: shawl.complexity,
                    peak_stitch_count: shawl.peak_stitch_count,
                    effective_shaping_rows: shawl.effective_shaping_rows,
                },
            })
        }
    }
}
