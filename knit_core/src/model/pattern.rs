//! # Pattern Definition
//!
//! [`PatternDefinition`] is the whole request document: metadata, gauge, yarn,
//! stitch motif, measurements and garment components. It arrives already
//! deserialized from the API layer (or from a `.json` file via
//! [`crate::file_io`]) and is checked by [`crate::validation`] before any
//! calculation runs.
//!
//! ```text
//! PatternDefinition
//! ├── metadata: PatternMetadata (id, schema version, timestamps)
//! ├── unit: LengthUnit (unit of fixed dimensions)
//! ├── gauge / gauge_profile_id
//! ├── yarn / yarn_profile_id
//! ├── stitch_pattern: Option<StitchPatternDefinition>
//! ├── measurements: Option<Measurements>
//! ├── components: Vec<ComponentDefinition>
//! └── yarn_project: Option<ProjectSpec> (yarn estimate request)
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::yarn_estimate::ProjectSpec;
use crate::model::garment::{ComponentDefinition, Measurements};
use crate::model::gauge::GaugeData;
use crate::model::stitch_pattern::StitchPatternDefinition;
use crate::model::yarn::YarnInfo;
use crate::units::LengthUnit;

/// Current schema version for pattern documents
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Identity and versioning fields.
///
/// Kept as raw strings: format checking is the validator's job, so a bad UUID
/// is reported as a field-scoped error instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// RFC 3339 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// RFC 3339 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl PatternMetadata {
    /// Fresh metadata with a random id, current schema version and timestamps
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        PatternMetadata {
            pattern_id: Some(Uuid::new_v4().to_string()),
            schema_version: Some(SCHEMA_VERSION.to_string()),
            name: Some(name.into()),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        }
    }
}

/// A complete pattern document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternDefinition {
    #[serde(default)]
    pub metadata: PatternMetadata,

    /// Unit of every `fixed` dimension in the components
    #[serde(default)]
    pub unit: LengthUnit,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gauge: Option<GaugeData>,

    /// Stored gauge to use when `gauge` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gauge_profile_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yarn: Option<YarnInfo>,

    /// Stored yarn to use when `yarn` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yarn_profile_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stitch_pattern: Option<StitchPatternDefinition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements: Option<Measurements>,

    #[serde(default)]
    pub components: Vec<ComponentDefinition>,

    /// Request a yarn quantity estimate for this project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yarn_project: Option<ProjectSpec>,
}

impl PatternDefinition {
    pub fn new(name: impl Into<String>, gauge: GaugeData) -> Self {
        PatternDefinition {
            metadata: PatternMetadata::new(name),
            unit: gauge.unit,
            gauge: Some(gauge),
            ..Default::default()
        }
    }

    pub fn with_component(mut self, component: ComponentDefinition) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_yarn(mut self, yarn: YarnInfo) -> Self {
        self.yarn = Some(yarn);
        self
    }

    pub fn with_stitch_pattern(mut self, pattern: StitchPatternDefinition) -> Self {
        self.stitch_pattern = Some(pattern);
        self
    }

    pub fn with_measurements(mut self, measurements: Measurements) -> Self {
        self.measurements = Some(measurements);
        self
    }

    pub fn with_yarn_project(mut self, project: ProjectSpec) -> Self {
        self.yarn_project = Some(project);
        self
    }

    /// Display name for messages, falling back to the id
    pub fn display_name(&self) -> &str {
        self.metadata
            .name
            .as_deref()
            .or(self.metadata.pattern_id.as_deref())
            .unwrap_or("untitled pattern")
    }
}
