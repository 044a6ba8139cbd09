//! Garment components and body measurements.
//!
//! A garment is a list of [`ComponentDefinition`]s. Each component carries a
//! closed, tagged [`ComponentAttributes`] payload so every calculation path
//! is matched exhaustively.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "component_key": "back",
//!   "display_name": "Back Panel",
//!   "attributes": {
//!     "type": "silhouette",
//!     "bottom_width": { "kind": "from_measurement", "measurement": "chest_circumference", "fraction": 0.5, "ease": 5.0 },
//!     "length": { "kind": "fixed", "value": 60.0 },
//!     "use_stitch_pattern": true
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{PatternError, PatternResult};
use crate::units::{Centimeters, LengthUnit};

/// Body or finished-garment measurement names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKey {
    ChestCircumference,
    WaistCircumference,
    HipCircumference,
    FinishedLength,
    SleeveLength,
    UpperArmCircumference,
    WristCircumference,
    HeadCircumference,
    ShoulderWidth,
}

impl MeasurementKey {
    pub const ALL: [MeasurementKey; 9] = [
        MeasurementKey::ChestCircumference,
        MeasurementKey::WaistCircumference,
        MeasurementKey::HipCircumference,
        MeasurementKey::FinishedLength,
        MeasurementKey::SleeveLength,
        MeasurementKey::UpperArmCircumference,
        MeasurementKey::WristCircumference,
        MeasurementKey::HeadCircumference,
        MeasurementKey::ShoulderWidth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKey::ChestCircumference => "chest_circumference",
            MeasurementKey::WaistCircumference => "waist_circumference",
            MeasurementKey::HipCircumference => "hip_circumference",
            MeasurementKey::FinishedLength => "finished_length",
            MeasurementKey::SleeveLength => "sleeve_length",
            MeasurementKey::UpperArmCircumference => "upper_arm_circumference",
            MeasurementKey::WristCircumference => "wrist_circumference",
            MeasurementKey::HeadCircumference => "head_circumference",
            MeasurementKey::ShoulderWidth => "shoulder_width",
        }
    }
}

impl fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of measurements in one declared unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(default)]
    pub unit: LengthUnit,
    #[serde(default)]
    pub values: BTreeMap<MeasurementKey, f64>,
}

impl Measurements {
    pub fn new(unit: LengthUnit) -> Self {
        Measurements {
            unit,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: MeasurementKey, value: f64) -> Self {
        self.values.insert(key, value);
        self
    }

    /// Measurement converted to centimetres
    pub fn get_cm(&self, key: MeasurementKey) -> Option<Centimeters> {
        self.values
            .get(&key)
            .map(|v| Centimeters::from_unit(*v, self.unit))
    }
}

/// A physical dimension of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dimension {
    /// A literal value in the pattern's unit
    Fixed { value: f64 },
    /// `measurement * fraction + ease`; ease is in the measurement's unit
    FromMeasurement {
        measurement: MeasurementKey,
        #[serde(default = "default_fraction")]
        fraction: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ease: Option<f64>,
    },
}

fn default_fraction() -> f64 {
    1.0
}

impl Dimension {
    pub fn fixed(value: f64) -> Self {
        Dimension::Fixed { value }
    }

    pub fn from_measurement(measurement: MeasurementKey, fraction: f64, ease: Option<f64>) -> Self {
        Dimension::FromMeasurement {
            measurement,
            fraction,
            ease,
        }
    }

    /// The measurement this dimension depends on, if any
    pub fn measurement(&self) -> Option<MeasurementKey> {
        match self {
            Dimension::Fixed { .. } => None,
            Dimension::FromMeasurement { measurement, .. } => Some(*measurement),
        }
    }

    /// Resolve to centimetres.
    ///
    /// Fails when the referenced measurement is absent or the result is not
    /// a positive length (negative ease can push it below zero).
    pub fn resolve_cm(
        &self,
        field: &str,
        pattern_unit: LengthUnit,
        measurements: Option<&Measurements>,
    ) -> PatternResult<Centimeters> {
        let resolved = match self {
            Dimension::Fixed { value } => Centimeters::from_unit(*value, pattern_unit),
            Dimension::FromMeasurement {
                measurement,
                fraction,
                ease,
            } => {
                let set = measurements.ok_or_else(|| {
                    PatternError::missing_field(format!("measurements.{}", measurement))
                })?;
                let base = set.get_cm(*measurement).ok_or_else(|| {
                    PatternError::missing_field(format!("measurements.{}", measurement))
                })?;
                // Ease is written in the same unit as the measurement it adjusts
                let ease_cm = ease.map(|e| set.unit.to_cm(e)).unwrap_or(0.0);
                base * *fraction + Centimeters(ease_cm)
            }
        };
        if !(resolved.0.is_finite() && resolved.0 > 0.0) {
            return Err(PatternError::invalid_input(
                field,
                format!("{:.2} cm", resolved.0),
                "Resolved dimension must be a positive length",
            ));
        }
        Ok(resolved)
    }
}

/// How a triangular shawl is constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionMethod {
    /// Small centre cast-on, symmetric increases every N rows
    TopDownCenterOut,
    /// Worked from one wing tip across to the other
    SideToSide,
    /// Full wingspan cast-on, decreased toward the point
    BottomUp,
}

impl ConstructionMethod {
    pub const ALL: [ConstructionMethod; 3] = [
        ConstructionMethod::TopDownCenterOut,
        ConstructionMethod::SideToSide,
        ConstructionMethod::BottomUp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructionMethod::TopDownCenterOut => "top_down_center_out",
            ConstructionMethod::SideToSide => "side_to_side",
            ConstructionMethod::BottomUp => "bottom_up",
        }
    }
}

/// Whether the work is turned every row or joined into rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkStyle {
    #[default]
    Flat,
    InTheRound,
}

impl WorkStyle {
    pub const ALL: [WorkStyle; 2] = [WorkStyle::Flat, WorkStyle::InTheRound];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStyle::Flat => "flat",
            WorkStyle::InTheRound => "in_the_round",
        }
    }

    /// What a single pass of work is called
    pub fn row_word(&self) -> &'static str {
        match self {
            WorkStyle::Flat => "row",
            WorkStyle::InTheRound => "round",
        }
    }
}

/// A generic panel: width at the bottom edge, optional width at the top, length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilhouetteAttributes {
    pub bottom_width: Dimension,

    /// Width at the top edge; `None` means a straight panel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_width: Option<Dimension>,

    pub length: Dimension,

    /// Non-patterned edge stitches each side; `None` uses the settings default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_stitches: Option<u32>,

    /// Lay the pattern's stitch motif across this component
    #[serde(default)]
    pub use_stitch_pattern: bool,
}

/// Triangular shawl descriptor. Dimensions are always centimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangularShawlAttributes {
    pub target_wingspan_cm: f64,
    pub target_depth_cm: f64,
    pub construction_method: ConstructionMethod,
    #[serde(default)]
    pub work_style: WorkStyle,
    #[serde(default)]
    pub border_stitches_each_side: u32,
}

/// Component payload, one variant per component kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentAttributes {
    Silhouette(SilhouetteAttributes),
    TriangularShawl(TriangularShawlAttributes),
}

impl ComponentAttributes {
    pub fn kind(&self) -> &'static str {
        match self {
            ComponentAttributes::Silhouette(_) => "silhouette",
            ComponentAttributes::TriangularShawl(_) => "triangular_shawl",
        }
    }
}

/// One piece of a garment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    /// Unique within a garment; keys the calculated output
    pub component_key: String,
    pub display_name: String,
    pub attributes: ComponentAttributes,
}

impl ComponentDefinition {
    pub fn new(component_key: impl Into<String>, display_name: impl Into<String>, attributes: ComponentAttributes) -> Self {
        ComponentDefinition {
            component_key: component_key.into(),
            display_name: display_name.into(),
            attributes,
        }
    }
}
