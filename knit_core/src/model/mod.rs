//! # Pattern Data Model
//!
//! Input types shared by every calculation. All of them are plain
//! JSON-serializable values, built fresh per request and never mutated by
//! the calculation code.
//!
//! - [`gauge`] - Stitch/row gauge and swatch normalisation
//! - [`yarn`] - Yarn weight categories and skein data
//! - [`stitch_pattern`] - Repeating stitch motifs
//! - [`garment`] - Components, dimensions and measurements
//! - [`pattern`] - The complete pattern document

pub mod garment;
pub mod gauge;
pub mod pattern;
pub mod stitch_pattern;
pub mod yarn;

pub use garment::{
    ComponentAttributes, ComponentDefinition, ConstructionMethod, Dimension, MeasurementKey,
    Measurements, SilhouetteAttributes, TriangularShawlAttributes, WorkStyle,
};
pub use gauge::{GaugeData, GaugeProfile, GaugeSwatch};
pub use pattern::{PatternDefinition, PatternMetadata, SCHEMA_VERSION};
pub use stitch_pattern::StitchPatternDefinition;
pub use yarn::{YarnInfo, YarnProfile, YarnWeightCategory};
