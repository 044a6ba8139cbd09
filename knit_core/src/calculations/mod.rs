//! # Pattern Calculations
//!
//! Pure numeric functions that turn validated pattern inputs into knitting
//! math. Each calculation follows the pattern:
//!
//! - `*Input` / `*Attributes` - Input parameters (JSON-serializable)
//! - `*Result` / `*Calculation` - Results (JSON-serializable)
//! - a free function `input -> PatternResult<result>` with no side effects
//!
//! ## Available Calculations
//!
//! - [`conversion`] - Dimension to stitch/row counts, and back
//! - [`repeat`] - Fitting a stitch-pattern repeat into a stitch budget
//! - [`shaping`] - Evenly spaced increase/decrease schedules
//! - [`silhouette`] - Generic panels with optional edge shaping
//! - [`shawl`] - Triangular shawls by construction method
//! - [`yarn_estimate`] - Yarn length, weight and skein count
//! - [`pattern`] - The whole-pattern orchestrator

pub mod conversion;
pub mod pattern;
pub mod repeat;
pub mod shaping;
pub mod shawl;
pub mod silhouette;
pub mod yarn_estimate;

// Re-export commonly used types
pub use conversion::{convert_dimension, round_count, RoundingRule, StitchRowCount, STITCH_ROUNDING};
pub use pattern::{
    calculate_pattern, calculate_pattern_with_profiles, CalculatedPatternDetails, ComponentCalculation,
    ComponentDetails, FinishedDimensions, SchematicDimensions,
};
pub use repeat::{integrate_repeat, IntegrationOption, IntegrationOptionType, RepeatIntegration, RepeatIntegrationInput};
pub use shaping::{ShapingKind, ShapingStep};
pub use shawl::{calculate_shawl, ShawlCalculation, ShawlComplexity};
pub use yarn_estimate::{
    estimate_yarn, GarmentSize, ProjectDimensions, ProjectSpec, ProjectType, YarnEstimateInput, YarnEstimateResult,
};
