//! # knit_core - Garment Pattern Calculation Engine
//!
//! `knit_core` turns a knitting pattern definition (gauge, yarn, stitch
//! pattern, measurements, garment components) into reproducible knitting
//! math: stitch and row counts, stitch-pattern repeat layout, shaping
//! schedules and yarn quantity. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured, field-scoped errors, not just strings
//! - **Validate First**: Nothing is calculated from input that failed validation
//!
//! ## Quick Start
//!
//! ```rust
//! use knit_core::calculations::repeat::{integrate_repeat, RepeatIntegrationInput};
//!
//! let layout = integrate_repeat(&RepeatIntegrationInput::new(100, 8, 3, "Moss Diamond")).unwrap();
//! assert_eq!(layout.full_repeats, 11);
//! assert_eq!(layout.remaining_stitches, 6);
//! ```
//!
//! ## Modules
//!
//! - [`model`] - Gauge, yarn, stitch pattern, garment and pattern document types
//! - [`calculations`] - Conversion, repeat fitting, shaping, shawls, yarn, orchestration
//! - [`validation`] - Field-scoped errors and warnings before calculation
//! - [`profiles`] - Lookup seam for stored gauge and yarn profiles
//! - [`settings`] - Calculation settings loaded from TOML
//! - [`units`] - Type-safe length units
//! - [`errors`] - Structured error types
//! - [`file_io`] - Pattern loading and atomic JSON saves

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod model;
pub mod profiles;
pub mod settings;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate_pattern, calculate_pattern_with_profiles, CalculatedPatternDetails};
pub use errors::{PatternError, PatternResult};
pub use file_io::{load_pattern, save_json};
pub use model::{PatternDefinition, PatternMetadata};
pub use settings::{load_settings, CalculationSettings};
pub use validation::{validate_pattern, ValidationIssue, ValidationReport};
