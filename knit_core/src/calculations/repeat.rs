//! # Stitch Pattern Repeat Integration
//!
//! Fits a motif with a fixed stitch-repeat width into a component of
//! `target_stitch_count` stitches, keeping `desired_edge_stitches` plain
//! stitches on each side.
//!
//! ```text
//! |edge|filler|rep|rep|rep|...|rep|filler|edge|
//!       \___ available width for pattern ___/
//! ```
//!
//! Options are generated in a fixed order:
//!
//! 1. `center_with_stockinette` - keep the count, centre the full repeats and
//!    fill the remainder with stockinette (only when at least one repeat fits)
//! 2. `adjust_for_full_repeats` - round the count up to the next repeat boundary
//!    (only when stitches remain)
//! 3. `increase_to_minimum` - no repeat fits; the smallest count that holds one
//!
//! ## Example
//!
//! ```rust
//! use knit_core::calculations::repeat::{integrate_repeat, RepeatIntegrationInput};
//!
//! let input = RepeatIntegrationInput::new(100, 8, 3, "Seed Rib");
//! let layout = integrate_repeat(&input).unwrap();
//! assert_eq!(layout.full_repeats, 11);
//! assert_eq!(layout.remaining_stitches, 6);
//! assert_eq!(layout.suggested_adjusted_stitch_count, 102);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::conversion::with_edges;
use crate::errors::{PatternError, PatternResult};

/// Inputs for a repeat layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatIntegrationInput {
    pub target_stitch_count: u32,
    pub stitch_repeat_width: u32,
    pub desired_edge_stitches: u32,
    /// Used only in option descriptions
    pub pattern_name: String,
}

impl RepeatIntegrationInput {
    pub fn new(
        target_stitch_count: u32,
        stitch_repeat_width: u32,
        desired_edge_stitches: u32,
        pattern_name: impl Into<String>,
    ) -> Self {
        RepeatIntegrationInput {
            target_stitch_count,
            stitch_repeat_width,
            desired_edge_stitches,
            pattern_name: pattern_name.into(),
        }
    }

    /// Check the layout preconditions.
    pub fn validate(&self) -> PatternResult<()> {
        if self.target_stitch_count == 0 {
            return Err(PatternError::invalid_input(
                "targetStitchCount",
                "0",
                "Target stitch count must be positive",
            ));
        }
        if self.stitch_repeat_width == 0 {
            return Err(PatternError::invalid_input(
                "stitchRepeatWidth",
                "0",
                "Stitch repeat must be at least one stitch wide",
            ));
        }
        if 2 * u64::from(self.desired_edge_stitches) >= u64::from(self.target_stitch_count) {
            return Err(PatternError::invalid_input(
                "desiredEdgeStitches",
                self.desired_edge_stitches.to_string(),
                format!(
                    "Edge stitches on both sides must leave room for the pattern in {} stitches",
                    self.target_stitch_count
                ),
            ));
        }
        Ok(())
    }
}

/// Kind of layout option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationOptionType {
    CenterWithStockinette,
    AdjustForFullRepeats,
    IncreaseToMinimum,
}

/// One candidate layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationOption {
    #[serde(rename = "type")]
    pub option_type: IntegrationOptionType,

    /// Stitch count of the whole row under this option
    pub total_stitches: u32,

    pub edge_stitches_each_side: u32,

    /// Stockinette filler on the first side; the other side gets this plus
    /// `centering_offset_stitches`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stockinette_stitches_each_side: Option<u32>,

    /// 1 when the filler cannot be split evenly, else 0
    pub centering_offset_stitches: u32,

    /// Full motif repeats across the row
    pub pattern_repeats: u32,

    pub description: String,
}

/// Result of fitting a repeat into a stitch budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatIntegration {
    pub full_repeats: u32,
    pub remaining_stitches: u32,
    /// Second option's total when there is one, else the unmodified target
    pub suggested_adjusted_stitch_count: u32,
    pub options: Vec<IntegrationOption>,
    pub available_width_for_pattern: u32,
    pub stitches_used_by_repeats: u32,
}

impl RepeatIntegration {
    pub fn option(&self, option_type: IntegrationOptionType) -> Option<&IntegrationOption> {
        self.options.iter().find(|o| o.option_type == option_type)
    }

    /// Whether the motif divides the available width exactly
    pub fn fits_exactly(&self) -> bool {
        self.full_repeats > 0 && self.remaining_stitches == 0
    }
}

/// Lay out a stitch repeat inside a fixed stitch budget.
///
/// # Errors
///
/// `InvalidInput` when the target is zero, the repeat width is zero, or the
/// edge stitches leave no room for the pattern.
pub fn integrate_repeat(input: &RepeatIntegrationInput) -> PatternResult<RepeatIntegration> {
    input.validate()?;

    let width = input.stitch_repeat_width;
    let edge = input.desired_edge_stitches;
    let name = input.pattern_name.as_str();

    let available = input.target_stitch_count - 2 * edge;
    let full_repeats = available / width;
    let used = full_repeats * width;
    let remaining = available - used;

    let mut options = Vec::with_capacity(2);

    if full_repeats > 0 {
        let filler = remaining / 2;
        let offset = remaining % 2;
        let description = if remaining == 0 {
            format!(
                "{} repeats of {} fill the row exactly between {} edge stitches each side",
                full_repeats, name, edge
            )
        } else {
            format!(
                "Work {} repeats of {} centred, with {} stockinette stitches on one side and {} on the other, plus {} edge stitches each side",
                full_repeats,
                name,
                filler,
                filler + offset,
                edge
            )
        };
        options.push(IntegrationOption {
            option_type: IntegrationOptionType::CenterWithStockinette,
            total_stitches: input.target_stitch_count,
            edge_stitches_each_side: edge,
            stockinette_stitches_each_side: Some(filler),
            centering_offset_stitches: offset,
            pattern_repeats: full_repeats,
            description,
        });
    }

    if remaining > 0 {
        let repeats = full_repeats + 1;
        let total = repeats
            .checked_mul(width)
            .and_then(|body| with_edges(body, edge))
            .ok_or_else(|| too_wide(input))?;
        options.push(IntegrationOption {
            option_type: IntegrationOptionType::AdjustForFullRepeats,
            total_stitches: total,
            edge_stitches_each_side: edge,
            stockinette_stitches_each_side: None,
            centering_offset_stitches: 0,
            pattern_repeats: repeats,
            description: format!(
                "Cast on {} stitches (+{}) for {} full repeats of {}",
                total,
                total - input.target_stitch_count,
                repeats,
                name
            ),
        });
    }

    if full_repeats == 0 {
        let minimum = with_edges(width, edge).ok_or_else(|| too_wide(input))?;
        options.push(IntegrationOption {
            option_type: IntegrationOptionType::IncreaseToMinimum,
            total_stitches: minimum,
            edge_stitches_each_side: edge,
            stockinette_stitches_each_side: None,
            centering_offset_stitches: 0,
            pattern_repeats: 1,
            description: format!(
                "No full repeat of {} ({} sts) fits in {} available stitches; at least {} stitches are needed",
                name, width, available, minimum
            ),
        });
        tracing::warn!(
            pattern = name,
            repeat_width = width,
            available,
            minimum,
            "stitch repeat does not fit component"
        );
    }

    let suggested = options
        .get(1)
        .map(|o| o.total_stitches)
        .unwrap_or(input.target_stitch_count);

    tracing::debug!(
        target = input.target_stitch_count,
        full_repeats,
        remaining,
        suggested,
        "integrated stitch repeat"
    );

    Ok(RepeatIntegration {
        full_repeats,
        remaining_stitches: remaining,
        suggested_adjusted_stitch_count: suggested,
        options,
        available_width_for_pattern: available,
        stitches_used_by_repeats: used,
    })
}

fn too_wide(input: &RepeatIntegrationInput) -> PatternError {
    PatternError::invalid_input(
        "stitchRepeatWidth",
        input.stitch_repeat_width.to_string(),
        "Repeat plus edge stitches exceeds the largest supported stitch count",
    )
}
