//! # Shaping Schedules
//!
//! Spreads a stitch-count change evenly over a run of rows.
//!
//! A change of `total_change` stitches made `stitches_per_row` at a time
//! needs `ceil(total_change / stitches_per_row)` shaping rows, placed every
//! `floor(eligible_rows / shaping_rows)` eligible rows. When there are more
//! shaping rows than eligible rows the schedule is compressed: every eligible
//! row shapes, with more stitches per row.
//!
//! `row_stride` maps eligible rows onto worked rows (2 = only every other
//! row/round may carry shaping).

use serde::{Deserialize, Serialize};

use crate::errors::{PatternError, PatternResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapingKind {
    Increase,
    Decrease,
}

impl ShapingKind {
    pub fn verb(&self) -> &'static str {
        match self {
            ShapingKind::Increase => "increase",
            ShapingKind::Decrease => "decrease",
        }
    }
}

/// One instruction-level shaping block: `times` shaping rows, the first at
/// `start_row`, then every `every_n_rows` rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapingStep {
    pub kind: ShapingKind,
    pub start_row: u32,
    pub every_n_rows: u32,
    pub times: u32,
    pub stitches_per_shaping_row: u32,
    pub stitch_count_after: u32,
    pub description: String,
}

/// A planned run of shaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapingPlan {
    pub steps: Vec<ShapingStep>,
    /// Shaping rows had to be packed tighter than requested
    pub compressed: bool,
    pub final_stitch_count: u32,
}

/// Where and how to shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapingRequest<'a> {
    pub kind: ShapingKind,
    pub starting_count: u32,
    pub total_change: u32,
    pub stitches_per_row: u32,
    pub eligible_rows: u32,
    pub row_stride: u32,
    /// Worked rows already completed before this run starts
    pub row_offset: u32,
    /// "row" or "round"
    pub row_word: &'a str,
    /// Where the shaping happens, e.g. "at each edge"
    pub placement: &'a str,
}

/// Build an evenly spaced shaping schedule.
///
/// # Errors
///
/// `CalculationFailed` when a change is requested but there are no rows to
/// make it in, or a decrease would remove more stitches than exist.
pub fn plan_shaping(request: &ShapingRequest<'_>) -> PatternResult<ShapingPlan> {
    let ShapingRequest {
        kind,
        starting_count,
        total_change,
        stitches_per_row,
        eligible_rows,
        row_stride,
        row_offset,
        row_word,
        placement,
    } = *request;

    if total_change == 0 {
        return Ok(ShapingPlan {
            steps: Vec::new(),
            compressed: false,
            final_stitch_count: starting_count,
        });
    }
    if eligible_rows == 0 {
        return Err(PatternError::calculation_failed(
            "shaping",
            format!("{} {} stitches requested but no {}s are available", kind.verb(), total_change, row_word),
        ));
    }
    if kind == ShapingKind::Decrease && total_change > starting_count {
        return Err(PatternError::calculation_failed(
            "shaping",
            format!("cannot decrease {} stitches from {}", total_change, starting_count),
        ));
    }

    if kind == ShapingKind::Increase && starting_count.checked_add(total_change).is_none() {
        return Err(PatternError::calculation_failed(
            "shaping",
            format!(
                "increasing {} stitches from {} exceeds the largest supported stitch count",
                total_change, starting_count
            ),
        ));
    }

    let per_row_requested = stitches_per_row.max(1);
    let mut shaping_rows = total_change.div_ceil(per_row_requested);
    let mut per_row = per_row_requested;
    let compressed = shaping_rows > eligible_rows;
    if compressed {
        per_row = total_change.div_ceil(eligible_rows);
        shaping_rows = total_change.div_ceil(per_row);
    }

    let interval = (eligible_rows / shaping_rows).max(1);
    let every = interval.checked_mul(row_stride.max(1)).ok_or_else(|| too_many_rows(row_word))?;
    let full_rows = total_change / per_row;
    let remainder = total_change % per_row;

    let apply = |count: u32, change: u32| match kind {
        ShapingKind::Increase => count + change,
        ShapingKind::Decrease => count - change,
    };

    let mut steps = Vec::with_capacity(2);
    let mut count = starting_count;

    if full_rows > 0 {
        count = apply(count, full_rows * per_row);
        steps.push(ShapingStep {
            kind,
            start_row: row_offset.checked_add(every).ok_or_else(|| too_many_rows(row_word))?,
            every_n_rows: every,
            times: full_rows,
            stitches_per_shaping_row: per_row,
            stitch_count_after: count,
            description: format!(
                "{} {} st{} {} every {} {}s, {} times",
                capitalize(kind.verb()),
                per_row,
                if per_row == 1 { "" } else { "s" },
                placement,
                every,
                row_word,
                full_rows
            ),
        });
    }

    if remainder > 0 {
        count = apply(count, remainder);
        let start_row = every
            .checked_mul(full_rows + 1)
            .and_then(|row| row.checked_add(row_offset))
            .ok_or_else(|| too_many_rows(row_word))?;
        steps.push(ShapingStep {
            kind,
            start_row,
            every_n_rows: every,
            times: 1,
            stitches_per_shaping_row: remainder,
            stitch_count_after: count,
            description: format!(
                "{} {} st{} once more on {} {}",
                capitalize(kind.verb()),
                remainder,
                if remainder == 1 { "" } else { "s" },
                row_word,
                start_row
            ),
        });
    }

    Ok(ShapingPlan {
        steps,
        compressed,
        final_stitch_count: count,
    })
}

fn too_many_rows(row_word: &str) -> PatternError {
    PatternError::calculation_failed(
        "shaping",
        format!("schedule runs past the largest supported {} number", row_word),
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: ShapingKind, start: u32, change: u32, per_row: u32, rows: u32) -> ShapingRequest<'static> {
        ShapingRequest {
            kind,
            starting_count: start,
            total_change: change,
            stitches_per_row: per_row,
            eligible_rows: rows,
            row_stride: 1,
            row_offset: 0,
            row_word: "row",
            placement: "at each edge",
        }
    }

    #[test]
    fn test_even_decreases() {
        let plan = plan_shaping(&request(ShapingKind::Decrease, 100, 20, 2, 100)).unwrap();
        assert!(!plan.compressed);
        assert_eq!(plan.steps.len(), 1);
        let step = &plan.steps[0];
        assert_eq!(step.times, 10);
        assert_eq!(step.every_n_rows, 10);
        assert_eq!(step.start_row, 10);
        assert_eq!(step.stitch_count_after, 80);
        assert_eq!(plan.final_stitch_count, 80);
    }

    #[test]
    fn test_odd_change_adds_single_stitch_row() {
        let plan = plan_shaping(&request(ShapingKind::Increase, 50, 7, 2, 60)).unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].times, 3);
        assert_eq!(plan.steps[1].stitches_per_shaping_row, 1);
        assert_eq!(plan.final_stitch_count, 57);
        // Last shaping row stays inside the available rows
        assert!(plan.steps[1].start_row <= 60);
    }

    #[test]
    fn test_compressed_schedule() {
        let plan = plan_shaping(&request(ShapingKind::Increase, 3, 400, 4, 50)).unwrap();
        assert!(plan.compressed);
        assert_eq!(plan.final_stitch_count, 403);
        let total_rows: u32 = plan.steps.iter().map(|s| s.times).sum();
        assert!(total_rows <= 50);
    }

    #[test]
    fn test_stride_and_offset() {
        let mut req = request(ShapingKind::Decrease, 40, 10, 1, 20);
        req.row_stride = 2;
        req.row_offset = 100;
        let plan = plan_shaping(&req).unwrap();
        assert_eq!(plan.steps[0].every_n_rows, 4);
        assert_eq!(plan.steps[0].start_row, 104);
    }

    #[test]
    fn test_count_overflow_is_an_error() {
        let err = plan_shaping(&request(ShapingKind::Increase, u32::MAX - 2, 10, 2, 40)).unwrap_err();
        assert_eq!(err.error_code(), "CALCULATION_FAILED");

        let mut req = request(ShapingKind::Decrease, 40, 1, 1, u32::MAX);
        req.row_stride = 2;
        let err = plan_shaping(&req).unwrap_err();
        assert_eq!(err.error_code(), "CALCULATION_FAILED");
    }

    #[test]
    fn test_no_change() {
        let plan = plan_shaping(&request(ShapingKind::Increase, 30, 0, 2, 0)).unwrap();
        assert!(plan.steps.is_empty());
        assert_eq!(plan.final_stitch_count, 30);
    }

    #[test]
    fn test_impossible_requests() {
        assert!(plan_shaping(&request(ShapingKind::Increase, 30, 4, 2, 0)).is_err());
        assert!(plan_shaping(&request(ShapingKind::Decrease, 3, 4, 2, 10)).is_err());
    }
}
