//! Stitch pattern (motif) definitions.

use serde::{Deserialize, Serialize};

/// A repeating stitch motif.
///
/// Only the repeat dimensions take part in calculations; `name` is used in
/// human-readable messages.
///
/// ## JSON Example
///
/// ```json
/// { "name": "Seed Rib", "stitch_repeat_width": 8, "row_repeat_height": 4 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StitchPatternDefinition {
    pub name: String,
    pub stitch_repeat_width: u32,
    pub row_repeat_height: u32,
}

impl StitchPatternDefinition {
    pub fn new(name: impl Into<String>, stitch_repeat_width: u32, row_repeat_height: u32) -> Self {
        StitchPatternDefinition {
            name: name.into(),
            stitch_repeat_width,
            row_repeat_height,
        }
    }

    /// Plain stockinette: a 1x1 repeat that fits any width
    pub fn stockinette() -> Self {
        StitchPatternDefinition::new("Stockinette", 1, 1)
    }

    /// Number of full vertical repeats that fit in `rows`
    pub fn full_row_repeats(&self, rows: u32) -> u32 {
        if self.row_repeat_height == 0 {
            return 0;
        }
        rows / self.row_repeat_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_row_repeats() {
        let pattern = StitchPatternDefinition::new("Cable", 12, 16);
        assert_eq!(pattern.full_row_repeats(100), 6);
        assert_eq!(pattern.full_row_repeats(15), 0);
        assert_eq!(StitchPatternDefinition::new("Broken", 4, 0).full_row_repeats(10), 0);
    }

    #[test]
    fn test_stockinette() {
        let st = StitchPatternDefinition::stockinette();
        assert_eq!(st.stitch_repeat_width, 1);
        assert_eq!(st.full_row_repeats(37), 37);
    }
}
