//! Property tests for the calculation invariants.

use proptest::prelude::*;

use knit_core::calculations::conversion::convert_dimension;
use knit_core::calculations::repeat::{integrate_repeat, IntegrationOptionType, RepeatIntegrationInput};
use knit_core::calculations::shaping::{plan_shaping, ShapingKind, ShapingRequest};
use knit_core::calculations::yarn_estimate::estimate_with_factor;
use knit_core::model::{GaugeData, YarnInfo, YarnWeightCategory};
use knit_core::units::LengthUnit;

fn repeat_input() -> impl Strategy<Value = RepeatIntegrationInput> {
    (1u32..=40, 0u32..=10)
        .prop_flat_map(|(width, edge)| (2 * edge + 1..=2 * edge + 400, Just(width), Just(edge)))
        .prop_map(|(target, width, edge)| RepeatIntegrationInput::new(target, width, edge, "motif"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: edges, repeats and remainder partition the target exactly.
    #[test]
    fn property_repeat_partition(input in repeat_input()) {
        let layout = integrate_repeat(&input).unwrap();
        let edge = input.desired_edge_stitches;

        prop_assert_eq!(layout.available_width_for_pattern, input.target_stitch_count - 2 * edge);
        prop_assert_eq!(layout.stitches_used_by_repeats, layout.full_repeats * input.stitch_repeat_width);
        prop_assert_eq!(
            2 * edge + layout.stitches_used_by_repeats + layout.remaining_stitches,
            input.target_stitch_count
        );
        prop_assert!(layout.remaining_stitches < input.stitch_repeat_width);
        prop_assert!(!layout.options.is_empty());
    }

    /// PROPERTY: rounding up to full repeats always adds stitches and lands on a repeat boundary.
    #[test]
    fn property_adjustment_is_monotonic(input in repeat_input()) {
        let layout = integrate_repeat(&input).unwrap();
        let adjust = layout.option(IntegrationOptionType::AdjustForFullRepeats);

        if layout.remaining_stitches == 0 {
            prop_assert!(adjust.is_none());
            prop_assert_eq!(layout.suggested_adjusted_stitch_count, input.target_stitch_count);
        } else {
            let adjust = adjust.unwrap();
            prop_assert!(adjust.total_stitches > input.target_stitch_count);
            prop_assert_eq!(
                adjust.total_stitches,
                (layout.full_repeats + 1) * input.stitch_repeat_width + 2 * input.desired_edge_stitches
            );
        }
    }

    /// PROPERTY: centring filler is split with at most one stitch of difference.
    #[test]
    fn property_centering_is_balanced(input in repeat_input()) {
        let layout = integrate_repeat(&input).unwrap();
        if let Some(center) = layout.option(IntegrationOptionType::CenterWithStockinette) {
            let filler = center.stockinette_stitches_each_side.unwrap();
            prop_assert!(center.centering_offset_stitches <= 1);
            prop_assert_eq!(2 * filler + center.centering_offset_stitches, layout.remaining_stitches);
        }
    }

    /// PROPERTY: a shaping plan changes the count by exactly the requested amount.
    #[test]
    fn property_shaping_reaches_target(
        start in 10u32..300,
        change in 0u32..200,
        per_row in 1u32..=4,
        rows in 1u32..400,
        increase in any::<bool>(),
    ) {
        let kind = if increase { ShapingKind::Increase } else { ShapingKind::Decrease };
        let change = if increase { change } else { change.min(start) };
        let plan = plan_shaping(&ShapingRequest {
            kind,
            starting_count: start,
            total_change: change,
            stitches_per_row: per_row,
            eligible_rows: rows,
            row_stride: 1,
            row_offset: 0,
            row_word: "row",
            placement: "at each edge",
        })
        .unwrap();

        let expected = if increase { start + change } else { start - change };
        prop_assert_eq!(plan.final_stitch_count, expected);

        let shaped: u32 = plan.steps.iter().map(|s| s.times * s.stitches_per_shaping_row).sum();
        prop_assert_eq!(shaped, change);

        let shaping_rows: u32 = plan.steps.iter().map(|s| s.times).sum();
        prop_assert!(shaping_rows <= rows);
    }

    /// PROPERTY: converted counts never go negative and grow with the dimension.
    #[test]
    fn property_conversion_is_monotonic(
        a in 0.0f64..500.0,
        b in 0.0f64..500.0,
        stitches in 5.0f64..40.0,
        rows in 5.0f64..60.0,
    ) {
        let gauge = GaugeData::new(stitches, rows);
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        let lo = convert_dimension(small, LengthUnit::Cm, &gauge).unwrap();
        let hi = convert_dimension(large, LengthUnit::Cm, &gauge).unwrap();
        prop_assert!(lo.stitches <= hi.stitches);
        prop_assert!(lo.rows <= hi.rows);
    }

    /// PROPERTY: at least one skein, and the buffer is applied exactly once.
    #[test]
    fn property_yarn_buffer_and_skeins(
        area in 0.0f64..5.0,
        factor in 50.0f64..1500.0,
        meterage in proptest::option::of(10.0f64..1000.0),
        grams in proptest::option::of(10.0f64..200.0),
        buffer in 0.0f64..50.0,
    ) {
        let yarn = YarnInfo::new(YarnWeightCategory::Medium).with_skein(meterage, grams);
        let estimate = estimate_with_factor(area, factor, &yarn, buffer);

        prop_assert!(estimate.number_of_skeins >= 1);
        let expected = area * factor * (1.0 + buffer / 100.0);
        prop_assert!((estimate.total_length_meters - expected).abs() <= 0.005 + 1e-9 * expected);

        if let Some(meterage) = meterage {
            let needed = (estimate.total_length_meters / meterage).ceil().max(1.0);
            prop_assert_eq!(estimate.number_of_skeins as f64, needed);
        }
    }
}
