//! End-to-end calculation scenarios through the public API.

use knit_core::calculations::conversion::convert_dimension;
use knit_core::calculations::repeat::{integrate_repeat, IntegrationOptionType, RepeatIntegrationInput};
use knit_core::calculations::yarn_estimate::{estimate_with_factor, GarmentSize, ProjectSpec, ProjectType};
use knit_core::calculations::{calculate_pattern, ComponentDetails, ShapingKind};
use knit_core::model::garment::{
    ComponentAttributes, ComponentDefinition, ConstructionMethod, Dimension, MeasurementKey, Measurements,
    SilhouetteAttributes, TriangularShawlAttributes, WorkStyle,
};
use knit_core::model::{GaugeData, PatternDefinition, StitchPatternDefinition, YarnInfo, YarnWeightCategory};
use knit_core::units::LengthUnit;
use knit_core::validation::{parse_pattern, validate_json};
use knit_core::{CalculationSettings, PatternError};

#[test]
fn scenario_repeat_centred_in_front_panel() {
    let layout = integrate_repeat(&RepeatIntegrationInput::new(100, 8, 3, "Moss Diamond")).unwrap();

    assert_eq!(layout.available_width_for_pattern, 94);
    assert_eq!(layout.full_repeats, 11);
    assert_eq!(layout.stitches_used_by_repeats, 88);
    assert_eq!(layout.remaining_stitches, 6);

    let center = layout.option(IntegrationOptionType::CenterWithStockinette).unwrap();
    assert_eq!(center.stockinette_stitches_each_side, Some(3));
    assert_eq!(center.centering_offset_stitches, 0);
    assert_eq!(center.edge_stitches_each_side, 3);
}

#[test]
fn scenario_repeat_wider_than_component() {
    let layout = integrate_repeat(&RepeatIntegrationInput::new(20, 30, 2, "Leaf Lace")).unwrap();

    assert_eq!(layout.full_repeats, 0);
    let options: Vec<IntegrationOptionType> = layout.options.iter().map(|o| o.option_type).collect();
    assert_eq!(
        options,
        vec![IntegrationOptionType::AdjustForFullRepeats, IntegrationOptionType::IncreaseToMinimum]
    );
    assert!(layout.options.iter().all(|o| o.total_stitches == 34));
}

#[test]
fn scenario_width_to_stitches() {
    let counts = convert_dimension(50.0, LengthUnit::Cm, &GaugeData::new(22.0, 30.0)).unwrap();
    assert_eq!(counts.stitches, 110);
    assert_eq!(counts.rows, 150);
}

#[test]
fn scenario_yarn_for_one_square_metre() {
    let yarn = YarnInfo::new(YarnWeightCategory::SuperBulky).with_skein(Some(100.0), None);
    let estimate = estimate_with_factor(1.0, 200.0, &yarn, 10.0);
    assert_eq!(format!("{:.2}", estimate.total_length_meters), "220.00");
    assert_eq!(estimate.number_of_skeins, 3);
}

fn sweater() -> PatternDefinition {
    let front = ComponentDefinition::new(
        "front",
        "Front",
        ComponentAttributes::Silhouette(SilhouetteAttributes {
            bottom_width: Dimension::from_measurement(MeasurementKey::ChestCircumference, 0.5, Some(4.0)),
            top_width: Some(Dimension::fixed(44.0)),
            length: Dimension::fixed(60.0),
            edge_stitches: Some(2),
            use_stitch_pattern: true,
        }),
    );
    let sleeve = ComponentDefinition::new(
        "sleeve",
        "Sleeve",
        ComponentAttributes::Silhouette(SilhouetteAttributes {
            bottom_width: Dimension::from_measurement(MeasurementKey::WristCircumference, 1.0, Some(4.0)),
            top_width: Some(Dimension::from_measurement(MeasurementKey::UpperArmCircumference, 1.0, Some(6.0))),
            length: Dimension::from_measurement(MeasurementKey::SleeveLength, 1.0, None),
            edge_stitches: None,
            use_stitch_pattern: false,
        }),
    );

    PatternDefinition::new("Harbour Pullover", GaugeData::new(22.0, 30.0))
        .with_measurements(
            Measurements::new(LengthUnit::Cm)
                .with(MeasurementKey::ChestCircumference, 96.0)
                .with(MeasurementKey::WristCircumference, 16.0)
                .with(MeasurementKey::UpperArmCircumference, 30.0)
                .with(MeasurementKey::SleeveLength, 45.0),
        )
        .with_stitch_pattern(StitchPatternDefinition::new("Seed Rib", 8, 4))
        .with_yarn(YarnInfo::new(YarnWeightCategory::Medium).with_skein(Some(200.0), Some(100.0)))
        .with_component(front)
        .with_component(sleeve)
        .with_yarn_project(ProjectSpec::sized(ProjectType::Sweater, GarmentSize::M))
}

#[test]
fn scenario_full_sweater() {
    let details = calculate_pattern(&sweater(), &CalculationSettings::default()).unwrap();
    assert_eq!(details.pattern_name, "Harbour Pullover");

    // 52 cm -> 114 sts + 4 edge = 118; 114 available fit 14 repeats of 8, so 15 repeats + 4 = 124
    let front = details.component("front").unwrap();
    assert_eq!(front.cast_on_stitches, 124);
    assert_eq!(front.length_in_rows, 180);
    // 44 cm -> 97 + 4 = 101, carried over by the same +6 adjustment
    assert_eq!(front.final_stitch_count, 107);
    assert!(front.shaping.iter().all(|s| s.kind == ShapingKind::Decrease));
    match &front.details {
        ComponentDetails::Silhouette { repeat_layout, .. } => {
            assert_eq!(repeat_layout.as_ref().map(|l| l.full_repeats), Some(14));
        }
        other => panic!("unexpected details {:?}", other),
    }

    // 20 cm -> 44 + 4; 36 cm -> 79 + 4; 45 cm -> 135 rows
    let sleeve = details.component("sleeve").unwrap();
    assert_eq!(sleeve.cast_on_stitches, 48);
    assert_eq!(sleeve.final_stitch_count, 83);
    assert_eq!(sleeve.length_in_rows, 135);
    assert!(sleeve.shaping.iter().all(|s| s.kind == ShapingKind::Increase));

    assert_eq!(details.schematics.len(), 2);

    // 1.5 m2 * 500 m/m2 * 1.10
    let yarn = details.yarn_estimate.as_ref().unwrap();
    assert_eq!(yarn.total_length_meters, 825.0);
    assert_eq!(yarn.number_of_skeins, 5);
}

#[test]
fn scenario_invalid_sweater_reports_every_error() {
    let mut definition = sweater();
    definition.gauge = Some(GaugeData::new(0.0, 30.0));
    definition.measurements = Some(Measurements::new(LengthUnit::Cm).with(MeasurementKey::ChestCircumference, 96.0));

    let err = calculate_pattern(&definition, &CalculationSettings::default()).unwrap_err();
    let fields: Vec<String> = match err {
        PatternError::ValidationFailed { errors } => errors.into_iter().map(|e| e.field).collect(),
        other => panic!("expected validation failure, got {:?}", other),
    };
    assert!(fields.contains(&"gauge.stitches_per_10cm".to_string()));
    assert!(fields.contains(&"measurements.wrist_circumference".to_string()));
    assert!(fields.contains(&"measurements.sleeve_length".to_string()));
}

#[test]
fn scenario_document_validation() {
    let text = r#"{
        "metadata": {
            "pattern_id": "0b6f1f0e-8d3a-4a57-9a52-5d1f3b0c2a11",
            "schema_version": "0.1.0",
            "name": "Garter Scarf"
        },
        "gauge": {"stitches_per_10cm": 18, "rows_per_10cm": 36},
        "yarn": {"weight_category": "medium", "skein_meterage": 180},
        "components": [{
            "component_key": "body",
            "display_name": "Body",
            "attributes": {
                "type": "silhouette",
                "bottom_width": {"kind": "fixed", "value": 22},
                "length": {"kind": "fixed", "value": 170}
            }
        }],
        "yarn_project": {
            "project_type": "scarf",
            "dimensions": {"width": 22, "length": 170}
        }
    }"#;

    let (report, definition) = validate_json(text, &CalculationSettings::default());
    assert!(report.is_valid, "{:?}", report.errors);
    let definition = definition.unwrap();

    let details = calculate_pattern(&definition, &CalculationSettings::default()).unwrap();
    // 22 cm at 1.8 sts/cm = 39.6 -> 40, + 2 default edge stitches each side
    assert_eq!(details.components["body"].cast_on_stitches, 44);
    assert_eq!(details.components["body"].length_in_rows, 612);
    assert!(details.yarn_estimate.is_some());

    let broken = text.replace("\"medium\"", "\"chunky-ish\"");
    let (report, definition) = validate_json(&broken, &CalculationSettings::default());
    assert!(!report.is_valid);
    assert!(definition.is_none());
    assert_eq!(report.errors[0].field, "yarn.weight_category");
}

#[test]
fn scenario_unknown_construction_method_fails_per_field() {
    let text = r#"{
        "metadata": {"name": "Corner Wrap"},
        "gauge": {"stitches_per_10cm": 20, "rows_per_10cm": 30},
        "components": [{
            "component_key": "body",
            "display_name": "Body",
            "attributes": {
                "type": "triangular_shawl",
                "target_wingspan_cm": 160,
                "target_depth_cm": 70,
                "construction_method": "cornerwise",
                "work_style": "flat",
                "border_stitches_each_side": 3
            }
        }]
    }"#;

    let err = parse_pattern(text).unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_FAILED");
    match err {
        PatternError::ValidationFailed { errors } => {
            assert_eq!(errors[0].field, "components.body.attributes.construction_method");
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn scenario_shawl_border_too_wide_to_count() {
    let definition = PatternDefinition::new("Endless Border", GaugeData::new(20.0, 30.0)).with_component(
        ComponentDefinition::new(
            "body",
            "Body",
            ComponentAttributes::TriangularShawl(TriangularShawlAttributes {
                target_wingspan_cm: 160.0,
                target_depth_cm: 70.0,
                construction_method: ConstructionMethod::BottomUp,
                work_style: WorkStyle::Flat,
                border_stitches_each_side: 3_000_000_000,
            }),
        ),
    );

    match calculate_pattern(&definition, &CalculationSettings::default()).unwrap_err() {
        PatternError::ValidationFailed { errors } => {
            assert!(errors.iter().any(|e| e.field == "components.body.border_stitches_each_side"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}
