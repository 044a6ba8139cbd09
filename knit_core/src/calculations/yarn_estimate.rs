//! # Yarn Quantity Estimation
//!
//! Estimates how much yarn a project needs from its fabric area and the
//! yarn's weight category.
//!
//! ```text
//! area_m2      = project area formula (size table or dimensions)
//! yarn_factor  = metres per m² for the weight category
//! base_length  = area_m2 * yarn_factor
//! total_length = base_length * (1 + buffer% / 100)
//! total_weight = total_length * skein_grams / skein_meters   (0 when unknown)
//! skeins       = ceil(total_length / skein_meters)
//!              | ceil(total_weight / skein_grams)
//!              | 1
//! ```
//!
//! Lengths and weights are reported to 2 decimals, area to 4. The skein
//! count is never below 1.
//!
//! ## Example
//!
//! ```rust
//! use knit_core::calculations::yarn_estimate::estimate_from_area;
//! use knit_core::model::{YarnInfo, YarnWeightCategory};
//!
//! let yarn = YarnInfo::new(YarnWeightCategory::Medium).with_skein(Some(200.0), Some(100.0));
//! let estimate = estimate_from_area(1.5, &yarn, 10.0);
//! assert_eq!(estimate.total_length_meters, 825.0);
//! assert_eq!(estimate.number_of_skeins, 5);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{PatternError, PatternResult};
use crate::model::gauge::{GaugeData, GaugeSwatch};
use crate::model::yarn::{YarnInfo, YarnWeightCategory};
use crate::profiles::{resolve_gauge, resolve_yarn, ProfileSource};
use crate::settings::CalculationSettings;
use crate::units::{Centimeters, LengthUnit};

/// Standard garment sizes for size-table area lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarmentSize {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl GarmentSize {
    pub const ALL: [GarmentSize; 6] = [
        GarmentSize::Xs,
        GarmentSize::S,
        GarmentSize::M,
        GarmentSize::L,
        GarmentSize::Xl,
        GarmentSize::Xxl,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GarmentSize::Xs => "XS",
            GarmentSize::S => "S",
            GarmentSize::M => "M",
            GarmentSize::L => "L",
            GarmentSize::Xl => "XL",
            GarmentSize::Xxl => "XXL",
        }
    }
}

/// Kind of project being estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Scarf,
    Blanket,
    TriangularShawl,
    Hat,
    Sweater,
    /// One pair
    Socks,
    /// Area supplied directly
    Custom,
}

impl ProjectType {
    pub const ALL: [ProjectType; 7] = [
        ProjectType::Scarf,
        ProjectType::Blanket,
        ProjectType::TriangularShawl,
        ProjectType::Hat,
        ProjectType::Sweater,
        ProjectType::Socks,
        ProjectType::Custom,
    ];

    /// Area comes from width/length (or `area_m2` for custom)
    pub fn requires_dimensions(&self) -> bool {
        matches!(
            self,
            ProjectType::Scarf | ProjectType::Blanket | ProjectType::TriangularShawl | ProjectType::Custom
        )
    }

    /// Area comes from a size table
    pub fn requires_size(&self) -> bool {
        matches!(self, ProjectType::Hat | ProjectType::Sweater | ProjectType::Socks)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Scarf => "scarf",
            ProjectType::Blanket => "blanket",
            ProjectType::TriangularShawl => "triangular_shawl",
            ProjectType::Hat => "hat",
            ProjectType::Sweater => "sweater",
            ProjectType::Socks => "socks",
            ProjectType::Custom => "custom",
        }
    }

    /// Fabric area in m² for a sized project
    fn size_table_m2(&self, size: GarmentSize) -> Option<f64> {
        let table: [f64; 6] = match self {
            ProjectType::Hat => [0.09, 0.10, 0.12, 0.13, 0.14, 0.15],
            ProjectType::Sweater => [1.20, 1.35, 1.50, 1.70, 1.90, 2.10],
            ProjectType::Socks => [0.08, 0.09, 0.10, 0.11, 0.12, 0.13],
            _ => return None,
        };
        let index = GarmentSize::ALL.iter().position(|s| *s == size)?;
        Some(table[index])
    }
}

/// Width/length (or area) of a dimension-driven project.
///
/// For a triangular shawl, `width` is the wingspan and `length` the depth.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectDimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_m2: Option<f64>,
    #[serde(default)]
    pub unit: LengthUnit,
}

/// What is being made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSpec {
    pub project_type: ProjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub garment_size: Option<GarmentSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<ProjectDimensions>,
}

impl ProjectSpec {
    pub fn sized(project_type: ProjectType, size: GarmentSize) -> Self {
        ProjectSpec {
            project_type,
            garment_size: Some(size),
            dimensions: None,
        }
    }

    pub fn with_dimensions(project_type: ProjectType, width: f64, length: f64, unit: LengthUnit) -> Self {
        ProjectSpec {
            project_type,
            garment_size: None,
            dimensions: Some(ProjectDimensions {
                width: Some(width),
                length: Some(length),
                area_m2: None,
                unit,
            }),
        }
    }

    /// Fabric surface area in m².
    ///
    /// # Errors
    ///
    /// `MissingField` when the project type's required inputs are absent,
    /// `InvalidInput` when they are not positive.
    pub fn surface_area_m2(&self) -> PatternResult<f64> {
        if self.project_type.requires_size() {
            let size = self
                .garment_size
                .ok_or_else(|| PatternError::missing_field("project.garment_size"))?;
            return self.project_type.size_table_m2(size).ok_or_else(|| {
                PatternError::Internal {
                    message: format!("no size table for {}", self.project_type.as_str()),
                }
            });
        }

        let dims = self
            .dimensions
            .as_ref()
            .ok_or_else(|| PatternError::missing_field("project.dimensions"))?;

        if self.project_type == ProjectType::Custom {
            let area = dims
                .area_m2
                .ok_or_else(|| PatternError::missing_field("project.dimensions.area_m2"))?;
            return positive("project.dimensions.area_m2", area);
        }

        let width = dims
            .width
            .ok_or_else(|| PatternError::missing_field("project.dimensions.width"))?;
        let length = dims
            .length
            .ok_or_else(|| PatternError::missing_field("project.dimensions.length"))?;
        let width_m = Centimeters::from_unit(positive("project.dimensions.width", width)?, dims.unit).to_meters();
        let length_m = Centimeters::from_unit(positive("project.dimensions.length", length)?, dims.unit).to_meters();

        let area = match self.project_type {
            ProjectType::TriangularShawl => width_m * length_m / 2.0,
            _ => width_m * length_m,
        };
        Ok(area)
    }
}

fn positive(field: &str, value: f64) -> PatternResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PatternError::invalid_input(field, value.to_string(), "Must be positive"))
    }
}

/// Everything the estimator needs, with gauge and yarn either inline or by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YarnEstimateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gauge: Option<GaugeData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch: Option<GaugeSwatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gauge_profile_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yarn: Option<YarnInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yarn_profile_id: Option<String>,

    pub project: ProjectSpec,
}

/// Estimated yarn requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YarnEstimateResult {
    pub total_length_meters: f64,
    pub total_weight_grams: f64,
    pub number_of_skeins: u32,
    pub surface_area_m2: f64,
    pub yarn_factor_used: f64,
    pub buffer_percentage: f64,
    pub base_length_meters: f64,
    pub weight_category: YarnWeightCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

fn round_decimals(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Estimate yarn for a known fabric area.
pub fn estimate_from_area(surface_area_m2: f64, yarn: &YarnInfo, buffer_percentage: f64) -> YarnEstimateResult {
    let yarn_factor = yarn.weight_category.consumption_factor_m_per_m2();
    estimate_with_factor(surface_area_m2, yarn_factor, yarn, buffer_percentage)
}

/// Estimate yarn with an explicit consumption factor (m/m²).
pub fn estimate_with_factor(
    surface_area_m2: f64,
    yarn_factor: f64,
    yarn: &YarnInfo,
    buffer_percentage: f64,
) -> YarnEstimateResult {
    let base_length = surface_area_m2 * yarn_factor;
    let total_length = round_decimals(base_length * (1.0 + buffer_percentage / 100.0), 2);
    let mut notes = Vec::new();

    let total_weight = match yarn.linear_density_g_per_m() {
        Some(density) => round_decimals(total_length * density, 2),
        None => 0.0,
    };

    let skeins = if let Some(meterage) = yarn.known_meterage() {
        (total_length / meterage).ceil()
    } else if let Some(grams) = yarn.known_weight_grams() {
        notes.push("Skein meterage unknown; skein count is based on weight only".to_string());
        (total_weight / grams).ceil()
    } else {
        notes.push("Skein size unknown; defaulted to 1 skein".to_string());
        1.0
    };
    let number_of_skeins = (skeins as u32).max(1);

    YarnEstimateResult {
        total_length_meters: total_length,
        total_weight_grams: total_weight,
        number_of_skeins,
        surface_area_m2: round_decimals(surface_area_m2, 4),
        yarn_factor_used: yarn_factor,
        buffer_percentage,
        base_length_meters: round_decimals(base_length, 2),
        weight_category: yarn.weight_category,
        notes,
    }
}

/// Note when the gauge is far from what the yarn weight is usually knit at
pub fn gauge_consistency_note(gauge: &GaugeData, category: YarnWeightCategory) -> Option<String> {
    let (min, max) = category.typical_stitch_gauge();
    if gauge.stitches_per_10cm < min || gauge.stitches_per_10cm > max {
        Some(format!(
            "Gauge of {:.1} sts/10cm is unusual for {} yarn (typically {}-{}); the estimate may be off",
            gauge.stitches_per_10cm,
            category.display_name(),
            min,
            max
        ))
    } else {
        None
    }
}

/// Resolve gauge and yarn, then estimate.
///
/// # Errors
///
/// `ResolutionFailed` when gauge or yarn cannot be resolved; `MissingField`
/// or `InvalidInput` when the project inputs are incomplete.
pub fn estimate_yarn(
    input: &YarnEstimateInput,
    settings: &CalculationSettings,
    profiles: &dyn ProfileSource,
) -> PatternResult<YarnEstimateResult> {
    let gauge = resolve_gauge(
        input.gauge.as_ref(),
        input.swatch.as_ref(),
        input.gauge_profile_id.as_deref(),
        profiles,
    )?;
    let yarn = resolve_yarn(input.yarn.as_ref(), input.yarn_profile_id.as_deref(), profiles)?;
    estimate_resolved(&gauge, &yarn, &input.project, settings)
}

/// Estimate with gauge and yarn already in hand.
pub fn estimate_resolved(
    gauge: &GaugeData,
    yarn: &YarnInfo,
    project: &ProjectSpec,
    settings: &CalculationSettings,
) -> PatternResult<YarnEstimateResult> {
    gauge.ensure_usable()?;
    let area = project.surface_area_m2()?;
    let mut result = estimate_from_area(area, yarn, settings.yarn_buffer_percentage);
    if let Some(note) = gauge_consistency_note(gauge, yarn.weight_category) {
        tracing::warn!(
            gauge = gauge.stitches_per_10cm,
            category = yarn.weight_category.display_name(),
            "gauge unusual for yarn weight"
        );
        result.notes.push(note);
    }
    if yarn.known_meterage().is_none() {
        tracing::warn!(skeins = result.number_of_skeins, "skein meterage unknown, skein count is approximate");
    }

    tracing::info!(
        project = project.project_type.as_str(),
        area_m2 = result.surface_area_m2,
        meters = result.total_length_meters,
        skeins = result.number_of_skeins,
        "estimated yarn quantity"
    );
    Ok(result)
}
