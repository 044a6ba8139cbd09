//! Yarn definitions.
//!
//! Weight categories follow the Craft Yarn Council standard (0 = lace through
//! 7 = jumbo). Each category carries the consumption factor used by the yarn
//! estimator and the stitch gauge range it is usually knit at.

use serde::{Deserialize, Serialize};

/// Yarn weight category (CYC 0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YarnWeightCategory {
    /// 0 - Lace, cobweb, light fingering
    Lace,
    /// 1 - Fingering, sock
    SuperFine,
    /// 2 - Sport, baby
    Fine,
    /// 3 - DK, light worsted
    Light,
    /// 4 - Worsted, aran
    Medium,
    /// 5 - Chunky, craft
    Bulky,
    /// 6 - Super bulky, roving
    SuperBulky,
    /// 7 - Jumbo
    Jumbo,
}

impl YarnWeightCategory {
    pub const ALL: [YarnWeightCategory; 8] = [
        YarnWeightCategory::Lace,
        YarnWeightCategory::SuperFine,
        YarnWeightCategory::Fine,
        YarnWeightCategory::Light,
        YarnWeightCategory::Medium,
        YarnWeightCategory::Bulky,
        YarnWeightCategory::SuperBulky,
        YarnWeightCategory::Jumbo,
    ];

    /// CYC category number
    pub fn number(&self) -> u8 {
        match self {
            YarnWeightCategory::Lace => 0,
            YarnWeightCategory::SuperFine => 1,
            YarnWeightCategory::Fine => 2,
            YarnWeightCategory::Light => 3,
            YarnWeightCategory::Medium => 4,
            YarnWeightCategory::Bulky => 5,
            YarnWeightCategory::SuperBulky => 6,
            YarnWeightCategory::Jumbo => 7,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            YarnWeightCategory::Lace => "Lace",
            YarnWeightCategory::SuperFine => "Super Fine (Fingering)",
            YarnWeightCategory::Fine => "Fine (Sport)",
            YarnWeightCategory::Light => "Light (DK)",
            YarnWeightCategory::Medium => "Medium (Worsted)",
            YarnWeightCategory::Bulky => "Bulky (Chunky)",
            YarnWeightCategory::SuperBulky => "Super Bulky",
            YarnWeightCategory::Jumbo => "Jumbo",
        }
    }

    /// Metres of yarn consumed per square metre of stockinette fabric.
    pub fn consumption_factor_m_per_m2(&self) -> f64 {
        match self {
            YarnWeightCategory::Lace => 1400.0,
            YarnWeightCategory::SuperFine => 1000.0,
            YarnWeightCategory::Fine => 800.0,
            YarnWeightCategory::Light => 650.0,
            YarnWeightCategory::Medium => 500.0,
            YarnWeightCategory::Bulky => 330.0,
            YarnWeightCategory::SuperBulky => 220.0,
            YarnWeightCategory::Jumbo => 140.0,
        }
    }

    /// Typical stockinette stitch gauge range, stitches per 10 cm (inclusive)
    pub fn typical_stitch_gauge(&self) -> (f64, f64) {
        match self {
            YarnWeightCategory::Lace => (30.0, 40.0),
            YarnWeightCategory::SuperFine => (27.0, 32.0),
            YarnWeightCategory::Fine => (23.0, 26.0),
            YarnWeightCategory::Light => (21.0, 24.0),
            YarnWeightCategory::Medium => (16.0, 20.0),
            YarnWeightCategory::Bulky => (12.0, 15.0),
            YarnWeightCategory::SuperBulky => (7.0, 11.0),
            YarnWeightCategory::Jumbo => (3.0, 6.0),
        }
    }
}

/// Yarn as used by a pattern.
///
/// ## JSON Example
///
/// ```json
/// {
///   "weight_category": "medium",
///   "skein_meterage": 200.0,
///   "skein_weight_grams": 100.0,
///   "fiber": "merino"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YarnInfo {
    pub weight_category: YarnWeightCategory,

    /// Length of one skein in metres, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skein_meterage: Option<f64>,

    /// Weight of one skein in grams, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skein_weight_grams: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<String>,
}

impl YarnInfo {
    pub fn new(weight_category: YarnWeightCategory) -> Self {
        YarnInfo {
            weight_category,
            skein_meterage: None,
            skein_weight_grams: None,
            fiber: None,
        }
    }

    pub fn with_skein(mut self, meterage: Option<f64>, weight_grams: Option<f64>) -> Self {
        self.skein_meterage = meterage;
        self.skein_weight_grams = weight_grams;
        self
    }

    /// Skein meterage, only when it is a usable positive number
    pub fn known_meterage(&self) -> Option<f64> {
        self.skein_meterage.filter(|m| m.is_finite() && *m > 0.0)
    }

    /// Skein weight, only when it is a usable positive number
    pub fn known_weight_grams(&self) -> Option<f64> {
        self.skein_weight_grams.filter(|g| g.is_finite() && *g > 0.0)
    }

    /// Grams per metre, when both skein length and weight are known
    pub fn linear_density_g_per_m(&self) -> Option<f64> {
        match (self.known_weight_grams(), self.known_meterage()) {
            (Some(grams), Some(meters)) => Some(grams / meters),
            _ => None,
        }
    }
}

/// A stored yarn record as handed over by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YarnProfile {
    pub id: String,
    pub name: String,
    pub yarn: YarnInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_decreases_with_weight() {
        let factors: Vec<f64> = YarnWeightCategory::ALL
            .iter()
            .map(|c| c.consumption_factor_m_per_m2())
            .collect();
        assert!(factors.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_category_numbers() {
        for (i, category) in YarnWeightCategory::ALL.iter().enumerate() {
            assert_eq!(category.number() as usize, i);
        }
    }

    #[test]
    fn test_zero_meterage_is_not_known() {
        // A zero from a form field must not be read as a real skein length
        let yarn = YarnInfo::new(YarnWeightCategory::Medium).with_skein(Some(0.0), Some(100.0));
        assert_eq!(yarn.known_meterage(), None);
        assert_eq!(yarn.known_weight_grams(), Some(100.0));
        assert_eq!(yarn.linear_density_g_per_m(), None);
    }

    #[test]
    fn test_linear_density() {
        let yarn = YarnInfo::new(YarnWeightCategory::Light).with_skein(Some(200.0), Some(50.0));
        assert_eq!(yarn.linear_density_g_per_m(), Some(0.25));
    }

    #[test]
    fn test_serialization() {
        let json = r#"{"weight_category": "super_bulky", "skein_meterage": 80}"#;
        let yarn: YarnInfo = serde_json::from_str(json).unwrap();
        assert_eq!(yarn.weight_category, YarnWeightCategory::SuperBulky);
        assert_eq!(yarn.skein_weight_grams, None);
    }
}
