//! # Unit Types
//!
//! Lightweight length wrappers and the closed set of measurement units a
//! pattern may be written in.
//!
//! Knitting math is done in centimetres internally: gauge is always expressed
//! per 10 cm, and any inch measurement is converted before it meets a gauge.
//!
//! ## Example
//!
//! ```rust
//! use knit_core::units::{Centimeters, Inches, LengthUnit};
//!
//! let chest = Inches(40.0);
//! let chest_cm: Centimeters = chest.into();
//! assert!((chest_cm.0 - 101.6).abs() < 1e-9);
//!
//! assert_eq!(LengthUnit::Inch.to_cm(4.0), 10.16);
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Centimetres per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Unit a measurement or gauge swatch is recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    #[default]
    Cm,
    Inch,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 2] = [LengthUnit::Cm, LengthUnit::Inch];

    /// Convert a value in this unit to centimetres
    pub fn to_cm(self, value: f64) -> f64 {
        match self {
            LengthUnit::Cm => value,
            LengthUnit::Inch => value * CM_PER_INCH,
        }
    }

    /// Convert a value in centimetres to this unit
    pub fn from_cm(self, value_cm: f64) -> f64 {
        match self {
            LengthUnit::Cm => value_cm,
            LengthUnit::Inch => value_cm / CM_PER_INCH,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            LengthUnit::Cm => "cm",
            LengthUnit::Inch => "in",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Length in centimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Inches> for Centimeters {
    fn from(inches: Inches) -> Self {
        Centimeters(inches.0 * CM_PER_INCH)
    }
}

impl From<Centimeters> for Inches {
    fn from(cm: Centimeters) -> Self {
        Inches(cm.0 / CM_PER_INCH)
    }
}

impl Centimeters {
    /// Interpret `value` in `unit` and convert it to centimetres
    pub fn from_unit(value: f64, unit: LengthUnit) -> Self {
        Centimeters(unit.to_cm(value))
    }

    pub fn to_meters(self) -> f64 {
        self.0 / 100.0
    }
}

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Centimeters);
impl_arithmetic!(Inches);
