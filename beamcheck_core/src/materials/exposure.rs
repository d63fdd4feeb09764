//! Exposure Classes (EN 1992-1-1 Table 4.1)
//!
//! The exposure class fixes the durability-governed minimum cover and the
//! admissible crack width.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Environmental exposure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExposureClass {
    /// No risk of corrosion
    X0,
    /// Carbonation, dry or permanently wet
    #[default]
    XC1,
    XC2,
    XC3,
    XC4,
    /// Chlorides other than sea water
    XD1,
    XD2,
    XD3,
    /// Chlorides from sea water
    XS1,
    XS2,
    XS3,
}

impl ExposureClass {
    pub const ALL: [ExposureClass; 11] = [
        ExposureClass::X0,
        ExposureClass::XC1,
        ExposureClass::XC2,
        ExposureClass::XC3,
        ExposureClass::XC4,
        ExposureClass::XD1,
        ExposureClass::XD2,
        ExposureClass::XD3,
        ExposureClass::XS1,
        ExposureClass::XS2,
        ExposureClass::XS3,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ExposureClass::X0 => "X0",
            ExposureClass::XC1 => "XC1",
            ExposureClass::XC2 => "XC2",
            ExposureClass::XC3 => "XC3",
            ExposureClass::XC4 => "XC4",
            ExposureClass::XD1 => "XD1",
            ExposureClass::XD2 => "XD2",
            ExposureClass::XD3 => "XD3",
            ExposureClass::XS1 => "XS1",
            ExposureClass::XS2 => "XS2",
            ExposureClass::XS3 => "XS3",
        }
    }

    /// Durability minimum cover c_min,dur (mm). X0 falls back to the bond cover.
    pub fn durability_cover_mm(&self, bond_cover_mm: f64) -> f64 {
        match self {
            ExposureClass::X0 => bond_cover_mm,
            ExposureClass::XC1 => 15.0,
            ExposureClass::XC2 | ExposureClass::XC3 | ExposureClass::XC4 => 25.0,
            ExposureClass::XD1
            | ExposureClass::XD2
            | ExposureClass::XD3
            | ExposureClass::XS1
            | ExposureClass::XS2 => 40.0,
            ExposureClass::XS3 => 50.0,
        }
    }

    /// Maximum crack width w_max (mm) given the cover ratio factor k_c.
    pub fn max_crack_width_mm(&self, k_c: f64) -> f64 {
        match self {
            ExposureClass::X0 => 0.4,
            _ => 0.3 * k_c,
        }
    }
}

impl FromStr for ExposureClass {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        ExposureClass::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or_else(|| CalcError::invalid_class("exposure", s))
    }
}

impl std::fmt::Display for ExposureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durability_cover() {
        assert_eq!(ExposureClass::X0.durability_cover_mm(20.0), 20.0);
        assert_eq!(ExposureClass::XC1.durability_cover_mm(20.0), 15.0);
        assert_eq!(ExposureClass::XC3.durability_cover_mm(20.0), 25.0);
        assert_eq!(ExposureClass::XS2.durability_cover_mm(20.0), 40.0);
        assert_eq!(ExposureClass::XS3.durability_cover_mm(20.0), 50.0);
    }

    #[test]
    fn test_crack_width() {
        assert_eq!(ExposureClass::X0.max_crack_width_mm(1.3), 0.4);
        assert!((ExposureClass::XC1.max_crack_width_mm(1.3) - 0.39).abs() < 1e-12);
    }

    #[test]
    fn test_parse() {
        assert_eq!("xd2".parse::<ExposureClass>().unwrap(), ExposureClass::XD2);
        assert!("XF1".parse::<ExposureClass>().is_err());
    }
}
