//! Reinforcing Steel (EN 1992-1-1 3.2, NS-EN 10080 designations)
//!
//! Classes are written as `B<fyk><ductility>`, e.g. `B500NC`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;
use crate::settings::CodeSettings;

/// Modulus of elasticity for reinforcing steel (N/mm²)
pub const ES: f64 = 200_000.0;

const DUCTILITY_SUFFIXES: [&str; 7] = ["", "A", "B", "C", "NA", "NB", "NC"];

/// Reinforcing steel class parsed from its designation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarClass {
    /// Designation as given, e.g. "B500NC"
    pub designation: String,
    /// Characteristic yield strength (N/mm²)
    pub fyk: f64,
}

impl RebarClass {
    /// Derive design properties.
    pub fn properties(&self, settings: &CodeSettings) -> RebarProperties {
        let fyd = self.fyk / settings.gamma_s;
        RebarProperties {
            fyk: self.fyk,
            fyd,
            es: ES,
            eps_yd: fyd / ES,
        }
    }
}

impl FromStr for RebarClass {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        let invalid = || CalcError::invalid_class("steel", s);

        let rest = code.strip_prefix('B').ok_or_else(invalid)?;
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.len() != 3 {
            return Err(invalid());
        }
        let suffix = &rest[digits.len()..];
        if !DUCTILITY_SUFFIXES.contains(&suffix) {
            return Err(invalid());
        }
        let fyk: f64 = digits.parse().map_err(|_| invalid())?;
        if !(400.0..=700.0).contains(&fyk) {
            return Err(invalid());
        }
        Ok(RebarClass { designation: code, fyk })
    }
}

/// Resolved reinforcing steel properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebarProperties {
    /// Characteristic yield strength (N/mm²)
    pub fyk: f64,
    /// Design yield strength (N/mm²)
    pub fyd: f64,
    /// Modulus of elasticity (N/mm²)
    pub es: f64,
    /// Design yield strain
    pub eps_yd: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_b500nc() {
        let class: RebarClass = "B500NC".parse().unwrap();
        assert_eq!(class.fyk, 500.0);
        let props = class.properties(&CodeSettings::default());
        assert!((props.fyd - 434.7826).abs() < 1e-3);
        assert!((props.eps_yd - 0.0021739).abs() < 1e-6);
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("b450c".parse::<RebarClass>().unwrap().fyk, 450.0);
        assert_eq!("B500".parse::<RebarClass>().unwrap().fyk, 500.0);
    }

    #[test]
    fn test_rejects_unknown() {
        for code in ["500NC", "B50NC", "B500XX", "B999NC", ""] {
            let err = code.parse::<RebarClass>().unwrap_err();
            assert_eq!(err.error_code(), "INVALID_CLASS", "{code}");
        }
    }
}
