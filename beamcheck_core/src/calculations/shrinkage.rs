//! # Shrinkage (EC2 3.1.4 and Annex B.2)
//!
//! Final total shrinkage strain ε_cs = ε_cd + ε_ca, reported as a positive
//! magnitude.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::creep::check_humidity;
use crate::errors::{require_positive, CalcResult};
use crate::materials::{CementClass, ConcreteProperties};

/// k_h table (EC2 Table 3.3): notional size h₀ (mm) → coefficient
const KH_TABLE: [(f64, f64); 4] = [(100.0, 1.0), (200.0, 0.85), (300.0, 0.75), (500.0, 0.70)];

/// Shrinkage strains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shrinkage {
    /// Basic drying shrinkage ε_cd,0
    pub eps_cd0: f64,
    /// Notional-size coefficient k_h
    pub k_h: f64,
    /// Final drying shrinkage ε_cd,∞
    pub eps_cd: f64,
    /// Final autogenous shrinkage ε_ca,∞
    pub eps_ca: f64,
    /// Total shrinkage ε_cs
    pub eps_cs: f64,
}

impl Shrinkage {
    pub fn compute(
        concrete: &ConcreteProperties,
        cement: CementClass,
        relative_humidity: f64,
        notional_size_mm: f64,
    ) -> CalcResult<Self> {
        check_humidity(relative_humidity)?;
        require_positive("notional_size_mm", notional_size_mm)?;

        let (alpha_ds1, alpha_ds2) = cement.drying_coefficients();
        let beta_rh = 1.55 * (1.0 - (relative_humidity / 100.0).powi(3));
        let eps_cd0 =
            0.85 * (220.0 + 110.0 * alpha_ds1) * (-alpha_ds2 * concrete.fcm / 10.0).exp() * 1e-6 * beta_rh;
        let k_h = notional_size_coefficient(notional_size_mm);
        let eps_cd = k_h * eps_cd0;
        let eps_ca = 2.5 * (concrete.fck - 10.0) * 1e-6;

        let shrinkage = Shrinkage {
            eps_cd0,
            k_h,
            eps_cd,
            eps_ca,
            eps_cs: eps_cd + eps_ca,
        };
        debug!("shrinkage: eps_cs = {:.3e}", shrinkage.eps_cs);
        Ok(shrinkage)
    }
}

/// k_h by linear interpolation, clamped at the ends of the table.
pub fn notional_size_coefficient(h0: f64) -> f64 {
    let (first, last) = (KH_TABLE[0], KH_TABLE[KH_TABLE.len() - 1]);
    if h0 <= first.0 {
        if h0 < first.0 {
            warn!("h0 = {h0:.1} mm below k_h table, clamped to {}", first.0);
        }
        return first.1;
    }
    if h0 >= last.0 {
        if h0 > last.0 {
            warn!("h0 = {h0:.1} mm above k_h table, clamped to {}", last.0);
        }
        return last.1;
    }
    KH_TABLE
        .windows(2)
        .find(|w| h0 <= w[1].0)
        .map(|w| {
            let ((x0, y0), (x1, y1)) = (w[0], w[1]);
            y0 + (y1 - y0) * (h0 - x0) / (x1 - x0)
        })
        .unwrap_or(last.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::ConcreteClass;
    use crate::settings::CodeSettings;

    #[test]
    fn test_kh_interpolation() {
        assert_eq!(notional_size_coefficient(50.0), 1.0);
        assert_eq!(notional_size_coefficient(100.0), 1.0);
        assert!((notional_size_coefficient(150.0) - 0.925).abs() < 1e-12);
        assert!((notional_size_coefficient(400.0) - 0.725).abs() < 1e-12);
        assert_eq!(notional_size_coefficient(800.0), 0.70);
    }

    #[test]
    fn test_c30_shrinkage() {
        let c30 = ConcreteClass::C30.properties(&CodeSettings::default());
        let s = Shrinkage::compute(&c30, CementClass::N, 50.0, 200.0).unwrap();
        // ε_ca = 2.5·20·1e-6
        assert!((s.eps_ca - 50e-6).abs() < 1e-12);
        // β_RH = 1.55·(1 − 0.125)
        let expected_cd0 = 0.85 * 660.0 * (-0.12_f64 * 3.8).exp() * 1e-6 * 1.356_25;
        assert!((s.eps_cd0 - expected_cd0).abs() < 1e-12);
        assert!((s.eps_cd - 0.85 * expected_cd0).abs() < 1e-12);
        assert!((s.eps_cs - (s.eps_cd + s.eps_ca)).abs() < 1e-15);
    }

    #[test]
    fn test_drier_air_shrinks_more() {
        let c30 = ConcreteClass::C30.properties(&CodeSettings::default());
        let dry = Shrinkage::compute(&c30, CementClass::R, 40.0, 171.4).unwrap();
        let humid = Shrinkage::compute(&c30, CementClass::R, 80.0, 171.4).unwrap();
        assert!(dry.eps_cs > humid.eps_cs);
    }
}
