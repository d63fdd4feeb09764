//! Concrete Materials (EN 1992-1-1 Table 3.1)
//!
//! Strength and deformation characteristics for normal-weight concrete
//! classes C12 through C90, plus the cement class used by the creep and
//! shrinkage models.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;
use crate::settings::CodeSettings;

/// Concrete strength classes per EC2 Table 3.1 (cylinder strength in the name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcreteClass {
    C12,
    C16,
    C20,
    C25,
    C30,
    C35,
    C40,
    C45,
    C50,
    C55,
    C60,
    C70,
    C80,
    C90,
}

// Columns of Table 3.1, in the order of `ConcreteClass::ALL`.
const FCK: [f64; 14] = [12.0, 16.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 70.0, 80.0, 90.0];
const FCK_CUBE: [f64; 14] = [15.0, 20.0, 25.0, 30.0, 37.0, 45.0, 50.0, 55.0, 60.0, 67.0, 75.0, 85.0, 95.0, 105.0];
const FCM: [f64; 14] = [20.0, 24.0, 28.0, 33.0, 38.0, 43.0, 48.0, 53.0, 58.0, 63.0, 68.0, 78.0, 88.0, 98.0];
const FCTM: [f64; 14] = [1.6, 1.9, 2.2, 2.6, 2.9, 3.2, 3.5, 3.8, 4.1, 4.2, 4.4, 4.6, 4.8, 5.0];
const FCTK_005: [f64; 14] = [1.1, 1.3, 1.5, 1.8, 2.0, 2.2, 2.5, 2.7, 2.9, 3.0, 3.1, 3.2, 3.4, 3.5];
const FCTK_095: [f64; 14] = [2.0, 2.5, 2.9, 3.3, 3.8, 4.2, 4.6, 4.9, 5.3, 5.5, 5.7, 6.0, 6.3, 6.6];
const ECM_GPA: [f64; 14] = [27.0, 29.0, 30.0, 31.0, 33.0, 34.0, 35.0, 36.0, 37.0, 38.0, 39.0, 41.0, 42.0, 44.0];
// Strains in per mille
const EPS_C1: [f64; 14] = [1.8, 1.9, 2.0, 2.1, 2.2, 2.25, 2.3, 2.4, 2.45, 2.5, 2.6, 2.7, 2.8, 2.8];
const EPS_CU1: [f64; 14] = [3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.2, 3.0, 2.8, 2.8, 2.8];
const EPS_C2: [f64; 14] = [2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.2, 2.3, 2.4, 2.5, 2.6];
const EPS_CU2: [f64; 14] = [3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.1, 2.9, 2.7, 2.6, 2.6];
const N_EXP: [f64; 14] = [2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 1.75, 1.6, 1.45, 1.4, 1.4];
const EPS_C3: [f64; 14] = [1.75, 1.75, 1.75, 1.75, 1.75, 1.75, 1.75, 1.75, 1.75, 1.8, 1.9, 2.0, 2.2, 2.3];
const EPS_CU3: [f64; 14] = [3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.1, 2.9, 2.7, 2.6, 2.6];

impl ConcreteClass {
    /// All concrete classes in table order
    pub const ALL: [ConcreteClass; 14] = [
        ConcreteClass::C12,
        ConcreteClass::C16,
        ConcreteClass::C20,
        ConcreteClass::C25,
        ConcreteClass::C30,
        ConcreteClass::C35,
        ConcreteClass::C40,
        ConcreteClass::C45,
        ConcreteClass::C50,
        ConcreteClass::C55,
        ConcreteClass::C60,
        ConcreteClass::C70,
        ConcreteClass::C80,
        ConcreteClass::C90,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Code string, e.g. "C30"
    pub fn code(&self) -> &'static str {
        match self {
            ConcreteClass::C12 => "C12",
            ConcreteClass::C16 => "C16",
            ConcreteClass::C20 => "C20",
            ConcreteClass::C25 => "C25",
            ConcreteClass::C30 => "C30",
            ConcreteClass::C35 => "C35",
            ConcreteClass::C40 => "C40",
            ConcreteClass::C45 => "C45",
            ConcreteClass::C50 => "C50",
            ConcreteClass::C55 => "C55",
            ConcreteClass::C60 => "C60",
            ConcreteClass::C70 => "C70",
            ConcreteClass::C80 => "C80",
            ConcreteClass::C90 => "C90",
        }
    }

    /// Display name with cube strength, e.g. "C30/37"
    pub fn display_name(&self) -> String {
        let i = self.index();
        format!("C{}/{}", FCK[i], FCK_CUBE[i])
    }

    /// Derive all concrete properties for this class.
    pub fn properties(&self, settings: &CodeSettings) -> ConcreteProperties {
        let i = self.index();
        let fck = FCK[i];
        let (lambda, eta) = stress_block_factors(fck);
        ConcreteProperties {
            class: *self,
            fck,
            fck_cube: FCK_CUBE[i],
            fcm: FCM[i],
            fctm: FCTM[i],
            fctk_005: FCTK_005[i],
            fctk_095: FCTK_095[i],
            ecm: ECM_GPA[i] * 1000.0,
            eps_c1: EPS_C1[i] / 1000.0,
            eps_cu1: EPS_CU1[i] / 1000.0,
            eps_c2: EPS_C2[i] / 1000.0,
            eps_cu2: EPS_CU2[i] / 1000.0,
            n: N_EXP[i],
            eps_c3: EPS_C3[i] / 1000.0,
            eps_cu3: EPS_CU3[i] / 1000.0,
            lambda,
            eta,
            fcd: settings.alpha_cc * fck / settings.gamma_c,
            fctd: settings.alpha_ct * FCTK_005[i] / settings.gamma_c,
        }
    }
}

impl FromStr for ConcreteClass {
    type Err = CalcError;

    /// Accepts "C30", "c30" and "C30/37".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_uppercase();
        let head = trimmed.split('/').next().unwrap_or_default();
        ConcreteClass::ALL
            .iter()
            .copied()
            .find(|c| c.code() == head)
            .ok_or_else(|| CalcError::invalid_class("concrete", s))
    }
}

impl std::fmt::Display for ConcreteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Rectangular stress block factors (λ, η) per EC2 3.1.7(3).
#[inline]
pub fn stress_block_factors(fck: f64) -> (f64, f64) {
    if fck <= 50.0 {
        (0.8, 1.0)
    } else {
        (0.8 - (fck - 50.0) / 400.0, 1.0 - (fck - 50.0) / 200.0)
    }
}

/// Resolved concrete properties (N/mm², strains dimensionless)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteProperties {
    pub class: ConcreteClass,
    /// Characteristic cylinder strength
    pub fck: f64,
    /// Characteristic cube strength
    pub fck_cube: f64,
    /// Mean compressive strength
    pub fcm: f64,
    /// Mean tensile strength
    pub fctm: f64,
    pub fctk_005: f64,
    pub fctk_095: f64,
    /// Secant modulus of elasticity
    pub ecm: f64,
    pub eps_c1: f64,
    pub eps_cu1: f64,
    pub eps_c2: f64,
    pub eps_cu2: f64,
    pub n: f64,
    pub eps_c3: f64,
    /// Ultimate strain for the rectangular block
    pub eps_cu3: f64,
    /// Effective height factor of the stress block
    pub lambda: f64,
    /// Effective strength factor of the stress block
    pub eta: f64,
    /// Design compressive strength
    pub fcd: f64,
    /// Design tensile strength
    pub fctd: f64,
}

/// Cement class per EC2 3.1.2(6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CementClass {
    /// Rapid hardening
    #[default]
    R,
    /// Normal hardening
    N,
    /// Slow hardening
    S,
}

impl CementClass {
    /// Exponent α used to adjust the loading age (EC2 B.9)
    pub fn age_exponent(&self) -> f64 {
        match self {
            CementClass::S => -1.0,
            CementClass::N => 0.0,
            CementClass::R => 1.0,
        }
    }

    /// Drying shrinkage coefficients (α_ds1, α_ds2) per EC2 B.11
    pub fn drying_coefficients(&self) -> (f64, f64) {
        match self {
            CementClass::S => (3.0, 0.13),
            CementClass::N => (4.0, 0.12),
            CementClass::R => (6.0, 0.11),
        }
    }
}

impl FromStr for CementClass {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "R" => Ok(CementClass::R),
            "N" => Ok(CementClass::N),
            "S" => Ok(CementClass::S),
            _ => Err(CalcError::invalid_class("cement", s)),
        }
    }
}
