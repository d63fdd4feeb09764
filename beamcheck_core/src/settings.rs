//! # Code Settings
//!
//! Partial factors and fixed code parameters. `Default` returns the values of
//! the code tables; a JSON file may override individual entries.
//!
//! ```rust
//! use beamcheck_core::settings::CodeSettings;
//!
//! let settings = CodeSettings::from_json(r#"{ "gamma_live": 1.35 }"#).unwrap();
//! assert_eq!(settings.gamma_live, 1.35);
//! assert_eq!(settings.gamma_self, 1.2);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcError, CalcResult};

/// Partial factors and fixed parameters used throughout an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeSettings {
    /// Load factor for self-load
    pub gamma_self: f64,
    /// Load factor for live-load
    pub gamma_live: f64,
    /// Material factor for concrete
    pub gamma_c: f64,
    /// Material factor for reinforcing steel
    pub gamma_s: f64,
    /// Material factor for prestressing steel
    pub gamma_p: f64,
    /// Favourable factor on prestress force (shear axial force)
    pub gamma_p_fav: f64,
    /// Long-term compressive strength coefficient
    pub alpha_cc: f64,
    /// Long-term tensile strength coefficient
    pub alpha_ct: f64,
    /// Allowance for deviation added to the minimum cover (mm)
    pub cover_deviation_mm: f64,
    /// Age at which long-term effects are evaluated (days)
    pub horizon_days: f64,
    /// Duration used for relaxation losses (hours)
    pub relaxation_hours: f64,
    /// Relaxation loss at 1000 h (%), class 2 strand
    pub rho_1000: f64,
    /// Deflection limit as span divisor (L/250)
    pub deflection_span_ratio: f64,
    /// Tension-stiffening factor for sustained loading
    pub tension_stiffening_beta: f64,
}

impl Default for CodeSettings {
    fn default() -> Self {
        CodeSettings {
            gamma_self: 1.2,
            gamma_live: 1.5,
            gamma_c: 1.5,
            gamma_s: 1.15,
            gamma_p: 1.15,
            gamma_p_fav: 0.9,
            alpha_cc: 0.85,
            alpha_ct: 0.85,
            cover_deviation_mm: 10.0,
            horizon_days: 18_263.0,
            relaxation_hours: 500_000.0,
            rho_1000: 2.5,
            deflection_span_ratio: 250.0,
            tension_stiffening_beta: 0.5,
        }
    }
}

impl CodeSettings {
    /// Parse settings from JSON, filling missing entries with defaults.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let settings: CodeSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate that every factor is usable.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("gamma_self", self.gamma_self)?;
        require_positive("gamma_live", self.gamma_live)?;
        require_positive("gamma_c", self.gamma_c)?;
        require_positive("gamma_s", self.gamma_s)?;
        require_positive("gamma_p", self.gamma_p)?;
        require_positive("gamma_p_fav", self.gamma_p_fav)?;
        require_positive("alpha_cc", self.alpha_cc)?;
        require_positive("alpha_ct", self.alpha_ct)?;
        require_positive("horizon_days", self.horizon_days)?;
        require_positive("relaxation_hours", self.relaxation_hours)?;
        require_positive("deflection_span_ratio", self.deflection_span_ratio)?;
        if self.cover_deviation_mm < 0.0 {
            return Err(CalcError::domain(
                "cover_deviation_mm",
                self.cover_deviation_mm.to_string(),
                "Must not be negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.tension_stiffening_beta) {
            return Err(CalcError::domain(
                "tension_stiffening_beta",
                self.tension_stiffening_beta.to_string(),
                "Must lie in [0, 1]",
            ));
        }
        Ok(())
    }
}
