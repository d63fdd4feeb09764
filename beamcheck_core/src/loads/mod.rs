//! Load cases, EN 1990 combinations and the derived load effects of a
//! simply-supported beam.
//!
//! # Overview
//!
//! - [`LoadType`] - Self-load (G) and live-load (Q)
//! - [`LoadCase`] - Characteristic load values for one scenario
//! - [`LoadCombination`] - Factors for ULS, characteristic and quasi-permanent
//! - [`DistributedLoads`] - Input block: intensities, ages, long-lasting share
//! - [`LoadEffects`] - Moments, shears and the prestressing force
//!
//! # Example
//!
//! ```
//! use beamcheck_core::loads::{combinations, LoadCase, LoadType};
//! use beamcheck_core::settings::CodeSettings;
//!
//! let case = LoadCase::new("Floor")
//!     .with_load(LoadType::SelfLoad, 5.0)
//!     .with_load(LoadType::LiveLoad, 10.0);
//!
//! let q_d = combinations::ultimate(&CodeSettings::default()).apply(&case);
//! assert!((q_d - 21.0).abs() < 1e-12);
//! ```

pub mod combinations;
pub mod load_types;

pub use combinations::LoadCombination;
pub use load_types::LoadType;

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::equations::{uniform_load_max_moment, uniform_load_max_shear};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::materials::StrandProperties;
use crate::section::CrossSection;
use crate::settings::CodeSettings;
use crate::units::{KiloNewtonMeters, KiloNewtons, KnPerM, Meters, Newtons};

/// A collection of load values by type for a specific loading scenario
///
/// LoadCase stores characteristic (unfactored) values in kN/m. They are
/// combined using LoadCombination factors to get design loads.
///
/// # Example
/// ```
/// use beamcheck_core::loads::{LoadCase, LoadType};
///
/// let case = LoadCase::new("Roof").with_load(LoadType::SelfLoad, 4.0);
///
/// assert_eq!(case.get(LoadType::SelfLoad), 4.0);
/// assert_eq!(case.get(LoadType::LiveLoad), 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCase {
    /// User-provided label for this load case
    pub label: String,

    /// Load values keyed by type (kN/m)
    pub loads: HashMap<LoadType, f64>,
}

impl LoadCase {
    /// Create a new empty load case with a label
    pub fn new(label: impl Into<String>) -> Self {
        LoadCase {
            label: label.into(),
            loads: HashMap::new(),
        }
    }

    /// Add or update a load value (builder pattern)
    pub fn with_load(mut self, load_type: LoadType, value: f64) -> Self {
        self.loads.insert(load_type, value);
        self
    }

    /// Get the load value for a type, defaulting to 0.0 if not set
    pub fn get(&self, load_type: LoadType) -> f64 {
        self.loads.get(&load_type).copied().unwrap_or(0.0)
    }

    /// Validate the load case
    ///
    /// Gravity loads on the beam cannot be negative.
    pub fn validate(&self) -> CalcResult<()> {
        for (load_type, value) in &self.loads {
            if !value.is_finite() || *value < 0.0 {
                return Err(CalcError::domain(
                    format!("load_{}", load_type.code()),
                    value.to_string(),
                    format!("{} cannot be negative", load_type.description()),
                ));
            }
        }
        Ok(())
    }
}

impl Default for LoadCase {
    fn default() -> Self {
        LoadCase::new("Unnamed")
    }
}

/// Uniformly distributed loads on the beam, with the age of the concrete
/// when each is applied.
///
/// ## JSON Example
///
/// ```json
/// { "self_load_kn_per_m": 5.0, "live_load_kn_per_m": 30.0,
///   "self_load_age_days": 7.0, "live_load_age_days": 90.0,
///   "long_lasting_live_percent": 40.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributedLoads {
    pub self_load_kn_per_m: f64,
    pub live_load_kn_per_m: f64,
    /// Concrete age when the self-load is applied (days)
    pub self_load_age_days: f64,
    /// Concrete age when the live-load is applied (days)
    pub live_load_age_days: f64,
    /// Share of the live-load acting long term (%)
    pub long_lasting_live_percent: f64,
}

impl Default for DistributedLoads {
    fn default() -> Self {
        DistributedLoads {
            self_load_kn_per_m: 5.0,
            live_load_kn_per_m: 30.0,
            self_load_age_days: 7.0,
            live_load_age_days: 90.0,
            long_lasting_live_percent: 40.0,
        }
    }
}

impl DistributedLoads {
    /// Validate intensities, loading ages and the long-lasting share.
    ///
    /// Loading ages must be positive and earlier than the long-term horizon.
    pub fn validate(&self, horizon_days: f64) -> CalcResult<()> {
        self.load_case().validate()?;
        for (field, age) in [
            ("self_load_age_days", self.self_load_age_days),
            ("live_load_age_days", self.live_load_age_days),
        ] {
            require_positive(field, age)?;
            if age >= horizon_days {
                return Err(CalcError::domain(
                    field,
                    age.to_string(),
                    format!("Loading age must be earlier than the {horizon_days}-day horizon"),
                ));
            }
        }
        require_non_negative("long_lasting_live_percent", self.long_lasting_live_percent)?;
        if self.long_lasting_live_percent > 100.0 {
            return Err(CalcError::domain(
                "long_lasting_live_percent",
                self.long_lasting_live_percent.to_string(),
                "Must lie in [0, 100]",
            ));
        }
        Ok(())
    }

    /// ψ₂ = long-lasting share / 100
    pub fn psi_2(&self) -> f64 {
        self.long_lasting_live_percent / 100.0
    }

    /// Characteristic load case
    pub fn load_case(&self) -> LoadCase {
        LoadCase::new("Distributed")
            .with_load(LoadType::SelfLoad, self.self_load_kn_per_m)
            .with_load(LoadType::LiveLoad, self.live_load_kn_per_m)
    }
}

/// Derived load effects at midspan (moments) and supports (shear)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadEffects {
    pub span: Meters,
    /// ψ₂ for the quasi-permanent combination
    pub psi_2: f64,

    pub self_load_k: KnPerM,
    pub live_load_k: KnPerM,
    pub total_load_k: KnPerM,
    pub self_load_d: KnPerM,
    pub live_load_d: KnPerM,
    pub total_load_d: KnPerM,
    /// g_d + ψ₂·p_d, the load used for long-term deflection
    pub sustained_load_d: KnPerM,

    pub moment_self_k: KiloNewtonMeters,
    pub moment_live_k: KiloNewtonMeters,
    pub moment_k: KiloNewtonMeters,
    pub moment_self_d: KiloNewtonMeters,
    pub moment_live_d: KiloNewtonMeters,
    /// Design moment M_Ed
    pub moment_ed: KiloNewtonMeters,
    /// Quasi-permanent moment M_g,k + ψ₂·M_p,k
    pub moment_qp: KiloNewtonMeters,

    pub shear_k: KiloNewtons,
    /// Design shear V_Ed
    pub shear_ed: KiloNewtons,

    /// Maximum tensioning stress σ_p,max (N/mm²), zero without strands
    pub sigma_p_max: f64,
    /// Initial prestressing force P₀ = σ_p,max·A_p
    pub prestress_force: KiloNewtons,
    /// Moment of P₀ about the gross centroid, −P₀·e (hogging)
    pub prestress_moment: KiloNewtonMeters,
}

impl LoadEffects {
    /// Compute load effects for the span and, if present, the strands.
    pub fn compute(
        loads: &DistributedLoads,
        span: Meters,
        section: &CrossSection,
        strand: Option<&StrandProperties>,
        settings: &CodeSettings,
    ) -> CalcResult<Self> {
        require_positive("span_m", span.value())?;
        loads.validate(settings.horizon_days)?;

        let case = loads.load_case();
        let uls = combinations::ultimate(settings);
        let psi_2 = loads.psi_2();
        let l = span.value();

        let self_load_k = case.get(LoadType::SelfLoad);
        let live_load_k = case.get(LoadType::LiveLoad);
        let total_load_k = combinations::characteristic().apply(&case);
        let self_load_d = uls.apply_to(&case, LoadType::SelfLoad);
        let live_load_d = uls.apply_to(&case, LoadType::LiveLoad);
        let total_load_d = uls.apply(&case);
        let sustained_load_d = self_load_d + psi_2 * live_load_d;

        let moment = |w: f64| KiloNewtonMeters(uniform_load_max_moment(w, l));
        let moment_qp = moment(combinations::quasi_permanent(psi_2).apply(&case));

        let (sigma_p_max, prestress_force) = match (strand, section.strands) {
            (Some(strand), Some(placed)) => {
                let sigma = strand.max_tensioning_stress();
                (sigma, KiloNewtons::from(Newtons(sigma * placed.area_mm2)))
            }
            _ => (0.0, KiloNewtons(0.0)),
        };
        let prestress_moment = KiloNewtonMeters(-prestress_force.value() * section.eccentricity_mm() * 1e-3);

        let effects = LoadEffects {
            span,
            psi_2,
            self_load_k: KnPerM(self_load_k),
            live_load_k: KnPerM(live_load_k),
            total_load_k: KnPerM(total_load_k),
            self_load_d: KnPerM(self_load_d),
            live_load_d: KnPerM(live_load_d),
            total_load_d: KnPerM(total_load_d),
            sustained_load_d: KnPerM(sustained_load_d),
            moment_self_k: moment(self_load_k),
            moment_live_k: moment(live_load_k),
            moment_k: moment(total_load_k),
            moment_self_d: moment(self_load_d),
            moment_live_d: moment(live_load_d),
            moment_ed: moment(total_load_d),
            moment_qp,
            shear_k: KiloNewtons(uniform_load_max_shear(total_load_k, l)),
            shear_ed: KiloNewtons(uniform_load_max_shear(total_load_d, l)),
            sigma_p_max,
            prestress_force,
            prestress_moment,
        };

        debug!(
            "load effects: M_Ed = {:.2} kNm, V_Ed = {:.2} kN, M_qp = {:.2} kNm, P0 = {:.1} kN",
            effects.moment_ed.value(),
            effects.shear_ed.value(),
            effects.moment_qp.value(),
            effects.prestress_force.value()
        );
        Ok(effects)
    }
}
