//! # Time-Dependent Prestress Losses
//!
//! Long-term loss of tendon stress from shrinkage, relaxation and creep,
//! per EC2 expression (5.46). Relaxation follows EC2 3.3.2 for class 2
//! (low-relaxation) strand.
//!
//! ```text
//!         ε_cs·E_p + 0.8·Δσ_pr + (E_p/E_cm)·φ·|σ_c,QP|
//! Δσ = ─────────────────────────────────────────────────────────
//!       1 + (E_p/E_cm)(A_p/A_c)(1 + A_c·e²/I_c)(1 + 0.8φ)
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::{ConcreteProperties, StrandProperties};
use crate::section::CrossSection;
use crate::settings::CodeSettings;

/// Relaxation loss Δσ_pr for class 2 strand (N/mm²).
///
/// `sigma_pi` is the initial stress, `hours` the time after tensioning.
pub fn relaxation_loss(sigma_pi: f64, fpk: f64, rho_1000: f64, hours: f64) -> f64 {
    let mu = sigma_pi / fpk;
    sigma_pi * 0.66 * rho_1000 * (9.1 * mu).exp() * (hours / 1000.0).powf(0.75 * (1.0 - mu)) * 1e-5
}

/// Long-term prestress losses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeDependentLosses {
    /// Shrinkage strain used
    pub eps_cs: f64,
    /// Relaxation loss Δσ_pr (N/mm²)
    pub relaxation_loss: f64,
    /// Quasi-permanent concrete stress at the tendon (N/mm²)
    pub sigma_c_qp: f64,
    /// Creep term (E_p/E_cm)·φ·|σ_c,QP| (N/mm²)
    pub creep_term: f64,
    /// Total loss Δσ_p,c+s+r (N/mm²)
    pub total_loss: f64,
    /// Loss as a percentage of σ_p,max
    pub loss_percent: f64,
    /// Remaining tendon prestrain after losses
    pub eps_diff: f64,
}

impl TimeDependentLosses {
    /// Compute losses for the tendon layer of `section`.
    ///
    /// `phi` is the self-load creep coefficient, `sigma_c_qp` the uncracked
    /// concrete stress at tendon level under P₀ and the quasi-permanent
    /// moment.
    #[allow(clippy::too_many_arguments)]
    pub fn compute(
        section: &CrossSection,
        concrete: &ConcreteProperties,
        strand: &StrandProperties,
        sigma_p_max: f64,
        phi: f64,
        eps_cs: f64,
        sigma_c_qp: f64,
        settings: &CodeSettings,
    ) -> CalcResult<Self> {
        let strands = section.strands.ok_or_else(|| {
            CalcError::domain("strands", "none", "Prestress losses need a strand layer")
        })?;
        if sigma_p_max <= 0.0 {
            return Err(CalcError::domain(
                "sigma_p_max",
                sigma_p_max.to_string(),
                "Tensioning stress must be positive",
            ));
        }

        let ep = strand.ep;
        let ratio = ep / concrete.ecm;
        let e = strands.eccentricity_mm;
        let (ap, ac, ic) = (strands.area_mm2, section.area_mm2, section.inertia_mm4);

        let relaxation_loss = relaxation_loss(
            strand.initial_stress(),
            strand.fpk,
            settings.rho_1000,
            settings.relaxation_hours,
        );
        let creep_term = ratio * phi * sigma_c_qp.abs();

        let numerator = eps_cs * ep + 0.8 * relaxation_loss + creep_term;
        let denominator = 1.0 + ratio * (ap / ac) * (1.0 + ac * e * e / ic) * (1.0 + 0.8 * phi);
        let total_loss = (numerator / denominator).abs();
        let loss_percent = total_loss * 100.0 / sigma_p_max;
        let eps_diff = sigma_p_max / ep * (1.0 - loss_percent / 100.0);

        debug!(
            "losses: relaxation = {relaxation_loss:.1}, total = {total_loss:.1} N/mm2 ({loss_percent:.1} %)"
        );

        Ok(TimeDependentLosses {
            eps_cs,
            relaxation_loss,
            sigma_c_qp,
            creep_term,
            total_loss,
            loss_percent,
            eps_diff,
        })
    }

    /// Loss as a fraction of σ_p,max
    pub fn fraction(&self) -> f64 {
        self.loss_percent / 100.0
    }
}
