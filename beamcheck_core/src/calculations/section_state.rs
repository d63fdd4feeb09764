//! # Section State
//!
//! Uncracked and cracked resolvers for the rectangular section, and the
//! single cracking classification shared by every SLS check.
//!
//! ## Sign Conventions
//!
//! - y is measured downward from mid-height
//! - Stress: tension positive, compression negative
//! - The prestressing force P acts as compression at eccentricity e
//!
//! ## Uncracked stresses
//!
//! σ(y) = −P/A_t + (−P(e − y_t) + M)(y − y_t)/I_t
//!
//! The cracking moment sets the bottom-fibre stress to f_ctm:
//!
//! M_cr = (f_ctm + P/A_t)·I_t/(h/2 − y_t) + P(e − y_t)

use log::debug;
use serde::{Deserialize, Serialize};

use crate::equations::roots::{bisection, DEFAULT_MAX_ITER, DEFAULT_TOLERANCE};
use crate::equations::{transformed_section, TransformedLayer};
use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadEffects;
use crate::section::CrossSection;
use crate::units::{KiloNewtonMeters, KiloNewtons, Meters, Millimeters, NewtonMillimeters, Newtons};

/// Whether a section with cracking moment `cracking_moment` is cracked under
/// `moment`.
///
/// Every check that needs the classification calls this.
pub fn is_cracked(moment: KiloNewtonMeters, cracking_moment: KiloNewtonMeters) -> bool {
    moment.value() >= cracking_moment.value()
}

/// Reinforcement layers of the section for transformation, with the given
/// modular ratios for ordinary bars and strands.
pub fn reinforcement_layers(section: &CrossSection, bar_ratio: f64, strand_ratio: f64) -> Vec<TransformedLayer> {
    let half = section.height_mm / 2.0;
    let bars = section.bars.map(|b| TransformedLayer {
        area: b.area_mm2,
        modular_ratio: bar_ratio,
        y: b.depth_mm - half,
    });
    let strands = section.strands.map(|s| TransformedLayer {
        area: s.area_mm2,
        modular_ratio: strand_ratio,
        y: s.depth_mm - half,
    });
    bars.into_iter().chain(strands).collect()
}

/// Linear-elastic state of the uncracked transformed section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncrackedState {
    /// Transformed area A_t (mm²)
    pub area_mm2: f64,
    /// Transformed centroid below mid-height y_t (mm)
    pub centroid_mm: f64,
    /// Transformed second moment I_t (mm⁴)
    pub inertia_mm4: f64,
    pub height_mm: f64,
    pub eccentricity_mm: f64,
    /// Prestressing force used (kN), zero for ordinary sections
    pub prestress_force: KiloNewtons,
    pub moment: KiloNewtonMeters,
    pub cracking_moment: KiloNewtonMeters,
    /// σ at the top fibre (N/mm²)
    pub stress_top: f64,
    /// σ at the bottom fibre (N/mm²)
    pub stress_bottom: f64,
    /// Concrete σ at tendon level (N/mm²), prestressed sections only
    pub stress_tendon: Option<f64>,
}

impl UncrackedState {
    /// Resolve the uncracked section under prestress P and moment M.
    pub fn resolve(
        section: &CrossSection,
        layers: &[TransformedLayer],
        prestress_force: KiloNewtons,
        moment: KiloNewtonMeters,
        fctm: f64,
    ) -> Self {
        let props = transformed_section(section.width_mm, section.height_mm, layers);
        let p = Newtons::from(prestress_force).value();
        let e = section.eccentricity_mm();
        let bottom_lever = section.height_mm / 2.0 - props.centroid;
        let cracking_moment_nmm =
            (fctm + p / props.area) * props.inertia / bottom_lever + p * (e - props.centroid);

        let mut state = UncrackedState {
            area_mm2: props.area,
            centroid_mm: props.centroid,
            inertia_mm4: props.inertia,
            height_mm: section.height_mm,
            eccentricity_mm: e,
            prestress_force,
            moment,
            cracking_moment: NewtonMillimeters(cracking_moment_nmm).into(),
            stress_top: 0.0,
            stress_bottom: 0.0,
            stress_tendon: None,
        };
        state.stress_top = state.stress_at(-section.height_mm / 2.0);
        state.stress_bottom = state.stress_at(section.height_mm / 2.0);
        state.stress_tendon = section.strands.map(|_| state.stress_at(e));
        state
    }

    /// Concrete stress at depth y below mid-height (N/mm²)
    pub fn stress_at(&self, y: f64) -> f64 {
        let p = Newtons::from(self.prestress_force).value();
        let m = NewtonMillimeters::from(self.moment).value();
        -p / self.area_mm2 + (-p * (self.eccentricity_mm - self.centroid_mm) + m) * (y - self.centroid_mm) / self.inertia_mm4
    }

    /// Classification of this section under `moment`
    pub fn is_cracked(&self, moment: KiloNewtonMeters) -> bool {
        is_cracked(moment, self.cracking_moment)
    }
}

/// Cracked prestressed section: neutral axis and stresses with the concrete
/// in tension ignored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrackedState {
    /// Neutral-axis depth factor α = x/d_p
    pub alpha: f64,
    /// Neutral-axis depth x (mm)
    pub neutral_axis_mm: f64,
    /// Net compressive force N = P₀ − N_s (kN)
    pub axial_force: KiloNewtons,
    /// Moment about the gross centroid (kNm)
    pub moment: KiloNewtonMeters,
    /// Distance e + a from the tendon to the resultant compression (mm)
    pub pressure_line_mm: f64,
    /// η = E_p/E_c,middle
    pub modular_ratio: f64,
    /// ρ = A_p/(b·d_p)
    pub reinforcement_ratio: f64,
    /// Top-fibre concrete stress (N/mm², compression negative)
    pub sigma_c_top: f64,
    /// Tendon stress increment after cracking (N/mm²)
    pub tendon_stress_increment: f64,
}

impl CrackedState {
    /// Solve the cracked prestressed section under the external moment
    /// `load_moment` (M_Ed for crack control and deflection, M_k for the
    /// stress limits).
    ///
    /// Returns `Ok(None)` when the section has no strands, or when the
    /// equilibrium cubic has no root in (0, 1) and the section is uncracked.
    /// A cracked section without a root is a convergence error.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve(
        section: &CrossSection,
        effects: &LoadEffects,
        load_moment: KiloNewtonMeters,
        loss_fraction: f64,
        eps_cs: f64,
        ep: f64,
        ec_middle: f64,
        cracked: bool,
    ) -> CalcResult<Option<Self>> {
        let Some(strands) = section.strands else {
            return Ok(None);
        };

        let b = section.width_mm;
        let d = strands.depth_mm;
        let e = strands.eccentricity_mm;
        let ap = strands.area_mm2;

        let shrinkage_force = KiloNewtons::from(Newtons(eps_cs * ep * ap)).value();
        let axial_force = effects.prestress_force.value() - shrinkage_force;
        let moment = load_moment.value()
            + effects.prestress_moment.value() * (1.0 - loss_fraction)
            + shrinkage_force * Meters::from(Millimeters(e)).value();

        let eta = ep / ec_middle;
        let rho = ap / (b * d);
        let eta_rho = eta * rho;

        let root = if axial_force > 0.0 {
            let lever = Millimeters::from(Meters(moment / axial_force)).value() + e;
            if lever > 0.0 {
                let cubic = |alpha: f64| {
                    d / (6.0 * lever) * alpha.powi(3) + 0.5 * (1.0 - d / lever) * alpha.powi(2) + eta_rho * alpha
                        - eta_rho
                };
                bisection(cubic, 0.0, 1.0, DEFAULT_TOLERANCE, DEFAULT_MAX_ITER).map(|alpha| (alpha, lever))
            } else {
                None
            }
        } else {
            None
        };

        let Some((alpha, lever)) = root.filter(|(alpha, _)| *alpha > 0.0 && *alpha < 1.0) else {
            if cracked {
                return Err(CalcError::convergence(
                    "cracked_section",
                    format!("No neutral axis in (0, 1) for N = {axial_force:.1} kN, M = {moment:.1} kNm"),
                ));
            }
            debug!("cracked resolver: no root, section uncracked");
            return Ok(None);
        };

        let sigma_c_top = -Newtons::from(KiloNewtons(axial_force)).value() / (b * d * (0.5 * alpha - eta_rho * (1.0 - alpha) / alpha));
        let tendon_stress_increment = ep * (sigma_c_top.abs() / ec_middle) * (1.0 - alpha) / alpha;
        debug!(
            "cracked resolver: alpha = {alpha:.4}, sigma_c_top = {sigma_c_top:.2}, d_sigma_p = {tendon_stress_increment:.1}"
        );

        Ok(Some(CrackedState {
            alpha,
            neutral_axis_mm: alpha * d,
            axial_force: KiloNewtons(axial_force),
            moment: KiloNewtonMeters(moment),
            pressure_line_mm: lever,
            modular_ratio: eta,
            reinforcement_ratio: rho,
            sigma_c_top,
            tendon_stress_increment,
        }))
    }

    /// Net tendon stress change |Δσ_p − ε_cs·E_p| after cracking and
    /// shrinkage (N/mm²)
    pub fn net_tendon_stress_change(&self, eps_cs: f64, ep: f64) -> f64 {
        (self.tendon_stress_increment - eps_cs * ep).abs()
    }
}
