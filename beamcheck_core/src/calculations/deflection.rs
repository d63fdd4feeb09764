//! # Deflection Check
//!
//! Long-term midspan deflection with creep (through E_c,middle), shrinkage
//! curvature, prestress camber and tension stiffening (EC2 7.4.3).
//!
//! For each state (uncracked I, fully cracked II):
//!
//! - δ_load = 5wL⁴/(384·E_c,middle·I), w = g_d + ψ₂·p_d
//! - δ_p = M_p,eff·L²/(8·E_c,middle·I), prestressed only (upward)
//! - κ_s = ε_cs·η·A_s·S/I, δ_s = κ_s·L²/8
//!
//! The states are combined as δ = ζ·δ_II + (1 − ζ)·δ_I with
//! ζ = 1 − β(M_cr/M_Ed)² when cracked and ζ = 0 otherwise.

use log::debug;
use serde::{Deserialize, Serialize};

use super::section_state::{reinforcement_layers, UncrackedState};
use super::uls::utilization;
use crate::equations::{
    constant_curvature_deflection,
    constant_moment_deflection,
    cracked_neutral_axis_factor,
    transformed_section,
    uniform_load_max_deflection,
};
use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadEffects;
use crate::materials::MaterialProperties;
use crate::section::CrossSection;
use crate::settings::CodeSettings;
use crate::units::{KiloNewtonMeters, Millimeters, NewtonMillimeters};

/// Tension-stiffening distribution coefficient ζ (EC2 7.19)
pub fn distribution_coefficient(beta: f64, cracking_moment: KiloNewtonMeters, moment: KiloNewtonMeters, cracked: bool) -> f64 {
    if !cracked || moment.value() <= 0.0 {
        return 0.0;
    }
    (1.0 - beta * (cracking_moment.value() / moment.value()).powi(2)).clamp(0.0, 1.0)
}

/// ζ-weighted combination of the cracked and uncracked values (EC2 7.18)
pub fn interpolate(zeta: f64, cracked: f64, uncracked: f64) -> f64 {
    zeta * cracked + (1.0 - zeta) * uncracked
}

/// Deflection components of one section state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateDeflection {
    /// Second moment of area in concrete units (mm⁴)
    pub inertia_mm4: f64,
    /// Bending stiffness E_c,middle·I (N·mm²)
    pub stiffness: f64,
    pub load_mm: f64,
    pub prestress_mm: f64,
    /// Shrinkage curvature κ_s (1/mm)
    pub shrinkage_curvature: f64,
    pub shrinkage_mm: f64,
    pub total_mm: f64,
}

impl StateDeflection {
    fn new(
        inertia_mm4: f64,
        ec_middle: f64,
        first_moment: f64,
        modular_ratio: f64,
        eps_cs: f64,
        effects: &LoadEffects,
        prestress_moment: KiloNewtonMeters,
    ) -> Self {
        let span: Millimeters = effects.span.into();
        let l = span.value();
        let stiffness = ec_middle * inertia_mm4;
        let load_mm = uniform_load_max_deflection(effects.sustained_load_d.n_per_mm(), l, stiffness);
        let prestress_mm = constant_moment_deflection(NewtonMillimeters::from(prestress_moment).value(), l, stiffness);
        let shrinkage_curvature = eps_cs * modular_ratio * first_moment / inertia_mm4;
        let shrinkage_mm = constant_curvature_deflection(shrinkage_curvature, l);

        StateDeflection {
            inertia_mm4,
            stiffness,
            load_mm,
            prestress_mm,
            shrinkage_curvature,
            shrinkage_mm,
            total_mm: load_mm + prestress_mm + shrinkage_mm,
        }
    }
}

/// Deflection verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeflectionVerdict {
    /// E_c,middle (N/mm²)
    pub ec_middle: f64,
    /// η = E_s/E_c,middle
    pub modular_ratio: f64,
    pub cracking_moment: KiloNewtonMeters,
    pub cracked: bool,
    pub zeta: f64,
    pub uncracked_state: StateDeflection,
    pub cracked_state: StateDeflection,
    /// Final deflection, positive downward (mm)
    pub deflection_mm: f64,
    /// L/250 (mm)
    pub limit_mm: f64,
    /// |δ|/limit·100 (%)
    pub utilization: f64,
    pub passes: bool,
}

/// Tension member of the section for stiffness purposes
#[derive(Debug, Clone, Copy, PartialEq)]
struct TensionMember {
    area_mm2: f64,
    depth_mm: f64,
    modulus: f64,
}

#[allow(clippy::too_many_arguments)]
fn evaluate(
    section: &CrossSection,
    member: TensionMember,
    effects: &LoadEffects,
    ec_middle: f64,
    eps_cs: f64,
    prestress_moment: KiloNewtonMeters,
    classification: &UncrackedState,
    settings: &CodeSettings,
) -> DeflectionVerdict {
    let (b, h) = (section.width_mm, section.height_mm);
    let d = member.depth_mm;
    let eta = member.modulus / ec_middle;

    // Uncracked: transformed section about its own centroid
    let layers = if section.strands.is_some() {
        reinforcement_layers(section, 1.0, eta)
    } else {
        reinforcement_layers(section, eta, 1.0)
    };
    let props = transformed_section(b, h, &layers);
    let lever_1 = d - h / 2.0 - props.centroid;
    let uncracked_state = StateDeflection::new(
        props.inertia,
        ec_middle,
        member.area_mm2 * lever_1,
        eta,
        eps_cs,
        effects,
        prestress_moment,
    );

    // Fully cracked: concrete in tension ignored
    let alpha = cracked_neutral_axis_factor(eta * member.area_mm2 / (b * d));
    let x = alpha * d;
    let inertia_2 = b * x.powi(3) / 3.0 + eta * member.area_mm2 * (d - x).powi(2);
    let cracked_state = StateDeflection::new(
        inertia_2,
        ec_middle,
        member.area_mm2 * (d - x),
        eta,
        eps_cs,
        effects,
        prestress_moment,
    );

    let cracked = classification.is_cracked(effects.moment_ed);
    let zeta = distribution_coefficient(
        settings.tension_stiffening_beta,
        classification.cracking_moment,
        effects.moment_ed,
        cracked,
    );
    let deflection_mm = interpolate(zeta, cracked_state.total_mm, uncracked_state.total_mm);
    let span: Millimeters = effects.span.into();
    let limit_mm = span.value() / settings.deflection_span_ratio;

    debug!(
        "deflection: E_c,mid = {ec_middle:.0}, zeta = {zeta:.3}, delta = {deflection_mm:.2} mm (limit {limit_mm:.1})"
    );

    DeflectionVerdict {
        ec_middle,
        modular_ratio: eta,
        cracking_moment: classification.cracking_moment,
        cracked,
        zeta,
        uncracked_state,
        cracked_state,
        deflection_mm,
        limit_mm,
        utilization: utilization(deflection_mm.abs(), limit_mm),
        passes: deflection_mm.abs() <= limit_mm,
    }
}

/// Deflection of an ordinary section.
pub fn check_ordinary(
    section: &CrossSection,
    materials: &MaterialProperties,
    effects: &LoadEffects,
    ec_middle: f64,
    eps_cs: f64,
    classification: &UncrackedState,
    settings: &CodeSettings,
) -> CalcResult<DeflectionVerdict> {
    let bars = section
        .bottom_bars()
        .ok_or_else(|| CalcError::domain("bars", "none", "No tension reinforcement"))?;
    let member = TensionMember {
        area_mm2: bars.area_mm2,
        depth_mm: bars.depth_mm,
        modulus: materials.rebar.es,
    };
    Ok(evaluate(
        section,
        member,
        effects,
        ec_middle,
        eps_cs,
        KiloNewtonMeters(0.0),
        classification,
        settings,
    ))
}

/// Deflection of a prestressed section, with camber from the effective
/// prestress `prestress_moment` (kNm, negative for a tendon below the
/// centroid).
#[allow(clippy::too_many_arguments)]
pub fn check_prestressed(
    section: &CrossSection,
    materials: &MaterialProperties,
    effects: &LoadEffects,
    ec_middle: f64,
    eps_cs: f64,
    prestress_moment: KiloNewtonMeters,
    classification: &UncrackedState,
    settings: &CodeSettings,
) -> CalcResult<DeflectionVerdict> {
    let strands = section
        .strands
        .ok_or_else(|| CalcError::domain("strands", "none", "No prestressing strands"))?;
    let member = TensionMember {
        area_mm2: strands.area_mm2,
        depth_mm: strands.depth_mm,
        modulus: materials.ep(),
    };
    Ok(evaluate(
        section,
        member,
        effects,
        ec_middle,
        eps_cs,
        prestress_moment,
        classification,
        settings,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::DistributedLoads;
    use crate::materials::ExposureClass;
    use crate::section::{BarLayer, Reinforcement};
    use crate::units::{KiloNewtons, Meters};
    use approx::assert_relative_eq;

    fn setup(g: f64, p: f64) -> (CrossSection, MaterialProperties, LoadEffects) {
        let settings = CodeSettings::default();
        let layout = Reinforcement::Ordinary {
            bars: BarLayer { count: 4, diameter_mm: 20.0 },
        };
        let section = CrossSection::new(300.0, 500.0, 10.0, ExposureClass::XC1, &layout, None, &settings).unwrap();
        let materials = MaterialProperties::resolve("C30", "B500NC", "R", None, &settings).unwrap();
        let loads = DistributedLoads {
            self_load_kn_per_m: g,
            live_load_kn_per_m: p,
            ..DistributedLoads::default()
        };
        let effects = LoadEffects::compute(&loads, Meters(6.0), &section, None, &settings).unwrap();
        (section, materials, effects)
    }

    fn classification(section: &CrossSection, materials: &MaterialProperties, ec_middle: f64, effects: &LoadEffects) -> UncrackedState {
        let layers = reinforcement_layers(section, materials.rebar.es / ec_middle, 1.0);
        UncrackedState::resolve(section, &layers, KiloNewtons(0.0), effects.moment_ed, materials.concrete.fctm)
    }

    #[test]
    fn test_zeta_limits() {
        let m_cr = KiloNewtonMeters(40.0);
        assert_eq!(distribution_coefficient(0.5, m_cr, KiloNewtonMeters(30.0), false), 0.0);
        assert_relative_eq!(distribution_coefficient(0.5, m_cr, KiloNewtonMeters(40.0), true), 0.5);
        assert_relative_eq!(distribution_coefficient(0.5, m_cr, KiloNewtonMeters(80.0), true), 0.875);
    }

    #[test]
    fn test_interpolate_endpoints() {
        assert_eq!(interpolate(0.0, 30.0, 10.0), 10.0);
        assert_eq!(interpolate(1.0, 30.0, 10.0), 30.0);
        assert_eq!(interpolate(0.25, 30.0, 10.0), 15.0);
    }

    #[test]
    fn test_cracked_state_is_softer() {
        let settings = CodeSettings::default();
        let (section, materials, effects) = setup(5.0, 10.0);
        let ec_mid = 12_000.0;
        let state = classification(&section, &materials, ec_mid, &effects);
        let verdict = check_ordinary(&section, &materials, &effects, ec_mid, 4e-4, &state, &settings).unwrap();
        assert!(verdict.cracked);
        assert!(verdict.cracked_state.stiffness < verdict.uncracked_state.stiffness);
        assert!(verdict.cracked_state.load_mm > verdict.uncracked_state.load_mm);
        assert!(verdict.deflection_mm >= verdict.uncracked_state.total_mm);
        assert!(verdict.deflection_mm <= verdict.cracked_state.total_mm);
        assert_eq!(verdict.uncracked_state.prestress_mm, 0.0);
        assert_relative_eq!(verdict.limit_mm, 24.0);
        assert_eq!(verdict.passes, verdict.deflection_mm.abs() <= 24.0);
    }

    #[test]
    fn test_load_deflection_formula() {
        let settings = CodeSettings::default();
        let (section, materials, effects) = setup(5.0, 10.0);
        let ec_mid = 15_000.0;
        let state = classification(&section, &materials, ec_mid, &effects);
        let verdict = check_ordinary(&section, &materials, &effects, ec_mid, 0.0, &state, &settings).unwrap();
        // w = 6 + 0.4·15 = 12 N/mm over 6000 mm
        let expected = 5.0 * 12.0 * 6000.0_f64.powi(4) / (384.0 * verdict.uncracked_state.stiffness);
        assert_relative_eq!(verdict.uncracked_state.load_mm, expected, max_relative = 1e-12);
        assert_eq!(verdict.uncracked_state.shrinkage_mm, 0.0);
    }

    #[test]
    fn test_uncracked_uses_state_one_only() {
        let settings = CodeSettings::default();
        let (section, materials, effects) = setup(0.5, 0.5);
        let ec_mid = 12_000.0;
        let state = classification(&section, &materials, ec_mid, &effects);
        let verdict = check_ordinary(&section, &materials, &effects, ec_mid, 4e-4, &state, &settings).unwrap();
        assert!(!verdict.cracked);
        assert_eq!(verdict.zeta, 0.0);
        assert_eq!(verdict.deflection_mm, verdict.uncracked_state.total_mm);
    }
}
