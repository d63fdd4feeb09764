//! # Stress Limitation (EC2 7.2)
//!
//! Concrete and tendon stress checks of a prestressed section.
//!
//! | check | limit |
//! |---|---|
//! | concrete compression, characteristic | 0.6·f_ck |
//! | concrete compression, quasi-permanent | 0.45·f_ck |
//! | concrete tension | f_ctm |
//! | tendon | 0.75·f_pk |
//!
//! Stresses are taken under the effective prestress P₀(1 − loss) and the
//! characteristic moment M_k. Both states are reported: the uncracked top,
//! bottom and tendon-level fibres with σ_p,uncracked, and the cracked top
//! fibre with σ_p,cracked when the cracked equilibrium resolves. The
//! classification under M_k picks which of them the limits apply to.

use log::debug;
use serde::{Deserialize, Serialize};

use super::losses::TimeDependentLosses;
use super::section_state::{CrackedState, UncrackedState};
use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadEffects;
use crate::materials::MaterialProperties;
use crate::units::KiloNewtonMeters;

/// Stress limits (N/mm², compression negative)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressLimits {
    pub compression: f64,
    pub quasi_permanent_compression: f64,
    pub tension: f64,
    pub tendon: f64,
}

impl StressLimits {
    pub fn new(fck: f64, fctm: f64, fpk: f64) -> Self {
        StressLimits {
            compression: -0.6 * fck,
            quasi_permanent_compression: -0.45 * fck,
            tension: fctm,
            tendon: 0.75 * fpk,
        }
    }

    /// Whether a concrete stress lies within the characteristic limits
    pub fn concrete_ok(&self, sigma: f64) -> bool {
        sigma >= self.compression && sigma <= self.tension
    }
}

/// Stress verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressVerdict {
    pub limits: StressLimits,
    /// Characteristic moment M_k the stresses are taken under
    pub moment: KiloNewtonMeters,
    /// Classification under M_k
    pub cracked: bool,
    /// Quasi-permanent concrete stress at the tendon (N/mm²)
    pub sigma_c_qp: f64,
    /// Uncracked concrete stresses: (fibre, σ)
    pub uncracked_stresses: Vec<(String, f64)>,
    /// Tendon stress of the uncracked state (N/mm²)
    pub sigma_p_uncracked: f64,
    /// Top-fibre concrete stress of the cracked state (N/mm²)
    pub sigma_c_cracked: Option<f64>,
    /// Tendon stress of the cracked state (N/mm²)
    pub sigma_p_cracked: Option<f64>,
    pub quasi_permanent_ok: bool,
    pub concrete_ok: bool,
    pub tendon_ok: bool,
}

impl StressVerdict {
    pub fn passes(&self) -> bool {
        self.quasi_permanent_ok && self.concrete_ok && self.tendon_ok
    }

    /// Tendon stress of the state the limits apply to
    pub fn tendon_stress(&self) -> f64 {
        match (self.cracked, self.sigma_p_cracked) {
            (true, Some(sigma)) => sigma,
            _ => self.sigma_p_uncracked,
        }
    }
}

/// Check concrete and tendon stresses.
///
/// `characteristic` is the uncracked state under the effective prestress and
/// M_k, `cracked_state` the cracked state under the same actions.
pub fn calculate(
    materials: &MaterialProperties,
    effects: &LoadEffects,
    losses: &TimeDependentLosses,
    characteristic: &UncrackedState,
    cracked_state: Option<&CrackedState>,
) -> CalcResult<StressVerdict> {
    let strand = materials
        .strand
        .as_ref()
        .ok_or_else(|| CalcError::domain("strand", "none", "Stress check needs prestressing strands"))?;
    let concrete = &materials.concrete;
    let limits = StressLimits::new(concrete.fck, concrete.fctm, strand.fpk);
    let base = effects.sigma_p_max - losses.total_loss;

    let sigma_c_p = characteristic.stress_tendon.unwrap_or(0.0);
    let uncracked_stresses = vec![
        ("top".to_string(), characteristic.stress_top),
        ("bottom".to_string(), characteristic.stress_bottom),
        ("tendon".to_string(), sigma_c_p),
    ];
    let sigma_p_uncracked = base + strand.ep / concrete.ecm * sigma_c_p;
    let sigma_c_cracked = cracked_state.map(|state| state.sigma_c_top);
    let sigma_p_cracked = cracked_state.map(|state| base + state.tendon_stress_increment);

    let cracked = characteristic.is_cracked(effects.moment_k);
    let (concrete_ok, tendon_ok) = if cracked {
        let (Some(sigma_c), Some(sigma_p)) = (sigma_c_cracked, sigma_p_cracked) else {
            return Err(CalcError::convergence(
                "cracked_section",
                "Cracked section has no resolved cracked state",
            ));
        };
        (limits.concrete_ok(sigma_c), sigma_p <= limits.tendon)
    } else {
        (
            uncracked_stresses.iter().all(|(_, s)| limits.concrete_ok(*s)),
            sigma_p_uncracked <= limits.tendon,
        )
    };

    let verdict = StressVerdict {
        limits,
        moment: effects.moment_k,
        cracked,
        sigma_c_qp: losses.sigma_c_qp,
        uncracked_stresses,
        sigma_p_uncracked,
        sigma_c_cracked,
        sigma_p_cracked,
        quasi_permanent_ok: losses.sigma_c_qp >= limits.quasi_permanent_compression,
        concrete_ok,
        tendon_ok,
    };
    debug!(
        "stress: M_k = {:.1} kNm, cracked = {}, sigma_p = {:.1} N/mm2, concrete_ok = {}",
        verdict.moment.value(),
        verdict.cracked,
        verdict.tendon_stress(),
        verdict.concrete_ok
    );
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::section_state::reinforcement_layers;
    use crate::loads::DistributedLoads;
    use crate::materials::{ExposureClass, StrandSpec};
    use crate::section::{CrossSection, Reinforcement, StrandLayer};
    use crate::settings::CodeSettings;
    use crate::units::Meters;

    struct Setup {
        materials: MaterialProperties,
        section: CrossSection,
        effects: LoadEffects,
        losses: TimeDependentLosses,
    }

    fn setup(self_load: f64, live_load: f64, sigma_c_qp: f64) -> Setup {
        let settings = CodeSettings::default();
        let spec = StrandSpec {
            name: "Y1860S7",
            diameter_mm: 12.5,
        };
        let materials = MaterialProperties::resolve("C30", "B500NC", "R", Some(spec), &settings).unwrap();
        let layout = Reinforcement::Prestressed {
            strands: StrandLayer {
                count: 6,
                diameter_mm: 12.5,
                name: "Y1860S7".to_string(),
            },
        };
        let strand = materials.strand.clone().unwrap();
        let section =
            CrossSection::new(300.0, 800.0, 10.0, ExposureClass::XC1, &layout, Some(strand.area_mm2), &settings).unwrap();
        let loads = DistributedLoads {
            self_load_kn_per_m: self_load,
            live_load_kn_per_m: live_load,
            ..DistributedLoads::default()
        };
        let effects = LoadEffects::compute(&loads, Meters(10.0), &section, Some(&strand), &settings).unwrap();
        let total_loss = 150.0;
        let losses = TimeDependentLosses {
            eps_cs: 4e-4,
            relaxation_loss: 40.0,
            sigma_c_qp,
            creep_term: 60.0,
            total_loss,
            loss_percent: total_loss * 100.0 / effects.sigma_p_max,
            eps_diff: (effects.sigma_p_max - total_loss) / strand.ep,
        };
        Setup {
            materials,
            section,
            effects,
            losses,
        }
    }

    fn characteristic_state(setup: &Setup) -> UncrackedState {
        let ecm = setup.materials.concrete.ecm;
        let layers = reinforcement_layers(&setup.section, setup.materials.rebar.es / ecm, setup.materials.ep() / ecm);
        UncrackedState::resolve(
            &setup.section,
            &layers,
            setup.effects.prestress_force * (1.0 - setup.losses.fraction()),
            setup.effects.moment_k,
            setup.materials.concrete.fctm,
        )
    }

    fn cracked_state(setup: &Setup, cracked: bool) -> Option<CrackedState> {
        CrackedState::resolve(
            &setup.section,
            &setup.effects,
            setup.effects.moment_k,
            setup.losses.fraction(),
            setup.losses.eps_cs,
            setup.materials.ep(),
            12_000.0,
            cracked,
        )
        .unwrap()
    }

    #[test]
    fn test_limits() {
        let limits = StressLimits::new(40.0, 3.5, 1860.0);
        assert_eq!(limits.compression, -24.0);
        assert_eq!(limits.quasi_permanent_compression, -18.0);
        assert_eq!(limits.tendon, 1395.0);
        assert!(limits.concrete_ok(-23.9));
        assert!(limits.concrete_ok(3.5));
        assert!(!limits.concrete_ok(-24.1));
        assert!(!limits.concrete_ok(3.6));
    }

    #[test]
    fn test_uncracked_stresses_under_characteristic_moment() {
        // M_k = 25·10²/8 = 312.5 kNm against M_Ed = 36·10²/8 = 450 kNm
        let setup = setup(5.0, 20.0, -5.0);
        let state = characteristic_state(&setup);
        assert!((setup.effects.moment_k.value() - 312.5).abs() < 1e-9);
        assert!(!state.is_cracked(setup.effects.moment_k));

        let verdict = calculate(&setup.materials, &setup.effects, &setup.losses, &state, None).unwrap();
        assert!(!verdict.cracked);
        assert_eq!(verdict.moment, setup.effects.moment_k);
        assert_eq!(verdict.uncracked_stresses.len(), 3);
        assert_eq!(verdict.uncracked_stresses[0].1, state.stress_top);
        assert_eq!(verdict.uncracked_stresses[1].1, state.stress_bottom);

        let sigma_c_p = state.stress_tendon.unwrap();
        assert!(sigma_c_p < 0.0);
        let ratio = setup.materials.ep() / setup.materials.concrete.ecm;
        let expected = setup.effects.sigma_p_max - 150.0 + ratio * sigma_c_p;
        assert!((verdict.sigma_p_uncracked - expected).abs() < 1e-9);
        assert_eq!(verdict.tendon_stress(), verdict.sigma_p_uncracked);
        assert_eq!(verdict.sigma_c_cracked, None);
        assert_eq!(verdict.sigma_p_cracked, None);

        // Below M_cr the bottom fibre stays under f_ctm
        assert!(state.stress_bottom < setup.materials.concrete.fctm);
        assert!(verdict.concrete_ok);
        assert!(verdict.tendon_ok);
        assert!(verdict.quasi_permanent_ok);
        assert!(verdict.passes());
    }

    #[test]
    fn test_reports_both_states() {
        let setup = setup(20.0, 60.0, -5.0);
        let state = characteristic_state(&setup);
        assert!(state.is_cracked(setup.effects.moment_k));
        let cracked = cracked_state(&setup, true).unwrap();

        let verdict = calculate(&setup.materials, &setup.effects, &setup.losses, &state, Some(&cracked)).unwrap();
        assert!(verdict.cracked);
        assert_eq!(verdict.uncracked_stresses.len(), 3);
        assert_eq!(verdict.sigma_c_cracked, Some(cracked.sigma_c_top));
        let expected = setup.effects.sigma_p_max - 150.0 + cracked.tendon_stress_increment;
        assert!((verdict.sigma_p_cracked.unwrap() - expected).abs() < 1e-9);
        assert_eq!(verdict.tendon_stress(), verdict.sigma_p_cracked.unwrap());
        assert_eq!(verdict.concrete_ok, verdict.limits.concrete_ok(cracked.sigma_c_top));
        assert_eq!(verdict.tendon_ok, expected <= verdict.limits.tendon);
        // Cracking raises the tendon stress above the uncracked value
        assert!(verdict.sigma_p_cracked.unwrap() > verdict.sigma_p_uncracked);
    }

    #[test]
    fn test_quasi_permanent_limit() {
        // 0.45·30 = 13.5 N/mm²
        let setup = setup(5.0, 20.0, -14.0);
        let state = characteristic_state(&setup);
        let verdict = calculate(&setup.materials, &setup.effects, &setup.losses, &state, None).unwrap();
        assert!(!verdict.quasi_permanent_ok);
        assert!(!verdict.passes());
    }

    #[test]
    fn test_cracked_without_state_is_convergence_error() {
        let setup = setup(20.0, 60.0, -5.0);
        let state = characteristic_state(&setup);
        let err = calculate(&setup.materials, &setup.effects, &setup.losses, &state, None).unwrap_err();
        assert_eq!(err.error_code(), "CONVERGENCE");
    }
}
