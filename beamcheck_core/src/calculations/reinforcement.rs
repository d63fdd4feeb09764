//! # Reinforcement Check
//!
//! Required tension area from the ULS lever arm, EC2 detailing limits
//! (9.2.1.1 and 9.2.2) and minimum shear reinforcement.
//!
//! ## Formulas
//!
//! - z = (1 − λα/2)·d
//! - A_s,req = M_Ed/(z·f_yd), or A_p,req = M_Ed/(z·f_pd) with strands
//! - A_s,min = max(0.26·f_ctm/f_yk·b·d, 0.0013·b·d)
//! - A_s,max = 0.04·A_c
//! - (A_sw/s)_min = 0.1·√f_ck/f_yk·b
//!
//! For strands the minimum is checked on the equivalent tension area
//! A_p·f_pd/f_yd + A_s,bottom and the maximum on A_p + A_s. Top bars count
//! towards the maximum only.

use log::debug;
use serde::{Deserialize, Serialize};

use super::uls::{utilization, FlexureResult};
use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadEffects;
use crate::materials::MaterialProperties;
use crate::section::CrossSection;
use crate::units::NewtonMillimeters;

/// Reinforcement verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementVerdict {
    /// Lever arm z (mm)
    pub lever_arm_mm: f64,
    /// Design strength of the tension steel (N/mm²)
    pub design_strength: f64,
    pub required_area_mm2: f64,
    pub provided_area_mm2: f64,
    /// Area compared with the minimum (equivalent area with strands)
    pub effective_area_mm2: f64,
    pub min_area_mm2: f64,
    pub max_area_mm2: f64,
    /// Provided A_sw/s (mm²/mm)
    pub shear_area_per_mm: f64,
    /// Minimum A_sw/s (mm²/mm)
    pub min_shear_area_per_mm: f64,
    /// required/provided·100 (%)
    pub utilization: f64,
    pub insufficient: bool,
    pub under_reinforced: bool,
    pub over_reinforced: bool,
    pub shear_under_reinforced: bool,
}

impl ReinforcementVerdict {
    pub fn passes(&self) -> bool {
        !(self.insufficient || self.under_reinforced || self.over_reinforced || self.shear_under_reinforced)
    }
}

/// Check the tension and shear reinforcement against demand and limits.
pub fn calculate(
    section: &CrossSection,
    materials: &MaterialProperties,
    effects: &LoadEffects,
    flexure: &FlexureResult,
    asw_per_s: f64,
) -> CalcResult<ReinforcementVerdict> {
    let concrete = &materials.concrete;
    let rebar = &materials.rebar;
    let b = section.width_mm;
    let d = section.tension_depth_mm()?;
    let z = (1.0 - 0.5 * concrete.lambda * flexure.alpha) * d;
    let m_ed = NewtonMillimeters::from(effects.moment_ed).value();

    let (design_strength, provided_area_mm2, effective_area_mm2, total_area_mm2) = match section.strands {
        Some(strands) => {
            let strand = materials
                .strand
                .as_ref()
                .ok_or_else(|| CalcError::domain("strand", "none", "Strand properties not resolved"))?;
            let tension_bars = section.bottom_bars().map_or(0.0, |b| b.area_mm2);
            (
                strand.fpd,
                strands.area_mm2,
                strands.area_mm2 * strand.fpd / rebar.fyd + tension_bars,
                strands.area_mm2 + section.bar_area_mm2(),
            )
        }
        None => {
            let bars = section.bar_area_mm2();
            (rebar.fyd, bars, bars, bars)
        }
    };

    let required_area_mm2 = m_ed / (z * design_strength);
    let min_area_mm2 = (0.26 * concrete.fctm / rebar.fyk * b * d).max(0.0013 * b * d);
    let max_area_mm2 = 0.04 * section.area_mm2;
    let min_shear_area_per_mm = 0.1 * concrete.fck.sqrt() / rebar.fyk * b;

    let verdict = ReinforcementVerdict {
        lever_arm_mm: z,
        design_strength,
        required_area_mm2,
        provided_area_mm2,
        effective_area_mm2,
        min_area_mm2,
        max_area_mm2,
        shear_area_per_mm: asw_per_s,
        min_shear_area_per_mm,
        utilization: utilization(required_area_mm2, provided_area_mm2),
        insufficient: provided_area_mm2 < required_area_mm2,
        under_reinforced: effective_area_mm2 < min_area_mm2,
        over_reinforced: total_area_mm2 > max_area_mm2,
        shear_under_reinforced: asw_per_s <= min_shear_area_per_mm,
    };
    debug!(
        "reinforcement: A_req = {:.0} mm2, A_prov = {:.0} mm2, A_min = {:.0}, A_max = {:.0}",
        verdict.required_area_mm2, verdict.provided_area_mm2, verdict.min_area_mm2, verdict.max_area_mm2
    );
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::uls::{flexural_capacity, ForceTerms};
    use crate::loads::DistributedLoads;
    use crate::materials::ExposureClass;
    use crate::materials::StrandSpec;
    use crate::section::{BarLayer, Reinforcement, StrandLayer};
    use crate::settings::CodeSettings;
    use crate::units::Meters;

    fn verdict(count: u32, diameter_mm: f64, asw_per_s: f64) -> ReinforcementVerdict {
        let settings = CodeSettings::default();
        let layout = Reinforcement::Ordinary {
            bars: BarLayer { count, diameter_mm },
        };
        let section = CrossSection::new(300.0, 500.0, 10.0, ExposureClass::XC1, &layout, None, &settings).unwrap();
        let materials = MaterialProperties::resolve("C30", "B500NC", "R", None, &settings).unwrap();
        let loads = DistributedLoads {
            self_load_kn_per_m: 5.0,
            live_load_kn_per_m: 10.0,
            ..DistributedLoads::default()
        };
        let effects = LoadEffects::compute(&loads, Meters(6.0), &section, None, &settings).unwrap();
        let flexure = flexural_capacity(&ForceTerms::ordinary(&section, &materials).unwrap()).unwrap();
        calculate(&section, &materials, &effects, &flexure, asw_per_s).unwrap()
    }

    #[test]
    fn test_example_beam_reinforcement() {
        let v = verdict(4, 20.0, 200.0 / 220.0);
        // z = (1 − 0.4·0.2976)·450
        assert!((v.lever_arm_mm - 396.4).abs() < 0.1);
        // A_req = 94.5e6/(396.4·434.78)
        assert!((v.required_area_mm2 - 548.3).abs() < 1.0);
        // A_min = max(0.26·2.9/500·300·450, 0.0013·300·450)
        assert!((v.min_area_mm2 - 203.58).abs() < 0.01);
        assert_eq!(v.max_area_mm2, 6000.0);
        assert!((v.min_shear_area_per_mm - 0.3286).abs() < 1e-3);
        assert!(v.passes());
        assert!(v.utilization < 50.0);
    }

    #[test]
    fn test_too_little_steel() {
        let v = verdict(2, 12.0, 200.0 / 220.0);
        assert!(v.insufficient);
        assert!(!v.under_reinforced);
        assert!(!v.passes());
        assert!(v.utilization > 100.0);
    }

    #[test]
    fn test_missing_stirrups_flagged() {
        let v = verdict(4, 20.0, 0.0);
        assert!(v.shear_under_reinforced);
        assert!(!v.passes());
    }

    #[test]
    fn test_over_reinforced_flag() {
        let v = verdict(8, 40.0, 1.0);
        assert!(v.over_reinforced);
    }

    #[test]
    fn test_top_bars_excluded_from_tension_minimum() {
        let settings = CodeSettings::default();
        let spec = StrandSpec {
            name: "Y1860S7",
            diameter_mm: 9.0,
        };
        let materials = MaterialProperties::resolve("C30", "B500NC", "R", Some(spec), &settings).unwrap();
        let strand = materials.strand.clone().unwrap();
        let layout = Reinforcement::PrestressedWithTop {
            strands: StrandLayer {
                count: 1,
                diameter_mm: 9.0,
                name: "Y1860S7".to_string(),
            },
            top_bars: BarLayer { count: 1, diameter_mm: 25.0 },
        };
        let section =
            CrossSection::new(300.0, 800.0, 10.0, ExposureClass::XC1, &layout, Some(strand.area_mm2), &settings).unwrap();
        let loads = DistributedLoads {
            self_load_kn_per_m: 5.0,
            live_load_kn_per_m: 10.0,
            ..DistributedLoads::default()
        };
        let effects = LoadEffects::compute(&loads, Meters(10.0), &section, Some(&strand), &settings).unwrap();
        let flexure = flexural_capacity(&ForceTerms::prestressed(&section, &materials, 6e-3).unwrap()).unwrap();
        let v = calculate(&section, &materials, &effects, &flexure, 200.0 / 220.0).unwrap();

        let top_area = section.top_bars().unwrap().area_mm2;
        assert!((top_area - 490.87).abs() < 0.01);
        assert_eq!(v.design_strength, strand.fpd);
        assert_eq!(v.provided_area_mm2, 50.0);
        // 50·f_pd/f_yd without the top bar
        assert!((v.effective_area_mm2 - 50.0 * strand.fpd / materials.rebar.fyd).abs() < 1e-9);
        assert!(v.effective_area_mm2 < v.min_area_mm2);
        assert!(v.under_reinforced);
        assert!(v.insufficient);
        assert!(!v.over_reinforced);
        assert!(!v.passes());
    }
}
