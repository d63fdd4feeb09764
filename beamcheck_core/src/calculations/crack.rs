//! # Crack Control
//!
//! Crack control without direct calculation (EC2 7.3.3): the steel stress in
//! the cracked section and the allowed crack width give the largest bar
//! diameter from Table 7.2N.
//!
//! - k_c = min(c_nom/c_min,dur, 1.3)
//! - w_max = 0.4 mm for X0, otherwise 0.3·k_c mm
//! - Ordinary bars: σ_s = E_s·M_Ed·(1 − α)d/EI₂, EI₂ = E_c,middle·b(αd)³/3 + E_s·A_s((1 − α)d)²
//! - Strands: σ = |Δσ_p − ε_cs·E_p| + Δσ_p,c+s+r, the tendon stress change
//!   from the cracked section under M_Ed net of shrinkage, plus the
//!   time-dependent loss

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::losses::TimeDependentLosses;
use super::section_state::CrackedState;
use super::uls::utilization;
use crate::equations::cracked_neutral_axis_factor;
use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadEffects;
use crate::materials::MaterialProperties;
use crate::section::CrossSection;
use crate::units::{KiloNewtonMeters, NewtonMillimeters};

/// Steel stresses heading the columns of Table 7.2N (N/mm²)
const TABLE_STRESSES: [f64; 8] = [160.0, 200.0, 240.0, 280.0, 320.0, 360.0, 400.0, 450.0];
/// Crack widths heading the rows of Table 7.2N (mm)
const TABLE_WIDTHS: [f64; 3] = [0.4, 0.3, 0.2];
/// Maximum bar diameters (mm)
const TABLE_DIAMETERS: [[f64; 8]; 3] = [
    [40.0, 32.0, 20.0, 16.0, 12.0, 10.0, 8.0, 6.0],
    [32.0, 25.0, 16.0, 12.0, 10.0, 8.0, 6.0, 5.0],
    [25.0, 16.0, 12.0, 8.0, 6.0, 5.0, 4.0, 0.0],
];

/// Linear interpolation of `ys` over ascending or descending `xs`
fn interpolate_row(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    for i in 0..xs.len() - 1 {
        let (x0, x1) = (xs[i], xs[i + 1]);
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        if x >= lo && x <= hi {
            return ys[i] + (ys[i + 1] - ys[i]) * (x - x0) / (x1 - x0);
        }
    }
    ys[ys.len() - 1]
}

/// Largest bar diameter (mm) for crack width `w_max` and steel stress
/// `sigma`, by bilinear interpolation in Table 7.2N.
///
/// Stresses below 160 N/mm² read the first column. Stresses above 450 N/mm²
/// are outside the table and give `None`. The width is clamped to
/// [0.2, 0.4] mm.
///
/// # Example
/// ```
/// use beamcheck_core::calculations::crack::max_bar_diameter;
///
/// assert_eq!(max_bar_diameter(0.3, 240.0), Some(16.0));
/// assert_eq!(max_bar_diameter(0.3, 500.0), None);
/// ```
pub fn max_bar_diameter(w_max: f64, sigma: f64) -> Option<f64> {
    if sigma > TABLE_STRESSES[TABLE_STRESSES.len() - 1] {
        warn!("steel stress {sigma:.1} N/mm2 above Table 7.2N");
        return None;
    }
    let sigma = sigma.max(TABLE_STRESSES[0]);
    let w = w_max.clamp(TABLE_WIDTHS[2], TABLE_WIDTHS[0]);

    let by_width: Vec<f64> = (0..TABLE_STRESSES.len())
        .map(|col| {
            let column: Vec<f64> = TABLE_DIAMETERS.iter().map(|row| row[col]).collect();
            interpolate_row(&TABLE_WIDTHS, &column, w)
        })
        .collect();
    Some(interpolate_row(&TABLE_STRESSES, &by_width, sigma))
}

/// Crack-control verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrackVerdict {
    pub k_c: f64,
    /// Allowed crack width (mm)
    pub w_max_mm: f64,
    /// Steel stress entering the table (N/mm²)
    pub steel_stress: f64,
    /// Table diameter limit, `None` above the table
    pub max_diameter_mm: Option<f64>,
    pub bar_diameter_mm: f64,
    /// bar/max·100 (%)
    pub utilization: f64,
    pub passes: bool,
}

impl CrackVerdict {
    fn new(section: &CrossSection, steel_stress: f64, bar_diameter_mm: f64) -> Self {
        let k_c = (section.nominal_cover_mm / section.durability_cover_mm).min(1.3);
        let w_max_mm = section.exposure.max_crack_width_mm(k_c);
        let max_diameter_mm = max_bar_diameter(w_max_mm, steel_stress);
        let passes = max_diameter_mm.is_some_and(|max| bar_diameter_mm <= max);
        let utilization = max_diameter_mm.map_or(f64::INFINITY, |max| utilization(bar_diameter_mm, max));
        debug!("crack: sigma = {steel_stress:.1} N/mm2, w_max = {w_max_mm:.3}, phi_max = {max_diameter_mm:?}");

        CrackVerdict {
            k_c,
            w_max_mm,
            steel_stress,
            max_diameter_mm,
            bar_diameter_mm,
            utilization,
            passes,
        }
    }
}

/// Steel stress of the cracked, singly reinforced ordinary section (N/mm²)
pub fn ordinary_steel_stress(
    section: &CrossSection,
    materials: &MaterialProperties,
    moment: KiloNewtonMeters,
    ec_middle: f64,
) -> CalcResult<f64> {
    let bars = section
        .bottom_bars()
        .ok_or_else(|| CalcError::domain("bars", "none", "No tension reinforcement"))?;
    let es = materials.rebar.es;
    let (b, d, area) = (section.width_mm, bars.depth_mm, bars.area_mm2);
    let alpha = cracked_neutral_axis_factor(es / ec_middle * area / (b * d));
    let ei_2 = ec_middle * b * (alpha * d).powi(3) / 3.0 + es * area * ((1.0 - alpha) * d).powi(2);
    Ok(es * NewtonMillimeters::from(moment).value() * (1.0 - alpha) * d / ei_2)
}

/// Crack control of an ordinary section under M_Ed.
pub fn check_ordinary(
    section: &CrossSection,
    materials: &MaterialProperties,
    effects: &LoadEffects,
    ec_middle: f64,
) -> CalcResult<CrackVerdict> {
    let sigma = ordinary_steel_stress(section, materials, effects.moment_ed, ec_middle)?;
    let diameter = section.bottom_bars().map_or(0.0, |b| b.diameter_mm);
    Ok(CrackVerdict::new(section, sigma, diameter))
}

/// Crack control of a prestressed section.
///
/// `cracked` is the cracked state under M_Ed. When the cracked equilibrium
/// has no root the tendon has no cracking increment and only shrinkage and
/// the losses remain.
pub fn check_prestressed(
    section: &CrossSection,
    cracked: Option<&CrackedState>,
    losses: &TimeDependentLosses,
    ep: f64,
) -> CalcResult<CrackVerdict> {
    let strands = section
        .strands
        .ok_or_else(|| CalcError::domain("strands", "none", "No prestressing strands"))?;
    let change = match cracked {
        Some(state) => state.net_tendon_stress_change(losses.eps_cs, ep),
        None => (losses.eps_cs * ep).abs(),
    };
    Ok(CrackVerdict::new(section, change + losses.total_loss, strands.diameter_mm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::DistributedLoads;
    use crate::materials::ExposureClass;
    use crate::materials::StrandProperties;
    use crate::section::{BarLayer, Reinforcement, StrandLayer};
    use crate::settings::CodeSettings;
    use crate::units::Meters;

    #[test]
    fn test_table_nodes() {
        assert_eq!(max_bar_diameter(0.4, 160.0), Some(40.0));
        assert_eq!(max_bar_diameter(0.2, 400.0), Some(4.0));
        assert_eq!(max_bar_diameter(0.3, 450.0), Some(5.0));
    }

    #[test]
    fn test_bilinear_interpolation() {
        // Midway between 0.4 and 0.3 at 180 N/mm²: rows give 36 and 28.5
        let phi = max_bar_diameter(0.35, 180.0).unwrap();
        assert!((phi - 32.25).abs() < 1e-9);
    }

    #[test]
    fn test_stress_clamping() {
        assert_eq!(max_bar_diameter(0.3, 50.0), Some(32.0));
        assert_eq!(max_bar_diameter(0.3, 450.1), None);
        // Width above the table reads the 0.4 row
        assert_eq!(max_bar_diameter(0.6, 160.0), Some(40.0));
    }

    #[test]
    fn test_diameter_decreases_with_stress() {
        let stresses = [160.0, 190.0, 230.0, 300.0, 380.0, 440.0];
        for pair in stresses.windows(2) {
            assert!(max_bar_diameter(0.3, pair[0]) >= max_bar_diameter(0.3, pair[1]));
        }
    }

    #[test]
    fn test_ordinary_crack_check() {
        let settings = CodeSettings::default();
        let layout = Reinforcement::Ordinary {
            bars: BarLayer { count: 4, diameter_mm: 20.0 },
        };
        let section = CrossSection::new(300.0, 500.0, 10.0, ExposureClass::XC1, &layout, None, &settings).unwrap();
        let materials = MaterialProperties::resolve("C30", "B500NC", "R", None, &settings).unwrap();
        let loads = DistributedLoads {
            self_load_kn_per_m: 5.0,
            live_load_kn_per_m: 10.0,
            ..DistributedLoads::default()
        };
        let effects = LoadEffects::compute(&loads, Meters(6.0), &section, None, &settings).unwrap();
        let verdict = check_ordinary(&section, &materials, &effects, 12_000.0).unwrap();
        // c_nom/c_min,dur = 30/15 capped at 1.3
        assert!((verdict.k_c - 1.3).abs() < 1e-12);
        assert!((verdict.w_max_mm - 0.39).abs() < 1e-12);
        assert!(verdict.steel_stress > 160.0 && verdict.steel_stress < 450.0);
        assert_eq!(verdict.passes, verdict.max_diameter_mm.unwrap() >= 20.0);
    }

    fn prestressed_setup(exposure: ExposureClass) -> (CrossSection, StrandProperties, TimeDependentLosses) {
        let settings = CodeSettings::default();
        let strand = StrandProperties::lookup("Y1860S7", 12.5, &settings).unwrap();
        let layout = Reinforcement::Prestressed {
            strands: StrandLayer {
                count: 6,
                diameter_mm: 12.5,
                name: "Y1860S7".to_string(),
            },
        };
        let section = CrossSection::new(300.0, 800.0, 10.0, exposure, &layout, Some(strand.area_mm2), &settings).unwrap();
        let losses = TimeDependentLosses {
            eps_cs: 4e-4,
            relaxation_loss: 40.0,
            sigma_c_qp: -5.0,
            creep_term: 60.0,
            total_loss: 150.0,
            loss_percent: 10.4,
            eps_diff: 6.6e-3,
        };
        (section, strand, losses)
    }

    #[test]
    fn test_prestressed_without_cracked_state() {
        let (section, strand, losses) = prestressed_setup(ExposureClass::X0);
        let verdict = check_prestressed(&section, None, &losses, strand.ep).unwrap();
        // |0 − 4e-4·195000| + 150 = 228 N/mm²
        assert!((verdict.steel_stress - 228.0).abs() < 1e-9);
        assert_eq!(verdict.w_max_mm, 0.4);
        // Between the 200 and 240 columns of the 0.4 row: 32 − 12·28/40
        assert!((verdict.max_diameter_mm.unwrap() - 23.6).abs() < 1e-9);
        assert!(verdict.passes);
    }

    #[test]
    fn test_prestressed_with_cracked_state() {
        let settings = CodeSettings::default();
        let (section, strand, losses) = prestressed_setup(ExposureClass::XC1);
        let loads = DistributedLoads {
            self_load_kn_per_m: 20.0,
            live_load_kn_per_m: 60.0,
            ..DistributedLoads::default()
        };
        let effects = LoadEffects::compute(&loads, Meters(10.0), &section, Some(&strand), &settings).unwrap();
        let state = CrackedState::resolve(
            &section,
            &effects,
            effects.moment_ed,
            losses.fraction(),
            losses.eps_cs,
            strand.ep,
            12_000.0,
            true,
        )
        .unwrap()
        .unwrap();

        let verdict = check_prestressed(&section, Some(&state), &losses, strand.ep).unwrap();
        let expected = (state.tendon_stress_increment - losses.eps_cs * strand.ep).abs() + losses.total_loss;
        assert!((verdict.steel_stress - expected).abs() < 1e-9);
        assert!(verdict.steel_stress > losses.total_loss);
        assert_eq!(verdict.max_diameter_mm, max_bar_diameter(verdict.w_max_mm, verdict.steel_stress));
        assert_eq!(verdict.passes, verdict.max_diameter_mm.is_some_and(|max| 12.5 <= max));
    }
}
