//! # Beam Evaluation
//!
//! Runs the complete EC2 check of a simply-supported rectangular beam: every
//! component is called once, in dependency order, and the results are
//! collected into a single [`BeamVerdict`].
//!
//! ## Chains
//!
//! | configuration | chain |
//! |---|---|
//! | Ordinary | section → loads → creep → shrinkage → ULS → reinforcement → crack → deflection |
//! | Prestressed | … → uncracked estimate → losses → refined uncracked (M_Ed, M_k) → cracked (M_Ed, M_k) → deflection → stress → ULS → crack → reinforcement |
//! | PrestressedWithTop | … → uncracked estimate → losses → ULS → reinforcement |
//!
//! Deflection and crack control use the design moment M_Ed; the stress
//! limits use the characteristic moment M_k. The SLS checks (crack,
//! deflection, stress) are not evaluated for strands with top bars and are
//! reported as `None`.
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::calculations::beam::{calculate, BeamInput};
//! use beamcheck_core::loads::DistributedLoads;
//! use beamcheck_core::section::{BarLayer, Reinforcement};
//! use beamcheck_core::settings::CodeSettings;
//!
//! let input = BeamInput {
//!     label: "B-1".to_string(),
//!     width_mm: 300.0,
//!     height_mm: 500.0,
//!     span_m: 6.0,
//!     reinforcement: Reinforcement::Ordinary {
//!         bars: BarLayer { count: 4, diameter_mm: 20.0 },
//!     },
//!     loads: DistributedLoads {
//!         self_load_kn_per_m: 5.0,
//!         live_load_kn_per_m: 10.0,
//!         ..DistributedLoads::default()
//!     },
//!     ..BeamInput::default()
//! };
//!
//! let verdict = calculate(&input, &CodeSettings::default()).unwrap();
//! assert!(verdict.capacity.moment_ok);
//! println!("Governs: {}", verdict.governing_check());
//! ```

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::crack::{self, CrackVerdict};
use super::creep::{check_humidity, Creep};
use super::deflection::{self, DeflectionVerdict};
use super::losses::TimeDependentLosses;
use super::reinforcement::{self, ReinforcementVerdict};
use super::section_state::{reinforcement_layers, CrackedState, UncrackedState};
use super::shrinkage::Shrinkage;
use super::stress::{self, StressVerdict};
use super::uls::{self, CapacityResult};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::loads::{DistributedLoads, LoadEffects};
use crate::materials::{ExposureClass, MaterialProperties, StrandProperties, StrandSpec};
use crate::section::{BarLayer, CrossSection, Reinforcement};
use crate::settings::CodeSettings;
use crate::units::{KiloNewtonMeters, Meters};

/// Input parameters for one beam.
///
/// Units: mm for the section, m for the span, kN/m for loads. Missing JSON
/// fields take the values of [`BeamInput::default`].
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "PB-1",
///   "concrete_class": "C40",
///   "steel_class": "B500NC",
///   "cement_class": "R",
///   "relative_humidity": 50.0,
///   "exposure_class": "XC3",
///   "width_mm": 300.0,
///   "height_mm": 800.0,
///   "span_m": 10.0,
///   "stirrup_diameter_mm": 10.0,
///   "shear_reinforcement_mm2_per_mm": 0.909,
///   "reinforcement": {
///     "type": "Prestressed",
///     "strands": { "count": 6, "diameter_mm": 12.5, "name": "Y1860S7" }
///   },
///   "loads": {
///     "self_load_kn_per_m": 5.0,
///     "live_load_kn_per_m": 30.0,
///     "self_load_age_days": 7.0,
///     "live_load_age_days": 90.0,
///     "long_lasting_live_percent": 40.0
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamInput {
    /// User label for this beam (e.g. "B-1")
    pub label: String,

    /// Concrete strength class, e.g. "C30"
    pub concrete_class: String,
    /// Reinforcing steel class, e.g. "B500NC"
    pub steel_class: String,
    /// Cement class: "R", "N" or "S"
    pub cement_class: String,
    /// Ambient relative humidity (%)
    pub relative_humidity: f64,
    /// Exposure class, e.g. "XC1"
    pub exposure_class: String,

    pub width_mm: f64,
    pub height_mm: f64,
    /// Span between supports (m)
    pub span_m: f64,

    pub stirrup_diameter_mm: f64,
    /// Shear reinforcement A_sw/s (mm²/mm)
    pub shear_reinforcement_mm2_per_mm: f64,
    pub reinforcement: Reinforcement,

    pub loads: DistributedLoads,
}

impl Default for BeamInput {
    fn default() -> Self {
        BeamInput {
            label: "Beam".to_string(),
            concrete_class: "C30".to_string(),
            steel_class: "B500NC".to_string(),
            cement_class: "R".to_string(),
            relative_humidity: 40.0,
            exposure_class: "XC1".to_string(),
            width_mm: 300.0,
            height_mm: 800.0,
            span_m: 10.0,
            stirrup_diameter_mm: 10.0,
            shear_reinforcement_mm2_per_mm: 200.0 / 220.0,
            reinforcement: Reinforcement::Ordinary {
                bars: BarLayer {
                    count: 4,
                    diameter_mm: 20.0,
                },
            },
            loads: DistributedLoads::default(),
        }
    }
}

impl BeamInput {
    /// Parse an input from JSON.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate input parameters.
    ///
    /// Class codes are checked when the materials are resolved.
    pub fn validate(&self, settings: &CodeSettings) -> CalcResult<()> {
        require_positive("width_mm", self.width_mm)?;
        require_positive("height_mm", self.height_mm)?;
        require_positive("span_m", self.span_m)?;
        require_non_negative("stirrup_diameter_mm", self.stirrup_diameter_mm)?;
        require_non_negative("shear_reinforcement_mm2_per_mm", self.shear_reinforcement_mm2_per_mm)?;
        check_humidity(self.relative_humidity)?;
        self.reinforcement.validate()?;
        self.loads.validate(settings.horizon_days)
    }

    /// Resolve the material class codes of this input.
    pub fn materials(&self, settings: &CodeSettings) -> CalcResult<MaterialProperties> {
        let strand = self.reinforcement.strands().map(|s| StrandSpec {
            name: &s.name,
            diameter_mm: s.diameter_mm,
        });
        MaterialProperties::resolve(
            &self.concrete_class,
            &self.steel_class,
            &self.cement_class,
            strand,
            settings,
        )
    }
}

/// Complete verdict of one beam.
///
/// Every field is plain data; the verdict serializes to JSON as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamVerdict {
    pub label: String,
    /// "Ordinary", "Prestressed" or "PrestressedWithTop"
    pub configuration: String,

    pub materials: MaterialProperties,
    pub section: CrossSection,
    pub loads: LoadEffects,
    pub creep: Creep,
    pub shrinkage: Shrinkage,
    /// E_c,middle used by the SLS checks (N/mm²)
    pub ec_middle: f64,

    /// Time-dependent prestress losses (prestressed only)
    pub losses: Option<TimeDependentLosses>,
    /// Uncracked state under P₀ and M_qp used for the losses (prestressed only)
    pub estimate: Option<UncrackedState>,
    /// Uncracked state under M_Ed used for the deflection classification
    pub uncracked: UncrackedState,
    /// Uncracked state under P_eff and M_k used for the stress limits
    /// (prestressed only)
    pub characteristic: Option<UncrackedState>,
    /// Cracked prestressed section under M_Ed, when it could be resolved
    pub cracked_section: Option<CrackedState>,

    pub capacity: CapacityResult,
    pub reinforcement: ReinforcementVerdict,
    pub crack: Option<CrackVerdict>,
    pub deflection: Option<DeflectionVerdict>,
    pub stress: Option<StressVerdict>,
}

impl BeamVerdict {
    /// Check if every evaluated check passes
    pub fn passes(&self) -> bool {
        self.capacity.passes()
            && self.reinforcement.passes()
            && self.crack.as_ref().map_or(true, |c| c.passes)
            && self.deflection.as_ref().map_or(true, |d| d.passes)
            && self.stress.as_ref().map_or(true, StressVerdict::passes)
    }

    /// Utilization (%) of every evaluated check with a ratio
    pub fn utilizations(&self) -> Vec<(&'static str, f64)> {
        let mut checks = vec![
            ("Moment", self.capacity.moment_utilization),
            ("Shear", self.capacity.shear_utilization),
            ("Reinforcement", self.reinforcement.utilization),
        ];
        if let Some(crack) = &self.crack {
            checks.push(("Crack", crack.utilization));
        }
        if let Some(deflection) = &self.deflection {
            checks.push(("Deflection", deflection.utilization));
        }
        checks
    }

    /// Get the governing (highest) utilization (%)
    pub fn governing_utilization(&self) -> f64 {
        self.utilizations()
            .iter()
            .map(|(_, u)| *u)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Get the name of the check that governs
    pub fn governing_check(&self) -> &'static str {
        self.utilizations()
            .into_iter()
            .fold(("Moment", f64::NEG_INFINITY), |acc, c| if c.1 > acc.1 { c } else { acc })
            .0
    }
}

/// Results shared by every configuration, computed before the dispatch
struct Common {
    materials: MaterialProperties,
    section: CrossSection,
    loads: LoadEffects,
    creep: Creep,
    shrinkage: Shrinkage,
}

/// Evaluate one beam.
///
/// This is a pure function: the same input and settings always give the
/// same verdict.
///
/// # Returns
///
/// * `Ok(BeamVerdict)` - all checks evaluated; pass/fail is on the verdict
/// * `Err(CalcError)` - the first invalid input or unsolvable equilibrium
pub fn calculate(input: &BeamInput, settings: &CodeSettings) -> CalcResult<BeamVerdict> {
    settings.validate()?;
    input.validate(settings)?;

    let materials = input.materials(settings)?;
    let exposure: ExposureClass = input.exposure_class.parse()?;
    let section = CrossSection::new(
        input.width_mm,
        input.height_mm,
        input.stirrup_diameter_mm,
        exposure,
        &input.reinforcement,
        materials.strand.as_ref().map(|s| s.area_mm2),
        settings,
    )?;
    let loads = LoadEffects::compute(
        &input.loads,
        Meters(input.span_m),
        &section,
        materials.strand.as_ref(),
        settings,
    )?;

    let concrete = &materials.concrete;
    let creep = Creep::compute(
        input.loads.self_load_age_days,
        input.loads.live_load_age_days,
        settings.horizon_days,
        input.relative_humidity,
        section.notional_size_mm,
        concrete,
        materials.cement,
    )?;
    let shrinkage = Shrinkage::compute(concrete, materials.cement, input.relative_humidity, section.notional_size_mm)?;
    debug!(
        "{}: {} section {}x{} mm, M_Ed = {:.1} kNm",
        input.label,
        input.reinforcement.kind(),
        section.width_mm,
        section.height_mm,
        loads.moment_ed.value()
    );

    let common = Common {
        materials,
        section,
        loads,
        creep,
        shrinkage,
    };
    let asw_per_s = input.shear_reinforcement_mm2_per_mm;
    let verdict = match &input.reinforcement {
        Reinforcement::Ordinary { .. } => evaluate_ordinary(input, common, asw_per_s, settings)?,
        Reinforcement::Prestressed { .. } => evaluate_prestressed(input, common, asw_per_s, settings)?,
        Reinforcement::PrestressedWithTop { .. } => evaluate_with_top_bars(input, common, asw_per_s, settings)?,
    };

    info!(
        "{}: {} (governs {} at {:.1} %)",
        verdict.label,
        if verdict.passes() { "PASS" } else { "FAIL" },
        verdict.governing_check(),
        verdict.governing_utilization()
    );
    Ok(verdict)
}

/// Evaluate independent beams in parallel.
///
/// Each input gets its own result in input order.
pub fn calculate_batch(inputs: &[BeamInput], settings: &CodeSettings) -> Vec<CalcResult<BeamVerdict>> {
    inputs.par_iter().map(|input| calculate(input, settings)).collect()
}

fn strand_of(materials: &MaterialProperties) -> CalcResult<&StrandProperties> {
    materials
        .strand
        .as_ref()
        .ok_or_else(|| CalcError::domain("strand", "none", "Strand properties not resolved"))
}

fn evaluate_ordinary(
    input: &BeamInput,
    common: Common,
    asw_per_s: f64,
    settings: &CodeSettings,
) -> CalcResult<BeamVerdict> {
    let Common {
        materials,
        section,
        loads,
        creep,
        shrinkage,
    } = common;

    let capacity = uls::calculate(&section, &materials, &loads, asw_per_s, None, settings)?;
    let reinforcement = reinforcement::calculate(&section, &materials, &loads, &capacity.flexure, asw_per_s)?;

    let ec_middle = creep.middle_modulus(loads.moment_self_d.value(), loads.moment_live_d.value());
    let layers = reinforcement_layers(&section, materials.rebar.es / ec_middle, 1.0);
    let uncracked = UncrackedState::resolve(
        &section,
        &layers,
        loads.prestress_force,
        loads.moment_ed,
        materials.concrete.fctm,
    );
    let crack = crack::check_ordinary(&section, &materials, &loads, ec_middle)?;
    let deflection = deflection::check_ordinary(
        &section,
        &materials,
        &loads,
        ec_middle,
        shrinkage.eps_cs,
        &uncracked,
        settings,
    )?;

    Ok(BeamVerdict {
        label: input.label.clone(),
        configuration: input.reinforcement.kind().to_string(),
        materials,
        section,
        loads,
        creep,
        shrinkage,
        ec_middle,
        losses: None,
        estimate: None,
        uncracked,
        characteristic: None,
        cracked_section: None,
        capacity,
        reinforcement,
        crack: Some(crack),
        deflection: Some(deflection),
        stress: None,
    })
}

/// Uncracked estimate under P₀ and M_qp, then the losses it drives.
fn estimate_losses(common: &Common, settings: &CodeSettings) -> CalcResult<(UncrackedState, TimeDependentLosses)> {
    let materials = &common.materials;
    let strand = strand_of(materials)?;
    let concrete = &materials.concrete;
    let layers = reinforcement_layers(&common.section, materials.rebar.es / concrete.ecm, strand.ep / concrete.ecm);

    let estimate = UncrackedState::resolve(
        &common.section,
        &layers,
        common.loads.prestress_force,
        common.loads.moment_qp,
        concrete.fctm,
    );
    let sigma_c_qp = estimate.stress_tendon.unwrap_or(0.0);
    let losses = TimeDependentLosses::compute(
        &common.section,
        concrete,
        strand,
        common.loads.sigma_p_max,
        common.creep.self_load.phi,
        common.shrinkage.eps_cs,
        sigma_c_qp,
        settings,
    )?;
    Ok((estimate, losses))
}

/// Uncracked state under the effective prestress P₀(1 − loss) and `moment`.
fn refined_state(common: &Common, losses: &TimeDependentLosses, moment: KiloNewtonMeters) -> CalcResult<UncrackedState> {
    let materials = &common.materials;
    let strand = strand_of(materials)?;
    let concrete = &materials.concrete;
    let layers = reinforcement_layers(&common.section, materials.rebar.es / concrete.ecm, strand.ep / concrete.ecm);
    Ok(UncrackedState::resolve(
        &common.section,
        &layers,
        common.loads.prestress_force * (1.0 - losses.fraction()),
        moment,
        concrete.fctm,
    ))
}

fn evaluate_prestressed(
    input: &BeamInput,
    common: Common,
    asw_per_s: f64,
    settings: &CodeSettings,
) -> CalcResult<BeamVerdict> {
    let (estimate, losses) = estimate_losses(&common, settings)?;
    let uncracked = refined_state(&common, &losses, common.loads.moment_ed)?;
    let characteristic = refined_state(&common, &losses, common.loads.moment_k)?;

    let Common {
        materials,
        section,
        loads,
        creep,
        shrinkage,
    } = common;

    let effective_prestress_moment = KiloNewtonMeters(loads.prestress_moment.value() * (1.0 - losses.fraction()));
    let ec_middle = creep.middle_modulus(
        loads.moment_self_d.value() + effective_prestress_moment.value().abs(),
        loads.moment_live_d.value(),
    );
    let resolve_cracked = |moment: KiloNewtonMeters, cracked: bool| {
        CrackedState::resolve(
            &section,
            &loads,
            moment,
            losses.fraction(),
            shrinkage.eps_cs,
            materials.ep(),
            ec_middle,
            cracked,
        )
    };

    let cracked_section = resolve_cracked(loads.moment_ed, uncracked.is_cracked(loads.moment_ed))?;
    let characteristic_section = resolve_cracked(loads.moment_k, characteristic.is_cracked(loads.moment_k))?;
    let deflection = deflection::check_prestressed(
        &section,
        &materials,
        &loads,
        ec_middle,
        shrinkage.eps_cs,
        effective_prestress_moment,
        &uncracked,
        settings,
    )?;
    let stress = stress::calculate(&materials, &loads, &losses, &characteristic, characteristic_section.as_ref())?;
    let capacity = uls::calculate(&section, &materials, &loads, asw_per_s, Some(&losses), settings)?;
    let crack = crack::check_prestressed(&section, cracked_section.as_ref(), &losses, materials.ep())?;
    let reinforcement = reinforcement::calculate(&section, &materials, &loads, &capacity.flexure, asw_per_s)?;

    Ok(BeamVerdict {
        label: input.label.clone(),
        configuration: input.reinforcement.kind().to_string(),
        materials,
        section,
        loads,
        creep,
        shrinkage,
        ec_middle,
        losses: Some(losses),
        estimate: Some(estimate),
        uncracked,
        characteristic: Some(characteristic),
        cracked_section,
        capacity,
        reinforcement,
        crack: Some(crack),
        deflection: Some(deflection),
        stress: Some(stress),
    })
}

fn evaluate_with_top_bars(
    input: &BeamInput,
    common: Common,
    asw_per_s: f64,
    settings: &CodeSettings,
) -> CalcResult<BeamVerdict> {
    let (estimate, losses) = estimate_losses(&common, settings)?;
    let uncracked = refined_state(&common, &losses, common.loads.moment_ed)?;

    let Common {
        materials,
        section,
        loads,
        creep,
        shrinkage,
    } = common;

    let capacity = uls::calculate(&section, &materials, &loads, asw_per_s, Some(&losses), settings)?;
    let reinforcement = reinforcement::calculate(&section, &materials, &loads, &capacity.flexure, asw_per_s)?;
    let ec_middle = creep.middle_modulus(
        loads.moment_self_d.value() + (loads.prestress_moment.value() * (1.0 - losses.fraction())).abs(),
        loads.moment_live_d.value(),
    );

    Ok(BeamVerdict {
        label: input.label.clone(),
        configuration: input.reinforcement.kind().to_string(),
        materials,
        section,
        loads,
        creep,
        shrinkage,
        ec_middle,
        losses: Some(losses),
        estimate: Some(estimate),
        uncracked,
        characteristic: None,
        cracked_section: None,
        capacity,
        reinforcement,
        crack: None,
        deflection: None,
        stress: None,
    })
}
