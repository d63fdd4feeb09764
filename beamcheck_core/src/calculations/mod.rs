//! # Beam Checks
//!
//! This module contains the EC2 check components and the evaluator that
//! chains them. Each component follows the pattern:
//!
//! - plain inputs (section, materials, load effects)
//! - a `*Result` or `*Verdict` struct (JSON-serializable) with `passes()`
//!   where the check has a pass/fail outcome
//! - a pure `calculate`/`check_*` function returning `CalcResult`
//!
//! ## Available Checks
//!
//! - [`creep`] / [`shrinkage`] - long-term concrete behaviour (Annex B)
//! - [`losses`] - time-dependent prestress losses (5.10.6)
//! - [`section_state`] - uncracked and cracked section resolvers
//! - [`uls`] - moment and shear capacity (6.1, 6.2)
//! - [`reinforcement`] - required area and detailing limits (9.2)
//! - [`crack`] - crack control by bar diameter (7.3.3)
//! - [`deflection`] - long-term deflection (7.4.3)
//! - [`stress`] - stress limitation (7.2)
//! - [`beam`] - the complete evaluation of one beam

pub mod beam;
pub mod crack;
pub mod creep;
pub mod deflection;
pub mod losses;
pub mod reinforcement;
pub mod section_state;
pub mod shrinkage;
pub mod stress;
pub mod uls;

// Re-export commonly used types
pub use beam::{calculate, calculate_batch, BeamInput, BeamVerdict};
pub use crack::CrackVerdict;
pub use creep::{Creep, CreepCoefficients};
pub use deflection::DeflectionVerdict;
pub use losses::TimeDependentLosses;
pub use reinforcement::ReinforcementVerdict;
pub use section_state::{is_cracked, CrackedState, UncrackedState};
pub use shrinkage::Shrinkage;
pub use stress::StressVerdict;
pub use uls::{CapacityResult, FlexureResult, ShearResult};
