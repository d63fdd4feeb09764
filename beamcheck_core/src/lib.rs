//! # beamcheck_core - Eurocode 2 Beam Check Engine
//!
//! `beamcheck_core` checks a simply-supported rectangular concrete beam under
//! uniformly distributed self-load and live-load against EN 1992-1-1. The
//! beam is reinforced with ordinary bars, prestressing strands, or strands
//! plus ordinary bars in the compression zone. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Verdicts, not errors**: a failing check is a `false` on the verdict
//!
//! ## Quick Start
//!
//! ```rust
//! use beamcheck_core::{calculate, BeamInput, CodeSettings};
//!
//! let verdict = calculate(&BeamInput::default(), &CodeSettings::default()).unwrap();
//!
//! println!("{}: {}", verdict.label, if verdict.passes() { "PASS" } else { "FAIL" });
//! let json = serde_json::to_string_pretty(&verdict).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Check components and the beam evaluator
//! - [`materials`] - Concrete, steel and strand tables
//! - [`section`] - Cross-section geometry and cover
//! - [`loads`] - Load cases, combinations and load effects
//! - [`equations`] - Shared formulas and root finding
//! - [`settings`] - Partial factors and code parameters
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod loads;
pub mod materials;
pub mod section;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, calculate_batch, BeamInput, BeamVerdict};
pub use errors::{CalcError, CalcResult};
pub use section::{BarLayer, Reinforcement, StrandLayer};
pub use settings::CodeSettings;
