//! EN 1990 Load Combinations
//!
//! The three combinations the checks need:
//!
//! - **ULS**: γ_G·G + γ_Q·Q, giving M_Ed and V_Ed for the capacity checks
//!   and the deflection classification
//! - **Characteristic**: G + Q, for the concrete and tendon stress limits
//! - **Quasi-permanent**: G + ψ₂·Q, with ψ₂ the long-lasting live-load share

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::load_types::LoadType;
use super::LoadCase;
use crate::settings::CodeSettings;

/// A load combination with factors for each load type
///
/// # Example
/// ```
/// use beamcheck_core::loads::{LoadCase, LoadCombination, LoadType};
///
/// let combo = LoadCombination::new("ULS", "1.2G + 1.5Q")
///     .with_factor(LoadType::SelfLoad, 1.2)
///     .with_factor(LoadType::LiveLoad, 1.5);
///
/// let case = LoadCase::new("Floor")
///     .with_load(LoadType::SelfLoad, 5.0)
///     .with_load(LoadType::LiveLoad, 10.0);
///
/// assert!((combo.apply(&case) - 21.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier (e.g., "ULS", "QP")
    pub name: String,

    /// Human-readable equation for display
    pub equation: String,

    /// Load factors keyed by load type
    pub factors: HashMap<LoadType, f64>,
}

impl LoadCombination {
    /// Create a new load combination
    pub fn new(name: impl Into<String>, equation: impl Into<String>) -> Self {
        LoadCombination {
            name: name.into(),
            equation: equation.into(),
            factors: HashMap::new(),
        }
    }

    /// Add a load factor (builder pattern)
    pub fn with_factor(mut self, load_type: LoadType, factor: f64) -> Self {
        self.factors.insert(load_type, factor);
        self
    }

    /// Apply this combination to a LoadCase, returning the total factored load
    pub fn apply(&self, case: &LoadCase) -> f64 {
        self.factors
            .iter()
            .map(|(load_type, factor)| factor * case.get(*load_type))
            .sum()
    }

    /// Factored contribution of one load type
    pub fn apply_to(&self, case: &LoadCase, load_type: LoadType) -> f64 {
        self.get_factor(load_type) * case.get(load_type)
    }

    /// Get the factor for a specific load type (0.0 if not in combination)
    pub fn get_factor(&self, load_type: LoadType) -> f64 {
        self.factors.get(&load_type).copied().unwrap_or(0.0)
    }
}

/// Fundamental ULS combination (EN 1990 6.10)
pub fn ultimate(settings: &CodeSettings) -> LoadCombination {
    LoadCombination::new("ULS", format!("{}G + {}Q", settings.gamma_self, settings.gamma_live))
        .with_factor(LoadType::SelfLoad, settings.gamma_self)
        .with_factor(LoadType::LiveLoad, settings.gamma_live)
}

/// Characteristic SLS combination (EN 1990 6.14b)
pub fn characteristic() -> LoadCombination {
    LoadCombination::new("CHAR", "G + Q")
        .with_factor(LoadType::SelfLoad, 1.0)
        .with_factor(LoadType::LiveLoad, 1.0)
}

/// Quasi-permanent SLS combination (EN 1990 6.16b)
pub fn quasi_permanent(psi_2: f64) -> LoadCombination {
    LoadCombination::new("QP", format!("G + {psi_2:.2}Q"))
        .with_factor(LoadType::SelfLoad, 1.0)
        .with_factor(LoadType::LiveLoad, psi_2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case() -> LoadCase {
        LoadCase::new("Test")
            .with_load(LoadType::SelfLoad, 5.0)
            .with_load(LoadType::LiveLoad, 10.0)
    }

    #[test]
    fn test_ultimate_factors() {
        let combo = ultimate(&CodeSettings::default());
        assert!((combo.apply(&case()) - 21.0).abs() < 1e-12);
        assert!((combo.apply_to(&case(), LoadType::LiveLoad) - 15.0).abs() < 1e-12);
        assert!(combo.get_factor(LoadType::SelfLoad) < combo.get_factor(LoadType::LiveLoad));
    }

    #[test]
    fn test_service_combinations() {
        assert_eq!(characteristic().apply(&case()), 15.0);
        assert!((quasi_permanent(0.4).apply(&case()) - 9.0).abs() < 1e-12);
        assert_eq!(quasi_permanent(0.4).equation, "G + 0.40Q");
    }
}
