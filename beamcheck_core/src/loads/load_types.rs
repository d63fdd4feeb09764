//! Load type definitions
//!
//! The beam carries two uniformly distributed actions: the permanent
//! self-load and the variable live-load.

use serde::{Deserialize, Serialize};

/// Load types acting on the beam
///
/// # Example
/// ```
/// use beamcheck_core::loads::LoadType;
///
/// assert_eq!(LoadType::SelfLoad.code(), "G");
/// assert!(LoadType::SelfLoad.is_permanent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// G - Self-load (self-weight and permanent finishes)
    SelfLoad,
    /// Q - Live-load (imposed, variable)
    LiveLoad,
}

impl LoadType {
    /// All load types in standard order
    pub const ALL: [LoadType; 2] = [LoadType::SelfLoad, LoadType::LiveLoad];

    /// Standard abbreviation used in combination equations
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::SelfLoad => "G",
            LoadType::LiveLoad => "Q",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            LoadType::SelfLoad => "Self-load",
            LoadType::LiveLoad => "Live-load",
        }
    }

    /// Whether the action is permanent
    pub fn is_permanent(&self) -> bool {
        matches!(self, LoadType::SelfLoad)
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(LoadType::LiveLoad.code(), "Q");
        assert_eq!(LoadType::LiveLoad.to_string(), "Q");
        assert!(!LoadType::LiveLoad.is_permanent());
    }
}
