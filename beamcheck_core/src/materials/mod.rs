//! # Materials Catalog
//!
//! Resolves named concrete, reinforcing steel and prestressing strand classes
//! into numeric strength and stiffness properties.
//!
//! ## Material Types
//!
//! - **Concrete**: EC2 Table 3.1 classes C12 to C90
//! - **Reinforcing steel**: `B<fyk><ductility>` designations
//! - **Prestressing strand**: EN 10138-3 grades, looked up by name and diameter
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::materials::{MaterialProperties, StrandSpec};
//! use beamcheck_core::settings::CodeSettings;
//!
//! let props = MaterialProperties::resolve("C30", "B500NC", "R", None, &CodeSettings::default()).unwrap();
//! assert_eq!(props.concrete.fck, 30.0);
//! assert!(props.strand.is_none());
//!
//! let strand = StrandSpec { name: "Y1770S7", diameter_mm: 15.2 };
//! let props = MaterialProperties::resolve("C45", "B500NC", "N", Some(strand), &CodeSettings::default()).unwrap();
//! assert_eq!(props.strand.unwrap().fpk, 1770.0);
//! ```

pub mod concrete;
pub mod exposure;
pub mod rebar;
pub mod strand;

pub use concrete::{CementClass, ConcreteClass, ConcreteProperties};
pub use exposure::ExposureClass;
pub use rebar::{RebarClass, RebarProperties};
pub use strand::StrandProperties;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::settings::CodeSettings;

/// Strand identification passed to the catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrandSpec<'a> {
    pub name: &'a str,
    pub diameter_mm: f64,
}

/// All material properties needed by one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    pub concrete: ConcreteProperties,
    pub rebar: RebarProperties,
    /// Present only for prestressed configurations
    pub strand: Option<StrandProperties>,
    pub cement: CementClass,
}

impl MaterialProperties {
    /// Resolve class codes into properties.
    ///
    /// Fails with `InvalidClass` when any code is not in its table.
    pub fn resolve(
        concrete_code: &str,
        steel_code: &str,
        cement_code: &str,
        strand: Option<StrandSpec<'_>>,
        settings: &CodeSettings,
    ) -> CalcResult<Self> {
        let concrete: ConcreteClass = concrete_code.parse()?;
        let rebar: RebarClass = steel_code.parse()?;
        let cement: CementClass = cement_code.parse()?;
        let strand = strand
            .map(|s| StrandProperties::lookup(s.name, s.diameter_mm, settings))
            .transpose()?;

        Ok(MaterialProperties {
            concrete: concrete.properties(settings),
            rebar: rebar.properties(settings),
            strand,
            cement,
        })
    }

    /// Modulus of the active tension reinforcement for prestressed sections
    pub fn ep(&self) -> f64 {
        self.strand.as_ref().map_or(strand::EP, |s| s.ep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_ordinary() {
        let props = MaterialProperties::resolve("C30", "B500NC", "R", None, &CodeSettings::default()).unwrap();
        assert_eq!(props.rebar.fyk, 500.0);
        assert_eq!(props.cement, CementClass::R);
        assert_eq!(props.ep(), strand::EP);
    }

    #[test]
    fn test_resolve_propagates_invalid_class() {
        let s = CodeSettings::default();
        assert_eq!(
            MaterialProperties::resolve("C31", "B500NC", "R", None, &s).unwrap_err().error_code(),
            "INVALID_CLASS"
        );
        assert!(MaterialProperties::resolve("C30", "A500", "R", None, &s).is_err());
        assert!(MaterialProperties::resolve("C30", "B500NC", "Q", None, &s).is_err());
        let bad = StrandSpec { name: "Y1860S7", diameter_mm: 3.0 };
        assert!(MaterialProperties::resolve("C30", "B500NC", "R", Some(bad), &s).is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let strand = StrandSpec { name: "Y1860S7", diameter_mm: 12.5 };
        let props = MaterialProperties::resolve("C35", "B500NC", "S", Some(strand), &CodeSettings::default()).unwrap();
        let json = serde_json::to_string(&props).unwrap();
        let roundtrip: MaterialProperties = serde_json::from_str(&json).unwrap();
        assert_eq!(props, roundtrip);
    }
}
