//! # Section Geometry
//!
//! Cover, effective depths and reinforcement areas of the rectangular
//! section for the chosen reinforcement layout.
//!
//! ```text
//!        b
//!   ┌─────────┐  ─┬─
//!   │ o     o │   │   top bars (PrestressedWithTop)
//!   │         │   │
//!   │    +    │   h   + centroid, e measured downward
//!   │         │   │
//!   │ o  o  o │   │   bottom bars or strands at depth d
//!   └─────────┘  ─┴─
//! ```
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::materials::ExposureClass;
//! use beamcheck_core::section::{BarLayer, CrossSection, Reinforcement};
//! use beamcheck_core::settings::CodeSettings;
//!
//! let layout = Reinforcement::Ordinary { bars: BarLayer { count: 4, diameter_mm: 20.0 } };
//! let section = CrossSection::new(300.0, 500.0, 10.0, ExposureClass::XC1, &layout, None, &CodeSettings::default()).unwrap();
//! assert_eq!(section.nominal_cover_mm, 30.0);
//! assert_eq!(section.bottom_bars().unwrap().depth_mm, 450.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::{bar_area, notional_size, rectangular_area, rectangular_moment_of_inertia};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::materials::ExposureClass;
use crate::settings::CodeSettings;

/// Minimum cover for bond regardless of bar size (mm)
const MIN_BOND_COVER_MM: f64 = 10.0;

/// A single layer of ordinary reinforcement bars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarLayer {
    pub count: u32,
    pub diameter_mm: f64,
}

/// A single layer of prestressing strands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandLayer {
    pub count: u32,
    pub diameter_mm: f64,
    /// EN 10138-3 grade, e.g. "Y1860S7"
    pub name: String,
}

/// Reinforcement configuration of the beam
///
/// ## JSON Example
///
/// ```json
/// { "type": "PrestressedWithTop",
///   "strands": { "count": 6, "diameter_mm": 12.5, "name": "Y1860S7" },
///   "top_bars": { "count": 2, "diameter_mm": 16.0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Reinforcement {
    /// Ordinary bottom tension bars only
    Ordinary { bars: BarLayer },
    /// Prestressing strands only
    Prestressed { strands: StrandLayer },
    /// Prestressing strands plus ordinary bars in the compression zone
    PrestressedWithTop { strands: StrandLayer, top_bars: BarLayer },
}

impl Reinforcement {
    /// Short name of the configuration
    pub fn kind(&self) -> &'static str {
        match self {
            Reinforcement::Ordinary { .. } => "Ordinary",
            Reinforcement::Prestressed { .. } => "Prestressed",
            Reinforcement::PrestressedWithTop { .. } => "PrestressedWithTop",
        }
    }

    /// Strand layer, if the beam is prestressed
    pub fn strands(&self) -> Option<&StrandLayer> {
        match self {
            Reinforcement::Ordinary { .. } => None,
            Reinforcement::Prestressed { strands } | Reinforcement::PrestressedWithTop { strands, .. } => {
                Some(strands)
            }
        }
    }

    /// Validate counts and diameters.
    ///
    /// A layout without any tension reinforcement is rejected.
    pub fn validate(&self) -> CalcResult<()> {
        let check_bars = |field: &str, bars: &BarLayer| -> CalcResult<()> {
            if bars.count == 0 {
                return Err(CalcError::domain(
                    format!("{field}.count"),
                    "0",
                    "At least one bar is required",
                ));
            }
            require_positive(&format!("{field}.diameter_mm"), bars.diameter_mm)
        };
        let check_strands = |strands: &StrandLayer| -> CalcResult<()> {
            if strands.count == 0 {
                return Err(CalcError::domain(
                    "strands.count",
                    "0",
                    "At least one strand is required",
                ));
            }
            require_positive("strands.diameter_mm", strands.diameter_mm)
        };

        match self {
            Reinforcement::Ordinary { bars } => {
                if bars.count == 0 {
                    return Err(CalcError::domain(
                        "bars.count",
                        "0",
                        "No tension reinforcement: ordinary beam needs bars or prestress",
                    ));
                }
                check_bars("bars", bars)
            }
            Reinforcement::Prestressed { strands } => check_strands(strands),
            Reinforcement::PrestressedWithTop { strands, top_bars } => {
                check_strands(strands)?;
                check_bars("top_bars", top_bars)
            }
        }
    }
}

/// Which face an ordinary bar layer sits near
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    Bottom,
    Top,
}

/// Placed ordinary bars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedBars {
    pub count: u32,
    pub diameter_mm: f64,
    pub face: Face,
    /// Total area A_s (mm²)
    pub area_mm2: f64,
    /// Depth of the layer centroid below the top fibre (mm)
    pub depth_mm: f64,
}

/// Placed prestressing strands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedStrands {
    pub count: u32,
    pub diameter_mm: f64,
    /// Total area A_p (mm²)
    pub area_mm2: f64,
    /// Effective depth d_p below the top fibre (mm)
    pub depth_mm: f64,
    /// Eccentricity below the gross centroid, e = d_p − h/2 (mm)
    pub eccentricity_mm: f64,
}

/// Derived geometry of the cross section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    pub width_mm: f64,
    pub height_mm: f64,
    /// Gross concrete area A_c (mm²)
    pub area_mm2: f64,
    /// Gross second moment of area I_c (mm⁴)
    pub inertia_mm4: f64,
    /// Perimeter exposed to drying (mm)
    pub perimeter_mm: f64,
    /// Notional size h₀ = 2A_c/u (mm)
    pub notional_size_mm: f64,
    pub stirrup_diameter_mm: f64,
    pub exposure: ExposureClass,
    /// c_min,b (mm)
    pub bond_cover_mm: f64,
    /// c_min,dur (mm)
    pub durability_cover_mm: f64,
    /// c_nom = max(c_min,b, c_min,dur, 10) + Δc_dev (mm)
    pub nominal_cover_mm: f64,
    pub bars: Option<PlacedBars>,
    pub strands: Option<PlacedStrands>,
}

impl CrossSection {
    /// Compute the section geometry.
    ///
    /// `strand_area_mm2` is the area of one strand from the catalog; it is
    /// required when the layout is prestressed.
    pub fn new(
        width_mm: f64,
        height_mm: f64,
        stirrup_diameter_mm: f64,
        exposure: ExposureClass,
        reinforcement: &Reinforcement,
        strand_area_mm2: Option<f64>,
        settings: &CodeSettings,
    ) -> CalcResult<Self> {
        require_positive("width_mm", width_mm)?;
        require_positive("height_mm", height_mm)?;
        require_non_negative("stirrup_diameter_mm", stirrup_diameter_mm)?;
        reinforcement.validate()?;

        let (bar_layer, face) = match reinforcement {
            Reinforcement::Ordinary { bars } => (Some(*bars), Face::Bottom),
            Reinforcement::Prestressed { .. } => (None, Face::Bottom),
            Reinforcement::PrestressedWithTop { top_bars, .. } => (Some(*top_bars), Face::Top),
        };
        let strand_layer = reinforcement.strands();

        let largest_diameter = bar_layer
            .map(|b| b.diameter_mm)
            .into_iter()
            .chain(strand_layer.map(|s| s.diameter_mm))
            .fold(0.0_f64, f64::max);
        let bond_cover_mm = largest_diameter.max(MIN_BOND_COVER_MM);
        let durability_cover_mm = exposure.durability_cover_mm(bond_cover_mm);
        let nominal_cover_mm =
            bond_cover_mm.max(durability_cover_mm).max(MIN_BOND_COVER_MM) + settings.cover_deviation_mm;

        // Depth of a bar centroid below the face it is placed against
        let inset = |diameter: f64| nominal_cover_mm + stirrup_diameter_mm + diameter / 2.0;

        let bars = match bar_layer {
            Some(layer) => {
                let depth_mm = match face {
                    Face::Bottom => height_mm - inset(layer.diameter_mm),
                    Face::Top => inset(layer.diameter_mm),
                };
                check_depth("bars.depth_mm", depth_mm, height_mm)?;
                Some(PlacedBars {
                    count: layer.count,
                    diameter_mm: layer.diameter_mm,
                    face,
                    area_mm2: bar_area(layer.count, layer.diameter_mm),
                    depth_mm,
                })
            }
            None => None,
        };

        let strands = match strand_layer {
            Some(layer) => {
                let single = strand_area_mm2.ok_or_else(|| {
                    CalcError::domain("strand_area_mm2", "none", "Strand area required for a prestressed layout")
                })?;
                require_positive("strand_area_mm2", single)?;
                let depth_mm = height_mm - inset(layer.diameter_mm);
                check_depth("strands.depth_mm", depth_mm, height_mm)?;
                Some(PlacedStrands {
                    count: layer.count,
                    diameter_mm: layer.diameter_mm,
                    area_mm2: f64::from(layer.count) * single,
                    depth_mm,
                    eccentricity_mm: depth_mm - height_mm / 2.0,
                })
            }
            None => None,
        };

        if let (Some(top), Some(p)) = (bars.filter(|b| b.face == Face::Top), strands) {
            if top.depth_mm >= p.depth_mm {
                return Err(CalcError::geometry(
                    "top_bars.depth_mm",
                    top.depth_mm.to_string(),
                    "Top bars must lie above the strands",
                ));
            }
        }

        let area_mm2 = rectangular_area(width_mm, height_mm);
        let perimeter_mm = 2.0 * (width_mm + height_mm);

        Ok(CrossSection {
            width_mm,
            height_mm,
            area_mm2,
            inertia_mm4: rectangular_moment_of_inertia(width_mm, height_mm),
            perimeter_mm,
            notional_size_mm: notional_size(area_mm2, perimeter_mm),
            stirrup_diameter_mm,
            exposure,
            bond_cover_mm,
            durability_cover_mm,
            nominal_cover_mm,
            bars,
            strands,
        })
    }

    /// Bottom tension bars (ordinary layout)
    pub fn bottom_bars(&self) -> Option<&PlacedBars> {
        self.bars.as_ref().filter(|b| b.face == Face::Bottom)
    }

    /// Top compression bars (mixed layout)
    pub fn top_bars(&self) -> Option<&PlacedBars> {
        self.bars.as_ref().filter(|b| b.face == Face::Top)
    }

    /// Ordinary bar area A_s (mm²), zero when absent
    pub fn bar_area_mm2(&self) -> f64 {
        self.bars.map_or(0.0, |b| b.area_mm2)
    }

    /// Prestress area A_p (mm²), zero when absent
    pub fn strand_area_mm2(&self) -> f64 {
        self.strands.map_or(0.0, |s| s.area_mm2)
    }

    /// Tendon eccentricity e (mm), zero when absent
    pub fn eccentricity_mm(&self) -> f64 {
        self.strands.map_or(0.0, |s| s.eccentricity_mm)
    }

    /// Effective depth of the tension reinforcement (mm)
    pub fn tension_depth_mm(&self) -> CalcResult<f64> {
        self.strands
            .map(|s| s.depth_mm)
            .or_else(|| self.bottom_bars().map(|b| b.depth_mm))
            .ok_or_else(|| CalcError::domain("reinforcement", "none", "No tension reinforcement"))
    }
}

fn check_depth(quantity: &str, depth_mm: f64, height_mm: f64) -> CalcResult<()> {
    if depth_mm <= 0.0 || depth_mm >= height_mm {
        return Err(CalcError::geometry(
            quantity,
            format!("{depth_mm:.1}"),
            format!("Effective depth must lie inside the section height {height_mm} mm; reduce cover or diameters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordinary(count: u32, diameter_mm: f64) -> Reinforcement {
        Reinforcement::Ordinary {
            bars: BarLayer { count, diameter_mm },
        }
    }

    fn strands() -> StrandLayer {
        StrandLayer {
            count: 6,
            diameter_mm: 12.5,
            name: "Y1860S7".to_string(),
        }
    }

    #[test]
    fn test_ordinary_section() {
        let s = CrossSection::new(300.0, 500.0, 10.0, ExposureClass::XC1, &ordinary(4, 20.0), None, &CodeSettings::default())
            .unwrap();
        // c_nom = max(20, 15, 10) + 10
        assert_eq!(s.nominal_cover_mm, 30.0);
        // d = 500 − 30 − 10 − 10
        let bars = s.bottom_bars().unwrap();
        assert_eq!(bars.depth_mm, 450.0);
        assert!((bars.area_mm2 - 1256.64).abs() < 0.01);
        assert!(s.strands.is_none());
        assert_eq!(s.tension_depth_mm().unwrap(), 450.0);
    }

    #[test]
    fn test_durability_cover_governs() {
        let s = CrossSection::new(300.0, 500.0, 10.0, ExposureClass::XS3, &ordinary(4, 20.0), None, &CodeSettings::default())
            .unwrap();
        assert_eq!(s.nominal_cover_mm, 60.0);
    }

    #[test]
    fn test_prestressed_eccentricity() {
        let layout = Reinforcement::Prestressed { strands: strands() };
        let s = CrossSection::new(300.0, 800.0, 10.0, ExposureClass::XC1, &layout, Some(93.0), &CodeSettings::default())
            .unwrap();
        // c_nom = max(12.5, 15, 10) + 10 = 25; d_p = 800 − 25 − 10 − 6.25
        let p = s.strands.unwrap();
        assert!((p.depth_mm - 758.75).abs() < 1e-9);
        assert!((p.eccentricity_mm - 358.75).abs() < 1e-9);
        assert_eq!(p.area_mm2, 558.0);
    }

    #[test]
    fn test_top_bars_placement() {
        let layout = Reinforcement::PrestressedWithTop {
            strands: strands(),
            top_bars: BarLayer { count: 2, diameter_mm: 16.0 },
        };
        let s = CrossSection::new(300.0, 800.0, 10.0, ExposureClass::XC1, &layout, Some(93.0), &CodeSettings::default())
            .unwrap();
        let top = s.top_bars().unwrap();
        // c_nom = max(16, 15, 10) + 10 = 26; depth = 26 + 10 + 8
        assert_eq!(top.depth_mm, 44.0);
        assert!(s.bottom_bars().is_none());
    }

    #[test]
    fn test_shallow_section_is_geometry_error() {
        let err = CrossSection::new(300.0, 60.0, 10.0, ExposureClass::XS3, &ordinary(2, 20.0), None, &CodeSettings::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "GEOMETRY");
    }

    #[test]
    fn test_no_bars_is_domain_error() {
        let err = CrossSection::new(300.0, 500.0, 10.0, ExposureClass::XC1, &ordinary(0, 20.0), None, &CodeSettings::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN");
    }

    #[test]
    fn test_non_positive_dimensions() {
        let s = CodeSettings::default();
        assert!(CrossSection::new(0.0, 500.0, 10.0, ExposureClass::XC1, &ordinary(4, 20.0), None, &s).is_err());
        assert!(CrossSection::new(300.0, -1.0, 10.0, ExposureClass::XC1, &ordinary(4, 20.0), None, &s).is_err());
    }

    #[test]
    fn test_layout_serialization() {
        let layout = Reinforcement::PrestressedWithTop {
            strands: strands(),
            top_bars: BarLayer { count: 2, diameter_mm: 16.0 },
        };
        let json = serde_json::to_string(&layout).unwrap();
        assert!(json.contains("\"type\":\"PrestressedWithTop\""));
        let roundtrip: Reinforcement = serde_json::from_str(&json).unwrap();
        assert_eq!(layout, roundtrip);
    }
}
