//! # Cross-Section Property Formulas
//!
//! Gross and transformed properties of a solid rectangular concrete section
//! with discrete reinforcement layers.
//!
//! ## Notation
//!
//! - `b` = Width of section
//! - `h` = Height of section
//! - `A` = Area
//! - `I` = Second moment of area
//! - `η` = Modular ratio E_s/E_c of a reinforcement layer
//! - `y` = Position below mid-height (positive downward)

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

// =============================================================================
// RECTANGULAR SECTION PROPERTIES
// =============================================================================

/// Cross-sectional area for rectangular section
///
/// # Formula
/// A = b × h
///
/// # Example
/// ```rust
/// use beamcheck_core::equations::section::rectangular_area;
///
/// assert_eq!(rectangular_area(300.0, 500.0), 150_000.0);
/// ```
#[inline]
pub fn rectangular_area(b: f64, h: f64) -> f64 {
    b * h
}

/// Second moment of area about the centroidal axis
///
/// ```text
///     ┌─────────┐
///     │         │
///   h │ ════════│ ← neutral axis at h/2
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// I = bh³/12
#[inline]
pub fn rectangular_moment_of_inertia(b: f64, h: f64) -> f64 {
    b * h.powi(3) / 12.0
}

/// Total area of `count` round bars of diameter `diameter`
///
/// # Formula
/// A_s = n·π·φ²/4
#[inline]
pub fn bar_area(count: u32, diameter: f64) -> f64 {
    f64::from(count) * PI * diameter * diameter / 4.0
}

/// Notional size for creep and shrinkage (EC2 3.1.4(5))
///
/// # Formula
/// h₀ = 2A_c/u, with u the perimeter exposed to drying
#[inline]
pub fn notional_size(area: f64, perimeter: f64) -> f64 {
    2.0 * area / perimeter
}

// =============================================================================
// TRANSFORMED SECTION
// =============================================================================

/// A reinforcement layer expressed for transformation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformedLayer {
    /// Steel area (mm²)
    pub area: f64,
    /// Modular ratio E_s/E_c
    pub modular_ratio: f64,
    /// Position below mid-height (mm, positive downward)
    pub y: f64,
}

/// Properties of an uncracked transformed section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformedProperties {
    /// Transformed area A_t (mm²)
    pub area: f64,
    /// Centroid below mid-height y_t (mm)
    pub centroid: f64,
    /// Second moment about the transformed centroid I_t (mm⁴)
    pub inertia: f64,
}

/// Transform a rectangular section with reinforcement layers into concrete.
///
/// The steel displaces concrete, so each layer adds (η − 1)·A.
///
/// # Formulas
/// - A_t = bh + Σ(η − 1)A
/// - y_t = Σ(η − 1)A·y / A_t
/// - I_t = bh³/12 + bh·y_t² + Σ(η − 1)A(y − y_t)²
pub fn transformed_section(b: f64, h: f64, layers: &[TransformedLayer]) -> TransformedProperties {
    let ac = rectangular_area(b, h);
    let added = |l: &TransformedLayer| (l.modular_ratio - 1.0) * l.area;

    let area = ac + layers.iter().map(added).sum::<f64>();
    let centroid = layers.iter().map(|l| added(l) * l.y).sum::<f64>() / area;
    let inertia = rectangular_moment_of_inertia(b, h)
        + ac * centroid * centroid
        + layers
            .iter()
            .map(|l| added(l) * (l.y - centroid).powi(2))
            .sum::<f64>();

    TransformedProperties {
        area,
        centroid,
        inertia,
    }
}

/// Neutral-axis depth factor α = x/d of a cracked singly reinforced section
/// (concrete in tension ignored, linear elastic).
///
/// # Formula
/// α = √((ηρ)² + 2ηρ) − ηρ, with ρ = A_s/(bd)
#[inline]
pub fn cracked_neutral_axis_factor(eta_rho: f64) -> f64 {
    (eta_rho * eta_rho + 2.0 * eta_rho).sqrt() - eta_rho
}
