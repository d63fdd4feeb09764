//! # Simply-Supported Beam Formulas
//!
//! Closed-form results for a single span with pin and roller supports.
//! Callers pass consistent units (the engine uses N/mm, mm and N/mm² for
//! deflections; kN/m and m for moments and shears).
//!
//! ## Notation
//!
//! - `L` = Span length
//! - `w` = Uniform load intensity (force per unit length)
//! - `M` = Bending moment
//! - `V` = Shear force
//! - `δ` = Deflection
//! - `EI` = Bending stiffness
//! - `κ` = Curvature
//!
//! ## Sign Conventions
//!
//! - Loads: Positive downward
//! - Moment: Positive causes tension on bottom (sagging)
//! - Deflection: Positive downward

// =============================================================================
// UNIFORM LOAD FORMULAS
// =============================================================================

/// Support shear for uniform load w over full span L
///
/// ```text
///    ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ w
///    ═════════════════
///    △                △
///   R1  ←─────L─────→ R2
/// ```
///
/// # Formula
/// V_max = R1 = R2 = wL/2
#[inline]
pub fn uniform_load_max_shear(w: f64, l: f64) -> f64 {
    w * l / 2.0
}

/// Maximum moment for uniform load (at midspan)
///
/// # Formula
/// M_max = wL²/8
#[inline]
pub fn uniform_load_max_moment(w: f64, l: f64) -> f64 {
    w * l * l / 8.0
}

/// Maximum deflection for uniform load (at midspan)
///
/// # Formula
/// δ_max = 5wL⁴ / (384EI)
#[inline]
pub fn uniform_load_max_deflection(w: f64, l: f64, ei: f64) -> f64 {
    5.0 * w * l.powi(4) / (384.0 * ei)
}

// =============================================================================
// CONSTANT MOMENT / CURVATURE
// Straight tendon or uniform shrinkage curvature along the full span
// =============================================================================

/// Midspan deflection under a constant moment M over the span
///
/// # Formula
/// δ = ML² / (8EI)
///
/// A negative moment (hogging, e.g. prestress below the centroid) gives
/// upward camber.
#[inline]
pub fn constant_moment_deflection(m: f64, l: f64, ei: f64) -> f64 {
    m * l * l / (8.0 * ei)
}

/// Midspan deflection for a constant curvature κ over the span
///
/// # Formula
/// δ = κL² / 8
#[inline]
pub fn constant_curvature_deflection(kappa: f64, l: f64) -> f64 {
    kappa * l * l / 8.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_load_moment_and_shear() {
        // w = 21 kN/m, L = 6 m
        assert!((uniform_load_max_moment(21.0, 6.0) - 94.5).abs() < 1e-9);
        assert!((uniform_load_max_shear(21.0, 6.0) - 63.0).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_load_deflection() {
        // w = 10 N/mm, L = 6000 mm, EI = 1e14 N·mm²
        let d = uniform_load_max_deflection(10.0, 6000.0, 1.0e14);
        assert!((d - 1.6875).abs() < 1e-9);
    }

    #[test]
    fn test_constant_moment_matches_curvature() {
        let (m, l, ei) = (-5.0e7, 8000.0, 2.0e14);
        let by_moment = constant_moment_deflection(m, l, ei);
        let by_curvature = constant_curvature_deflection(m / ei, l);
        assert!((by_moment - by_curvature).abs() < 1e-12);
        assert!(by_moment < 0.0);
    }
}
