//! # Unit Types
//!
//! Newtype wrappers for the unit contract of the engine. Formulas are not
//! dimensionally generic, so conversions between the section scale (mm, N)
//! and the member scale (m, kN) go through these types.
//!
//! ## Units
//!
//! - Length: millimetres (section), metres (span)
//! - Force: newtons, kilonewtons
//! - Moment: kilonewton-metres, newton-millimetres
//! - Distributed load: kN/m (numerically equal to N/mm)
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::units::{KiloNewtonMeters, Meters, Millimeters, NewtonMillimeters};
//!
//! let span: Millimeters = Meters(6.0).into();
//! assert_eq!(span.0, 6000.0);
//!
//! let m: NewtonMillimeters = KiloNewtonMeters(94.5).into();
//! assert_eq!(m.0, 94.5e6);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

impl From<Newtons> for KiloNewtons {
    fn from(n: Newtons) -> Self {
        KiloNewtons(n.0 / 1000.0)
    }
}

impl From<KiloNewtons> for Newtons {
    fn from(kn: KiloNewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in kilonewton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtonMeters(pub f64);

/// Moment in newton-millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewtonMillimeters(pub f64);

impl From<KiloNewtonMeters> for NewtonMillimeters {
    fn from(knm: KiloNewtonMeters) -> Self {
        NewtonMillimeters(knm.0 * 1.0e6)
    }
}

impl From<NewtonMillimeters> for KiloNewtonMeters {
    fn from(nmm: NewtonMillimeters) -> Self {
        KiloNewtonMeters(nmm.0 * 1.0e-6)
    }
}

// ============================================================================
// Distributed Load
// ============================================================================

/// Distributed load in kN/m. Equal in value to N/mm.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerM(pub f64);

impl KnPerM {
    /// Same load expressed in N/mm
    pub fn n_per_mm(self) -> f64 {
        self.0
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Newtons);
impl_arithmetic!(KiloNewtons);
impl_arithmetic!(KiloNewtonMeters);
impl_arithmetic!(NewtonMillimeters);
impl_arithmetic!(KnPerM);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_millimeters() {
        let span: Millimeters = Meters(10.0).into();
        assert_eq!(span.0, 10_000.0);
        let back: Meters = span.into();
        assert_eq!(back.0, 10.0);
    }

    #[test]
    fn test_force_and_moment_conversions() {
        let n: Newtons = KiloNewtons(1.5).into();
        assert_eq!(n.0, 1500.0);
        let knm: KiloNewtonMeters = NewtonMillimeters(2.5e6).into();
        assert!((knm.0 - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = KiloNewtonMeters(10.0);
        let b = KiloNewtonMeters(4.0);
        assert_eq!((a + b).value(), 14.0);
        assert_eq!((a - b).value(), 6.0);
        assert_eq!((a * 2.0).value(), 20.0);
        assert_eq!((a / 2.0).value(), 5.0);
    }

    #[test]
    fn test_serialization() {
        let w = KnPerM(12.5);
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, "12.5");
        let roundtrip: KnPerM = serde_json::from_str(&json).unwrap();
        assert_eq!(w, roundtrip);
    }
}
