//! # Error Types
//!
//! Structured error types for beamcheck_core. An evaluation either yields a
//! complete verdict or fails with exactly one of these, naming the offending
//! field or derived quantity.
//!
//! Code-check outcomes (moment capacity exceeded, crack width too large, ...)
//! are never errors. They are reported as booleans on the verdict.
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::errors::{CalcError, CalcResult};
//!
//! fn validate_width(width_mm: f64) -> CalcResult<()> {
//!     if width_mm <= 0.0 {
//!         return Err(CalcError::domain(
//!             "width_mm",
//!             width_mm.to_string(),
//!             "Width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(validate_width(-1.0).unwrap_err().error_code(), "DOMAIN");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for beamcheck_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for beam evaluation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A class code is not in the supported code table
    #[error("Unknown {table} class: '{code}'")]
    InvalidClass { table: String, code: String },

    /// Derived geometry is non-physical (e.g. effective depth ≤ 0)
    #[error("Invalid geometry for '{quantity}': {value} - {reason}")]
    Geometry {
        quantity: String,
        value: String,
        reason: String,
    },

    /// An equilibrium root-find could not bracket a solution
    #[error("No convergence in {solver}: {reason}")]
    Convergence { solver: String, reason: String },

    /// An input value lies outside its permitted domain
    #[error("Invalid input for '{field}': {value} - {reason}")]
    Domain {
        field: String,
        value: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    File {
        operation: String,
        path: String,
        reason: String,
    },
}

impl CalcError {
    /// Create an InvalidClass error
    pub fn invalid_class(table: impl Into<String>, code: impl Into<String>) -> Self {
        CalcError::InvalidClass {
            table: table.into(),
            code: code.into(),
        }
    }

    /// Create a Geometry error
    pub fn geometry(quantity: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Geometry {
            quantity: quantity.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a Convergence error
    pub fn convergence(solver: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Convergence {
            solver: solver.into(),
            reason: reason.into(),
        }
    }

    /// Create a Domain error
    pub fn domain(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Domain {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a Serialization error
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::Serialization {
            reason: reason.into(),
        }
    }

    /// Create a File error
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::File {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidClass { .. } => "INVALID_CLASS",
            CalcError::Geometry { .. } => "GEOMETRY",
            CalcError::Convergence { .. } => "CONVERGENCE",
            CalcError::Domain { .. } => "DOMAIN",
            CalcError::Serialization { .. } => "SERIALIZATION",
            CalcError::File { .. } => "FILE_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

/// Reject non-finite or non-positive values.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::domain(field, value.to_string(), "Must be positive"));
    }
    Ok(())
}

/// Reject non-finite or negative values.
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::domain(field, value.to_string(), "Must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::domain("width_mm", "-5", "Must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"Domain\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::invalid_class("concrete", "C33").error_code(), "INVALID_CLASS");
        assert_eq!(CalcError::convergence("uls", "no sign change").error_code(), "CONVERGENCE");
        assert_eq!(CalcError::geometry("d", "-3", "negative").error_code(), "GEOMETRY");
    }

    #[test]
    fn test_display_names_offending_field() {
        let error = CalcError::invalid_class("exposure", "XF1");
        assert_eq!(error.to_string(), "Unknown exposure class: 'XF1'");
    }

    #[test]
    fn test_require_helpers() {
        assert!(require_positive("h", 500.0).is_ok());
        assert!(require_positive("h", 0.0).is_err());
        assert!(require_positive("h", f64::NAN).is_err());
        assert!(require_non_negative("g", 0.0).is_ok());
        assert!(require_non_negative("g", -0.1).is_err());
    }
}
