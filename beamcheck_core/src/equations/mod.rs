//! # Structural Engineering Equations
//!
//! Fundamental formulas shared by the calculation modules. Keeping them in
//! one place makes each one easy to check against its code reference.
//!
//! ## Modules
//!
//! - [`beam`] - Simply-supported beam formulas (moment, shear, deflection)
//! - [`section`] - Gross and transformed cross-section properties
//! - [`roots`] - Bracketed scalar root finding
//!
//! ## Sign Conventions
//!
//! - **Loads**: Positive downward (gravity direction)
//! - **Moment**: Positive causes tension on bottom fiber (sagging)
//! - **Stress**: Tension positive, compression negative
//! - **Deflection**: Positive downward
//!
//! ## References
//!
//! - EN 1992-1-1:2004 Eurocode 2: Design of concrete structures
//! - EN 10138-3 Prestressing steels, strand

pub mod beam;
pub mod roots;
pub mod section;

pub use beam::{
    constant_curvature_deflection,
    constant_moment_deflection,
    uniform_load_max_deflection,
    uniform_load_max_moment,
    uniform_load_max_shear,
};

pub use roots::bisection;

pub use section::{
    bar_area,
    cracked_neutral_axis_factor,
    notional_size,
    rectangular_area,
    rectangular_moment_of_inertia,
    transformed_section,
    TransformedLayer,
    TransformedProperties,
};
