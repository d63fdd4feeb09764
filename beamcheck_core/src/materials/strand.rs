//! Prestressing Strand (EN 10138-3)
//!
//! Strands are identified by grade name and nominal diameter. The table
//! stores cross-section area and the characteristic maximum and 0.1 % proof
//! forces, from which the stresses are derived.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::settings::CodeSettings;

/// Modulus of elasticity for prestressing strand (N/mm²)
pub const EP: f64 = 195_000.0;

/// One row of the strand table
#[derive(Debug, Clone, Copy, PartialEq)]
struct StrandRow {
    name: &'static str,
    diameter_mm: f64,
    fpk: f64,
    area_mm2: f64,
    fpk_force_kn: f64,
    fp01k_force_kn: f64,
}

const fn row(
    name: &'static str,
    diameter_mm: f64,
    fpk: f64,
    area_mm2: f64,
    fpk_force_kn: f64,
    fp01k_force_kn: f64,
) -> StrandRow {
    StrandRow {
        name,
        diameter_mm,
        fpk,
        area_mm2,
        fpk_force_kn,
        fp01k_force_kn,
    }
}

const STRANDS: [StrandRow; 23] = [
    row("Y1960S3", 5.2, 1960.0, 13.6, 26.6, 22.9),
    row("Y1860S3", 6.5, 1860.0, 21.1, 39.2, 33.8),
    row("Y1860S3", 6.8, 1860.0, 23.4, 43.5, 37.4),
    row("Y1860S3", 7.5, 1860.0, 29.0, 54.0, 46.4),
    row("Y1860S7", 7.0, 1860.0, 30.0, 56.0, 48.0),
    row("Y1860S7", 9.0, 1860.0, 50.0, 93.0, 80.0),
    row("Y1860S7", 11.0, 1860.0, 75.0, 140.0, 120.0),
    row("Y1860S7", 12.5, 1860.0, 93.0, 173.0, 149.0),
    row("Y1860S7", 13.0, 1860.0, 100.0, 186.0, 160.0),
    row("Y1860S7", 15.2, 1860.0, 140.0, 260.0, 224.0),
    row("Y1860S7", 16.0, 1860.0, 150.0, 279.0, 240.0),
    row("Y1770S7", 15.2, 1770.0, 140.0, 248.0, 213.0),
    row("Y1770S7", 16.0, 1770.0, 150.0, 265.0, 228.0),
    row("Y1770S7", 18.0, 1770.0, 200.0, 354.0, 304.0),
    row("Y1860S7G", 12.7, 1860.0, 112.0, 209.0, 180.0),
    row("Y1820S7G", 15.2, 1820.0, 165.0, 300.0, 258.0),
    row("Y1700S7G", 18.0, 1700.0, 223.0, 380.0, 327.0),
    row("Y2160S3", 5.2, 2160.0, 13.6, 29.4, 26.2),
    row("Y2060S3", 5.2, 2060.0, 13.6, 28.0, 24.1),
    row("Y1960S3", 6.5, 1960.0, 21.2, 41.4, 35.6),
    row("Y2160S7", 6.85, 2160.0, 28.2, 60.9, 52.4),
    row("Y2060S7", 7.0, 2060.0, 30.0, 62.0, 53.0),
    row("Y1960S7", 9.0, 1960.0, 50.0, 98.0, 84.0),
];

/// Grade names present in the table
pub fn strand_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = STRANDS.iter().map(|r| r.name).collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// Resolved prestressing strand properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandProperties {
    pub name: String,
    pub diameter_mm: f64,
    /// Characteristic tensile strength (N/mm²)
    pub fpk: f64,
    /// Cross-section area of one strand (mm²)
    pub area_mm2: f64,
    /// Characteristic maximum force (kN)
    pub fpk_force_kn: f64,
    /// Characteristic 0.1 % proof force (kN)
    pub fp01k_force_kn: f64,
    /// Characteristic 0.1 % proof stress (N/mm²)
    pub fp01k: f64,
    /// Design strength (N/mm²)
    pub fpd: f64,
    /// Modulus of elasticity (N/mm²)
    pub ep: f64,
}

impl StrandProperties {
    /// Look up a strand by grade name and nominal diameter.
    pub fn lookup(name: &str, diameter_mm: f64, settings: &CodeSettings) -> CalcResult<Self> {
        let code = name.trim().to_uppercase();
        let found = STRANDS
            .iter()
            .find(|r| r.name == code && (r.diameter_mm - diameter_mm).abs() < 1e-6)
            .ok_or_else(|| CalcError::invalid_class("prestress strand", format!("{name} Ø{diameter_mm}")))?;

        let fp01k = found.fp01k_force_kn * 1000.0 / found.area_mm2;
        Ok(StrandProperties {
            name: found.name.to_string(),
            diameter_mm: found.diameter_mm,
            fpk: found.fpk,
            area_mm2: found.area_mm2,
            fpk_force_kn: found.fpk_force_kn,
            fp01k_force_kn: found.fp01k_force_kn,
            fp01k,
            fpd: fp01k / settings.gamma_p,
            ep: EP,
        })
    }

    /// Maximum stress at tensioning: min(0.8 fpk, 0.9 fp01k), EC2 5.10.2.1
    pub fn max_tensioning_stress(&self) -> f64 {
        (0.8 * self.fpk).min(0.9 * self.fp01k)
    }

    /// Initial stress after transfer used for relaxation: min(0.75 fpk, 0.85 fp01k)
    pub fn initial_stress(&self) -> f64 {
        (0.75 * self.fpk).min(0.85 * self.fp01k)
    }
}
