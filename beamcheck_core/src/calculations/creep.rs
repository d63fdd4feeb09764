//! # Creep (EC2 Annex B)
//!
//! Creep coefficient φ(t, t₀) at the long-term horizon, computed once per
//! load with that load's own application age. The two coefficients give
//! effective moduli E_c,eff = E_cm/(1 + φ) and, weighted by moment, the
//! mid-term modulus E_c,middle used by the SLS checks.
//!
//! ## Formulas
//!
//! - β(f_cm) = 16.8/√f_cm
//! - φ_RH = 1 + (1 − RH/100)/(0.1·∛h₀), with α₁, α₂ for f_cm > 35
//! - t₀,adj = max(t₀·(9/(2 + t₀^1.2) + 1)^α, 0.5)
//! - β(t₀) = 1/(0.1 + t₀,adj^0.2)
//! - β_H = min(1.5(1 + (0.012RH)^18)h₀ + 250α₃, 1500α₃)
//! - β_c = ((t − t₀)/(β_H + t − t₀))^0.3
//! - φ = φ_RH·β(f_cm)·β(t₀)·β_c

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcError, CalcResult};
use crate::materials::{CementClass, ConcreteProperties};

/// Mean strength above which the α₁..α₃ corrections apply (N/mm²)
const FCM_THRESHOLD: f64 = 35.0;

/// Creep coefficient and its intermediate factors for one load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreepCoefficients {
    /// Loading age t₀ (days)
    pub age_days: f64,
    /// Notional size h₀ (mm)
    pub notional_size_mm: f64,
    pub beta_fcm: f64,
    pub phi_rh: f64,
    /// Age adjusted for cement type (days)
    pub adjusted_age_days: f64,
    pub beta_t0: f64,
    /// Notional creep coefficient φ₀
    pub phi_0: f64,
    pub beta_h: f64,
    pub beta_c: f64,
    /// Creep coefficient φ(t, t₀)
    pub phi: f64,
}

impl CreepCoefficients {
    /// Compute φ(t, t₀) for a load applied at `age_days`.
    pub fn compute(
        age_days: f64,
        horizon_days: f64,
        relative_humidity: f64,
        notional_size_mm: f64,
        concrete: &ConcreteProperties,
        cement: CementClass,
    ) -> CalcResult<Self> {
        require_positive("age_days", age_days)?;
        require_positive("notional_size_mm", notional_size_mm)?;
        if age_days >= horizon_days {
            return Err(CalcError::domain(
                "age_days",
                age_days.to_string(),
                "Loading age must be earlier than the long-term horizon",
            ));
        }
        check_humidity(relative_humidity)?;

        let fcm = concrete.fcm;
        let rh = relative_humidity;
        let h0 = notional_size_mm;
        let (alpha_1, alpha_2, alpha_3) = if fcm > FCM_THRESHOLD {
            (
                (FCM_THRESHOLD / fcm).powf(0.7),
                (FCM_THRESHOLD / fcm).powf(0.2),
                (FCM_THRESHOLD / fcm).powf(0.5),
            )
        } else {
            (1.0, 1.0, 1.0)
        };

        let beta_fcm = 16.8 / fcm.sqrt();
        let phi_rh = (1.0 + (1.0 - rh / 100.0) / (0.1 * h0.cbrt()) * alpha_1) * alpha_2;

        let adjusted_age_days =
            (age_days * (9.0 / (2.0 + age_days.powf(1.2)) + 1.0).powf(cement.age_exponent())).max(0.5);
        let beta_t0 = 1.0 / (0.1 + adjusted_age_days.powf(0.2));
        let phi_0 = phi_rh * beta_fcm * beta_t0;

        let beta_h = (1.5 * (1.0 + (0.012 * rh).powi(18)) * h0 + 250.0 * alpha_3).min(1500.0 * alpha_3);
        let duration = horizon_days - age_days;
        let beta_c = (duration / (beta_h + duration)).powf(0.3);

        Ok(CreepCoefficients {
            age_days,
            notional_size_mm: h0,
            beta_fcm,
            phi_rh,
            adjusted_age_days,
            beta_t0,
            phi_0,
            beta_h,
            beta_c,
            phi: phi_0 * beta_c,
        })
    }

    /// Effective modulus E_cm/(1 + φ)
    pub fn effective_modulus(&self, ecm: f64) -> f64 {
        ecm / (1.0 + self.phi)
    }
}

/// Creep of the self-load and the live-load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Creep {
    pub self_load: CreepCoefficients,
    pub live_load: CreepCoefficients,
    /// E_c,eff under the self-load (N/mm²)
    pub ec_eff_self: f64,
    /// E_c,eff under the live-load (N/mm²)
    pub ec_eff_live: f64,
}

impl Creep {
    /// Creep for both loads.
    pub fn compute(
        self_load_age_days: f64,
        live_load_age_days: f64,
        horizon_days: f64,
        relative_humidity: f64,
        notional_size_mm: f64,
        concrete: &ConcreteProperties,
        cement: CementClass,
    ) -> CalcResult<Self> {
        let coefficients = |age| {
            CreepCoefficients::compute(age, horizon_days, relative_humidity, notional_size_mm, concrete, cement)
        };
        let self_load = coefficients(self_load_age_days)?;
        let live_load = coefficients(live_load_age_days)?;
        debug!(
            "creep: phi_self = {:.3}, phi_live = {:.3}",
            self_load.phi, live_load.phi
        );

        Ok(Creep {
            self_load,
            live_load,
            ec_eff_self: self_load.effective_modulus(concrete.ecm),
            ec_eff_live: live_load.effective_modulus(concrete.ecm),
        })
    }

    /// Moment-weighted modulus
    /// E_c,middle = (M_g + M_p)/(M_g/E_c,eff,g + M_p/E_c,eff,p).
    ///
    /// `moment_self` includes any permanent prestress moment magnitude.
    /// With no moment at all the self-load modulus is returned.
    pub fn middle_modulus(&self, moment_self: f64, moment_live: f64) -> f64 {
        let total = moment_self + moment_live;
        if total <= 0.0 {
            return self.ec_eff_self;
        }
        total / (moment_self / self.ec_eff_self + moment_live / self.ec_eff_live)
    }
}

pub(crate) fn check_humidity(relative_humidity: f64) -> CalcResult<()> {
    if !relative_humidity.is_finite() || relative_humidity <= 0.0 || relative_humidity > 100.0 {
        return Err(CalcError::domain(
            "relative_humidity",
            relative_humidity.to_string(),
            "Must lie in (0, 100] %",
        ));
    }
    Ok(())
}
