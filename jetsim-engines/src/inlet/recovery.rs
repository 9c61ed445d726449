use ndarray::Array1;
use ninterp::{
    error::{InterpolateError, ValidateError},
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterpError {
    #[error(transparent)]
    Validation(#[from] ValidateError),
    #[error(transparent)]
    Interpolation(#[from] InterpolateError),
}

/// Total pressure recovery of an inlet as a function of freestream Mach number.
#[derive(Debug, Clone)]
pub enum PressureRecovery {
    /// Piecewise-linear calibration curve, clamped at both ends.
    Curve(RecoveryCurve),
    /// Closed-form supersonic loss: `1` up to Mach 1, `1 − 0.075·(M−1)^1.35` above.
    Supersonic,
}

impl PressureRecovery {
    /// Total pressure recovery at `mach`.
    #[must_use]
    pub fn at(&self, mach: f64) -> f64 {
        match self {
            Self::Curve(curve) => curve
                .evaluate(mach)
                .unwrap_or_else(|_| supersonic_recovery(mach)),
            Self::Supersonic => supersonic_recovery(mach),
        }
    }
}

/// A `(Mach, TPR)` calibration table.
#[derive(Debug, Clone)]
pub struct RecoveryCurve(Interp1DOwned<f64, Linear>);

impl RecoveryCurve {
    /// Builds a curve from `(mach, tpr)` points sorted by Mach number.
    ///
    /// # Errors
    ///
    /// Returns an error if the points are not strictly increasing in Mach
    /// or there are too few of them to interpolate.
    pub fn new(points: &[[f64; 2]]) -> Result<Self, InterpError> {
        let mach: Array1<f64> = points.iter().map(|p| p[0]).collect();
        let tpr: Array1<f64> = points.iter().map(|p| p[1]).collect();
        let interp = Interp1DOwned::new(
            mach,
            tpr,
            Linear,
            ninterp::interpolator::Extrapolate::Clamp,
        )?;
        Ok(Self(interp))
    }

    /// Interpolated recovery at `mach`.
    ///
    /// # Errors
    ///
    /// Returns an error if interpolation fails, for example on NaN input.
    pub fn evaluate(&self, mach: f64) -> Result<f64, InterpError> {
        Ok(self.0.interpolate(&[mach])?)
    }
}

fn supersonic_recovery(mach: f64) -> f64 {
    if mach <= 1.0 {
        1.0
    } else {
        1.0 - 0.075 * (mach - 1.0).powf(1.35)
    }
}

/// Near-unity cosine floor used at low speed, capped at 1.
///
/// Keeps inlet recovery from collapsing when the flow direction is poorly
/// defined near standstill.
#[must_use]
pub fn fake_cosine(speed: f64) -> f64 {
    (-0.000_123 * speed * speed + 0.002_469 * speed + 0.987_654).min(1.0)
}

/// Overall recovery of an inlet at rest.
#[must_use]
pub fn overall_static_tpr(tpr: f64) -> f64 {
    let cosine = fake_cosine(0.0);
    tpr * cosine * cosine
}
