//! Empirical gas-property correlation for air and hydrocarbon combustion products.
//!
//! Below 300 K the mixture behaves as cold air. Above it the specific heat
//! rises and the heat-capacity ratio falls linearly with temperature, faster
//! for richer mixtures, within fixed bounds. Tuned engine configurations
//! depend on these exact constants.

/// Temperature above which the properties start to vary, in K.
pub const REFERENCE_TEMPERATURE: f64 = 300.0;

/// Specific heat at constant pressure of cold air, J/kg·K.
pub const CP_MIN: f64 = 1004.5;

/// Upper bound on the specific heat at constant pressure, J/kg·K.
pub const CP_MAX: f64 = 1404.5;

/// Heat-capacity ratio of cold air.
pub const GAMMA_MAX: f64 = 1.4;

/// Lower bound on the heat-capacity ratio.
pub const GAMMA_MIN: f64 = 1.1;

/// Derived properties of a gas mixture at a given temperature and composition.
///
/// All values are in SI units (J/kg·K for `cp`, `cv` and `r`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasProperties {
    pub cp: f64,
    pub cv: f64,
    pub gamma: f64,
    pub r: f64,
}

impl GasProperties {
    /// Evaluates the correlation at temperature `t` (K) and fuel-air ratio `far`.
    #[must_use]
    pub fn at(t: f64, far: f64) -> Self {
        let ff = fuel_fraction(far);
        let td = ((t - REFERENCE_TEMPERATURE) * 0.0005).max(0.0);

        let cp = (CP_MIN + 250.0 * td * (1.0 + 10.0 * ff)).clamp(CP_MIN, CP_MAX);
        let gamma = (GAMMA_MAX - 0.1 * td * (1.0 + ff)).clamp(GAMMA_MIN, GAMMA_MAX);
        let cv = cp / gamma;
        let r = cv * (gamma - 1.0);

        Self { cp, cv, gamma, r }
    }
}

/// Converts a fuel-air ratio to a fuel mass fraction.
#[must_use]
pub fn fuel_fraction(far: f64) -> f64 {
    far / (far + 1.0)
}

/// Converts a fuel mass fraction to a fuel-air ratio.
#[must_use]
pub fn fuel_air_ratio(ff: f64) -> f64 {
    ff / (1.0 - ff)
}
