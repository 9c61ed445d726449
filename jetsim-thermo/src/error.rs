use thiserror::Error;

/// Errors that may occur when constructing or combining gas states.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThermoError {
    /// Pressure or temperature is not a finite positive value.
    #[error("non-physical gas state: P = {pressure} Pa, T = {temperature} K")]
    NonPhysical { pressure: f64, temperature: f64 },

    /// The fuel mass fraction must lie in `[0, 1)`.
    #[error("invalid fuel fraction: {0}")]
    InvalidFuelFraction(f64),

    /// No streams were given to mix.
    #[error("cannot mix an empty set of streams")]
    EmptyMix,

    /// The streams to mix carry no mass.
    #[error("cannot mix streams with total mass ratio {0}")]
    NoMassToMix(f64),
}
