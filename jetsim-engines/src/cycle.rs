//! Thermodynamic cycle models.
//!
//! A cycle model turns the freestream and engine-face gas states into thrust,
//! fuel flow and an internal temperature. Each engine family implements
//! [`CycleModel`]; [`Cycle`] selects one at construction time.

mod nozzle;
mod ramjet;
mod turbofan;

pub use nozzle::{Nozzle, NozzleFlow};
pub use ramjet::{Ramjet, RamjetParams};
pub use turbofan::{Turbofan, TurbofanFitInputs, TurbofanFitResults, TurbofanParams};

use jetsim_solve::equation::brent;
use jetsim_thermo::{GasState, ThermoError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::{
    f64::{Area, Force, MassRate, ThermodynamicTemperature, Time, Velocity},
    force::newton,
    mass_rate::kilogram_per_second,
    thermodynamic_temperature::kelvin,
    time::second,
};

use crate::G0;

/// Inputs to one cycle evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleConditions {
    /// Static freestream state.
    pub ambient: GasState,
    /// Total conditions at the engine face, after inlet recovery.
    pub inlet: GasState,
    /// Freestream speed relative to the engine.
    pub speed: Velocity,
    /// Fraction of the required intake area that is available.
    pub area_ratio: f64,
    /// Commanded throttle in `[0, 1]`.
    pub throttle: f64,
}

/// Performance produced by one cycle evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutput {
    pub thrust: Force,
    pub fuel_flow: MassRate,
    pub isp: Time,
    /// Temperature the engine structure is exposed to.
    pub engine_temperature: ThermodynamicTemperature,
    /// Air captured by the inlet.
    pub air_flow: MassRate,
}

impl CycleOutput {
    pub(crate) fn new(
        thrust: f64,
        fuel_flow: f64,
        air_flow: f64,
        engine_temperature: f64,
    ) -> Result<Self, CycleError> {
        if !thrust.is_finite() {
            return Err(CycleError::NonFiniteThrust);
        }
        let isp = if fuel_flow > 0.0 {
            thrust / (fuel_flow * G0)
        } else {
            0.0
        };
        Ok(Self {
            thrust: Force::new::<newton>(thrust),
            fuel_flow: MassRate::new::<kilogram_per_second>(fuel_flow),
            isp: Time::new::<second>(isp),
            engine_temperature: ThermodynamicTemperature::new::<kelvin>(engine_temperature),
            air_flow: MassRate::new::<kilogram_per_second>(air_flow),
        })
    }
}

/// Reasons a cycle cannot run.
///
/// The `Display` text is reported to the pilot as the flameout reason.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CycleError {
    #[error("no oxygen in the atmosphere")]
    NoOxygen,

    #[error("no propellant")]
    NoPropellant,

    #[error("no intake air")]
    NoIntakeAir,

    #[error("non-physical gas state")]
    NonPhysical(#[from] ThermoError),

    #[error("nozzle pressure ratio {ratio:.3} too low to expand")]
    BackPressure { ratio: f64 },

    #[error("turbine cannot drive the compressor")]
    TurbineStall(#[source] brent::Error),

    #[error("thrust is not finite")]
    NonFiniteThrust,
}

/// A thermodynamic cycle for one engine family.
pub trait CycleModel {
    /// Intake area the engine requires at its design face Mach number.
    fn area(&self) -> Area;

    /// Evaluates the cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] when the cycle is infeasible under the given
    /// conditions.
    fn compute(&self, conditions: &CycleConditions) -> Result<CycleOutput, CycleError>;

    /// Rotor speed fraction at `throttle`, for engines that have one.
    fn spool(&self, throttle: f64) -> f64 {
        throttle
    }
}

/// Cycle parameters for every supported engine family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CycleParams {
    Turbofan(TurbofanParams),
    Ramjet(RamjetParams),
}

/// One of the supported cycle models.
#[derive(Debug, Clone, PartialEq)]
pub enum Cycle {
    Turbofan(Turbofan),
    Ramjet(Ramjet),
}

impl Cycle {
    /// Short name of the engine family.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Turbofan(_) => "turbofan",
            Self::Ramjet(_) => "ramjet",
        }
    }
}

impl From<Turbofan> for Cycle {
    fn from(engine: Turbofan) -> Self {
        Self::Turbofan(engine)
    }
}

impl From<Ramjet> for Cycle {
    fn from(engine: Ramjet) -> Self {
        Self::Ramjet(engine)
    }
}

impl CycleModel for Cycle {
    fn area(&self) -> Area {
        match self {
            Self::Turbofan(engine) => engine.area(),
            Self::Ramjet(engine) => engine.area(),
        }
    }

    fn compute(&self, conditions: &CycleConditions) -> Result<CycleOutput, CycleError> {
        match self {
            Self::Turbofan(engine) => engine.compute(conditions),
            Self::Ramjet(engine) => engine.compute(conditions),
        }
    }

    fn spool(&self, throttle: f64) -> f64 {
        match self {
            Self::Turbofan(engine) => engine.spool(throttle),
            Self::Ramjet(engine) => engine.spool(throttle),
        }
    }
}

/// Spool speed fraction for a throttle setting.
pub(crate) fn spool(idle: f64, throttle: f64) -> f64 {
    idle + (1.0 - idle) * throttle
}

/// Scales a design pressure ratio by spool speed.
pub(crate) fn part_speed_ratio(design: f64, spool: f64) -> f64 {
    1.0 + (design - 1.0) * spool
}
