//! Air-breathing engine performance for vehicles in flight.
//!
//! The pieces, leaf first:
//!
//! - [`inlet`]: per-inlet pressure recovery and the per-vehicle aggregate.
//! - [`cycle`]: thermodynamic cycle models built from [`jetsim_thermo::GasState`] operators.
//! - [`solver`]: the per-engine solver that turns flight conditions into thrust.
//! - [`controller`]: the per-tick lifecycle (ignition, flameout, overheating).
//! - [`vehicle`]: drives every inlet and engine on one vehicle each tick.
//! - [`config`] and [`fitting`]: engine definitions and the fitted-parameter cache.

pub mod config;
pub mod controller;
pub mod cycle;
pub mod fitting;
pub mod inlet;
pub mod propellant;
pub mod solver;
pub mod vehicle;

pub use config::{ConfigError, EngineConfig, InletConfig, VehicleConfig};
pub use controller::{EngineController, EngineEvent, EngineState};
pub use cycle::{Cycle, CycleError, CycleModel};
pub use inlet::{Inlet, InletAggregate};
pub use solver::EngineSolver;
pub use vehicle::{FlightConditions, Vehicle};

/// Standard gravitational acceleration used for specific impulse, m/s².
pub const G0: f64 = jetsim_thermo::ambient::STANDARD_GRAVITY;
