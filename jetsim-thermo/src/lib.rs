//! Gas-state thermodynamics for air-breathing engine cycles.
//!
//! [`GasState`] carries the total conditions of an air and fuel mixture along
//! a gas path and exposes the adiabatic operators that engine cycles chain
//! together. [`ambient`] turns atmosphere queries into gas states.

mod error;
mod gas;

pub mod ambient;
pub mod properties;
pub mod units;

pub use error::ThermoError;
pub use gas::{GasState, Process};
pub use properties::GasProperties;
