//! Quantity aliases used by the gas-state API.

use uom::{
    si::{ISQ, Quantity, SI},
    typenum::{N1, N2, P2, Z0},
};

/// Specific gas constant, J/kg·K in SI.
pub type SpecificGasConstant = Quantity<ISQ<P2, Z0, N2, Z0, N1, Z0, Z0>, SI<f64>, f64>;

/// Work per unit of reference mass flow, J/kg in SI.
///
/// Adiabatic operators report work scaled by the stream's mass ratio, so a
/// bypass stream carrying half the reference flow reports half the work.
pub type SpecificWork = Quantity<ISQ<P2, Z0, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Heating value of a fuel, J/kg in SI.
pub type HeatOfCombustion = SpecificWork;
