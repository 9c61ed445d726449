//! Shared numeric building blocks for the Jetsim workspace.
//!
//! Engine models accept values such as throttle settings, propellant fractions
//! and stage efficiencies that are only meaningful within known bounds.
//! The [`constraint`] module lets those bounds live in the type system so the
//! per-tick solvers can trust their inputs.

pub mod constraint;
