//! Numerical solvers used by the Jetsim cycle models.
//!
//! Cycle models close implicit balances (turbine work against compressor work,
//! face area against a target static thrust) by driving a scalar residual to
//! zero. The [`equation`] module provides the root finders for that job.

pub mod equation;
