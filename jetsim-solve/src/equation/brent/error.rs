use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    #[error("bracket endpoint {value} is not finite")]
    NonFiniteBracket { value: f64 },

    #[error("root is not bracketed: f({left}) = {left_residual}, f({right}) = {right_residual}")]
    NoBracket {
        left: f64,
        right: f64,
        left_residual: f64,
        right_residual: f64,
    },

    #[error("bad solver config: {reason}")]
    InvalidConfig { reason: &'static str },

    #[error("residual is {residual} at x = {x}")]
    NonFiniteResidual { x: f64, residual: f64 },
}
