/// Why the iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The residual hit zero or the bracket shrank below `x_abs_tol`.
    Converged,
    /// `max_iters` ran out; `x` is a best effort.
    MaxIters,
    StoppedByObserver,
}

/// Outcome of [`solve`](super::solve).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub status: Status,
    /// Root estimate.
    pub x: f64,
    /// `f(x)`.
    pub residual: f64,
    pub iters: usize,
}

impl Solution {
    pub(super) fn new(status: Status, x: f64, residual: f64, iters: usize) -> Self {
        Self {
            status,
            x,
            residual,
            iters,
        }
    }

    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }
}
