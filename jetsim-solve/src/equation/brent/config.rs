/// Configuration for Brent's method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Iteration cap; the best estimate is returned once it is reached.
    pub max_iters: usize,
    /// Bracket width at which the root is considered found.
    ///
    /// Also used as the minimum step size that keeps interpolation steps
    /// from stalling.
    pub x_abs_tol: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 100,
            x_abs_tol: 1e-9,
        }
    }
}

impl Config {
    /// Creates a config with the given tolerance and iteration cap.
    #[must_use]
    pub fn new(x_abs_tol: f64, max_iters: usize) -> Self {
        Self {
            max_iters,
            x_abs_tol,
        }
    }

    /// Validates that the tolerance is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is negative or non-finite.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.x_abs_tol.is_finite() || self.x_abs_tol < 0.0 {
            return Err("x_abs_tol must be finite and non-negative");
        }
        Ok(())
    }
}
