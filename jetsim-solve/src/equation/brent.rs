mod config;
mod error;
mod solution;

pub use config::Config;
pub use error::Error;
pub use solution::{Solution, Status};

use tracing::debug;

use crate::equation::Observer;

/// Control actions supported by Brent's method.
pub enum Action {
    /// Stop the solver early and report the best estimate so far.
    StopEarly,
}

/// Kind of step taken to produce a trial point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    InverseQuadratic,
    Secant,
    Bisection,
}

/// Iteration event emitted by Brent's method.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    /// Iteration counter (1-based).
    pub iter: usize,
    /// Bracket `[a, b]` before the trial point is applied.
    ///
    /// `b` is the current best estimate, so the pair is not sorted.
    pub bracket: [f64; 2],
    /// Trial point evaluated this iteration.
    pub x: f64,
    /// Residual at the trial point.
    pub residual: f64,
    /// How the trial point was chosen.
    pub step: Step,
}

/// Finds a root of `f` inside `bracket` using Brent's method.
///
/// Combines inverse quadratic interpolation, the secant rule and bisection,
/// falling back to bisection whenever an interpolated step would not shrink
/// the bracket fast enough. An endpoint with an exactly zero residual is
/// returned immediately as the root.
///
/// # Errors
///
/// Returns an error if the config is invalid, the bracket is non-finite,
/// the residuals at the endpoints share a sign, or `f` returns a non-finite
/// value.
pub fn solve<F, Obs>(
    mut f: F,
    bracket: [f64; 2],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    F: FnMut(f64) -> f64,
    Obs: Observer<Event, Action>,
{
    config
        .validate()
        .map_err(|reason| Error::InvalidConfig { reason })?;

    let [mut a, mut b] = bracket;
    for value in [a, b] {
        if !value.is_finite() {
            return Err(Error::NonFiniteBracket { value });
        }
    }

    let mut fa = checked(&mut f, a)?;
    if fa == 0.0 {
        return Ok(Solution::new(Status::Converged, a, fa, 0));
    }
    let mut fb = checked(&mut f, b)?;
    if fb == 0.0 {
        return Ok(Solution::new(Status::Converged, b, fb, 0));
    }

    if fa.signum() == fb.signum() {
        return Err(Error::NoBracket {
            left: a,
            right: b,
            left_residual: fa,
            right_residual: fb,
        });
    }

    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let delta = config.x_abs_tol;
    let mut c = a;
    let mut fc = fa;
    let mut d = a;
    let mut bisected = true;

    for iter in 1..=config.max_iters {
        if fb == 0.0 || (b - a).abs() <= config.x_abs_tol {
            return Ok(Solution::new(Status::Converged, b, fb, iter - 1));
        }

        let (mut s, mut step) = if fa != fc && fb != fc {
            let s = a * fb * fc / ((fa - fb) * (fa - fc))
                + b * fa * fc / ((fb - fa) * (fb - fc))
                + c * fa * fb / ((fc - fa) * (fc - fb));
            (s, Step::InverseQuadratic)
        } else {
            (b - fb * (b - a) / (fb - fa), Step::Secant)
        };

        let quarter = (3.0 * a + b) / 4.0;
        let outside = !(s > quarter.min(b) && s < quarter.max(b));
        let slow = if bisected {
            (s - b).abs() >= (b - c).abs() / 2.0 || (b - c).abs() < delta
        } else {
            (s - b).abs() >= (c - d).abs() / 2.0 || (c - d).abs() < delta
        };

        if outside || slow || !s.is_finite() {
            s = 0.5 * (a + b);
            step = Step::Bisection;
            bisected = true;
        } else {
            bisected = false;
        }

        let fs = checked(&mut f, s)?;

        let event = Event {
            iter,
            bracket: [a, b],
            x: s,
            residual: fs,
            step,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            let (x, residual) = if fs.abs() < fb.abs() { (s, fs) } else { (b, fb) };
            return Ok(Solution::new(Status::StoppedByObserver, x, residual, iter));
        }

        d = c;
        c = b;
        fc = fb;

        if (fa < 0.0 && fs > 0.0) || (fa > 0.0 && fs < 0.0) {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
    }

    if fb == 0.0 || (b - a).abs() <= config.x_abs_tol {
        return Ok(Solution::new(Status::Converged, b, fb, config.max_iters));
    }

    Ok(Solution::new(Status::MaxIters, b, fb, config.max_iters))
}

/// Runs Brent's method without observation.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved<F>(f: F, bracket: [f64; 2], config: &Config) -> Result<Solution, Error>
where
    F: FnMut(f64) -> f64,
{
    solve(f, bracket, config, ())
}

/// Best-effort root of `f` on `[a, b]`.
///
/// Returns the best estimate even when the iteration cap is hit, and `0.0`
/// when the solve cannot start (for example when `f(a)` and `f(b)` share a
/// sign). An endpoint whose residual is exactly zero is a root, not a
/// failure, and is returned as is. Callers must check the result for
/// physical plausibility.
pub fn brents_method<F>(f: F, a: f64, b: f64, epsilon: f64, max_iters: usize) -> f64
where
    F: FnMut(f64) -> f64,
{
    match solve_unobserved(f, [a, b], &Config::new(epsilon, max_iters)) {
        Ok(solution) => {
            if !solution.is_converged() {
                debug!(
                    x = solution.x,
                    residual = solution.residual,
                    iters = solution.iters,
                    "brent's method hit the iteration cap"
                );
            }
            solution.x
        }
        Err(error) => {
            debug!(%error, "brent's method failed");
            0.0
        }
    }
}

fn checked<F: FnMut(f64) -> f64>(f: &mut F, x: f64) -> Result<f64, Error> {
    let residual = f(x);
    if residual.is_finite() {
        Ok(residual)
    } else {
        Err(Error::NonFiniteResidual { x, residual })
    }
}
