//! Bounded numeric values.
//!
//! Engine inputs such as throttle settings, propellant fractions and stage
//! efficiencies only make sense inside known bounds. Wrapping them in
//! [`Constrained<T, C>`] checks the bound once, when the value is built.
//!
//! | Marker | Accepts |
//! |---|---|
//! | [`NonNegative`] | `x ≥ 0` |
//! | [`StrictlyPositive`] | `x > 0` |
//! | [`UnitInterval`] | `0 ≤ x ≤ 1` |
//!
//! NaN is rejected by every marker.

mod non_negative;
mod strictly_positive;
mod unit_interval;

use std::marker::PhantomData;

use thiserror::Error;

pub use non_negative::NonNegative;
pub use strictly_positive::StrictlyPositive;
pub use unit_interval::{UnitBounds, UnitInterval};

/// A bound that values of type `T` can be checked against.
pub trait Constraint<T> {
    /// # Errors
    ///
    /// Returns the [`ConstraintError`] describing how `value` is out of bounds.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// How a value falls outside its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("is NaN")]
    NotANumber,

    #[error("is negative")]
    Negative,

    #[error("is zero")]
    Zero,

    #[error("is below the lower bound")]
    BelowMinimum,

    #[error("is above the upper bound")]
    AboveMaximum,
}

/// A value of type `T` known to satisfy the bound `C`.
///
/// ```
/// use jetsim_core::constraint::{Constrained, StrictlyPositive};
///
/// let area = Constrained::<f64, StrictlyPositive>::new(0.5).unwrap();
/// assert_eq!(area.into_inner(), 0.5);
/// assert!(Constrained::<f64, StrictlyPositive>::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    bound: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if `value` is out of bounds.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value).map(|()| Self::trusted(value))
    }

    /// Skips the check for values the caller has already bounded.
    pub(crate) fn trusted(value: T) -> Self {
        Self {
            value,
            bound: PhantomData,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
