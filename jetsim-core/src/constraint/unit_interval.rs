use std::cmp::Ordering;

use super::{Constrained, Constraint, ConstraintError};

/// Numeric types that have a zero and a one to bound the unit interval.
pub trait UnitBounds: PartialOrd + Sized {
    fn zero() -> Self;
    fn one() -> Self;
}

impl UnitBounds for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }
}

impl UnitBounds for f32 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }
}

/// Marker type enforcing that a value lies in the closed unit interval `[0, 1]`.
///
/// Throttle settings, propellant availability and stage efficiencies are all
/// carried as `Constrained<f64, UnitInterval>`.
///
/// ```
/// use jetsim_core::constraint::UnitInterval;
///
/// let throttle = UnitInterval::new(0.75).unwrap();
/// assert_eq!(throttle.into_inner(), 0.75);
///
/// assert!(UnitInterval::new(1.0).is_ok());
/// assert!(UnitInterval::new(1.01).is_err());
/// assert_eq!(UnitInterval::clamped(-3.0).into_inner(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitInterval;

impl UnitInterval {
    /// Constructs `Constrained<T, UnitInterval>` if `0 ≤ value ≤ 1`.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::BelowMinimum`] if less than zero.
    /// - [`ConstraintError::AboveMaximum`] if greater than one.
    /// - [`ConstraintError::NotANumber`] if the comparison is undefined.
    pub fn new<T: UnitBounds>(value: T) -> Result<Constrained<T, UnitInterval>, ConstraintError> {
        Constrained::<T, UnitInterval>::new(value)
    }

    /// Clamps the value into `[0, 1]`, mapping NaN to zero.
    #[must_use]
    pub fn clamped<T: UnitBounds>(value: T) -> Constrained<T, UnitInterval> {
        match Self::check(&value) {
            Ok(()) => Constrained::trusted(value),
            Err(ConstraintError::AboveMaximum) => Constrained::trusted(T::one()),
            Err(_) => Constrained::trusted(T::zero()),
        }
    }
}

impl<T: UnitBounds> Constraint<T> for UnitInterval {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match (value.partial_cmp(&T::zero()), value.partial_cmp(&T::one())) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_included() {
        assert_eq!(UnitInterval::new(0.0).unwrap().into_inner(), 0.0);
        assert_eq!(UnitInterval::new(1.0).unwrap().into_inner(), 1.0);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(UnitInterval::new(-0.5), Err(ConstraintError::BelowMinimum));
        assert_eq!(UnitInterval::new(1.5), Err(ConstraintError::AboveMaximum));
        assert_eq!(UnitInterval::new(f64::NAN), Err(ConstraintError::NotANumber));
    }

    #[test]
    fn clamped_saturates() {
        assert_eq!(UnitInterval::clamped(2.0).into_inner(), 1.0);
        assert_eq!(UnitInterval::clamped(-2.0).into_inner(), 0.0);
        assert_eq!(UnitInterval::clamped(f64::NAN).into_inner(), 0.0);
        assert_eq!(UnitInterval::clamped(0.4).into_inner(), 0.4);
    }
}
