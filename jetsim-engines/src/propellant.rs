//! Propellant supply seen by an engine.

use uom::si::{f64::Mass, mass::kilogram};

/// Supplies propellant to an engine each tick.
pub trait PropellantSource {
    /// Requests `mass` of propellant and returns the fraction supplied, in `[0, 1]`.
    fn request(&mut self, mass: Mass) -> f64;

    /// Whether any propellant is left.
    fn has_propellant(&self) -> bool;
}

/// A finite tank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tank {
    remaining: f64,
}

impl Tank {
    #[must_use]
    pub fn new(contents: Mass) -> Self {
        Self {
            remaining: contents.get::<kilogram>().max(0.0),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> Mass {
        Mass::new::<kilogram>(self.remaining)
    }
}

impl PropellantSource for Tank {
    fn request(&mut self, mass: Mass) -> f64 {
        let wanted = mass.get::<kilogram>();
        if wanted <= 0.0 {
            return if self.remaining > 0.0 { 1.0 } else { 0.0 };
        }
        let supplied = wanted.min(self.remaining);
        self.remaining -= supplied;
        supplied / wanted
    }

    fn has_propellant(&self) -> bool {
        self.remaining > 0.0
    }
}

/// A supply that never runs dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unlimited;

impl PropellantSource for Unlimited {
    fn request(&mut self, _mass: Mass) -> f64 {
        1.0
    }

    fn has_propellant(&self) -> bool {
        true
    }
}
