//! Inlet pressure recovery and the per-vehicle inlet aggregate.

mod aggregate;
mod recovery;

pub use aggregate::InletAggregate;
pub use recovery::{InterpError, PressureRecovery, RecoveryCurve, fake_cosine, overall_static_tpr};

use nalgebra::Vector3;
use uom::si::{area::square_meter, f64::Area};

/// Speed below which the approach angle is considered undefined, in m/s.
const STANDSTILL_SPEED: f64 = 0.05;

/// Environmental flags that decide whether an inlet can capture air.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InletStatus {
    pub enabled: bool,
    pub in_atmosphere: bool,
    pub shielded: bool,
    pub underwater: bool,
}

impl Default for InletStatus {
    fn default() -> Self {
        Self {
            enabled: true,
            in_atmosphere: true,
            shielded: false,
            underwater: false,
        }
    }
}

/// An air intake mounted on a vehicle.
#[derive(Debug, Clone)]
pub struct Inlet {
    name: String,
    area: f64,
    axis: Vector3<f64>,
    recovery: PressureRecovery,
    disable_underwater: bool,
    pub status: InletStatus,
    cosine: f64,
    overall_tpr: f64,
}

impl Inlet {
    /// Creates an inlet facing along `axis`.
    ///
    /// The axis is normalized; a zero axis leaves the inlet relying on the
    /// low-speed cosine floor alone.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        area: Area,
        axis: Vector3<f64>,
        recovery: PressureRecovery,
        disable_underwater: bool,
    ) -> Self {
        Self {
            name: name.into(),
            area: area.get::<square_meter>(),
            axis: axis.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros),
            recovery,
            disable_underwater,
            status: InletStatus::default(),
            cosine: 1.0,
            overall_tpr: 1.0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn area(&self) -> Area {
        Area::new::<square_meter>(self.area)
    }

    /// Whether the inlet is currently capturing air.
    #[must_use]
    pub fn is_active(&self) -> bool {
        let InletStatus {
            enabled,
            in_atmosphere,
            shielded,
            underwater,
        } = self.status;
        enabled && in_atmosphere && !shielded && !(underwater && self.disable_underwater)
    }

    /// Captured area, zero while inactive.
    #[must_use]
    pub fn usable_area(&self) -> Area {
        if self.is_active() {
            self.area()
        } else {
            Area::new::<square_meter>(0.0)
        }
    }

    /// Approach-angle cosine from the last update.
    #[must_use]
    pub fn cosine(&self) -> f64 {
        self.cosine
    }

    /// Overall pressure recovery from the last update, `cosine²·TPR(M)`.
    #[must_use]
    pub fn overall_tpr(&self) -> f64 {
        self.overall_tpr
    }

    /// Updates the approach cosine and overall recovery for the current flight state.
    ///
    /// `velocity` is the surface-relative velocity in the same frame as the
    /// inlet axis, in m/s. Inactive inlets report zero recovery.
    pub fn update(&mut self, velocity: &Vector3<f64>, mach: f64) {
        if !self.is_active() {
            self.cosine = 1.0;
            self.overall_tpr = 0.0;
            return;
        }

        let speed = velocity.norm();
        if speed < STANDSTILL_SPEED {
            self.cosine = fake_cosine(0.0);
            self.overall_tpr = overall_static_tpr(self.recovery.at(0.0));
            return;
        }

        let cosine = (velocity / speed).dot(&self.axis).max(0.0).max(fake_cosine(speed));
        self.cosine = cosine;
        self.overall_tpr = cosine * cosine * self.recovery.at(mach);
    }
}
