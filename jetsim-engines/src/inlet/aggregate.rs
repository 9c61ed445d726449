use jetsim_thermo::GasState;
use uom::si::{
    area::square_meter,
    f64::{Area, Velocity},
};

use super::Inlet;

/// Inlet conditions shared by every engine on a vehicle for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InletAggregate {
    inlet_area: f64,
    engine_area: f64,
    area_ratio: f64,
    tpr: f64,
}

impl Default for InletAggregate {
    /// Unrestricted intake with full recovery.
    fn default() -> Self {
        Self {
            inlet_area: 0.0,
            engine_area: 0.0,
            area_ratio: 1.0,
            tpr: 1.0,
        }
    }
}

impl InletAggregate {
    /// Combines the active inlets against the intake area the engines require.
    ///
    /// The area ratio is `min(1, inlet / engine)`, or 1 when no engine needs
    /// air. The effective recovery is the area-weighted average of the active
    /// inlets' overall recovery, scaled by the area ratio.
    pub fn compute<'a>(
        inlets: impl IntoIterator<Item = &'a Inlet>,
        engine_areas: impl IntoIterator<Item = Area>,
    ) -> Self {
        let (inlet_area, weighted_tpr) = inlets
            .into_iter()
            .filter(|inlet| inlet.is_active())
            .fold((0.0, 0.0), |(area, tpr), inlet| {
                let a = inlet.area().get::<square_meter>();
                (area + a, tpr + a * inlet.overall_tpr())
            });

        let engine_area: f64 = engine_areas
            .into_iter()
            .map(|area| area.get::<square_meter>())
            .sum();

        let average_tpr = if inlet_area > 0.0 {
            weighted_tpr / inlet_area
        } else {
            0.0
        };

        let area_ratio = if engine_area > 0.0 {
            (inlet_area / engine_area).min(1.0)
        } else {
            1.0
        };

        Self {
            inlet_area,
            engine_area,
            area_ratio,
            tpr: average_tpr * area_ratio,
        }
    }

    #[must_use]
    pub fn inlet_area(&self) -> Area {
        Area::new::<square_meter>(self.inlet_area)
    }

    #[must_use]
    pub fn engine_area(&self) -> Area {
        Area::new::<square_meter>(self.engine_area)
    }

    /// Fraction of the required intake area that is available, in `[0, 1]`.
    #[must_use]
    pub fn area_ratio(&self) -> f64 {
        self.area_ratio
    }

    /// Effective total pressure recovery.
    #[must_use]
    pub fn tpr(&self) -> f64 {
        self.tpr
    }

    /// Total conditions delivered to the engine face.
    ///
    /// Brings the static ambient state to stagnation at `speed`, then applies
    /// the effective recovery to the pressure.
    #[must_use]
    pub fn inlet_state(&self, ambient: &GasState, speed: Velocity) -> GasState {
        ambient.change_reference_frame(speed).scale_pressure(self.tpr)
    }
}
