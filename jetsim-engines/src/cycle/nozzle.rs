use jetsim_thermo::GasState;
use uom::si::{
    f64::{MassDensity, Pressure, Velocity},
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

use super::CycleError;

/// A convergent nozzle expanding to ambient pressure, choking when it cannot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nozzle {
    pub efficiency: f64,
}

/// Exit conditions of a nozzle expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NozzleFlow {
    velocity: f64,
    pressure: f64,
    density: f64,
    choked: bool,
}

impl Nozzle {
    #[must_use]
    pub fn new(efficiency: f64) -> Self {
        Self { efficiency }
    }

    /// Expands `total` toward `back_pressure`.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::BackPressure`] if the total pressure does not
    /// exceed the back pressure.
    pub fn expand(&self, total: &GasState, back_pressure: Pressure) -> Result<NozzleFlow, CycleError> {
        let p_total = total.pressure().get::<pascal>();
        let p_back = back_pressure.get::<pascal>();
        let ratio = p_back / p_total;
        if ratio >= 1.0 || !ratio.is_finite() {
            return Err(CycleError::BackPressure {
                ratio: p_total / p_back,
            });
        }

        let p_choked = total.choked_pressure().get::<pascal>();
        let choked = p_back < p_choked;
        let exit_ratio = if choked { p_choked / p_total } else { ratio };

        let exit = total
            .adiabatic_with_pressure_ratio(exit_ratio, 1.0 / self.efficiency)
            .outlet;

        let cp = total.properties().cp;
        let t_in = total.temperature().get::<kelvin>();
        let t_exit = exit.temperature().get::<kelvin>();
        let velocity = (2.0 * cp * (t_in - t_exit)).sqrt();

        Ok(NozzleFlow {
            velocity,
            pressure: exit.pressure().get::<pascal>(),
            density: exit.density().get::<kilogram_per_cubic_meter>(),
            choked,
        })
    }
}

impl NozzleFlow {
    #[must_use]
    pub fn velocity(&self) -> Velocity {
        Velocity::new::<meter_per_second>(self.velocity)
    }

    #[must_use]
    pub fn pressure(&self) -> Pressure {
        Pressure::new::<pascal>(self.pressure)
    }

    #[must_use]
    pub fn density(&self) -> MassDensity {
        MassDensity::new::<kilogram_per_cubic_meter>(self.density)
    }

    #[must_use]
    pub fn is_choked(&self) -> bool {
        self.choked
    }

    /// Net thrust in N.
    ///
    /// `exit_flow` and `air_flow` are in kg/s, `speed` in m/s and
    /// `back_pressure` in Pa. Includes ram drag and the pressure thrust of an
    /// underexpanded exit.
    pub(crate) fn net_thrust(&self, exit_flow: f64, air_flow: f64, speed: f64, back_pressure: f64) -> f64 {
        let exit_area = exit_flow / (self.density * self.velocity);
        exit_flow * self.velocity - air_flow * speed + (self.pressure - back_pressure) * exit_area
    }
}
