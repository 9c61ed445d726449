//! Ambient conditions around a vehicle.
//!
//! An [`Atmosphere`] answers "what is the air like at this altitude"; the
//! answer is an [`AmbientConditions`] value that converts into a static
//! [`GasState`].

use uom::si::{
    f64::{Length, Pressure, ThermodynamicTemperature},
    length::meter,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::{GasState, ThermoError};

/// Standard gravitational acceleration, m/s².
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Specific gas constant of dry air used by the standard atmosphere, J/kg·K.
const R_AIR: f64 = 287.0531;

/// Static conditions of the surrounding atmosphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientConditions {
    pub pressure: Pressure,
    pub temperature: ThermodynamicTemperature,
    /// Whether the atmosphere can support combustion.
    pub oxygen: bool,
}

impl AmbientConditions {
    #[must_use]
    pub fn new(pressure: Pressure, temperature: ThermodynamicTemperature, oxygen: bool) -> Self {
        Self {
            pressure,
            temperature,
            oxygen,
        }
    }

    /// Static gas state of the ambient air.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::NonPhysical`] in vacuum or for invalid inputs.
    pub fn gas_state(&self) -> Result<GasState, ThermoError> {
        GasState::new(self.pressure, self.temperature)
    }
}

/// Provides ambient conditions as a function of altitude.
pub trait Atmosphere {
    fn conditions(&self, altitude: Length) -> AmbientConditions;
}

#[derive(Debug, Clone, Copy)]
struct Layer {
    base_altitude: f64,
    base_temperature: f64,
    base_pressure: f64,
    lapse_rate: f64,
}

static ICAO_LAYERS: [Layer; 7] = [
    Layer {
        base_altitude: 0.0,
        base_temperature: 288.15,
        base_pressure: 101_325.0,
        lapse_rate: -0.0065,
    },
    Layer {
        base_altitude: 11_000.0,
        base_temperature: 216.65,
        base_pressure: 22_632.1,
        lapse_rate: 0.0,
    },
    Layer {
        base_altitude: 20_000.0,
        base_temperature: 216.65,
        base_pressure: 5_474.89,
        lapse_rate: 0.001,
    },
    Layer {
        base_altitude: 32_000.0,
        base_temperature: 228.65,
        base_pressure: 868.02,
        lapse_rate: 0.0028,
    },
    Layer {
        base_altitude: 47_000.0,
        base_temperature: 270.65,
        base_pressure: 110.91,
        lapse_rate: 0.0,
    },
    Layer {
        base_altitude: 51_000.0,
        base_temperature: 270.65,
        base_pressure: 66.94,
        lapse_rate: -0.0028,
    },
    Layer {
        base_altitude: 71_000.0,
        base_temperature: 214.65,
        base_pressure: 3.96,
        lapse_rate: -0.002,
    },
];

/// ICAO standard atmosphere up to 84 km.
///
/// Altitudes below sea level are treated as sea level. Above the top layer
/// the atmosphere ends and conditions are vacuum.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StandardAtmosphere;

impl StandardAtmosphere {
    /// Altitude where the modeled atmosphere ends, in m.
    pub const CEILING: f64 = 84_000.0;
}

impl Atmosphere for StandardAtmosphere {
    fn conditions(&self, altitude: Length) -> AmbientConditions {
        let h = altitude.get::<meter>().max(0.0);
        if h > Self::CEILING {
            return Vacuum.conditions(altitude);
        }

        let layer = ICAO_LAYERS
            .iter()
            .rev()
            .find(|layer| h >= layer.base_altitude)
            .unwrap_or(&ICAO_LAYERS[0]);

        let dh = h - layer.base_altitude;
        let temperature = layer.base_temperature + layer.lapse_rate * dh;
        let pressure = if layer.lapse_rate == 0.0 {
            layer.base_pressure
                * (-STANDARD_GRAVITY * dh / (R_AIR * layer.base_temperature)).exp()
        } else {
            let ratio = temperature / layer.base_temperature;
            layer.base_pressure * ratio.powf(-STANDARD_GRAVITY / (layer.lapse_rate * R_AIR))
        };

        AmbientConditions::new(
            Pressure::new::<pascal>(pressure),
            ThermodynamicTemperature::new::<kelvin>(temperature),
            true,
        )
    }
}

/// Empty space: no pressure and no oxygen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vacuum;

impl Vacuum {
    /// Background temperature reported in vacuum, in K.
    pub const TEMPERATURE: f64 = 4.0;
}

impl Atmosphere for Vacuum {
    fn conditions(&self, _altitude: Length) -> AmbientConditions {
        AmbientConditions::new(
            Pressure::new::<pascal>(0.0),
            ThermodynamicTemperature::new::<kelvin>(Self::TEMPERATURE),
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn at(meters: f64) -> AmbientConditions {
        StandardAtmosphere.conditions(Length::new::<meter>(meters))
    }

    #[test]
    fn sea_level() {
        let sl = at(0.0);

        assert_relative_eq!(sl.pressure.get::<pascal>(), 101_325.0);
        assert_relative_eq!(sl.temperature.get::<kelvin>(), 288.15);
        assert!(sl.oxygen);
        assert!(sl.gas_state().is_ok());
    }

    #[test]
    fn layers_are_continuous() {
        for boundary in [11_000.0, 20_000.0, 32_000.0, 47_000.0] {
            let below = at(boundary - 1e-6);
            let above = at(boundary);
            assert_relative_eq!(
                below.pressure.get::<pascal>(),
                above.pressure.get::<pascal>(),
                max_relative = 1e-3
            );
            assert_relative_eq!(
                below.temperature.get::<kelvin>(),
                above.temperature.get::<kelvin>(),
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn tropopause_temperature() {
        assert_relative_eq!(at(15_000.0).temperature.get::<kelvin>(), 216.65);
    }

    #[test]
    fn above_ceiling_is_vacuum() {
        let space = at(100_000.0);

        assert!(!space.oxygen);
        assert_eq!(space.pressure.get::<pascal>(), 0.0);
        assert!(space.gas_state().is_err());
    }
}
