use jetsim_thermo::units::HeatOfCombustion;
use serde::{Deserialize, Serialize};
use uom::si::{
    area::square_meter,
    available_energy::joule_per_kilogram,
    f64::{Area, ThermodynamicTemperature},
    mass_rate::kilogram_per_second,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

use super::{CycleConditions, CycleError, CycleModel, CycleOutput, Nozzle};

/// Design parameters of a ramjet. All values are SI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamjetParams {
    /// Engine face area, m².
    pub area: f64,
    /// Axial Mach number at the engine face.
    pub face_mach: f64,
    /// Burner exit temperature at full throttle, K.
    pub max_temperature: f64,
    /// Fuel heating value, J/kg.
    pub heat_of_fuel: f64,
    /// Fuel-air ratio limit of the burner.
    pub max_far: f64,
    /// Total pressure retained across the burner.
    pub burner_pressure_ratio: f64,
    pub nozzle_efficiency: f64,
}

impl Default for RamjetParams {
    fn default() -> Self {
        Self {
            area: 0.3,
            face_mach: 0.3,
            max_temperature: 2200.0,
            heat_of_fuel: 43e6,
            max_far: 0.068,
            burner_pressure_ratio: 0.95,
            nozzle_efficiency: 0.95,
        }
    }
}

/// A ramjet: ram compression, a burner and a convergent nozzle.
///
/// It cannot run until ram pressure exceeds the ambient back pressure.
#[derive(Debug, Clone, PartialEq)]
pub struct Ramjet {
    params: RamjetParams,
}

impl Ramjet {
    #[must_use]
    pub fn new(params: RamjetParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &RamjetParams {
        &self.params
    }
}

impl CycleModel for Ramjet {
    fn area(&self) -> Area {
        Area::new::<square_meter>(self.params.area)
    }

    fn compute(&self, conditions: &CycleConditions) -> Result<CycleOutput, CycleError> {
        let p = &self.params;
        let inlet = conditions.inlet;

        let air_flow = inlet
            .mass_flow(self.area(), p.face_mach)
            .get::<kilogram_per_second>()
            * conditions.area_ratio;
        if air_flow.is_nan() || air_flow <= 0.0 {
            return Err(CycleError::NoIntakeAir);
        }

        let burner = inlet
            .add_fuel_to_temperature(
                ThermodynamicTemperature::new::<kelvin>(p.max_temperature),
                HeatOfCombustion::new::<joule_per_kilogram>(p.heat_of_fuel),
                conditions.throttle,
                p.max_far,
            )
            .scale_pressure(p.burner_pressure_ratio);

        let p0 = conditions.ambient.pressure();
        let flow = Nozzle::new(p.nozzle_efficiency).expand(&burner, p0)?;

        let thrust = flow.net_thrust(
            air_flow * burner.mass_ratio() / inlet.mass_ratio(),
            air_flow,
            conditions.speed.get::<meter_per_second>(),
            p0.get::<pascal>(),
        );
        let fuel_flow = air_flow * (burner.far() - inlet.far()).max(0.0);

        CycleOutput::new(thrust, fuel_flow, air_flow, inlet.temperature().get::<kelvin>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use jetsim_thermo::GasState;
    use uom::si::{
        f64::{Pressure, Velocity},
        force::newton,
        time::second,
    };

    fn ambient() -> GasState {
        GasState::new(
            Pressure::new::<pascal>(12_044.6),
            ThermodynamicTemperature::new::<kelvin>(216.65),
        )
        .unwrap()
    }

    fn cruise(throttle: f64) -> CycleConditions {
        let ambient = ambient();
        let speed = ambient.speed_of_sound(0.0) * 3.0;
        let tpr = 1.0 - 0.075 * 2.0_f64.powf(1.35);
        CycleConditions {
            ambient,
            inlet: ambient.change_reference_frame(speed).scale_pressure(tpr),
            speed,
            area_ratio: 1.0,
            throttle,
        }
    }

    #[test]
    fn mach_three_cruise() {
        let out = Ramjet::new(RamjetParams::default()).compute(&cruise(1.0)).unwrap();

        assert_relative_eq!(out.thrust.get::<newton>(), 57_970.488, max_relative = 1e-6);
        assert_relative_eq!(
            out.fuel_flow.get::<kilogram_per_second>(),
            3.312_349_3,
            max_relative = 1e-6
        );
        assert_relative_eq!(out.isp.get::<second>(), 1_784.638, max_relative = 1e-6);
        assert_relative_eq!(out.engine_temperature.get::<kelvin>(), 606.62, max_relative = 1e-9);
    }

    #[test]
    fn zero_throttle_burns_nothing() {
        let out = Ramjet::new(RamjetParams::default()).compute(&cruise(0.0)).unwrap();

        assert_eq!(out.fuel_flow.get::<kilogram_per_second>(), 0.0);
        assert_eq!(out.isp.get::<second>(), 0.0);
    }

    #[test]
    fn static_ramjet_cannot_expand() {
        let ambient = ambient();
        let result = Ramjet::new(RamjetParams::default()).compute(&CycleConditions {
            ambient,
            inlet: ambient,
            speed: Velocity::new::<meter_per_second>(0.0),
            area_ratio: 1.0,
            throttle: 1.0,
        });

        assert!(matches!(result, Err(CycleError::BackPressure { .. })));
    }
}
