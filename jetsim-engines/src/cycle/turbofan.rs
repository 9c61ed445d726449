use jetsim_solve::equation::brent::{self, Config};
use jetsim_thermo::{
    GasState,
    ambient::{Atmosphere, StandardAtmosphere},
    units::HeatOfCombustion,
};
use serde::{Deserialize, Serialize};
use uom::si::{
    area::square_meter,
    available_energy::joule_per_kilogram,
    f64::{Area, Force, Length, ThermodynamicTemperature, Velocity},
    force::newton,
    length::meter,
    mass_rate::kilogram_per_second,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

use super::{CycleConditions, CycleError, CycleModel, CycleOutput, Nozzle, part_speed_ratio, spool};
use crate::fitting::{FitError, FittableEngine};

/// Bracket for the turbine temperature ratio.
const TURBINE_RATIO_BRACKET: [f64; 2] = [0.05, 1.0];

/// Bracket for the fitted face area, in m².
const AREA_BRACKET: [f64; 2] = [1e-6, 1e3];

/// Design parameters of a mixed-exhaust turbofan.
///
/// All values are SI. A bypass ratio of zero describes a turbojet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbofanParams {
    /// Engine face area, m².
    pub area: f64,
    /// Axial Mach number at the engine face.
    pub face_mach: f64,
    /// Spool speed fraction at zero throttle.
    pub idle_spool: f64,
    pub fan_pressure_ratio: f64,
    pub compressor_pressure_ratio: f64,
    pub bypass_ratio: f64,
    pub fan_efficiency: f64,
    pub compressor_efficiency: f64,
    pub turbine_efficiency: f64,
    pub nozzle_efficiency: f64,
    /// Shaft transmission efficiency between turbine and compressors.
    pub mechanical_efficiency: f64,
    /// Turbine inlet temperature at full spool, K.
    pub turbine_inlet_temperature: f64,
    /// Fuel heating value, J/kg.
    pub heat_of_fuel: f64,
    /// Fuel-air ratio limit of the burner.
    pub max_far: f64,
}

impl Default for TurbofanParams {
    /// A small low-bypass military turbofan.
    fn default() -> Self {
        Self {
            area: 0.5,
            face_mach: 0.5,
            idle_spool: 0.3,
            fan_pressure_ratio: 2.0,
            compressor_pressure_ratio: 8.0,
            bypass_ratio: 0.5,
            fan_efficiency: 0.88,
            compressor_efficiency: 0.85,
            turbine_efficiency: 0.9,
            nozzle_efficiency: 0.95,
            mechanical_efficiency: 0.99,
            turbine_inlet_temperature: 1500.0,
            heat_of_fuel: 43e6,
            max_far: 0.068,
        }
    }
}

/// A two-spool-equivalent turbofan with a single mixed nozzle.
#[derive(Debug, Clone, PartialEq)]
pub struct Turbofan {
    params: TurbofanParams,
    area: f64,
    static_thrust: Option<f64>,
}

impl Turbofan {
    #[must_use]
    pub fn new(params: TurbofanParams) -> Self {
        let area = params.area;
        Self {
            params,
            area,
            static_thrust: None,
        }
    }

    /// Sets the sea-level static thrust the face area is fitted to.
    #[must_use]
    pub fn with_static_thrust(self, thrust: Force) -> Self {
        Self {
            static_thrust: Some(thrust.get::<newton>()),
            ..self
        }
    }

    #[must_use]
    pub fn params(&self) -> &TurbofanParams {
        &self.params
    }

    fn nozzle(&self) -> Nozzle {
        Nozzle::new(self.params.nozzle_efficiency)
    }

    fn with_area(&self, area: f64) -> Self {
        Self {
            area,
            ..self.clone()
        }
    }
}

impl CycleModel for Turbofan {
    fn area(&self) -> Area {
        Area::new::<square_meter>(self.area)
    }

    fn compute(&self, conditions: &CycleConditions) -> Result<CycleOutput, CycleError> {
        let p = &self.params;
        let CycleConditions {
            ambient,
            inlet,
            speed,
            area_ratio,
            throttle,
        } = *conditions;

        let air_flow = inlet
            .mass_flow(self.area(), p.face_mach)
            .get::<kilogram_per_second>()
            * area_ratio;
        if air_flow.is_nan() || air_flow <= 0.0 {
            return Err(CycleError::NoIntakeAir);
        }

        let spool = spool(p.idle_spool, throttle);
        let fan_ratio = part_speed_ratio(p.fan_pressure_ratio, spool);
        let compressor_ratio = part_speed_ratio(p.compressor_pressure_ratio, spool);

        let fan = inlet
            .with_mass_ratio(1.0 + p.bypass_ratio)
            .adiabatic_with_pressure_ratio(fan_ratio, p.fan_efficiency);
        let core = fan.outlet.with_mass_ratio(1.0);
        let bypass = fan.outlet.with_mass_ratio(p.bypass_ratio);

        let compressor = core.adiabatic_with_pressure_ratio(compressor_ratio, p.compressor_efficiency);
        let burner = compressor.outlet.add_fuel_to_temperature(
            ThermodynamicTemperature::new::<kelvin>(p.turbine_inlet_temperature),
            HeatOfCombustion::new::<joule_per_kilogram>(p.heat_of_fuel),
            spool,
            p.max_far,
        );

        let required = -(fan.work + compressor.work).get::<joule_per_kilogram>()
            / p.mechanical_efficiency;
        let expansion = 1.0 / p.turbine_efficiency;
        let turbine_ratio = brent::solve_unobserved(
            |ratio| {
                burner
                    .adiabatic_with_temperature_ratio(ratio, expansion)
                    .work
                    .get::<joule_per_kilogram>()
                    - required
            },
            TURBINE_RATIO_BRACKET,
            &Config::new(1e-10, 100),
        )
        .map_err(CycleError::TurbineStall)?
        .x;
        let turbine = burner.adiabatic_with_temperature_ratio(turbine_ratio, expansion).outlet;

        let exhaust = if p.bypass_ratio > 0.0 {
            GasState::mix(&[turbine, bypass])?
        } else {
            turbine
        };

        let p0 = ambient.pressure();
        let flow = self.nozzle().expand(&exhaust, p0)?;

        let core_air = air_flow / (1.0 + p.bypass_ratio);
        let exit_flow = core_air * exhaust.mass_ratio();
        let thrust = flow.net_thrust(
            exit_flow,
            air_flow,
            speed.get::<meter_per_second>(),
            p0.get::<pascal>(),
        );
        let fuel_flow = core_air * (burner.far() - core.far()).max(0.0);

        CycleOutput::new(
            thrust,
            fuel_flow,
            air_flow,
            compressor.outlet.temperature().get::<kelvin>(),
        )
    }

    fn spool(&self, throttle: f64) -> f64 {
        spool(self.params.idle_spool, throttle)
    }
}

/// Values the turbofan's area fit depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbofanFitInputs {
    pub params: TurbofanParams,
    /// Target sea-level static thrust, N.
    pub static_thrust: Option<f64>,
}

/// Fitted turbofan values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurbofanFitResults {
    /// Face area, m².
    pub area: f64,
}

impl FittableEngine for Turbofan {
    type Inputs = TurbofanFitInputs;
    type Results = TurbofanFitResults;

    const CHECKSUM: u64 = 0x7462_6661_6e01;

    fn fit_inputs(&self) -> TurbofanFitInputs {
        TurbofanFitInputs {
            params: self.params.clone(),
            static_thrust: self.static_thrust,
        }
    }

    /// Sizes the face area so full-throttle sea-level static thrust hits the target.
    fn fit(&self) -> Result<TurbofanFitResults, FitError> {
        let target = self.static_thrust.ok_or(FitError::MissingTarget)?;

        let sea_level = StandardAtmosphere.conditions(Length::new::<meter>(0.0));
        let ambient = sea_level
            .gas_state()
            .map_err(|err| FitError::Cycle(err.into()))?;
        let conditions = CycleConditions {
            ambient,
            inlet: ambient,
            speed: Velocity::new::<meter_per_second>(0.0),
            area_ratio: 1.0,
            throttle: 1.0,
        };

        // Surface cycle errors before the search turns them into NaN residuals.
        self.compute(&conditions)?;

        let solution = brent::solve_unobserved(
            |area| {
                self.with_area(area)
                    .compute(&conditions)
                    .map_or(f64::NAN, |out| out.thrust.get::<newton>() - target)
            },
            AREA_BRACKET,
            &Config::default(),
        )?;

        Ok(TurbofanFitResults { area: solution.x })
    }

    fn apply_fit_results(&mut self, results: TurbofanFitResults) {
        self.area = results.area;
    }
}
