//! Per-engine performance solver.

use jetsim_core::constraint::UnitInterval;
use jetsim_thermo::{GasState, ThermoError, ambient::AmbientConditions};
use uom::si::{
    f64::{Area, Force, MassRate, Pressure, ThermodynamicTemperature, Time, Velocity},
    force::newton,
    mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    time::second,
    velocity::meter_per_second,
};

use crate::{
    cycle::{Cycle, CycleConditions, CycleError, CycleModel, CycleOutput},
    inlet::InletAggregate,
};

/// Status reported while the cycle runs normally.
pub const NOMINAL: &str = "Nominal";

/// Results of the last [`EngineSolver::calculate_performance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Performance {
    pub thrust: Force,
    pub isp: Time,
    pub fuel_flow: MassRate,
    pub engine_temperature: ThermodynamicTemperature,
}

impl Performance {
    fn idle(engine_temperature: f64) -> Self {
        Self {
            thrust: Force::new::<newton>(0.0),
            isp: Time::new::<second>(0.0),
            fuel_flow: MassRate::new::<kilogram_per_second>(0.0),
            engine_temperature: ThermodynamicTemperature::new::<kelvin>(engine_temperature),
        }
    }
}

/// Turns flight conditions into thrust for one engine.
///
/// Each tick the owner calls, in order,
/// [`set_freestream_and_inlet`](Self::set_freestream_and_inlet),
/// [`set_engine_state`](Self::set_engine_state) and
/// [`calculate_performance`](Self::calculate_performance), then reads the
/// results. A cycle that cannot run leaves the solver not running with a
/// zeroed output and the reason in [`status`](Self::status).
#[derive(Debug, Clone)]
pub struct EngineSolver<C = Cycle> {
    cycle: C,
    ambient: Result<GasState, ThermoError>,
    inlet: Option<GasState>,
    ambient_temperature: f64,
    oxygen: bool,
    speed: f64,
    mach: f64,
    dynamic_pressure: f64,
    running: bool,
    propellant_fraction: f64,
    throttle: f64,
    performance: Performance,
    status: String,
}

impl<C: CycleModel> EngineSolver<C> {
    #[must_use]
    pub fn new(cycle: C) -> Self {
        Self {
            cycle,
            ambient: Err(ThermoError::NonPhysical {
                pressure: 0.0,
                temperature: 0.0,
            }),
            inlet: None,
            ambient_temperature: 0.0,
            oxygen: false,
            speed: 0.0,
            mach: 0.0,
            dynamic_pressure: 0.0,
            running: false,
            propellant_fraction: 0.0,
            throttle: 0.0,
            performance: Performance::idle(0.0),
            status: NOMINAL.to_string(),
        }
    }

    #[must_use]
    pub fn cycle(&self) -> &C {
        &self.cycle
    }

    pub fn cycle_mut(&mut self) -> &mut C {
        &mut self.cycle
    }

    /// Stores the freestream and engine-face conditions for this tick.
    ///
    /// Derives the freestream Mach number from the static ambient speed of
    /// sound and the dynamic pressure `½·ρ·V²`. Outside a physical atmosphere
    /// both are zero and there is no engine-face state.
    pub fn set_freestream_and_inlet(
        &mut self,
        ambient: &AmbientConditions,
        speed: Velocity,
        aggregate: &InletAggregate,
    ) {
        let v = speed.get::<meter_per_second>();
        self.speed = v;
        self.oxygen = ambient.oxygen;
        self.ambient_temperature = ambient.temperature.get::<kelvin>();
        self.ambient = ambient.gas_state();

        match &self.ambient {
            Ok(gas) => {
                let sound = gas.speed_of_sound(0.0).get::<meter_per_second>();
                let rho = gas.density().get::<kilogram_per_cubic_meter>();
                self.mach = v.abs() / sound;
                self.dynamic_pressure = 0.5 * rho * v * v;
                self.inlet = Some(aggregate.inlet_state(gas, speed));
            }
            Err(_) => {
                self.mach = 0.0;
                self.dynamic_pressure = 0.0;
                self.inlet = None;
            }
        }
    }

    /// Latches whether the engine is lit and how much of the requested
    /// propellant was supplied, in `[0, 1]`.
    pub fn set_engine_state(&mut self, running: bool, propellant_fraction: f64) {
        self.running = running;
        self.propellant_fraction = UnitInterval::clamped(propellant_fraction).into_inner();
    }

    /// Evaluates the cycle for this tick.
    ///
    /// Fuel flow is scaled by `flow_mult`, specific impulse by `isp_mult`
    /// and thrust by both. When the engine is not running every output is
    /// zero. An infeasible cycle stops the engine and records the reason.
    pub fn calculate_performance(
        &mut self,
        area_ratio: f64,
        throttle: f64,
        flow_mult: f64,
        isp_mult: f64,
    ) {
        self.throttle = UnitInterval::clamped(throttle).into_inner();

        if !self.running {
            self.performance = Performance::idle(self.fallback_temperature());
            return;
        }

        match self.run_cycle(area_ratio) {
            Ok(out) => {
                self.status = NOMINAL.to_string();
                self.performance = Performance {
                    thrust: out.thrust * (flow_mult * isp_mult),
                    isp: out.isp * isp_mult,
                    fuel_flow: out.fuel_flow * flow_mult,
                    engine_temperature: out.engine_temperature,
                };
            }
            Err(err) => {
                self.running = false;
                self.status = err.to_string();
                self.performance = Performance::idle(self.fallback_temperature());
            }
        }
    }

    fn run_cycle(&self, area_ratio: f64) -> Result<CycleOutput, CycleError> {
        if !self.oxygen {
            return Err(CycleError::NoOxygen);
        }
        if self.propellant_fraction <= 0.0 {
            return Err(CycleError::NoPropellant);
        }
        if area_ratio.is_nan() || area_ratio <= 0.0 {
            return Err(CycleError::NoIntakeAir);
        }
        let ambient = self.ambient.clone()?;
        let inlet = self.inlet.ok_or(CycleError::NoIntakeAir)?;

        self.cycle.compute(&CycleConditions {
            ambient,
            inlet,
            speed: Velocity::new::<meter_per_second>(self.speed),
            area_ratio: area_ratio.min(1.0),
            throttle: self.throttle,
        })
    }

    fn fallback_temperature(&self) -> f64 {
        self.inlet
            .map_or(self.ambient_temperature, |inlet| inlet.temperature().get::<kelvin>())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn performance(&self) -> &Performance {
        &self.performance
    }

    #[must_use]
    pub fn thrust(&self) -> Force {
        self.performance.thrust
    }

    #[must_use]
    pub fn isp(&self) -> Time {
        self.performance.isp
    }

    #[must_use]
    pub fn fuel_flow(&self) -> MassRate {
        self.performance.fuel_flow
    }

    #[must_use]
    pub fn engine_temperature(&self) -> ThermodynamicTemperature {
        self.performance.engine_temperature
    }

    /// Human-readable state of the cycle; the flameout reason after a failure.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    /// Rotor speed fraction at the current throttle.
    #[must_use]
    pub fn spool(&self) -> f64 {
        self.cycle.spool(self.throttle)
    }

    #[must_use]
    pub fn mach(&self) -> f64 {
        self.mach
    }

    #[must_use]
    pub fn dynamic_pressure(&self) -> Pressure {
        Pressure::new::<pascal>(self.dynamic_pressure)
    }

    /// Intake area the cycle requires.
    #[must_use]
    pub fn area(&self) -> Area {
        self.cycle.area()
    }
}
