//! Per-tick engine lifecycle.
//!
//! An [`EngineController`] owns one [`EngineSolver`] and drives it once per
//! physics tick. It handles ignition and shutdown, flameout and relight,
//! propellant draw, the thrust soft cap, overheating, and distributing thrust
//! over the engine's thrust transforms.

mod transform;

pub use transform::{
    ThrustTransform, ThrustTransformSpec, TransformError, TransformLocation, build_thrust_transforms,
};

use jetsim_thermo::ambient::AmbientConditions;
use nalgebra::Vector3;
use tracing::{info, warn};
use uom::si::{
    f64::{Force, Mass, Time, Velocity},
    force::newton,
    mass::kilogram,
    mass_rate::kilogram_per_second,
    thermodynamic_temperature::kelvin,
    time::second,
};

use crate::{
    cycle::{Cycle, CycleModel},
    inlet::InletAggregate,
    propellant::PropellantSource,
    solver::EngineSolver,
};

/// Lowest throttle an ignited engine runs at.
pub const MIN_RUNNING_THROTTLE: f64 = 0.01;

/// Temperature ratio at which the overheat warning is raised.
pub const OVERHEAT_WARNING_RATIO: f64 = 0.8;

/// Share of thrust above the upper limit that still gets through.
const SOFT_CAP_SLOPE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Not ignited.
    Off,
    /// Ignited and burning.
    Running,
    /// Ignited, but combustion failed; relights on its own when it can.
    Flameout,
    /// Melted by overheating. Permanent.
    Destroyed,
}

/// Something the host may want to report.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Flameout { reason: String },
    Relit,
    OverheatWarning,
    Destroyed,
}

/// Lifecycle tuning for one engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    /// Internal temperature at which the engine is destroyed, K.
    pub max_engine_temperature: f64,
    /// A flamed-out engine only relights while colder than this, K.
    pub autoignition_temperature: Option<f64>,
    /// Thrust above which the soft cap applies, N.
    pub thrust_upper_limit: Option<f64>,
    /// Rated thrust used to report the power fraction, N.
    pub max_thrust: f64,
    /// Heat put into the engine at the temperature limit, W.
    pub heat_production: f64,
    /// Scale thrust by the fraction of propellant supplied.
    pub multiply_thrust_by_fuel_fraction: bool,
    pub flow_mult: f64,
    pub isp_mult: f64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            max_engine_temperature: 1200.0,
            autoignition_temperature: None,
            thrust_upper_limit: None,
            max_thrust: 100_000.0,
            heat_production: 0.0,
            multiply_thrust_by_fuel_fraction: true,
            flow_mult: 1.0,
            isp_mult: 1.0,
        }
    }
}

/// Conditions for one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickInput<'a> {
    pub ambient: &'a AmbientConditions,
    /// Vehicle speed relative to the air.
    pub speed: Velocity,
    pub aggregate: &'a InletAggregate,
    /// Commanded throttle in `[0, 1]`.
    pub throttle: f64,
    pub dt: Time,
}

/// Effect levels in `[0, 1]` for exhaust and sound.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineFx {
    pub throttle: f64,
    pub spool: f64,
    pub power: f64,
}

/// What one tick did to the vehicle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickOutput {
    /// Force at each thrust transform, in N, in transform order.
    pub forces: Vec<Vector3<f64>>,
    /// Heat put into the engine this tick, W.
    pub thermal_flux: f64,
    pub fx: EngineFx,
    pub events: Vec<EngineEvent>,
}

/// Drives one engine through its lifecycle.
#[derive(Debug, Clone)]
pub struct EngineController<C = Cycle> {
    name: String,
    solver: EngineSolver<C>,
    settings: ControllerSettings,
    transforms: Vec<ThrustTransform>,
    state: EngineState,
    propellant_fraction: f64,
    engine_temperature: f64,
    final_thrust: f64,
    overheating: bool,
}

impl<C: CycleModel> EngineController<C> {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        cycle: C,
        settings: ControllerSettings,
        transforms: Vec<ThrustTransform>,
    ) -> Self {
        Self {
            name: name.into(),
            solver: EngineSolver::new(cycle),
            settings,
            transforms,
            state: EngineState::Off,
            propellant_fraction: 1.0,
            engine_temperature: 288.15,
            final_thrust: 0.0,
            overheating: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn solver(&self) -> &EngineSolver<C> {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut EngineSolver<C> {
        &mut self.solver
    }

    #[must_use]
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    #[must_use]
    pub fn transforms(&self) -> &[ThrustTransform] {
        &self.transforms
    }

    /// Thrust delivered on the last tick.
    #[must_use]
    pub fn final_thrust(&self) -> Force {
        Force::new::<newton>(self.final_thrust)
    }

    /// Internal temperature over its limit, from the last tick.
    #[must_use]
    pub fn temperature_ratio(&self) -> f64 {
        self.engine_temperature / self.settings.max_engine_temperature
    }

    /// Whether the engine currently needs intake air.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Lights an engine that is off.
    pub fn ignite(&mut self) {
        if self.state == EngineState::Off {
            self.state = EngineState::Running;
            self.propellant_fraction = 1.0;
            info!(engine = %self.name, "ignited");
        }
    }

    /// Shuts down an engine that is not destroyed.
    pub fn shutdown(&mut self) {
        if self.state != EngineState::Destroyed {
            self.state = EngineState::Off;
            info!(engine = %self.name, "shut down");
        }
    }

    /// Advances the engine by one tick.
    pub fn tick(&mut self, input: &TickInput<'_>, propellant: &mut dyn PropellantSource) -> TickOutput {
        let mut out = TickOutput::default();
        self.final_thrust = 0.0;

        if self.state == EngineState::Destroyed {
            return out;
        }

        let relighting = self.state == EngineState::Flameout && self.can_relight(propellant);
        if relighting {
            self.propellant_fraction = 1.0;
        }
        let attempt = self.state == EngineState::Running || relighting;

        let ignited = self.state != EngineState::Off;
        let throttle = if ignited {
            input.throttle.max(MIN_RUNNING_THROTTLE)
        } else {
            0.0
        };

        self.solver
            .set_freestream_and_inlet(input.ambient, input.speed, input.aggregate);
        self.solver.set_engine_state(attempt, self.propellant_fraction);
        self.solver.calculate_performance(
            input.aggregate.area_ratio(),
            throttle,
            self.settings.flow_mult,
            self.settings.isp_mult,
        );

        self.engine_temperature = self.solver.engine_temperature().get::<kelvin>();
        let temperature_ratio = self.temperature_ratio();

        let thrust = self.solver.thrust().get::<newton>();
        if thrust.is_nan() || thrust <= 0.0 {
            if self.state == EngineState::Running && !thrust.is_nan() && throttle > 0.0 {
                let reason = self.solver.status().to_string();
                warn!(engine = %self.name, %reason, "flameout");
                self.state = EngineState::Flameout;
                out.events.push(EngineEvent::Flameout { reason });
            }
        } else {
            let fuel_flow = self.solver.fuel_flow().get::<kilogram_per_second>();
            let mass = Mass::new::<kilogram>(fuel_flow * input.dt.get::<second>());
            self.propellant_fraction = propellant.request(mass);

            let mut produced = thrust;
            if self.settings.multiply_thrust_by_fuel_fraction {
                produced *= self.propellant_fraction;
            }
            if let Some(limit) = self.settings.thrust_upper_limit {
                if produced > limit {
                    produced = limit + (produced - limit) * SOFT_CAP_SLOPE;
                }
            }
            self.final_thrust = produced;

            if self.state == EngineState::Flameout {
                info!(engine = %self.name, "relit");
                self.state = EngineState::Running;
                out.events.push(EngineEvent::Relit);
            }
        }

        if self.final_thrust > 0.0 {
            out.forces = self
                .transforms
                .iter()
                .map(|t| t.force(self.final_thrust))
                .collect();
            out.thermal_flux = self.settings.heat_production * temperature_ratio * temperature_ratio;
        }

        if temperature_ratio > 1.0 {
            warn!(
                engine = %self.name,
                temperature = self.engine_temperature,
                "destroyed by overheating"
            );
            self.state = EngineState::Destroyed;
            out.events.push(EngineEvent::Destroyed);
            return out;
        }

        let overheating = temperature_ratio >= OVERHEAT_WARNING_RATIO;
        if overheating && !self.overheating {
            warn!(engine = %self.name, temperature_ratio, "overheating");
            out.events.push(EngineEvent::OverheatWarning);
        }
        self.overheating = overheating;

        out.fx = self.fx(throttle);
        out
    }

    fn can_relight(&self, propellant: &dyn PropellantSource) -> bool {
        propellant.has_propellant()
            && self
                .settings
                .autoignition_temperature
                .is_none_or(|limit| self.engine_temperature < limit)
    }

    fn fx(&self, throttle: f64) -> EngineFx {
        match self.state {
            EngineState::Running => EngineFx {
                throttle,
                spool: self.solver.spool(),
                power: if self.settings.max_thrust > 0.0 {
                    self.final_thrust / self.settings.max_thrust
                } else {
                    0.0
                },
            },
            EngineState::Flameout => EngineFx {
                throttle,
                ..EngineFx::default()
            },
            EngineState::Off | EngineState::Destroyed => EngineFx::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use jetsim_thermo::ambient::{Atmosphere, StandardAtmosphere, Vacuum};
    use uom::si::{f64::Length, length::meter, velocity::meter_per_second};

    use crate::{
        cycle::{Turbofan, TurbofanParams},
        propellant::{Tank, Unlimited},
    };

    fn controller(settings: ControllerSettings) -> EngineController {
        let transforms = build_thrust_transforms(
            &[TransformLocation {
                name: "thrust".into(),
                axis: Vector3::new(0.0, 0.0, 1.0),
            }],
            &[],
        )
        .unwrap();
        EngineController::new(
            "test engine",
            Cycle::from(Turbofan::new(TurbofanParams::default())),
            settings,
            transforms,
        )
    }

    fn hot_settings() -> ControllerSettings {
        ControllerSettings {
            max_engine_temperature: 2000.0,
            heat_production: 100.0,
            ..ControllerSettings::default()
        }
    }

    fn tick_at(
        engine: &mut EngineController,
        ambient: &AmbientConditions,
        throttle: f64,
        propellant: &mut dyn PropellantSource,
    ) -> TickOutput {
        let aggregate = InletAggregate::default();
        engine.tick(
            &TickInput {
                ambient,
                speed: Velocity::new::<meter_per_second>(0.0),
                aggregate: &aggregate,
                throttle,
                dt: Time::new::<second>(0.02),
            },
            propellant,
        )
    }

    fn sea_level() -> AmbientConditions {
        StandardAtmosphere.conditions(Length::new::<meter>(0.0))
    }

    #[test]
    fn off_engine_produces_nothing() {
        let mut engine = controller(hot_settings());
        let out = tick_at(&mut engine, &sea_level(), 1.0, &mut Unlimited);

        assert_eq!(engine.state(), EngineState::Off);
        assert!(out.forces.is_empty());
        assert_eq!(out.fx, EngineFx::default());
    }

    #[test]
    fn running_engine_pushes_against_its_axis() {
        let mut engine = controller(hot_settings());
        engine.ignite();
        let out = tick_at(&mut engine, &sea_level(), 1.0, &mut Unlimited);

        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(out.forces.len(), 1);
        assert_relative_eq!(out.forces[0].z, -65_330.256_8, max_relative = 1e-6);
        assert_relative_eq!(out.fx.power, 0.653_302_568, max_relative = 1e-6);
        let ratio = engine.temperature_ratio();
        assert_relative_eq!(out.thermal_flux, 100.0 * ratio * ratio);
    }

    #[test]
    fn soft_cap_limits_excess_thrust() {
        let mut engine = controller(ControllerSettings {
            thrust_upper_limit: Some(60_000.0),
            ..hot_settings()
        });
        engine.ignite();
        tick_at(&mut engine, &sea_level(), 1.0, &mut Unlimited);

        assert_relative_eq!(
            engine.final_thrust().get::<newton>(),
            60_000.0 + 0.1 * 5_330.256_8,
            max_relative = 1e-6
        );
    }

    #[test]
    fn zero_throttle_still_idles() {
        let mut engine = controller(hot_settings());
        engine.ignite();
        tick_at(&mut engine, &sea_level(), 0.0, &mut Unlimited);

        assert_eq!(engine.solver().throttle(), MIN_RUNNING_THROTTLE);
        assert!(engine.final_thrust().get::<newton>() > 0.0);
    }

    #[test]
    fn vacuum_flames_out_in_one_tick() {
        let space = Vacuum.conditions(Length::new::<meter>(0.0));
        for throttle in [0.0, 0.5, 1.0] {
            let mut engine = controller(hot_settings());
            engine.ignite();
            let out = tick_at(&mut engine, &space, throttle, &mut Unlimited);

            assert_eq!(engine.state(), EngineState::Flameout);
            assert!(!engine.solver().is_running());
            assert_eq!(
                out.events,
                vec![EngineEvent::Flameout {
                    reason: "no oxygen in the atmosphere".into()
                }]
            );
        }
    }

    #[test]
    fn flameout_relights_when_air_returns() {
        let mut engine = controller(hot_settings());
        engine.ignite();
        tick_at(&mut engine, &Vacuum.conditions(Length::new::<meter>(0.0)), 1.0, &mut Unlimited);
        let again = tick_at(&mut engine, &Vacuum.conditions(Length::new::<meter>(0.0)), 1.0, &mut Unlimited);
        assert!(again.events.is_empty());

        let out = tick_at(&mut engine, &sea_level(), 1.0, &mut Unlimited);

        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(out.events, vec![EngineEvent::Relit]);
    }

    #[test]
    fn empty_tank_flames_out_and_stays_out() {
        let mut engine = controller(hot_settings());
        let mut tank = Tank::new(Mass::new::<kilogram>(0.01));
        engine.ignite();

        // Drains the tank, then reports an empty supply.
        let first = tick_at(&mut engine, &sea_level(), 1.0, &mut tank);
        assert!(first.events.is_empty());
        assert!(!tank.has_propellant());
        tick_at(&mut engine, &sea_level(), 1.0, &mut tank);
        assert_eq!(engine.final_thrust().get::<newton>(), 0.0);

        let out = tick_at(&mut engine, &sea_level(), 1.0, &mut tank);
        assert_eq!(engine.state(), EngineState::Flameout);
        assert_eq!(
            out.events,
            vec![EngineEvent::Flameout {
                reason: "no propellant".into()
            }]
        );

        tick_at(&mut engine, &sea_level(), 1.0, &mut tank);
        assert_eq!(engine.state(), EngineState::Flameout);
    }

    #[test]
    fn hot_engine_waits_for_autoignition_limit() {
        let mut engine = controller(ControllerSettings {
            autoignition_temperature: Some(250.0),
            ..hot_settings()
        });
        let mut tank = Tank::new(Mass::new::<kilogram>(0.01));
        engine.ignite();
        for _ in 0..3 {
            tick_at(&mut engine, &sea_level(), 1.0, &mut tank);
        }
        assert_eq!(engine.state(), EngineState::Flameout);
        // Idle engine sits at the engine-face temperature.
        assert_relative_eq!(engine.engine_temperature, 288.15, max_relative = 1e-9);

        let out = tick_at(&mut engine, &sea_level(), 1.0, &mut Unlimited);
        assert_eq!(engine.state(), EngineState::Flameout);
        assert!(out.events.is_empty());
        assert_eq!(engine.final_thrust().get::<newton>(), 0.0);

        engine.settings.autoignition_temperature = Some(300.0);
        let out = tick_at(&mut engine, &sea_level(), 1.0, &mut Unlimited);
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(out.events, vec![EngineEvent::Relit]);
        assert!(engine.final_thrust().get::<newton>() > 0.0);
    }

    #[test]
    fn partial_supply_scales_thrust() {
        let mut engine = controller(hot_settings());
        // The turbofan burns about 1.1465 kg/s; 0.02 s needs about 0.0229 kg.
        let mut tank = Tank::new(Mass::new::<kilogram>(0.011_465_379));
        engine.ignite();
        tick_at(&mut engine, &sea_level(), 1.0, &mut tank);

        assert_relative_eq!(
            engine.final_thrust().get::<newton>(),
            0.5 * 65_330.256_8,
            max_relative = 1e-5
        );
    }

    #[test]
    fn temperature_at_limit_survives() {
        let mut reference = controller(hot_settings());
        reference.ignite();
        tick_at(&mut reference, &sea_level(), 1.0, &mut Unlimited);
        let limit = reference.solver().engine_temperature().get::<kelvin>();

        let mut engine = controller(ControllerSettings {
            max_engine_temperature: limit,
            ..hot_settings()
        });
        engine.ignite();
        let out = tick_at(&mut engine, &sea_level(), 1.0, &mut Unlimited);

        assert_eq!(engine.temperature_ratio(), 1.0);
        assert_eq!(engine.state(), EngineState::Running);
        assert!(out.events.contains(&EngineEvent::OverheatWarning));
    }

    #[test]
    fn overheating_destroys_the_engine() {
        let mut engine = controller(ControllerSettings {
            max_engine_temperature: 700.0,
            ..hot_settings()
        });
        engine.ignite();
        let out = tick_at(&mut engine, &sea_level(), 1.0, &mut Unlimited);

        assert_eq!(engine.state(), EngineState::Destroyed);
        assert!(out.events.contains(&EngineEvent::Destroyed));

        engine.ignite();
        let after = tick_at(&mut engine, &sea_level(), 1.0, &mut Unlimited);
        assert_eq!(engine.state(), EngineState::Destroyed);
        assert!(after.forces.is_empty());
    }

    #[test]
    fn overheat_warning_fires_once() {
        let mut engine = controller(ControllerSettings {
            max_engine_temperature: 800.0,
            ..hot_settings()
        });
        engine.ignite();

        let first = tick_at(&mut engine, &sea_level(), 1.0, &mut Unlimited);
        let repeat = tick_at(&mut engine, &sea_level(), 1.0, &mut Unlimited);

        assert_eq!(first.events, vec![EngineEvent::OverheatWarning]);
        assert!(repeat.events.is_empty());
    }
}
