//! Drives every inlet and engine on one vehicle.

use jetsim_thermo::ambient::AmbientConditions;
use nalgebra::Vector3;
use uom::si::{
    f64::{Time, Velocity},
    pressure::pascal,
    velocity::meter_per_second,
};

use crate::{
    config::{ConfigError, VehicleConfig},
    controller::{EngineController, TickInput, TickOutput},
    cycle::{Cycle, CycleModel},
    fitting::EngineDatabase,
    inlet::{Inlet, InletAggregate},
    propellant::PropellantSource,
};

/// Where the vehicle is and how it moves through the air.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightConditions {
    pub ambient: AmbientConditions,
    /// Air-relative velocity in the vehicle frame, m/s.
    pub velocity: Vector3<f64>,
}

/// Result of one vehicle tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VehicleTick {
    /// Per-engine results, in engine order.
    pub engines: Vec<TickOutput>,
    /// Sum of every force applied, N.
    pub total_force: Vector3<f64>,
}

/// The propulsion system of one vehicle.
#[derive(Debug, Clone)]
pub struct Vehicle<C = Cycle> {
    engines: Vec<EngineController<C>>,
    inlets: Vec<Inlet>,
    aggregate: InletAggregate,
}

impl Vehicle {
    /// Builds every engine and inlet in `config`.
    ///
    /// Engines are keyed in `database` by name, cycle type and position.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] met.
    pub fn from_config(
        config: &VehicleConfig,
        mut database: Option<&mut EngineDatabase>,
    ) -> Result<Self, ConfigError> {
        let engines = config
            .engines
            .iter()
            .enumerate()
            .map(|(i, engine)| engine.build(&i.to_string(), database.as_deref_mut()))
            .collect::<Result<_, _>>()?;
        let inlets = config
            .inlets
            .iter()
            .map(|inlet| inlet.build())
            .collect::<Result<_, _>>()?;

        Ok(Self::new(engines, inlets))
    }
}

impl<C: CycleModel> Vehicle<C> {
    #[must_use]
    pub fn new(engines: Vec<EngineController<C>>, inlets: Vec<Inlet>) -> Self {
        Self {
            engines,
            inlets,
            aggregate: InletAggregate::default(),
        }
    }

    #[must_use]
    pub fn engines(&self) -> &[EngineController<C>] {
        &self.engines
    }

    pub fn engines_mut(&mut self) -> &mut [EngineController<C>] {
        &mut self.engines
    }

    #[must_use]
    pub fn inlets(&self) -> &[Inlet] {
        &self.inlets
    }

    pub fn inlets_mut(&mut self) -> &mut [Inlet] {
        &mut self.inlets
    }

    /// Inlet aggregate from the last tick.
    #[must_use]
    pub fn aggregate(&self) -> &InletAggregate {
        &self.aggregate
    }

    pub fn ignite_all(&mut self) {
        self.engines.iter_mut().for_each(EngineController::ignite);
    }

    pub fn shutdown_all(&mut self) {
        self.engines.iter_mut().for_each(EngineController::shutdown);
    }

    /// Advances every engine by one tick.
    ///
    /// Inlets are updated first, then one [`InletAggregate`] is built from
    /// the active inlets and the running engines' areas and shared by every
    /// engine.
    pub fn tick(
        &mut self,
        conditions: &FlightConditions,
        throttle: f64,
        dt: Time,
        propellant: &mut dyn PropellantSource,
    ) -> VehicleTick {
        let ambient = &conditions.ambient;
        let speed = conditions.velocity.norm();
        let mach = ambient.gas_state().map_or(0.0, |gas| {
            speed / gas.speed_of_sound(0.0).get::<meter_per_second>()
        });
        let in_atmosphere = ambient.pressure.get::<pascal>() > 0.0;

        for inlet in &mut self.inlets {
            inlet.status.in_atmosphere = in_atmosphere;
            inlet.update(&conditions.velocity, mach);
        }

        self.aggregate = InletAggregate::compute(
            &self.inlets,
            self.engines
                .iter()
                .filter(|engine| engine.is_running())
                .map(|engine| engine.solver().area()),
        );

        let input = TickInput {
            ambient,
            speed: Velocity::new::<meter_per_second>(speed),
            aggregate: &self.aggregate,
            throttle,
            dt,
        };

        let mut tick = VehicleTick::default();
        for engine in &mut self.engines {
            let out = engine.tick(&input, propellant);
            tick.total_force += out.forces.iter().sum::<Vector3<f64>>();
            tick.engines.push(out);
        }
        tick
    }
}
