//! # Combined-Cycle Climb
//!
//! This example flies a vehicle with a turbofan and a ramjet from a standing
//! start at sea level to Mach 3 at 20 km through the standard atmosphere.
//!
//! - The **turbofan** is sized by fitting its face area to a static thrust
//!   target and shut down past Mach 2, before ram heating destroys it.
//! - The **ramjet** is lit on the runway, flames out because it cannot run at
//!   rest, and relights once the ram pressure lets its nozzle expand.
//! - Both engines draw from one shared tank and share one intake.
//!
//! Engine events are logged as they happen, and a summary line is logged
//! every ten seconds of flight.
//!
//! ## Running the Example
//!
//! To run this example with Cargo:
//!
//! ```sh
//! RUST_LOG=info cargo run --example climb
//! ```

use std::error::Error;

use jetsim_engines::{
    FlightConditions, Vehicle, VehicleConfig,
    fitting::EngineDatabase,
    propellant::Tank,
};
use jetsim_thermo::ambient::{Atmosphere, StandardAtmosphere};
use nalgebra::Vector3;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uom::si::{
    f64::{Length, Mass, Time},
    force::newton,
    length::meter,
    mass::kilogram,
    thermodynamic_temperature::kelvin,
    time::second,
};

const VEHICLE: &str = r#"
    [[engines]]
    name = "cruise fan"
    max_engine_temperature = 1100.0
    max_thrust = 60000.0
    heat_production = 2000.0
    static_thrust = 50000.0

    [engines.cycle]
    type = "turbofan"
    area = 0.5
    face_mach = 0.5
    idle_spool = 0.3
    fan_pressure_ratio = 2.0
    compressor_pressure_ratio = 8.0
    bypass_ratio = 0.5
    fan_efficiency = 0.88
    compressor_efficiency = 0.85
    turbine_efficiency = 0.9
    nozzle_efficiency = 0.95
    mechanical_efficiency = 0.99
    turbine_inlet_temperature = 1500.0
    heat_of_fuel = 43e6
    max_far = 0.068

    [[engines.transforms]]
    name = "thrust"
    axis = [0.0, 0.0, 1.0]

    [[engines]]
    name = "ramjet"
    max_engine_temperature = 1400.0
    autoignition_temperature = 1300.0
    max_thrust = 80000.0
    heat_production = 3000.0

    [engines.cycle]
    type = "ramjet"
    area = 0.3
    face_mach = 0.3
    max_temperature = 2200.0
    heat_of_fuel = 43e6
    max_far = 0.068
    burner_pressure_ratio = 0.95
    nozzle_efficiency = 0.95

    [[engines.transforms]]
    name = "thrust"
    axis = [0.0, 0.0, 1.0]

    [[inlets]]
    name = "chin intake"
    area = 1.2
    axis = [0.0, 0.0, -1.0]
    tpr_curve = [[0.0, 1.0], [1.0, 0.99], [2.0, 0.93], [3.0, 0.82]]
"#;

const DURATION: f64 = 300.0;
const STEP: f64 = 0.1;
const FINAL_ALTITUDE: f64 = 20_000.0;
const FINAL_SPEED: f64 = 900.0;
const FAN_SHUTDOWN_MACH: f64 = 2.0;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = VehicleConfig::from_toml_str(VEHICLE)?;
    let mut database = EngineDatabase::new();
    let mut vehicle = Vehicle::from_config(&config, Some(&mut database))?;
    let mut tank = Tank::new(Mass::new::<kilogram>(4_000.0));
    let dt = Time::new::<second>(STEP);

    vehicle.ignite_all();

    let steps = (DURATION / STEP).round() as usize;
    for step in 0..=steps {
        let t = step as f64 * STEP;
        let progress = t / DURATION;
        let altitude = FINAL_ALTITUDE * progress * progress;
        let speed = FINAL_SPEED * progress;

        let conditions = FlightConditions {
            ambient: StandardAtmosphere.conditions(Length::new::<meter>(altitude)),
            velocity: Vector3::new(0.0, 0.0, -speed),
        };
        let tick = vehicle.tick(&conditions, 1.0, dt, &mut tank);

        let fan = &mut vehicle.engines_mut()[0];
        if fan.is_running() && fan.solver().mach() > FAN_SHUTDOWN_MACH {
            fan.shutdown();
        }

        if step % 100 == 0 {
            let engines = vehicle.engines();
            info!(
                t,
                altitude,
                mach = engines[0].solver().mach(),
                fan_thrust = engines[0].final_thrust().get::<newton>(),
                fan_temperature = engines[0].solver().engine_temperature().get::<kelvin>(),
                ramjet_thrust = engines[1].final_thrust().get::<newton>(),
                total_force = tick.total_force.norm(),
                fuel_left = tank.remaining().get::<kilogram>(),
                "flight state"
            );
        }
    }

    Ok(())
}
