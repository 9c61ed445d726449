//! Vehicles built from TOML and flown through changing conditions.

use approx::assert_relative_eq;
use jetsim_engines::{
    EngineEvent, EngineState, FlightConditions, Vehicle, VehicleConfig,
    fitting::EngineDatabase,
    propellant::{Tank, Unlimited},
};
use jetsim_thermo::ambient::{Atmosphere, StandardAtmosphere, Vacuum};
use nalgebra::Vector3;
use uom::si::{
    area::square_meter,
    f64::{Length, Mass, Time},
    force::newton,
    length::meter,
    mass::kilogram,
    time::second,
};

const VEHICLE: &str = r#"
    [[engines]]
    name = "lift fan"
    max_engine_temperature = 1000.0
    max_thrust = 40000.0
    heat_production = 100.0
    static_thrust = 32665.1284

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

    [[inlets]]
    name = "intake"
    area = 1.0
    tpr_curve = [[0.0, 1.0], [2.0, 0.9]]
"#;

fn dt() -> Time {
    Time::new::<second>(0.02)
}

fn at_altitude(altitude: f64, speed: f64) -> FlightConditions {
    FlightConditions {
        ambient: StandardAtmosphere.conditions(Length::new::<meter>(altitude)),
        velocity: Vector3::new(0.0, 0.0, speed),
    }
}

fn in_vacuum() -> FlightConditions {
    FlightConditions {
        ambient: Vacuum.conditions(Length::new::<meter>(150_000.0)),
        velocity: Vector3::new(0.0, 0.0, 2_000.0),
    }
}

fn vehicle() -> Vehicle {
    let config = VehicleConfig::from_toml_str(VEHICLE).unwrap();
    Vehicle::from_config(&config, None).unwrap()
}

#[test]
fn fitted_engine_pushes_along_its_axis() {
    let mut vehicle = vehicle();
    assert_relative_eq!(
        vehicle.engines()[0].solver().area().get::<square_meter>(),
        0.25,
        max_relative = 1e-6
    );

    vehicle.ignite_all();
    let tick = vehicle.tick(&at_altitude(0.0, 0.0), 1.0, dt(), &mut Unlimited);

    let engine = &vehicle.engines()[0];
    assert_eq!(engine.state(), EngineState::Running);
    let thrust = engine.final_thrust().get::<newton>();
    assert!(thrust > 0.0 && thrust < 32_665.2);
    assert_relative_eq!(tick.total_force.z, -thrust, max_relative = 1e-12);
    assert_eq!(tick.total_force.x, 0.0);
    assert!(tick.engines[0].thermal_flux > 0.0);
}

#[test]
fn fit_is_cached_across_sessions() {
    let path = std::env::temp_dir().join(format!("jetsim-fit-cache-{}.json", std::process::id()));
    let mut config = VehicleConfig::from_toml_str(VEHICLE).unwrap();

    let mut database = EngineDatabase::new();
    Vehicle::from_config(&config, Some(&mut database)).unwrap();
    assert_eq!(database.len(), 1);
    database.save(&path).unwrap();

    let mut restored = EngineDatabase::load(&path).unwrap();
    let vehicle = Vehicle::from_config(&config, Some(&mut restored)).unwrap();
    assert_eq!(restored, database);
    assert_relative_eq!(
        vehicle.engines()[0].solver().area().get::<square_meter>(),
        0.25,
        max_relative = 1e-6
    );

    config.engines[0].static_thrust = Some(65_330.256_8);
    let vehicle = Vehicle::from_config(&config, Some(&mut restored)).unwrap();
    assert_eq!(restored.len(), 1);
    assert_ne!(restored, database);
    assert_relative_eq!(
        vehicle.engines()[0].solver().area().get::<square_meter>(),
        0.5,
        max_relative = 1e-6
    );

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn vacuum_flames_out_in_one_tick() {
    for throttle in [0.0, 0.3, 1.0] {
        let mut vehicle = vehicle();
        vehicle.ignite_all();
        vehicle.tick(&at_altitude(0.0, 0.0), 1.0, dt(), &mut Unlimited);

        let tick = vehicle.tick(&in_vacuum(), throttle, dt(), &mut Unlimited);

        let engine = &vehicle.engines()[0];
        assert!(!engine.is_running());
        assert_eq!(engine.state(), EngineState::Flameout);
        assert_eq!(engine.final_thrust().get::<newton>(), 0.0);
        assert_eq!(tick.total_force, Vector3::zeros());
        assert!(matches!(
            tick.engines[0].events[..],
            [EngineEvent::Flameout { .. }]
        ));
    }
}

#[test]
fn relights_on_returning_to_air() {
    let mut vehicle = vehicle();
    vehicle.ignite_all();
    vehicle.tick(&in_vacuum(), 1.0, dt(), &mut Unlimited);
    assert_eq!(vehicle.engines()[0].state(), EngineState::Flameout);

    let tick = vehicle.tick(&at_altitude(1_000.0, 100.0), 1.0, dt(), &mut Unlimited);

    assert_eq!(vehicle.engines()[0].state(), EngineState::Running);
    assert!(tick.engines[0].events.contains(&EngineEvent::Relit));
    assert!(tick.total_force.z < 0.0);
}

#[test]
fn shut_down_engine_does_nothing() {
    let mut vehicle = vehicle();
    vehicle.ignite_all();
    vehicle.tick(&at_altitude(0.0, 0.0), 1.0, dt(), &mut Unlimited);
    vehicle.shutdown_all();

    let tick = vehicle.tick(&at_altitude(0.0, 0.0), 1.0, dt(), &mut Unlimited);

    let engine = &vehicle.engines()[0];
    assert_eq!(engine.state(), EngineState::Off);
    assert_eq!(engine.solver().thrust().get::<newton>(), 0.0);
    assert_eq!(tick.total_force, Vector3::zeros());
    assert_eq!(tick.engines[0].thermal_flux, 0.0);
    assert!(tick.engines[0].events.is_empty());
}

#[test]
fn tank_runs_dry_mid_flight() {
    let mut vehicle = vehicle();
    vehicle.ignite_all();
    let mut tank = Tank::new(Mass::new::<kilogram>(0.05));

    let mut flamed_out = false;
    for _ in 0..200 {
        let tick = vehicle.tick(&at_altitude(0.0, 0.0), 1.0, dt(), &mut tank);
        if tick.engines[0]
            .events
            .iter()
            .any(|event| matches!(event, EngineEvent::Flameout { .. }))
        {
            flamed_out = true;
            break;
        }
    }

    assert!(flamed_out);
    assert_eq!(tank.remaining().get::<kilogram>(), 0.0);
    assert_eq!(vehicle.engines()[0].state(), EngineState::Flameout);
}
