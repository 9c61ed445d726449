//! Property-based checks of the gas-state invariants.

use approx::relative_eq;
use jetsim_thermo::{GasState, units::HeatOfCombustion};
use proptest::prelude::*;
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{Pressure, ThermodynamicTemperature, Velocity},
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

fn gas(p: f64, t: f64, far: f64) -> GasState {
    GasState::new(
        Pressure::new::<pascal>(p),
        ThermodynamicTemperature::new::<kelvin>(t),
    )
    .expect("inputs are physical")
    .with_far(far)
}

proptest! {
    /// Derived properties stay consistent with each other and the ideal-gas law.
    #[test]
    fn derived_properties_are_consistent(
        p in 1.0f64..5e6,
        t in 50.0f64..4000.0,
        far in 0.0f64..0.1,
    ) {
        let state = gas(p, t, far);
        let props = state.properties();

        prop_assert!(relative_eq!(props.cv, props.cp / props.gamma, max_relative = 1e-12));
        prop_assert!(relative_eq!(props.r, props.cv * (props.gamma - 1.0), max_relative = 1e-12));
        prop_assert!((1004.5..=1404.5).contains(&props.cp));
        prop_assert!((1.1..=1.4).contains(&props.gamma));

        let rho = state.density().get::<kilogram_per_cubic_meter>();
        prop_assert!(relative_eq!(rho, p / (props.r * t), max_relative = 1e-12));
    }

    /// A unit temperature ratio leaves the state unchanged and does no work.
    #[test]
    fn unit_temperature_ratio_is_identity(
        p in 1.0f64..5e6,
        t in 50.0f64..4000.0,
        far in 0.0f64..0.1,
        eff in 0.5f64..1.0,
    ) {
        let state = gas(p, t, far);
        let process = state.adiabatic_with_temperature_ratio(1.0, eff);

        prop_assert_eq!(process.outlet, state);
        prop_assert_eq!(process.work.get::<joule_per_kilogram>(), 0.0);
    }

    /// Pressure-ratio and temperature-ratio processes agree at unit efficiency.
    #[test]
    fn pressure_and_temperature_ratios_agree(
        p in 1e3f64..1e6,
        t in 200.0f64..2000.0,
        pr in 0.05f64..40.0,
    ) {
        let state = gas(p, t, 0.0);
        let by_pressure = state.adiabatic_with_pressure_ratio(pr, 1.0);
        let tr = by_pressure.outlet.temperature().get::<kelvin>() / t;
        let by_temperature = state.adiabatic_with_temperature_ratio(tr, 1.0);

        let p1 = by_pressure.outlet.pressure().get::<pascal>();
        let p2 = by_temperature.outlet.pressure().get::<pascal>();
        prop_assert!(relative_eq!(p1, p2, max_relative = 1e-9), "{} vs {}", p1, p2);
        let w1 = by_pressure.work.get::<joule_per_kilogram>();
        let w2 = by_temperature.work.get::<joule_per_kilogram>();
        prop_assert!((w1 - w2).abs() <= 1e-6 * (1.0 + w1.abs()));
    }

    /// Frame changes round trip exactly while the gas stays below 300 K,
    /// where the properties are constant.
    #[test]
    fn reference_frame_round_trip(
        p in 1e3f64..1e6,
        t in 150.0f64..250.0,
        v in -200.0f64..200.0,
    ) {
        let state = gas(p, t, 0.0);
        let speed = Velocity::new::<meter_per_second>(v);
        let back = state.change_reference_frame(speed).change_reference_frame(-speed);

        prop_assert!(relative_eq!(back.temperature().get::<kelvin>(), t, max_relative = 1e-12));
        prop_assert!(relative_eq!(back.pressure().get::<pascal>(), p, max_relative = 1e-9));
    }

    /// Hot gas drifts on the return trip because `cp` is taken at the start
    /// of each change, but stays within half a percent.
    #[test]
    fn hot_reference_frame_round_trip_is_close(
        p in 1e3f64..1e6,
        t in 1000.0f64..2000.0,
        v in -600.0f64..600.0,
    ) {
        let state = gas(p, t, 0.0);
        let speed = Velocity::new::<meter_per_second>(v);
        let back = state.change_reference_frame(speed).change_reference_frame(-speed);

        let t_back = back.temperature().get::<kelvin>();
        let p_back = back.pressure().get::<pascal>();
        prop_assert!(relative_eq!(t_back, t, max_relative = 5e-3), "{} vs {}", t_back, t);
        prop_assert!(relative_eq!(p_back, p, max_relative = 5e-3), "{} vs {}", p_back, p);
    }

    /// Burning fuel never exceeds the fuel-air ratio limit.
    #[test]
    fn add_fuel_respects_max_far(
        t in 200.0f64..2500.0,
        far in 0.0f64..0.05,
        max_t in 200.0f64..4000.0,
        heat in 1e6f64..1e8,
        throttle in 0.0f64..1.0,
        max_far in 1e-4f64..0.1,
    ) {
        let state = gas(101_325.0, t, far.min(max_far));
        let burned = state.add_fuel_to_temperature(
            ThermodynamicTemperature::new::<kelvin>(max_t),
            HeatOfCombustion::new::<joule_per_kilogram>(heat),
            throttle,
            max_far,
        );

        prop_assert!(burned.far() <= max_far);
        prop_assert!(burned.far() >= state.far());
        prop_assert!(burned.mass_ratio() >= state.mass_ratio());
        prop_assert!(burned.temperature().get::<kelvin>() >= t);
    }

    /// A stream already richer than the limit passes through untouched.
    #[test]
    fn add_fuel_keeps_over_rich_stream(
        t in 200.0f64..2500.0,
        max_far in 1e-4f64..0.05,
        excess in 1e-4f64..0.05,
        max_t in 200.0f64..4000.0,
        throttle in 0.0f64..1.0,
    ) {
        let state = gas(101_325.0, t, max_far + excess);
        let burned = state.add_fuel_to_temperature(
            ThermodynamicTemperature::new::<kelvin>(max_t),
            HeatOfCombustion::new::<joule_per_kilogram>(43e6),
            throttle,
            max_far,
        );

        prop_assert_eq!(burned, state);
    }

    /// Mixing conserves mass ratio and bounds the mixed temperature.
    #[test]
    fn mixing_conserves_mass(
        t1 in 200.0f64..2000.0,
        t2 in 200.0f64..2000.0,
        m1 in 0.01f64..5.0,
        m2 in 0.01f64..5.0,
    ) {
        let a = gas(100_000.0, t1, 0.0).with_mass_ratio(m1);
        let b = gas(150_000.0, t2, 0.02).with_mass_ratio(m2);
        let mixed = GasState::mix(&[a, b]).expect("streams carry mass");

        prop_assert!(relative_eq!(mixed.mass_ratio(), m1 + m2, max_relative = 1e-12));
        let t = mixed.temperature().get::<kelvin>();
        prop_assert!(t >= t1.min(t2) - 1e-9 && t <= t1.max(t2) + 1e-9);
    }
}
