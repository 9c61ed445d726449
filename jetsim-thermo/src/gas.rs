use tracing::warn;
use uom::si::{
    area::square_meter,
    available_energy::joule_per_kilogram,
    f64::{Area, MassDensity, MassRate, Pressure, SpecificHeatCapacity, ThermodynamicTemperature, Velocity},
    mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

use crate::{
    ThermoError,
    properties::{GasProperties, fuel_air_ratio, fuel_fraction},
    units::{HeatOfCombustion, SpecificGasConstant, SpecificWork},
};

/// Total (stagnation) conditions of an air and fuel mixture on a gas path.
///
/// A `GasState` is a value: every operator returns a new state and leaves the
/// receiver untouched. The derived properties (`cp`, `cv`, `gamma`, `R` and
/// density) are recomputed from temperature and fuel-air ratio whenever either
/// changes, so they can never drift from their generating inputs.
///
/// The mass ratio is the stream's mass flow relative to a reference flow,
/// usually the core air flow of the engine.
///
/// # Example
///
/// ```
/// use jetsim_thermo::GasState;
/// use uom::si::{
///     f64::{Pressure, ThermodynamicTemperature},
///     pressure::pascal,
///     thermodynamic_temperature::kelvin,
/// };
///
/// let ambient = GasState::new(
///     Pressure::new::<pascal>(101_325.0),
///     ThermodynamicTemperature::new::<kelvin>(288.15),
/// )
/// .unwrap();
///
/// let compressed = ambient.adiabatic_with_pressure_ratio(8.0, 0.85);
/// assert!(compressed.outlet.temperature() > ambient.temperature());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasState {
    pressure: f64,
    temperature: f64,
    far: f64,
    mass_ratio: f64,
    properties: GasProperties,
}

/// Result of an adiabatic process applied to a [`GasState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Process {
    /// State leaving the process.
    pub outlet: GasState,
    /// Work extracted from the stream per unit reference mass flow.
    ///
    /// Negative for compression, positive for expansion.
    pub work: SpecificWork,
}

impl GasState {
    /// Creates a state of pure air with unit mass ratio.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::NonPhysical`] unless both pressure and
    /// temperature are finite and strictly positive.
    pub fn new(
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Result<Self, ThermoError> {
        let state = Self::from_parts(pressure.get::<pascal>(), temperature.get::<kelvin>(), 0.0, 1.0);
        if state.is_physical() {
            Ok(state)
        } else {
            Err(ThermoError::NonPhysical {
                pressure: state.pressure,
                temperature: state.temperature,
            })
        }
    }

    fn from_parts(pressure: f64, temperature: f64, far: f64, mass_ratio: f64) -> Self {
        Self {
            pressure,
            temperature,
            far,
            mass_ratio,
            properties: GasProperties::at(temperature, far),
        }
    }

    /// Returns `true` if pressure and temperature are finite and positive.
    #[must_use]
    pub fn is_physical(&self) -> bool {
        self.pressure.is_finite()
            && self.temperature.is_finite()
            && self.pressure > 0.0
            && self.temperature > 0.0
    }

    #[must_use]
    pub fn pressure(&self) -> Pressure {
        Pressure::new::<pascal>(self.pressure)
    }

    #[must_use]
    pub fn temperature(&self) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(self.temperature)
    }

    /// Fuel-air ratio.
    #[must_use]
    pub fn far(&self) -> f64 {
        self.far
    }

    /// Fuel mass fraction, `far / (far + 1)`.
    #[must_use]
    pub fn fuel_fraction(&self) -> f64 {
        fuel_fraction(self.far)
    }

    #[must_use]
    pub fn mass_ratio(&self) -> f64 {
        self.mass_ratio
    }

    /// Raw property set backing the state.
    #[must_use]
    pub fn properties(&self) -> GasProperties {
        self.properties
    }

    #[must_use]
    pub fn cp(&self) -> SpecificHeatCapacity {
        SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(self.properties.cp)
    }

    #[must_use]
    pub fn cv(&self) -> SpecificHeatCapacity {
        SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(self.properties.cv)
    }

    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.properties.gamma
    }

    /// Specific gas constant of the mixture.
    #[must_use]
    pub fn gas_constant(&self) -> SpecificGasConstant {
        SpecificGasConstant::new::<joule_per_kilogram_kelvin>(self.properties.r)
    }

    /// Density from the ideal-gas law, `P / (R·T)`.
    #[must_use]
    pub fn density(&self) -> MassDensity {
        MassDensity::new::<kilogram_per_cubic_meter>(
            self.pressure / (self.properties.r * self.temperature),
        )
    }

    /// Returns a new state with the given pressure.
    #[must_use]
    pub fn with_pressure(self, pressure: Pressure) -> Self {
        Self {
            pressure: pressure.get::<pascal>(),
            ..self
        }
    }

    /// Returns a new state with the given temperature and recomputed properties.
    #[must_use]
    pub fn with_temperature(self, temperature: ThermodynamicTemperature) -> Self {
        Self::from_parts(
            self.pressure,
            temperature.get::<kelvin>(),
            self.far,
            self.mass_ratio,
        )
    }

    /// Returns a new state with the given fuel-air ratio and recomputed properties.
    #[must_use]
    pub fn with_far(self, far: f64) -> Self {
        Self::from_parts(self.pressure, self.temperature, far, self.mass_ratio)
    }

    /// Returns a new state with the given fuel mass fraction.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::InvalidFuelFraction`] unless `0 ≤ ff < 1`.
    pub fn with_fuel_fraction(self, ff: f64) -> Result<Self, ThermoError> {
        if !(0.0..1.0).contains(&ff) {
            return Err(ThermoError::InvalidFuelFraction(ff));
        }
        Ok(self.with_far(fuel_air_ratio(ff)))
    }

    /// Returns a new state with the given mass ratio.
    #[must_use]
    pub fn with_mass_ratio(self, mass_ratio: f64) -> Self {
        Self { mass_ratio, ..self }
    }

    /// Returns a new state with pressure multiplied by `ratio`.
    #[must_use]
    pub fn scale_pressure(self, ratio: f64) -> Self {
        Self {
            pressure: self.pressure * ratio,
            ..self
        }
    }

    /// Adiabatic process with a known temperature ratio.
    ///
    /// Applies `T' = T·τ` and `P' = P·τ^(cp/R·η)` using the inlet properties.
    /// For expansion with losses, pass the reciprocal of the efficiency.
    #[must_use]
    pub fn adiabatic_with_temperature_ratio(&self, temperature_ratio: f64, efficiency: f64) -> Process {
        let GasProperties { cp, r, .. } = self.properties;
        let temperature = self.temperature * temperature_ratio;
        let pressure = self.pressure * temperature_ratio.powf(cp / r * efficiency);
        self.process_to(pressure, temperature)
    }

    /// Adiabatic process with a known pressure ratio.
    ///
    /// Applies `T' = T·π^(R/(cp·η))` and `P' = P·π` using the inlet properties.
    #[must_use]
    pub fn adiabatic_with_pressure_ratio(&self, pressure_ratio: f64, efficiency: f64) -> Process {
        let GasProperties { cp, r, .. } = self.properties;
        let temperature = self.temperature * pressure_ratio.powf(r / (cp * efficiency));
        let pressure = self.pressure * pressure_ratio;
        self.process_to(pressure, temperature)
    }

    /// Adiabatic process adding a known amount of work to the stream.
    ///
    /// `work` is per unit reference mass flow; the temperature rise is
    /// `work / (cp·mass_ratio)`.
    #[must_use]
    pub fn adiabatic_with_work(&self, work: SpecificWork, efficiency: f64) -> Self {
        let GasProperties { cp, r, .. } = self.properties;
        let temperature =
            self.temperature + work.get::<joule_per_kilogram>() / (cp * self.mass_ratio);
        let pressure = self.pressure * (temperature / self.temperature).powf(cp / r * efficiency);
        Self::from_parts(pressure, temperature, self.far, self.mass_ratio)
    }

    /// Converts between static and total conditions for a flow at `speed`.
    ///
    /// A positive speed brings static conditions to stagnation; the negative
    /// of the same speed reverses it.
    #[must_use]
    pub fn change_reference_frame(&self, speed: Velocity) -> Self {
        let v = speed.get::<meter_per_second>();
        let work = SpecificWork::new::<joule_per_kilogram>(0.5 * v * v.abs() * self.mass_ratio);
        self.adiabatic_with_work(work, 1.0)
    }

    /// Burns fuel to approach `max_temperature`.
    ///
    /// The temperature rise is `(max_temperature − T)·throttle`, never
    /// negative. When `max_far > 0` the fuel-air ratio is capped at `max_far`
    /// and the rise is limited to what that much fuel can provide. A stream
    /// already at or above `max_far` is returned unchanged. Mass added by
    /// combustion increases the mass ratio.
    #[must_use]
    pub fn add_fuel_to_temperature(
        &self,
        max_temperature: ThermodynamicTemperature,
        heat_of_fuel: HeatOfCombustion,
        throttle: f64,
        max_far: f64,
    ) -> Self {
        let cp = self.properties.cp;
        let heat = heat_of_fuel.get::<joule_per_kilogram>();
        let limited = max_far > 0.0;

        let mut delta_t = ((max_temperature.get::<kelvin>() - self.temperature) * throttle).max(0.0);
        if limited {
            if self.far >= max_far {
                delta_t = 0.0;
            } else {
                delta_t = delta_t.min((max_far - self.far) * heat / cp);
            }
        }

        let mut added = delta_t * cp / heat;
        if limited {
            added = added.min((max_far - self.far).max(0.0));
        }

        // Mass growth is relative to the incoming fuel-air ratio.
        let mass_ratio = self.mass_ratio * (1.0 + self.far + added) / (1.0 + self.far);

        // Only the added fuel is capped; an already rich stream keeps its ratio.
        let mut far = self.far + added;
        if limited && self.far < max_far {
            far = far.min(max_far);
        }

        Self::from_parts(self.pressure, self.temperature + delta_t, far, mass_ratio)
    }

    /// Mixes streams into one consistent state.
    ///
    /// Temperature is weighted by `cp·mass_ratio`; pressure and fuel fraction
    /// by `mass_ratio`. The result carries the summed mass ratio.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::EmptyMix`] for an empty slice and
    /// [`ThermoError::NoMassToMix`] if the streams carry no mass.
    pub fn mix(streams: &[GasState]) -> Result<Self, ThermoError> {
        if streams.is_empty() {
            return Err(ThermoError::EmptyMix);
        }

        let mut mass = 0.0;
        let mut heat_capacity = 0.0;
        let mut enthalpy = 0.0;
        let mut pressure = 0.0;
        let mut ff = 0.0;

        for stream in streams {
            let mr = stream.mass_ratio;
            let c = stream.properties.cp * mr;
            mass += mr;
            heat_capacity += c;
            enthalpy += c * stream.temperature;
            pressure += mr * stream.pressure;
            ff += mr * stream.fuel_fraction();
        }

        if mass <= 0.0 || heat_capacity <= 0.0 {
            return Err(ThermoError::NoMassToMix(mass));
        }

        Ok(Self::from_parts(
            pressure / mass,
            enthalpy / heat_capacity,
            fuel_air_ratio(ff / mass),
            mass,
        ))
    }

    /// Static speed of sound for a flow at `mach` with these total conditions.
    #[must_use]
    pub fn speed_of_sound(&self, mach: f64) -> Velocity {
        let GasProperties { gamma, r, .. } = self.properties;
        let static_factor = 1.0 + 0.5 * (gamma - 1.0) * mach * mach;
        Velocity::new::<meter_per_second>((gamma * r * self.temperature / static_factor).sqrt())
    }

    /// Static speed of sound for a flow at `velocity` with these total conditions.
    ///
    /// Returns zero and logs a warning when the velocity exceeds what the
    /// stream's total enthalpy can support.
    #[must_use]
    pub fn speed_of_sound_from_velocity(&self, velocity: Velocity) -> Velocity {
        let GasProperties { gamma, r, .. } = self.properties;
        let v = velocity.get::<meter_per_second>();
        let radicand = gamma * r * self.temperature - 0.5 * (gamma - 1.0) * v * v;
        if radicand <= 0.0 {
            warn!(
                velocity = v,
                temperature = self.temperature,
                "velocity exceeds the isentropic limit for this gas state"
            );
            return Velocity::new::<meter_per_second>(0.0);
        }
        Velocity::new::<meter_per_second>(radicand.sqrt())
    }

    /// Mass flow through `area` at `mach` with these total conditions.
    #[must_use]
    pub fn mass_flow(&self, area: Area, mach: f64) -> MassRate {
        MassRate::new::<kilogram_per_second>(
            area.get::<square_meter>() * self.mass_flux_per_area(mach),
        )
    }

    /// Flow area that passes `mass_flow` at `mach` with these total conditions.
    ///
    /// The area is unbounded as `mach` approaches zero.
    #[must_use]
    pub fn flow_area(&self, mass_flow: MassRate, mach: f64) -> Area {
        Area::new::<square_meter>(
            mass_flow.get::<kilogram_per_second>() / self.mass_flux_per_area(mach),
        )
    }

    /// Static pressure at the sonic point of an isentropic expansion.
    #[must_use]
    pub fn choked_pressure(&self) -> Pressure {
        let gamma = self.properties.gamma;
        Pressure::new::<pascal>(
            self.pressure * (1.0 + 0.5 * (gamma - 1.0)).powf(-gamma / (gamma - 1.0)),
        )
    }

    fn mass_flux_per_area(&self, mach: f64) -> f64 {
        let GasProperties { gamma, r, .. } = self.properties;
        let static_factor = 1.0 + 0.5 * (gamma - 1.0) * mach * mach;
        self.pressure
            * (gamma / (r * self.temperature)).sqrt()
            * mach
            * static_factor.powf(-(gamma + 1.0) / (2.0 * (gamma - 1.0)))
    }

    fn process_to(&self, pressure: f64, temperature: f64) -> Process {
        let work = self.properties.cp * (self.temperature - temperature) * self.mass_ratio;
        Process {
            outlet: Self::from_parts(pressure, temperature, self.far, self.mass_ratio),
            work: SpecificWork::new::<joule_per_kilogram>(work),
        }
    }
}
