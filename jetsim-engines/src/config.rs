//! Engine and inlet definitions loaded from TOML.
//!
//! A [`VehicleConfig`] lists the engines and inlets of one vehicle. Values are
//! checked when they are turned into runtime objects.

use std::path::Path;

use jetsim_core::constraint::{ConstraintError, NonNegative, StrictlyPositive, UnitInterval};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uom::si::{area::square_meter, f64::Area, f64::Force, force::newton};

use crate::{
    controller::{
        ControllerSettings, EngineController, ThrustTransform, ThrustTransformSpec, TransformError,
        TransformLocation, build_thrust_transforms,
    },
    cycle::{Cycle, CycleParams, Ramjet, Turbofan},
    fitting::{EngineDatabase, EngineKey, FitError, fit_if_necessary},
    inlet::{Inlet, InterpError, PressureRecovery, RecoveryCurve},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field} {source}")]
    InvalidValue {
        field: &'static str,
        #[source]
        source: ConstraintError,
    },

    #[error("invalid thrust transforms")]
    Transform(#[from] TransformError),

    #[error("invalid pressure recovery curve for inlet {inlet}")]
    RecoveryCurve {
        inlet: String,
        #[source]
        source: InterpError,
    },

    #[error("failed to fit engine")]
    Fit(#[from] FitError),
}

/// One engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub name: String,
    pub cycle: CycleParams,
    /// K.
    pub max_engine_temperature: f64,
    /// K.
    #[serde(default)]
    pub autoignition_temperature: Option<f64>,
    /// N.
    #[serde(default)]
    pub thrust_upper_limit: Option<f64>,
    /// Rated thrust for effect levels, N.
    pub max_thrust: f64,
    /// W.
    #[serde(default)]
    pub heat_production: f64,
    #[serde(default = "default_true")]
    pub multiply_thrust_by_fuel_fraction: bool,
    #[serde(default = "default_multiplier")]
    pub flow_mult: f64,
    #[serde(default = "default_multiplier")]
    pub isp_mult: f64,
    /// Where thrust can be applied.
    pub transforms: Vec<TransformLocation>,
    /// How thrust is shared among `transforms`; empty shares it equally.
    #[serde(default)]
    pub thrust_transforms: Vec<ThrustTransformSpec>,
    /// Sea-level static thrust to fit the engine to, N.
    #[serde(default)]
    pub static_thrust: Option<f64>,
}

/// One air intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InletConfig {
    pub name: String,
    /// m².
    pub area: f64,
    /// `(mach, tpr)` calibration points; empty uses the closed-form supersonic loss.
    #[serde(default)]
    pub tpr_curve: Vec<[f64; 2]>,
    #[serde(default = "default_axis")]
    pub axis: Vector3<f64>,
    #[serde(default)]
    pub disable_underwater: bool,
}

/// Every engine and inlet on a vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    #[serde(default)]
    pub engines: Vec<EngineConfig>,
    #[serde(default)]
    pub inlets: Vec<InletConfig>,
}

fn default_true() -> bool {
    true
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_axis() -> Vector3<f64> {
    Vector3::z()
}

fn positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    StrictlyPositive::new(value)
        .map(|v| v.into_inner())
        .map_err(|source| ConfigError::InvalidValue { field, source })
}

/// Checks a value lies in `(0, 1]`.
fn efficiency(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    positive(field, value)?;
    UnitInterval::new(value)
        .map(|v| v.into_inner())
        .map_err(|source| ConfigError::InvalidValue { field, source })
}

impl VehicleConfig {
    /// Parses a vehicle from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid vehicle.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a vehicle TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

impl EngineConfig {
    /// Checks every numeric field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_engine_temperature", self.max_engine_temperature)?;
        positive("max_thrust", self.max_thrust)?;
        positive("flow_mult", self.flow_mult)?;
        positive("isp_mult", self.isp_mult)?;
        if let Some(limit) = self.autoignition_temperature {
            positive("autoignition_temperature", limit)?;
        }
        if let Some(limit) = self.thrust_upper_limit {
            positive("thrust_upper_limit", limit)?;
        }
        if let Some(thrust) = self.static_thrust {
            positive("static_thrust", thrust)?;
        }
        validate_cycle(&self.cycle)
    }

    #[must_use]
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            max_engine_temperature: self.max_engine_temperature,
            autoignition_temperature: self.autoignition_temperature,
            thrust_upper_limit: self.thrust_upper_limit,
            max_thrust: self.max_thrust,
            heat_production: self.heat_production,
            multiply_thrust_by_fuel_fraction: self.multiply_thrust_by_fuel_fraction,
            flow_mult: self.flow_mult,
            isp_mult: self.isp_mult,
        }
    }

    /// Resolves the thrust transform specs against the transform locations.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transform`] for malformed specs.
    pub fn thrust_transforms(&self) -> Result<Vec<ThrustTransform>, ConfigError> {
        Ok(build_thrust_transforms(&self.transforms, &self.thrust_transforms)?)
    }

    /// Builds a validated engine.
    ///
    /// A turbofan with a `static_thrust` target is fitted, through `database`
    /// when one is given so that unchanged engines reuse their cached fit.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if validation or fitting fails.
    pub fn build(
        &self,
        engine_id: &str,
        database: Option<&mut EngineDatabase>,
    ) -> Result<EngineController, ConfigError> {
        self.validate()?;
        let transforms = self.thrust_transforms()?;

        let cycle = match &self.cycle {
            CycleParams::Turbofan(params) => {
                let mut engine = Turbofan::new(params.clone());
                if let Some(thrust) = self.static_thrust {
                    engine = engine.with_static_thrust(Force::new::<newton>(thrust));
                    let key = EngineKey::new(&self.name, "turbofan", engine_id);
                    let mut scratch = EngineDatabase::new();
                    fit_if_necessary(&mut engine, &key, database.unwrap_or(&mut scratch))?;
                }
                Cycle::from(engine)
            }
            CycleParams::Ramjet(params) => Cycle::from(Ramjet::new(params.clone())),
        };

        debug!(engine = %self.name, kind = cycle.kind(), "built engine");
        Ok(EngineController::new(
            self.name.clone(),
            cycle,
            self.controller_settings(),
            transforms,
        ))
    }
}

fn validate_cycle(cycle: &CycleParams) -> Result<(), ConfigError> {
    match cycle {
        CycleParams::Turbofan(p) => {
            positive("area", p.area)?;
            positive("face_mach", p.face_mach)?;
            UnitInterval::new(p.idle_spool).map_err(|source| ConfigError::InvalidValue {
                field: "idle_spool",
                source,
            })?;
            positive("fan_pressure_ratio", p.fan_pressure_ratio)?;
            positive("compressor_pressure_ratio", p.compressor_pressure_ratio)?;
            NonNegative::new(p.bypass_ratio).map_err(|source| ConfigError::InvalidValue {
                field: "bypass_ratio",
                source,
            })?;
            efficiency("fan_efficiency", p.fan_efficiency)?;
            efficiency("compressor_efficiency", p.compressor_efficiency)?;
            efficiency("turbine_efficiency", p.turbine_efficiency)?;
            efficiency("nozzle_efficiency", p.nozzle_efficiency)?;
            efficiency("mechanical_efficiency", p.mechanical_efficiency)?;
            positive("turbine_inlet_temperature", p.turbine_inlet_temperature)?;
            positive("heat_of_fuel", p.heat_of_fuel)?;
            positive("max_far", p.max_far)?;
        }
        CycleParams::Ramjet(p) => {
            positive("area", p.area)?;
            positive("face_mach", p.face_mach)?;
            positive("max_temperature", p.max_temperature)?;
            positive("heat_of_fuel", p.heat_of_fuel)?;
            positive("max_far", p.max_far)?;
            efficiency("burner_pressure_ratio", p.burner_pressure_ratio)?;
            efficiency("nozzle_efficiency", p.nozzle_efficiency)?;
        }
    }
    Ok(())
}

impl InletConfig {
    /// Builds a validated inlet.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a non-positive area and
    /// [`ConfigError::RecoveryCurve`] for a malformed calibration curve.
    pub fn build(&self) -> Result<Inlet, ConfigError> {
        let area = positive("inlet area", self.area)?;
        let recovery = if self.tpr_curve.is_empty() {
            PressureRecovery::Supersonic
        } else {
            let curve = RecoveryCurve::new(&self.tpr_curve).map_err(|source| {
                ConfigError::RecoveryCurve {
                    inlet: self.name.clone(),
                    source,
                }
            })?;
            PressureRecovery::Curve(curve)
        };

        Ok(Inlet::new(
            self.name.clone(),
            Area::new::<square_meter>(area),
            self.axis,
            recovery,
            self.disable_underwater,
        ))
    }
}
