//! Cache of fitted engine parameters.
//!
//! Some engines derive internal parameters from designer-facing targets, for
//! example a turbofan whose face area is sized to hit a static thrust. Fitting
//! runs a solver, so results are stored in an [`EngineDatabase`] keyed by
//! [`EngineKey`] and reused until the inputs, the fit schema, or the library
//! version change.

use std::{collections::BTreeMap, fmt, fs, path::Path};

use jetsim_solve::equation::brent;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, info};

use crate::cycle::CycleError;

/// Version stamped on every cached record.
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// An engine with parameters derived by fitting.
pub trait FittableEngine {
    /// Designer-facing values the fit depends on.
    type Inputs: Serialize + DeserializeOwned + PartialEq;
    /// Values produced by the fit.
    type Results: Serialize + DeserializeOwned;

    /// Identifies the fit procedure; bump when it changes.
    const CHECKSUM: u64;

    /// Current fit inputs.
    fn fit_inputs(&self) -> Self::Inputs;

    /// Runs the fit.
    ///
    /// # Errors
    ///
    /// Returns a [`FitError`] if the fit cannot be completed.
    fn fit(&self) -> Result<Self::Results, FitError>;

    /// Installs previously fitted values.
    fn apply_fit_results(&mut self, results: Self::Results);
}

/// Identifies one engine instance in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EngineKey {
    pub part_name: String,
    pub engine_type: String,
    pub engine_id: String,
}

impl EngineKey {
    #[must_use]
    pub fn new(
        part_name: impl Into<String>,
        engine_type: impl Into<String>,
        engine_id: impl Into<String>,
    ) -> Self {
        Self {
            part_name: part_name.into(),
            engine_type: engine_type.into(),
            engine_id: engine_id.into(),
        }
    }
}

impl fmt::Display for EngineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.part_name, self.engine_type, self.engine_id)
    }
}

/// A cached fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRecord {
    pub inputs: serde_json::Value,
    pub results: serde_json::Value,
    pub version: String,
    pub checksum: u64,
}

/// Persistent store of fitted engine parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineDatabase {
    records: BTreeMap<String, EngineRecord>,
}

/// Whether [`fit_if_necessary`] reused the cache or ran a fresh fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    Restored,
    Fitted,
}

#[derive(Debug, Error)]
pub enum FitError {
    #[error("no fit target is configured")]
    MissingTarget,

    #[error("engine cannot run at the fit point")]
    Cycle(#[from] CycleError),

    #[error("fit did not converge")]
    Solve(#[from] brent::Error),

    #[error("failed to encode or decode cached fit")]
    Json(#[from] serde_json::Error),

    #[error("failed to access engine database")]
    Io(#[from] std::io::Error),
}

impl EngineDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a database from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::Io`] if the file cannot be read and
    /// [`FitError::Json`] if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FitError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the database to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::Io`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FitError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &EngineKey) -> Option<&EngineRecord> {
        self.records.get(&key.to_string())
    }

    pub fn insert(&mut self, key: &EngineKey, record: EngineRecord) {
        self.records.insert(key.to_string(), record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Restores cached fit results for `engine`, or fits and caches them.
///
/// A cached record is reused only if its library version, checksum and
/// stored inputs all match the engine's current ones.
///
/// # Errors
///
/// Returns a [`FitError`] if fitting fails or a record cannot be encoded or
/// decoded.
pub fn fit_if_necessary<E: FittableEngine>(
    engine: &mut E,
    key: &EngineKey,
    database: &mut EngineDatabase,
) -> Result<FitOutcome, FitError> {
    let inputs = engine.fit_inputs();

    if let Some(record) = database.get(key) {
        let stale = record.version != LIBRARY_VERSION
            || record.checksum != E::CHECKSUM
            || serde_json::from_value::<E::Inputs>(record.inputs.clone())
                .map_or(true, |cached| cached != inputs);

        if stale {
            debug!(%key, "cached fit is stale");
        } else {
            let results = serde_json::from_value(record.results.clone())?;
            engine.apply_fit_results(results);
            debug!(%key, "restored fit from cache");
            return Ok(FitOutcome::Restored);
        }
    }

    let results = engine.fit()?;
    let record = EngineRecord {
        inputs: serde_json::to_value(&inputs)?,
        results: serde_json::to_value(&results)?,
        version: LIBRARY_VERSION.to_string(),
        checksum: E::CHECKSUM,
    };
    engine.apply_fit_results(results);
    database.insert(key, record);
    info!(%key, "fitted engine parameters");

    Ok(FitOutcome::Fitted)
}
