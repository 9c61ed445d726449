use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named point on the engine where thrust can be applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformLocation {
    pub name: String,
    /// Exhaust direction; thrust acts opposite to it.
    pub axis: Vector3<f64>,
}

/// How thrust is shared among the transforms with one name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrustTransformSpec {
    pub name: String,
    #[serde(default = "unit_multiplier")]
    pub overall_multiplier: f64,
    /// Per-transform multipliers, one for each transform with this name.
    #[serde(default)]
    pub multipliers: Vec<f64>,
}

fn unit_multiplier() -> f64 {
    1.0
}

/// A transform with its share of the engine's thrust.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrustTransform {
    name: String,
    axis: Vector3<f64>,
    weight: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("thrust transform name is missing or blank")]
    BlankName,

    #[error("{name}: multiplier must be positive, got {value}")]
    NonPositiveMultiplier { name: String, value: f64 },

    #[error("{name}: no thrust transform with this name")]
    UnknownTransform { name: String },

    #[error("{name}: {found} multipliers given for {expected} transforms")]
    MultiplierCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("{name}: thrust axis has zero length")]
    ZeroAxis { name: String },

    #[error("engine has no thrust transforms")]
    NoTransforms,
}

impl ThrustTransformSpec {
    /// Checks name and multipliers, folding a single multiplier into the overall one.
    ///
    /// # Errors
    ///
    /// Returns a [`TransformError`] for a blank name or a non-positive multiplier.
    pub fn validated(mut self) -> Result<Self, TransformError> {
        if self.name.trim().is_empty() {
            return Err(TransformError::BlankName);
        }

        for value in std::iter::once(self.overall_multiplier).chain(self.multipliers.iter().copied()) {
            if value.is_nan() || value <= 0.0 {
                return Err(TransformError::NonPositiveMultiplier {
                    name: self.name.clone(),
                    value,
                });
            }
        }

        if let [single] = self.multipliers[..] {
            self.overall_multiplier *= single;
            self.multipliers.clear();
        }

        Ok(self)
    }
}

impl ThrustTransform {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit exhaust direction.
    #[must_use]
    pub fn axis(&self) -> Vector3<f64> {
        self.axis
    }

    /// Fraction of the engine's thrust applied here.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Force applied here for a total engine thrust, in N.
    #[must_use]
    pub fn force(&self, thrust: f64) -> Vector3<f64> {
        -self.axis * (self.weight * thrust)
    }
}

/// Distributes thrust over `locations` according to `specs`.
///
/// With no specs every location gets an equal share. Otherwise only the
/// locations named by a spec receive thrust, weighted by the spec's
/// multipliers. Weights always sum to one.
///
/// # Errors
///
/// Returns a [`TransformError`] if a spec is invalid, names no location, or
/// lists a different number of multipliers than there are matching locations.
pub fn build_thrust_transforms(
    locations: &[TransformLocation],
    specs: &[ThrustTransformSpec],
) -> Result<Vec<ThrustTransform>, TransformError> {
    let mut raw = Vec::new();

    if specs.is_empty() {
        for location in locations {
            raw.push((location, 1.0));
        }
    } else {
        for spec in specs {
            let spec = spec.clone().validated()?;
            let matched: Vec<_> = locations.iter().filter(|l| l.name == spec.name).collect();
            if matched.is_empty() {
                return Err(TransformError::UnknownTransform { name: spec.name });
            }
            if !spec.multipliers.is_empty() && spec.multipliers.len() != matched.len() {
                return Err(TransformError::MultiplierCount {
                    name: spec.name,
                    expected: matched.len(),
                    found: spec.multipliers.len(),
                });
            }
            for (i, location) in matched.into_iter().enumerate() {
                let each = spec.multipliers.get(i).copied().unwrap_or(1.0);
                raw.push((location, spec.overall_multiplier * each));
            }
        }
    }

    if raw.is_empty() {
        return Err(TransformError::NoTransforms);
    }

    let total: f64 = raw.iter().map(|(_, w)| w).sum();
    raw.into_iter()
        .map(|(location, weight)| {
            let axis = location
                .axis
                .try_normalize(f64::EPSILON)
                .ok_or_else(|| TransformError::ZeroAxis {
                    name: location.name.clone(),
                })?;
            Ok(ThrustTransform {
                name: location.name.clone(),
                axis,
                weight: weight / total,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn location(name: &str) -> TransformLocation {
        TransformLocation {
            name: name.into(),
            axis: Vector3::new(0.0, 0.0, 1.0),
        }
    }

    fn spec(name: &str, overall: f64, multipliers: &[f64]) -> ThrustTransformSpec {
        ThrustTransformSpec {
            name: name.into(),
            overall_multiplier: overall,
            multipliers: multipliers.to_vec(),
        }
    }

    #[test]
    fn no_specs_share_equally() {
        let locations = [location("a"), location("a"), location("b"), location("c")];
        let transforms = build_thrust_transforms(&locations, &[]).unwrap();

        assert_eq!(transforms.len(), 4);
        for t in &transforms {
            assert_relative_eq!(t.weight(), 0.25);
        }
    }

    #[test]
    fn multipliers_are_normalized() {
        let locations = [location("main"), location("main"), location("aux")];
        let specs = [spec("main", 1.0, &[1.0, 3.0]), spec("aux", 4.0, &[])];
        let transforms = build_thrust_transforms(&locations, &specs).unwrap();

        let weights: Vec<f64> = transforms.iter().map(ThrustTransform::weight).collect();
        assert_relative_eq!(weights[0], 0.125);
        assert_relative_eq!(weights[1], 0.375);
        assert_relative_eq!(weights[2], 0.5);
    }

    #[test]
    fn single_multiplier_folds_into_overall() {
        let folded = spec("main", 2.0, &[1.5]).validated().unwrap();

        assert_relative_eq!(folded.overall_multiplier, 3.0);
        assert!(folded.multipliers.is_empty());
    }

    #[test]
    fn invalid_specs_are_rejected() {
        assert_eq!(spec("  ", 1.0, &[]).validated(), Err(TransformError::BlankName));
        assert!(matches!(
            spec("main", 0.0, &[]).validated(),
            Err(TransformError::NonPositiveMultiplier { .. })
        ));
        assert!(matches!(
            spec("main", 1.0, &[1.0, -1.0]).validated(),
            Err(TransformError::NonPositiveMultiplier { .. })
        ));
    }

    #[test]
    fn multiplier_count_must_match() {
        let locations = [location("main"), location("main")];
        let result = build_thrust_transforms(&locations, &[spec("main", 1.0, &[1.0, 2.0, 3.0])]);

        assert_eq!(
            result,
            Err(TransformError::MultiplierCount {
                name: "main".into(),
                expected: 2,
                found: 3,
            })
        );
    }

    #[test]
    fn unknown_name_is_rejected() {
        let result = build_thrust_transforms(&[location("main")], &[spec("nozzle", 1.0, &[])]);

        assert!(matches!(result, Err(TransformError::UnknownTransform { .. })));
    }

    #[test]
    fn force_opposes_exhaust() {
        let transforms = build_thrust_transforms(&[location("main")], &[]).unwrap();

        assert_eq!(transforms[0].force(100.0), Vector3::new(0.0, 0.0, -100.0));
    }
}
