//! Generation configuration - tunable constants and per-run parameters.
//!
//! `GenerationConstants` can be loaded from JSON so tests and tools can run
//! with alternate values. Any field missing from the JSON keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GenerationError};

/// Earth mass in kilograms, lower bound for generated planets
pub const EARTH_MASS_KG: f64 = 5.972e24;
/// Jupiter mass in kilograms, upper bound for generated planets
pub const JUPITER_MASS_KG: f64 = 1.898e27;

/// Constants governing system generation and orbital motion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConstants {
    /// Orbital radius of the first planet, in simulation units
    pub base_orbital_radius: f32,
    /// Spacing between consecutive orbits
    pub orbital_radius_increment: f32,
    /// Full width of the symmetric random variance applied to each radius
    pub orbital_radius_variance: f32,
    pub min_orbital_radius: f32,
    pub max_orbital_radius: f32,
    /// Radii at or below this use `default_orbital_speed`
    pub min_radius_threshold: f32,
    pub default_orbital_speed: f32,
    /// Coefficient in `speed = base / sqrt(radius)`
    pub orbital_speed_base: f32,
    pub max_planets: u32,
    pub min_planet_mass: f64,
    pub max_planet_mass: f64,
}

impl Default for GenerationConstants {
    fn default() -> Self {
        Self {
            base_orbital_radius: 150.0,
            orbital_radius_increment: 100.0,
            orbital_radius_variance: 50.0,
            min_orbital_radius: 0.1,
            max_orbital_radius: 50.0,
            min_radius_threshold: 1.0,
            default_orbital_speed: 1.0,
            orbital_speed_base: 50.0,
            max_planets: 15,
            min_planet_mass: EARTH_MASS_KG,
            max_planet_mass: JUPITER_MASS_KG,
        }
    }
}

impl GenerationConstants {
    /// Parse constants from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let constants: Self = serde_json::from_str(json)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Read constants from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject constants that would make generation produce garbage
    pub fn validate(&self) -> Result<(), GenerationError> {
        let floats = [
            ("base_orbital_radius", self.base_orbital_radius),
            ("orbital_radius_increment", self.orbital_radius_increment),
            ("orbital_radius_variance", self.orbital_radius_variance),
            ("min_orbital_radius", self.min_orbital_radius),
            ("max_orbital_radius", self.max_orbital_radius),
            ("min_radius_threshold", self.min_radius_threshold),
            ("default_orbital_speed", self.default_orbital_speed),
            ("orbital_speed_base", self.orbital_speed_base),
        ];
        if let Some((name, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GenerationError::InvalidConstants(format!(
                "{} must be finite",
                name
            )));
        }
        if self.orbital_radius_variance < 0.0 {
            return Err(GenerationError::InvalidConstants(
                "orbital_radius_variance must not be negative".into(),
            ));
        }
        // Innermost draw is base - variance/2; a negative radius would orbit clockwise
        let innermost = self.base_orbital_radius - self.orbital_radius_variance / 2.0;
        if innermost < 0.0 {
            return Err(GenerationError::InvalidConstants(format!(
                "base_orbital_radius {} is below half of orbital_radius_variance {}",
                self.base_orbital_radius, self.orbital_radius_variance
            )));
        }
        if self.orbital_radius_increment < 0.0 {
            return Err(GenerationError::InvalidConstants(
                "orbital_radius_increment must not be negative".into(),
            ));
        }
        if self.min_orbital_radius > self.max_orbital_radius {
            return Err(GenerationError::InvalidConstants(format!(
                "min_orbital_radius {} exceeds max_orbital_radius {}",
                self.min_orbital_radius, self.max_orbital_radius
            )));
        }
        if self.max_planets == 0 {
            return Err(GenerationError::InvalidConstants(
                "max_planets must be at least 1".into(),
            ));
        }
        let masses_ok = self.min_planet_mass.is_finite()
            && self.max_planet_mass.is_finite()
            && self.min_planet_mass > 0.0
            && self.min_planet_mass <= self.max_planet_mass;
        if !masses_ok {
            return Err(GenerationError::InvalidConstants(format!(
                "planet mass bounds [{}, {}] must be positive and ordered",
                self.min_planet_mass, self.max_planet_mass
            )));
        }
        Ok(())
    }
}

/// Per-run generation parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemConfig {
    /// Must lie in `1..=max_planets`
    pub number_of_planets: u32,
    /// Clamped into the known star-type table
    pub star_type_index: i32,
    /// `None` draws a seed from system entropy
    pub seed: Option<u64>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            number_of_planets: 5,
            star_type_index: 1,
            seed: None,
        }
    }
}

impl SystemConfig {
    pub fn new(number_of_planets: u32, star_type_index: i32) -> Self {
        Self {
            number_of_planets,
            star_type_index,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GenerationConstants::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c = GenerationConstants::from_json_str(r#"{ "max_planets": 8, "orbital_speed_base": 25.0 }"#)
            .expect("valid json");
        assert_eq!(c.max_planets, 8);
        assert_eq!(c.orbital_speed_base, 25.0);
        assert_eq!(c.base_orbital_radius, 150.0);
        assert_eq!(c.min_planet_mass, EARTH_MASS_KG);
    }

    #[test]
    fn test_rejects_zero_max_planets() {
        let err = GenerationConstants::from_json_str(r#"{ "max_planets": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(GenerationError::InvalidConstants(_))));
    }

    #[test]
    fn test_rejects_inverted_radius_band() {
        let c = GenerationConstants {
            min_orbital_radius: 100.0,
            max_orbital_radius: 10.0,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_rejects_radius_that_can_go_negative() {
        let c = GenerationConstants {
            base_orbital_radius: 5.0,
            orbital_radius_increment: 0.0,
            orbital_radius_variance: 50.0,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(GenerationError::InvalidConstants(_))
        ));

        let c = GenerationConstants {
            orbital_radius_increment: -10.0,
            ..Default::default()
        };
        assert!(c.validate().is_err());

        // Exactly half the variance is the lowest accepted base
        let c = GenerationConstants {
            base_orbital_radius: 25.0,
            orbital_radius_variance: 50.0,
            ..Default::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_masses() {
        let c = GenerationConstants {
            min_planet_mass: 0.0,
            ..Default::default()
        };
        assert!(c.validate().is_err());

        let c = GenerationConstants {
            min_planet_mass: JUPITER_MASS_KG,
            max_planet_mass: EARTH_MASS_KG,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = GenerationConstants::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = GenerationConstants::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_system_config_builder() {
        let config = SystemConfig::new(3, 2).with_seed(7);
        assert_eq!(config.number_of_planets, 3);
        assert_eq!(config.star_type_index, 2);
        assert_eq!(config.seed, Some(7));
    }
}
