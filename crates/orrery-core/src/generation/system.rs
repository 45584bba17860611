//! Star system generation - builds a complete state tree from a config

use std::f64::consts::TAU;

use crate::components::Vec2;
use crate::config::{GenerationConstants, SystemConfig};
use crate::error::GenerationError;
use crate::orbital::{orbital_speed, position_on_orbit, velocity_tangent_to_orbit};
use crate::random::RandomSource;
use crate::state::{
    PlanetId, PlanetState, PlanetarySystemState, StarId, StarState, StarSystemState, SystemId,
};

use super::names::{planet_name, planetary_system_name, StarType, PRIMARY_SYSTEM_NAME};

/// Procedural star-system generator
///
/// Each planet consumes exactly three draws, in order: radius variance,
/// orbital angle, mass. Changing that order changes every seeded system.
pub struct SystemGenerator {
    constants: GenerationConstants,
    random: RandomSource,
}

impl SystemGenerator {
    pub fn new(constants: GenerationConstants, random: RandomSource) -> Self {
        Self { constants, random }
    }

    /// Build a generator seeded from `config.seed`
    pub fn from_config(config: &SystemConfig, constants: GenerationConstants) -> Self {
        Self::new(constants, RandomSource::new(config.seed))
    }

    pub fn constants(&self) -> &GenerationConstants {
        &self.constants
    }

    pub fn seed(&self) -> u64 {
        self.random.seed()
    }

    /// Generate a full star system
    ///
    /// Planet counts outside `1..=max_planets` are rejected; the star type is
    /// clamped into the known table.
    pub fn generate(&mut self, config: &SystemConfig) -> Result<StarSystemState, GenerationError> {
        self.constants.validate()?;

        let max = self.constants.max_planets;
        if config.number_of_planets == 0 || config.number_of_planets > max {
            return Err(GenerationError::PlanetCountOutOfRange {
                requested: config.number_of_planets,
                max,
            });
        }

        let mut state = StarSystemState::new(SystemId::new());

        let star = generate_star(StarType::from_index(config.star_type_index));
        let planetary = self.generate_planetary_system(
            state.id,
            config.number_of_planets,
            &star.display_name,
        );

        log::info!(
            "Generated star system {} with {} planets around {} (seed {})",
            state.id,
            config.number_of_planets,
            star.display_name,
            self.random.seed()
        );

        state.star = Some(star);
        state.planetary_systems.push(planetary);
        Ok(state)
    }

    fn generate_planetary_system(
        &mut self,
        system_id: SystemId,
        number_of_planets: u32,
        star_name: &str,
    ) -> PlanetarySystemState {
        let mut planetary = PlanetarySystemState::new(system_id, planetary_system_name(star_name));

        for index in 0..number_of_planets as usize {
            let base_radius = self.constants.base_orbital_radius
                + index as f32 * self.constants.orbital_radius_increment;
            let half_variance = self.constants.orbital_radius_variance as f64 / 2.0;
            let radius = base_radius
                + self.random.next_float_in_range(-half_variance, half_variance) as f32;

            let planet = self.generate_planet(index, radius, star_name, &planetary);
            planetary.planets.push(planet);
        }

        planetary
    }

    fn generate_planet(
        &mut self,
        index: usize,
        radius: f32,
        star_name: &str,
        planetary: &PlanetarySystemState,
    ) -> PlanetState {
        let angle = self.random.next_float_in_range(0.0, TAU) as f32;
        let position = position_on_orbit(radius, angle);

        let speed = orbital_speed(radius, &self.constants);
        let velocity = velocity_tangent_to_orbit(radius, angle, speed);

        PlanetState {
            id: PlanetId::new(),
            planetary_system_id: planetary.id,
            display_name: planet_name(index),
            system_name: star_name.to_string(),
            position,
            velocity,
            mass: self.random_planet_mass(),
        }
    }

    /// Log-uniform between the configured Earth-like and Jupiter-like bounds
    fn random_planet_mass(&mut self) -> f32 {
        let min = self.constants.min_planet_mass;
        let max = self.constants.max_planet_mass;
        let (log_min, log_max) = (min.ln(), max.ln());
        let u = self.random.next_float01();
        let mass = (log_min + u * (log_max - log_min)).exp().clamp(min, max) as f32;
        // Rounding to f32 may step just outside the f64 bounds
        mass.clamp(min as f32, max as f32)
    }
}

fn generate_star(star_type: StarType) -> StarState {
    StarState {
        id: StarId::new(),
        display_name: star_type.display_name().to_string(),
        system_name: PRIMARY_SYSTEM_NAME.to_string(),
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
        mass: star_type.mass(),
    }
}

/// One-shot generation with default constants
pub fn generate_system(config: &SystemConfig) -> Result<StarSystemState, GenerationError> {
    SystemGenerator::from_config(config, GenerationConstants::default()).generate(config)
}
