//! Simulation engine - owns the live bodies and advances them each tick

use hecs::World;

use crate::components::*;
use crate::config::GenerationConstants;
use crate::orbital::{derive_orbital_radius_and_speed, normalize_angle, orbital_angle};
use crate::state::{StarSystemState, SystemId};
use crate::systems::orbit_system;

/// Live simulation of one star system
pub struct SimulationEngine {
    /// ECS world containing the live bodies
    pub world: World,
    /// Simulation time in seconds since instantiation
    pub sim_time: f64,
    /// System the live bodies were built from
    system_id: Option<SystemId>,
    time_scale: f32,
}

/// What a write-back touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteBackReport {
    pub star_updated: bool,
    pub planets_updated: usize,
    pub live_planets: usize,
    pub stored_planets: usize,
}

impl WriteBackReport {
    /// Live planets that had no stored counterpart and were dropped
    pub fn dropped_planets(&self) -> usize {
        self.live_planets.saturating_sub(self.stored_planets)
    }
}

impl SimulationEngine {
    /// Create an empty simulation
    pub fn new() -> Self {
        Self {
            world: World::new(),
            sim_time: 0.0,
            system_id: None,
            time_scale: 1.0,
        }
    }

    /// Replace all live bodies with ones built from `state`
    pub fn instantiate(&mut self, state: &StarSystemState, constants: &GenerationConstants) {
        let world = build_world(state, constants);
        self.install(state.id, world);
    }

    /// Swap in a fully built world in one step
    pub(crate) fn install(&mut self, system_id: SystemId, world: World) {
        self.world = world;
        self.system_id = Some(system_id);
        self.sim_time = 0.0;
    }

    /// Tear down every live body; safe to call when empty
    pub fn clear(&mut self) {
        self.world.clear();
        self.system_id = None;
        self.sim_time = 0.0;
    }

    /// Advance the simulation by `delta_seconds` of host time
    pub fn update(&mut self, delta_seconds: f32) {
        let scaled_delta = delta_seconds * self.time_scale;
        self.sim_time += scaled_delta as f64;

        orbit_system(&mut self.world, scaled_delta);
        // Stars are stationary.
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Simulation time in seconds
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn system_id(&self) -> Option<SystemId> {
        self.system_id
    }

    pub fn body_count(&self) -> usize {
        self.world.len() as usize
    }

    pub fn star(&self) -> Option<LiveBodyView> {
        self.world
            .query::<(&Star, &BodyInfo, &Kinematics)>()
            .iter()
            .next()
            .map(|(entity, (_, info, kinematics))| LiveBodyView {
                entity,
                kind: BodyKind::Star,
                info: info.clone(),
                kinematics: *kinematics,
                orbit: None,
            })
    }

    /// Live planets in generation order
    pub fn planets(&self) -> Vec<LiveBodyView> {
        let mut planets: Vec<(usize, LiveBodyView)> = self
            .world
            .query::<(&Planet, &BodyInfo, &Kinematics, &Orbit)>()
            .iter()
            .map(|(entity, (planet, info, kinematics, orbit))| {
                (
                    planet.index,
                    LiveBodyView {
                        entity,
                        kind: BodyKind::Planet,
                        info: info.clone(),
                        kinematics: *kinematics,
                        orbit: Some(*orbit),
                    },
                )
            })
            .collect();
        planets.sort_by_key(|(index, _)| *index);
        planets.into_iter().map(|(_, view)| view).collect()
    }

    pub fn planet(&self, index: usize) -> Option<LiveBodyView> {
        self.planets().into_iter().nth(index)
    }

    pub fn planet_count(&self) -> usize {
        self.world.query::<&Planet>().iter().count()
    }

    /// Copy live values into `state`, matching planets by generation order
    ///
    /// Stored entities without a live counterpart are left as they are. Live
    /// planets beyond the stored count are dropped.
    pub fn write_back(&self, state: &mut StarSystemState) -> WriteBackReport {
        let mut report = WriteBackReport {
            stored_planets: state.planet_count(),
            ..Default::default()
        };

        if let (Some(star), Some(stored)) = (self.star(), state.star.as_mut()) {
            stored.display_name = star.info.display_name;
            stored.system_name = star.info.system_name;
            stored.position = star.kinematics.position;
            stored.velocity = star.kinematics.velocity;
            stored.mass = star.info.mass;
            report.star_updated = true;
        }

        let live = self.planets();
        report.live_planets = live.len();
        for (planet, stored) in live.into_iter().zip(state.planets_mut()) {
            stored.display_name = planet.info.display_name;
            stored.system_name = planet.info.system_name;
            stored.position = planet.kinematics.position;
            stored.velocity = planet.kinematics.velocity;
            stored.mass = planet.info.mass;
            report.planets_updated += 1;
        }

        report
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a world of live bodies from a stored state
///
/// Orbit radius and speed are re-derived from each planet's position and
/// velocity relative to the star; no stored radius is trusted.
pub fn build_world(state: &StarSystemState, constants: &GenerationConstants) -> World {
    let mut world = World::new();

    if let Some(star) = &state.star {
        world.spawn((
            Star { source: star.id },
            BodyInfo {
                display_name: star.display_name.clone(),
                system_name: star.system_name.clone(),
                mass: star.mass,
            },
            Kinematics {
                position: star.position,
                velocity: star.velocity,
            },
        ));
        log::debug!("Instantiated star: {}", star.display_name);
    }

    let center = state.orbit_center();
    for (index, planet) in state.planets().enumerate() {
        let (radius, angular_speed) =
            derive_orbital_radius_and_speed(planet.position, planet.velocity, center, constants);
        let orbit = Orbit {
            radius,
            angular_speed,
            angle: normalize_angle(orbital_angle(planet.position, center)),
            center,
        };
        world.spawn((
            Planet {
                source: planet.id,
                index,
            },
            BodyInfo {
                display_name: planet.display_name.clone(),
                system_name: planet.system_name.clone(),
                mass: planet.mass,
            },
            Kinematics {
                position: planet.position,
                velocity: planet.velocity,
            },
            orbit,
        ));
        log::debug!(
            "Instantiated planet: {} at radius {:.2}",
            planet.display_name,
            radius
        );
    }

    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;
    use crate::generation::generate_system;
    use crate::state::{PlanetId, PlanetState, PlanetarySystemState};

    fn generated(planets: u32) -> StarSystemState {
        generate_system(&SystemConfig::new(planets, 1).with_seed(42)).expect("generation")
    }

    #[test]
    fn test_engine_creation() {
        let engine = SimulationEngine::new();
        assert_eq!(engine.body_count(), 0);
        assert_eq!(engine.sim_time(), 0.0);
        assert!(engine.star().is_none());
        assert!(engine.system_id().is_none());
    }

    #[test]
    fn test_instantiate_mirrors_state() {
        let state = generated(5);
        let mut engine = SimulationEngine::new();
        engine.instantiate(&state, &GenerationConstants::default());

        assert_eq!(engine.body_count(), 6);
        assert_eq!(engine.planet_count(), 5);
        assert_eq!(engine.system_id(), Some(state.id));

        let star = engine.star().expect("star");
        assert_eq!(star.display_name(), "Yellow Star");

        for (live, stored) in engine.planets().iter().zip(state.planets()) {
            assert_eq!(live.display_name(), stored.display_name);
            assert_eq!(live.position(), stored.position);
            assert_eq!(live.velocity(), stored.velocity);
            assert_eq!(live.mass(), stored.mass);
            let orbit = live.orbit.expect("orbit");
            assert!((orbit.radius - stored.orbital_radius()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_derived_speed_reproduces_stored_velocity() {
        let state = generated(4);
        let mut engine = SimulationEngine::new();
        engine.instantiate(&state, &GenerationConstants::default());

        // A zero-length step recomputes kinematics from the derived orbit
        engine.update(0.0);
        for (live, stored) in engine.planets().iter().zip(state.planets()) {
            assert!(live.position().approx_eq(&stored.position, 1e-2));
            assert!(live.velocity().approx_eq(&stored.velocity, 1e-3));
        }
    }

    #[test]
    fn test_update_moves_planets_not_star() {
        let state = generated(3);
        let mut engine = SimulationEngine::new();
        engine.instantiate(&state, &GenerationConstants::default());

        let before = engine.planets();
        engine.update(1.0);
        let after = engine.planets();

        assert_eq!(engine.star().expect("star").position(), Vec2::ZERO);
        for (b, a) in before.iter().zip(&after) {
            assert_ne!(b.position(), a.position());
            let r_before = b.orbit.expect("orbit").radius;
            assert!((a.position().length() - r_before).abs() < 1e-2);
        }
        assert!((engine.sim_time() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_scale() {
        let mut engine = SimulationEngine::new();
        engine.set_time_scale(2.0);
        engine.update(1.0);
        assert!((engine.sim_time() - 2.0).abs() < 1e-9);

        engine.set_time_scale(-1.0);
        assert_eq!(engine.time_scale(), 0.0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut engine = SimulationEngine::new();
        engine.clear();
        engine.instantiate(&generated(2), &GenerationConstants::default());
        engine.clear();
        engine.clear();
        assert_eq!(engine.body_count(), 0);
        assert!(engine.system_id().is_none());
    }

    #[test]
    fn test_write_back_after_ticks() {
        let mut state = generated(3);
        let mut engine = SimulationEngine::new();
        engine.instantiate(&state, &GenerationConstants::default());
        for _ in 0..10 {
            engine.update(0.5);
        }

        let report = engine.write_back(&mut state);
        assert!(report.star_updated);
        assert_eq!(report.planets_updated, 3);
        assert_eq!(report.dropped_planets(), 0);

        for (live, stored) in engine.planets().iter().zip(state.planets()) {
            assert_eq!(live.position(), stored.position);
            assert_eq!(live.velocity(), stored.velocity);
        }
    }

    #[test]
    fn test_write_back_drops_extra_live_planets() {
        let full = generated(3);
        let mut engine = SimulationEngine::new();
        engine.instantiate(&full, &GenerationConstants::default());

        let mut truncated = full.clone();
        truncated.planetary_systems[0].planets.truncate(2);
        let report = engine.write_back(&mut truncated);

        assert_eq!(report.planets_updated, 2);
        assert_eq!(report.dropped_planets(), 1);
        assert_eq!(truncated.planet_count(), 2);
    }

    #[test]
    fn test_write_back_leaves_unmatched_stored_planets() {
        let mut state = generated(2);
        let extra = PlanetState {
            id: PlanetId::new(),
            planetary_system_id: state.planetary_systems[0].id,
            display_name: "Extra".into(),
            system_name: "Yellow Star".into(),
            position: Vec2::new(999.0, 0.0),
            velocity: Vec2::new(0.0, 1.0),
            mass: 1.0,
        };
        let mut engine = SimulationEngine::new();
        engine.instantiate(&state, &GenerationConstants::default());

        let mut other = PlanetarySystemState::new(state.id, "Outer");
        other.planets.push(extra.clone());
        state.planetary_systems.push(other);

        let report = engine.write_back(&mut state);
        assert_eq!(report.planets_updated, 2);
        let untouched = state.planets().last().expect("extra");
        assert_eq!(untouched.position, extra.position);
        assert_eq!(untouched.display_name, "Extra");
    }

    #[test]
    fn test_loads_around_offset_star() {
        let original = generated(3);
        let offset = Vec2::new(100.0, -50.0);
        let mut state = original.clone();
        if let Some(star) = state.star.as_mut() {
            star.position = offset;
        }
        for planet in state.planets_mut() {
            planet.position = planet.position + offset;
        }

        let mut engine = SimulationEngine::new();
        engine.instantiate(&state, &GenerationConstants::default());

        for (live, unshifted) in engine.planets().iter().zip(original.planets()) {
            let orbit = live.orbit.expect("orbit");
            assert_eq!(orbit.center, offset);
            assert!((orbit.radius - unshifted.orbital_radius()).abs() < 1e-2);
            let expected_angle = normalize_angle(orbital_angle(unshifted.position, Vec2::ZERO));
            let diff = (orbit.angle - expected_angle).abs();
            assert!(
                diff.min(std::f32::consts::TAU - diff) < 1e-3,
                "angle {} vs {}",
                orbit.angle,
                expected_angle
            );
        }

        engine.update(0.0);
        for (live, stored) in engine.planets().iter().zip(state.planets()) {
            assert!(live.position().approx_eq(&stored.position, 1e-2));
            assert!(live.velocity().approx_eq(&stored.velocity, 1e-3));
        }
        assert_eq!(engine.star().expect("star").position(), offset);
    }

    #[test]
    fn test_tightest_valid_constants_keep_orbit_direction() {
        // Innermost draw can reach zero but never go below it
        let constants = GenerationConstants {
            base_orbital_radius: 30.0,
            orbital_radius_increment: 0.0,
            orbital_radius_variance: 50.0,
            ..Default::default()
        };
        let config = SystemConfig::new(15, 1).with_seed(42);
        let state = crate::generation::SystemGenerator::from_config(&config, constants.clone())
            .generate(&config)
            .expect("generation");

        let mut engine = SimulationEngine::new();
        engine.instantiate(&state, &constants);
        engine.update(0.0);

        for (live, stored) in engine.planets().iter().zip(state.planets()) {
            let cross = stored.position.x * stored.velocity.y - stored.position.y * stored.velocity.x;
            assert!(cross > 0.0, "{} stored clockwise", stored.display_name);
            assert!(
                live.velocity().approx_eq(&stored.velocity, 1e-3),
                "{} velocity {} became {}",
                stored.display_name,
                stored.velocity,
                live.velocity()
            );
        }

        let below_half = GenerationConstants {
            base_orbital_radius: 5.0,
            ..constants
        };
        assert!(crate::generation::SystemGenerator::from_config(&config, below_half)
            .generate(&config)
            .is_err());
    }

    #[test]
    fn test_planet_without_star_orbits_origin() {
        let mut state = generated(1);
        state.star = None;
        let mut engine = SimulationEngine::new();
        engine.instantiate(&state, &GenerationConstants::default());

        assert!(engine.star().is_none());
        let planet = engine.planet(0).expect("planet");
        assert_eq!(planet.orbit.expect("orbit").center, Vec2::ZERO);
        assert!(engine.planet(1).is_none());
    }
}
