//! Persisted star-system state tree.
//!
//! Entities (system, star, planetary system, planet, belt) are keyed records
//! that point at their parent by id. Kinematic values are embedded by value.
//! Equality on every entity compares identifiers only.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::components::Vec2;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Allocate a fresh process-unique identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

entity_id!(
    /// Identifier of a whole star system (the persistence key)
    SystemId
);
entity_id!(StarId);
entity_id!(PlanetarySystemId);
entity_id!(PlanetId);
entity_id!(AsteroidBeltId);

macro_rules! eq_by_id {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $ty {}
    };
}

/// Root of the state tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarSystemState {
    pub id: SystemId,
    pub star: Option<StarState>,
    pub planetary_systems: Vec<PlanetarySystemState>,
    pub asteroid_belts: Vec<AsteroidBeltState>,
}

impl StarSystemState {
    pub fn new(id: SystemId) -> Self {
        Self {
            id,
            star: None,
            planetary_systems: Vec::new(),
            asteroid_belts: Vec::new(),
        }
    }

    /// All planets in generation order, across planetary systems
    pub fn planets(&self) -> impl Iterator<Item = &PlanetState> {
        self.planetary_systems.iter().flat_map(|ps| ps.planets.iter())
    }

    pub fn planets_mut(&mut self) -> impl Iterator<Item = &mut PlanetState> {
        self.planetary_systems
            .iter_mut()
            .flat_map(|ps| ps.planets.iter_mut())
    }

    pub fn planet_count(&self) -> usize {
        self.planetary_systems.iter().map(|ps| ps.planets.len()).sum()
    }

    /// Position of the orbit center for this system's planets
    pub fn orbit_center(&self) -> Vec2 {
        self.star.as_ref().map(|s| s.position).unwrap_or(Vec2::ZERO)
    }
}

eq_by_id!(StarSystemState);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarState {
    pub id: StarId,
    pub display_name: String,
    pub system_name: String,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Mass in kilograms
    pub mass: f32,
}

eq_by_id!(StarState);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetarySystemState {
    pub id: PlanetarySystemId,
    pub system_id: SystemId,
    pub name: String,
    /// Generation order, which is also orbital-radius order
    pub planets: Vec<PlanetState>,
}

impl PlanetarySystemState {
    pub fn new(system_id: SystemId, name: impl Into<String>) -> Self {
        Self {
            id: PlanetarySystemId::new(),
            system_id,
            name: name.into(),
            planets: Vec::new(),
        }
    }
}

eq_by_id!(PlanetarySystemState);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetState {
    pub id: PlanetId,
    pub planetary_system_id: PlanetarySystemId,
    pub display_name: String,
    pub system_name: String,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Mass in kilograms
    pub mass: f32,
}

impl PlanetState {
    /// Distance from the system origin. Derived, never stored.
    pub fn orbital_radius(&self) -> f32 {
        self.position.length()
    }
}

eq_by_id!(PlanetState);

/// Placeholder entity, carries no physics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsteroidBeltState {
    pub id: AsteroidBeltId,
    pub system_id: SystemId,
    pub name: String,
}

impl AsteroidBeltState {
    pub fn new(system_id: SystemId, name: impl Into<String>) -> Self {
        Self {
            id: AsteroidBeltId::new(),
            system_id,
            name: name.into(),
        }
    }
}

eq_by_id!(AsteroidBeltState);
