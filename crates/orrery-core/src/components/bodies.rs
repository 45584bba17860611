//! Components for live orbital bodies.

use serde::{Deserialize, Serialize};

use super::Vec2;
use crate::state::{PlanetId, StarId};

/// Naming and mass shared by every body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyInfo {
    pub display_name: String,
    pub system_name: String,
    /// Mass in kilograms
    pub mass: f32,
}

/// Current position and velocity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Circular orbit state, integrated every tick
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Orbit {
    pub radius: f32,
    /// Radians per second
    pub angular_speed: f32,
    /// Angular position in radians, kept in `[0, 2π)`
    pub angle: f32,
    pub center: Vec2,
}

/// Marks the system's star; links back to its stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Star {
    pub source: StarId,
}

/// Marks a planet; `index` is its position in generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Planet {
    pub source: PlanetId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Star,
    Planet,
}

/// Read-only snapshot of a live body
#[derive(Debug, Clone, PartialEq)]
pub struct LiveBodyView {
    pub entity: hecs::Entity,
    pub kind: BodyKind,
    pub info: BodyInfo,
    pub kinematics: Kinematics,
    /// `None` for the star
    pub orbit: Option<Orbit>,
}

impl LiveBodyView {
    pub fn display_name(&self) -> &str {
        &self.info.display_name
    }

    pub fn position(&self) -> Vec2 {
        self.kinematics.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.kinematics.velocity
    }

    pub fn mass(&self) -> f32 {
        self.info.mass
    }
}
