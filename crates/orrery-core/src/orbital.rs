//! Simplified circular-orbit mechanics.
//!
//! Pure functions, all in `f32` since that is the precision values are stored
//! at. Angles are radians, counter-clockwise from +x.

use std::f32::consts::TAU;

use crate::components::Vec2;
use crate::config::GenerationConstants;

/// Point on a circular orbit of `radius` around the origin
pub fn position_on_orbit(radius: f32, angle: f32) -> Vec2 {
    Vec2::new(radius * angle.cos(), radius * angle.sin())
}

/// Kepler-like linear speed: `base / sqrt(radius)`
///
/// Radii at or below the threshold (including zero and negatives) return the
/// default speed instead of dividing.
pub fn orbital_speed(radius: f32, constants: &GenerationConstants) -> f32 {
    if radius > constants.min_radius_threshold {
        constants.orbital_speed_base / radius.sqrt()
    } else {
        constants.default_orbital_speed
    }
}

/// Counter-clockwise velocity tangent to the orbit at `angle`
///
/// `radius` does not enter the formula; `speed` is already the linear speed.
pub fn velocity_tangent_to_orbit(_radius: f32, angle: f32, speed: f32) -> Vec2 {
    Vec2::new(-speed * angle.sin(), speed * angle.cos())
}

/// Recover `(radius, angular_speed)` from raw position and velocity
///
/// Used when loading bodies whose stored radius may be stale.
pub fn derive_orbital_radius_and_speed(
    position: Vec2,
    velocity: Vec2,
    orbit_center: Vec2,
    constants: &GenerationConstants,
) -> (f32, f32) {
    let radius = position.distance(&orbit_center);
    let speed = if radius > constants.min_radius_threshold {
        velocity.length() / radius
    } else {
        constants.default_orbital_speed
    };
    (radius, speed)
}

/// Angle of `position` around `orbit_center`, in `(-π, π]`
pub fn orbital_angle(position: Vec2, orbit_center: Vec2) -> f32 {
    let rel = position - orbit_center;
    rel.y.atan2(rel.x)
}

/// Wrap into `[0, 2π)`
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
