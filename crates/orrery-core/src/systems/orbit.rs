//! Orbit system - advances every body carrying an `Orbit` component

use hecs::World;

use crate::components::{Kinematics, Orbit};
use crate::orbital::{normalize_angle, position_on_orbit, velocity_tangent_to_orbit};

/// Advance all orbiting bodies by `delta_seconds`
///
/// Bodies without an `Orbit` (the star) are left where they are.
pub fn orbit_system(world: &mut World, delta_seconds: f32) {
    for (_entity, (kinematics, orbit)) in world.query_mut::<(&mut Kinematics, &mut Orbit)>() {
        let (new_orbit, new_kinematics) = advance_orbit(orbit, delta_seconds);
        *orbit = new_orbit;
        *kinematics = new_kinematics;
    }
}

/// Step a single orbit, returning the new orbit and kinematics
pub fn advance_orbit(orbit: &Orbit, delta_seconds: f32) -> (Orbit, Kinematics) {
    let angle = normalize_angle(orbit.angle + orbit.angular_speed * delta_seconds);
    let next = Orbit { angle, ..*orbit };
    (next, kinematics_on_orbit(&next))
}

/// Position and velocity implied by an orbit's current angle
pub fn kinematics_on_orbit(orbit: &Orbit) -> Kinematics {
    let linear_speed = orbit.angular_speed * orbit.radius;
    Kinematics {
        position: orbit.center + position_on_orbit(orbit.radius, orbit.angle),
        velocity: velocity_tangent_to_orbit(orbit.radius, orbit.angle, linear_speed),
    }
}
