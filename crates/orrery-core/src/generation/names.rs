//! Star-type and planet name tables

use serde::{Deserialize, Serialize};

/// Known star types, indexed by the generator's `star_type_index`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarType {
    RedDwarf,
    YellowStar,
    BlueGiant,
    WhiteDwarf,
}

/// Sun-like mass, also the fallback for unknown star types
pub const SOLAR_MASS_KG: f32 = 1.989e30;

impl StarType {
    pub const ALL: [StarType; 4] = [
        StarType::RedDwarf,
        StarType::YellowStar,
        StarType::BlueGiant,
        StarType::WhiteDwarf,
    ];

    /// Clamp any index into the table
    pub fn from_index(index: i32) -> Self {
        let last = (Self::ALL.len() - 1) as i32;
        Self::ALL[index.clamp(0, last) as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StarType::RedDwarf => "Red Dwarf",
            StarType::YellowStar => "Yellow Star",
            StarType::BlueGiant => "Blue Giant",
            StarType::WhiteDwarf => "White Dwarf",
        }
    }

    pub fn mass(self) -> f32 {
        star_mass_for_index(self.index() as i32)
    }
}

/// Star mass by raw table index, Sun-like for anything unknown
pub fn star_mass_for_index(index: i32) -> f32 {
    match index {
        0 => 0.5e30,
        1 => SOLAR_MASS_KG,
        2 => 3.5e30,
        3 => 0.6e30,
        _ => SOLAR_MASS_KG,
    }
}

/// Name for the planet at `index` in generation order
pub fn planet_name(index: usize) -> String {
    PLANET_NAMES
        .get(index)
        .map(|n| n.to_string())
        .unwrap_or_else(|| format!("Planet {}", index + 1))
}

/// Name of the planetary system orbiting a star
pub fn planetary_system_name(star_name: &str) -> String {
    format!("{} Planetary System", star_name)
}

/// System name given to generated stars
pub const PRIMARY_SYSTEM_NAME: &str = "Primary System";

pub static PLANET_NAMES: &[&str] = &[
    "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune", "Pluto", "Eris",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_type_clamps() {
        assert_eq!(StarType::from_index(-5), StarType::RedDwarf);
        assert_eq!(StarType::from_index(1), StarType::YellowStar);
        assert_eq!(StarType::from_index(99), StarType::WhiteDwarf);
    }

    #[test]
    fn test_star_masses_are_distinct() {
        let masses: Vec<f32> = StarType::ALL.iter().map(|t| t.mass()).collect();
        for (i, a) in masses.iter().enumerate() {
            for b in &masses[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(StarType::YellowStar.mass(), SOLAR_MASS_KG);
    }

    #[test]
    fn test_unknown_index_mass_is_solar() {
        assert_eq!(star_mass_for_index(42), SOLAR_MASS_KG);
        assert_eq!(star_mass_for_index(-1), SOLAR_MASS_KG);
    }

    #[test]
    fn test_planet_names() {
        assert_eq!(planet_name(0), "Mercury");
        assert_eq!(planet_name(4), "Jupiter");
        assert_eq!(planet_name(9), "Eris");
        assert_eq!(planet_name(10), "Planet 11");
        assert_eq!(planet_name(14), "Planet 15");
    }

    #[test]
    fn test_planetary_system_name() {
        assert_eq!(
            planetary_system_name("Yellow Star"),
            "Yellow Star Planetary System"
        );
    }
}
