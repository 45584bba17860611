//! Systems - logic that operates on components

mod orbit;

pub use orbit::*;
