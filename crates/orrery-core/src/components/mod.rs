//! Component definitions for live bodies.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod bodies;
mod common;

pub use bodies::*;
pub use common::*;
