//! Orrery Core - Star System Generation Engine
//!
//! Procedurally generates star systems (one star, a planetary system, its
//! planets) from a seed, runs them as live bodies on circular orbits, and
//! keeps the live bodies in sync with a persistent store.
//!
//! # Architecture
//!
//! Live bodies use an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: The star and its planets
//! - **Components**: Pure data attached to entities (Kinematics, Orbit, BodyInfo, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! Stored systems are plain serde trees ([`state::StarSystemState`]) behind the
//! [`persistence::SystemRepository`] trait. The [`synchronizer::StateSynchronizer`]
//! moves data between the two.
//!
//! # Example
//!
//! ```rust,no_run
//! use orrery_core::prelude::*;
//!
//! # async fn run() -> Result<(), SyncError> {
//! let mut sync = StateSynchronizer::new(InMemoryRepository::new(), GenerationConstants::default());
//!
//! // Generate, persist and instantiate a system
//! let generated = sync
//!     .generate_and_instantiate(&SystemConfig::new(5, 1).with_seed(42))
//!     .await?;
//!
//! // Run simulation
//! for _ in 0..600 {
//!     sync.update(1.0 / 60.0); // 60 FPS
//! }
//!
//! sync.save().await?;
//! sync.load(generated.state.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod orbital;
pub mod persistence;
pub mod random;
pub mod state;
pub mod synchronizer;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{GenerationConstants, SystemConfig};
    pub use crate::engine::SimulationEngine;
    pub use crate::error::{GenerationError, PersistenceError, SyncError, SyncResult};
    pub use crate::generation::{generate_system, StarType, SystemGenerator};
    pub use crate::persistence::{FileRepository, InMemoryRepository, SystemRepository};
    pub use crate::state::*;
    pub use crate::synchronizer::{GeneratedSystem, SaveOutcome, StateSynchronizer};
}
