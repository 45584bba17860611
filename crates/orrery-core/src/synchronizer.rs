//! State synchronizer - bridges persisted state trees and live bodies.
//!
//! Load and save are the only async operations. Both take `&mut self`, so a
//! synchronizer never runs two of them at once. Hosts that share one across
//! tasks should wrap it in a `tokio::sync::Mutex`, one per active system.
//!
//! Load builds the new world off to the side and installs it after the last
//! await, so a dropped load future leaves the previous live set intact. Save
//! never touches the live set.

use crate::components::LiveBodyView;
use crate::config::{GenerationConstants, SystemConfig};
use crate::engine::{build_world, SimulationEngine, WriteBackReport};
use crate::error::{PersistenceError, SyncError, SyncResult};
use crate::generation::SystemGenerator;
use crate::persistence::SystemRepository;
use crate::state::{StarSystemState, SystemId};

/// Result of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing instantiated; repository untouched
    NothingToSave,
    Saved(WriteBackReport),
}

/// Result of generate-and-instantiate
#[derive(Debug, Clone)]
pub struct GeneratedSystem {
    pub state: StarSystemState,
    /// Seed the generator ran with, for replay
    pub seed: u64,
    /// False when the repository was unavailable and the system lives only in memory
    pub persisted: bool,
}

pub struct StateSynchronizer<R: SystemRepository> {
    repository: R,
    constants: GenerationConstants,
    engine: SimulationEngine,
}

impl<R: SystemRepository> StateSynchronizer<R> {
    pub fn new(repository: R, constants: GenerationConstants) -> Self {
        Self {
            repository,
            constants,
            engine: SimulationEngine::new(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn constants(&self) -> &GenerationConstants {
        &self.constants
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SimulationEngine {
        &mut self.engine
    }

    /// Fetch a stored system and replace the live bodies with it
    pub async fn load(&mut self, id: SystemId) -> SyncResult<()> {
        let state = match self.repository.fetch_system(id).await {
            Ok(state) => state,
            Err(PersistenceError::NotFound(_)) => {
                log::warn!("Star system {} not found", id);
                return Err(SyncError::NotFound(id));
            }
            Err(e) => return Err(e.into()),
        };

        self.instantiate(&state);
        Ok(())
    }

    /// Replace the live bodies with ones built from `state` without touching storage
    pub fn instantiate(&mut self, state: &StarSystemState) {
        let world = build_world(state, &self.constants);
        self.engine.clear();
        self.engine.install(state.id, world);

        log::info!(
            "Star system {} loaded: {} planets",
            state.id,
            self.engine.planet_count()
        );
    }

    /// Advance live bodies by `delta_seconds`
    pub fn update(&mut self, delta_seconds: f32) {
        self.engine.update(delta_seconds);
    }

    /// Write live values back into the stored system
    ///
    /// The stored tree is fetched, patched and persisted as a whole. An
    /// unknown id fails with `NotFound` rather than creating a record.
    pub async fn save(&mut self) -> SyncResult<SaveOutcome> {
        let Some(id) = self.engine.system_id() else {
            log::info!("Nothing instantiated, skipping save");
            return Ok(SaveOutcome::NothingToSave);
        };

        let mut state = match self.repository.fetch_system(id).await {
            Ok(state) => state,
            Err(PersistenceError::NotFound(_)) => {
                log::warn!("Cannot save star system {}: not found", id);
                return Err(SyncError::NotFound(id));
            }
            Err(e) => return Err(e.into()),
        };

        let report = self.engine.write_back(&mut state);
        if report.dropped_planets() > 0 {
            log::warn!(
                "Star system {} has {} live planets but {} stored; {} dropped on save",
                id,
                report.live_planets,
                report.stored_planets,
                report.dropped_planets()
            );
        }

        self.repository.persist_system(&state).await?;
        log::info!(
            "Star system {} saved ({} planets updated)",
            id,
            report.planets_updated
        );
        Ok(SaveOutcome::Saved(report))
    }

    /// Generate a new system, persist it, then load it
    ///
    /// If the repository is unavailable the generated system is instantiated
    /// directly and `persisted` is false.
    pub async fn generate_and_instantiate(
        &mut self,
        config: &SystemConfig,
    ) -> SyncResult<GeneratedSystem> {
        let mut generator = SystemGenerator::from_config(config, self.constants.clone());
        let state = generator.generate(config)?;
        let seed = generator.seed();

        let persisted = match self.repository.persist_system(&state).await {
            Ok(()) => {
                self.load(state.id).await?;
                true
            }
            Err(PersistenceError::Unavailable(reason)) => {
                log::warn!(
                    "Persistence unavailable ({}), running star system {} transiently",
                    reason,
                    state.id
                );
                self.instantiate(&state);
                false
            }
            Err(e) => return Err(e.into()),
        };

        Ok(GeneratedSystem {
            state,
            seed,
            persisted,
        })
    }

    /// Tear down all live bodies
    pub fn clear(&mut self) {
        if let Some(id) = self.engine.system_id() {
            log::info!("Cleared star system {}", id);
        }
        self.engine.clear();
    }

    pub fn current_system_id(&self) -> Option<SystemId> {
        self.engine.system_id()
    }

    pub fn star(&self) -> Option<LiveBodyView> {
        self.engine.star()
    }

    pub fn planets(&self) -> Vec<LiveBodyView> {
        self.engine.planets()
    }

    pub fn planet(&self, index: usize) -> Option<LiveBodyView> {
        self.engine.planet(index)
    }

    pub fn planet_count(&self) -> usize {
        self.engine.planet_count()
    }
}
