//! In-memory repository, used for transient sessions and tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use super::SystemRepository;
use crate::error::PersistenceError;
use crate::state::{StarSystemState, SystemId};

/// Map of star systems guarded by an async lock
///
/// Writes replace the whole tree under one lock acquisition, so readers never
/// see a partially updated system. `set_available(false)` makes every call
/// fail with `Unavailable`, standing in for a store that cannot be reached.
#[derive(Debug)]
pub struct InMemoryRepository {
    systems: RwLock<HashMap<SystemId, StarSystemState>>,
    available: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            systems: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// A repository that rejects every call
    pub fn offline() -> Self {
        let repo = Self::new();
        repo.set_available(false);
        repo
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), PersistenceError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PersistenceError::Unavailable(
                "in-memory repository is offline".into(),
            ))
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemRepository for InMemoryRepository {
    async fn fetch_system(&self, id: SystemId) -> Result<StarSystemState, PersistenceError> {
        self.check_available()?;
        self.systems
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(PersistenceError::NotFound(id))
    }

    async fn persist_system(&self, state: &StarSystemState) -> Result<(), PersistenceError> {
        self.check_available()?;
        let snapshot = state.clone();
        self.systems.write().await.insert(snapshot.id, snapshot);
        Ok(())
    }

    async fn contains_system(&self, id: SystemId) -> Result<bool, PersistenceError> {
        self.check_available()?;
        Ok(self.systems.read().await.contains_key(&id))
    }

    async fn delete_system(&self, id: SystemId) -> Result<(), PersistenceError> {
        self.check_available()?;
        self.systems
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(PersistenceError::NotFound(id))
    }

    async fn list_systems(&self) -> Result<Vec<SystemId>, PersistenceError> {
        self.check_available()?;
        let mut ids: Vec<SystemId> = self.systems.read().await.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;
    use crate::generation::generate_system;

    fn system() -> StarSystemState {
        generate_system(&SystemConfig::new(3, 1).with_seed(8)).expect("generation")
    }

    #[tokio::test]
    async fn test_persist_and_fetch() {
        let repo = InMemoryRepository::new();
        let state = system();
        repo.persist_system(&state).await.expect("persist");

        let fetched = repo.fetch_system(state.id).await.expect("fetch");
        assert_eq!(fetched, state);
        assert_eq!(fetched.planet_count(), 3);
        assert!(repo.contains_system(state.id).await.expect("contains"));
    }

    #[tokio::test]
    async fn test_fetch_unknown_is_not_found() {
        let repo = InMemoryRepository::new();
        let id = SystemId::new();
        assert!(matches!(
            repo.fetch_system(id).await,
            Err(PersistenceError::NotFound(found)) if found == id
        ));
    }

    #[tokio::test]
    async fn test_persist_overwrites_whole_tree() {
        let repo = InMemoryRepository::new();
        let mut state = system();
        repo.persist_system(&state).await.expect("persist");

        state.planetary_systems[0].planets.truncate(1);
        state.planetary_systems[0].planets[0].display_name = "Renamed".into();
        repo.persist_system(&state).await.expect("persist");

        let fetched = repo.fetch_system(state.id).await.expect("fetch");
        assert_eq!(fetched.planet_count(), 1);
        assert_eq!(fetched.planetary_systems[0].planets[0].display_name, "Renamed");
    }

    #[tokio::test]
    async fn test_fetch_returns_independent_copy() {
        let repo = InMemoryRepository::new();
        let state = system();
        repo.persist_system(&state).await.expect("persist");

        let mut copy = repo.fetch_system(state.id).await.expect("fetch");
        copy.planetary_systems.clear();

        let again = repo.fetch_system(state.id).await.expect("fetch");
        assert_eq!(again.planet_count(), 3);
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let repo = InMemoryRepository::new();
        let a = system();
        let b = system();
        repo.persist_system(&a).await.expect("persist");
        repo.persist_system(&b).await.expect("persist");

        let mut expected = vec![a.id, b.id];
        expected.sort();
        assert_eq!(repo.list_systems().await.expect("list"), expected);

        repo.delete_system(a.id).await.expect("delete");
        assert_eq!(repo.list_systems().await.expect("list"), vec![b.id]);
        assert!(matches!(
            repo.delete_system(a.id).await,
            Err(PersistenceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_offline_rejects_everything() {
        let repo = InMemoryRepository::offline();
        let state = system();
        assert!(matches!(
            repo.persist_system(&state).await,
            Err(PersistenceError::Unavailable(_))
        ));
        assert!(matches!(
            repo.fetch_system(state.id).await,
            Err(PersistenceError::Unavailable(_))
        ));

        repo.set_available(true);
        repo.persist_system(&state).await.expect("persist");
    }
}
