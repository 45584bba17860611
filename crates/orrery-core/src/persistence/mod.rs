//! Persistence boundary for star-system state trees.
//!
//! The synchronizer only talks to [`SystemRepository`]. Two implementations
//! ship with the crate: an in-memory map and a directory of bincode files.
//! Each state tree is stored as a single versioned record keyed by its
//! [`SystemId`], so every write replaces the whole tree at once.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::state::{StarSystemState, SystemId};

mod file;
mod memory;

pub use file::FileRepository;
pub use memory::InMemoryRepository;

/// Version number for the save record format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Abstract store of star systems
///
/// `persist_system` must be all-or-nothing: a failed write leaves the
/// previously committed tree readable.
pub trait SystemRepository: Send + Sync {
    fn fetch_system(
        &self,
        id: SystemId,
    ) -> impl Future<Output = Result<StarSystemState, PersistenceError>> + Send;

    /// Insert or overwrite the whole tree stored under `state.id`
    fn persist_system(
        &self,
        state: &StarSystemState,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    fn contains_system(
        &self,
        id: SystemId,
    ) -> impl Future<Output = Result<bool, PersistenceError>> + Send;

    fn delete_system(&self, id: SystemId)
        -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Stored ids, sorted
    fn list_systems(&self) -> impl Future<Output = Result<Vec<SystemId>, PersistenceError>> + Send;
}

impl<R: SystemRepository> SystemRepository for Arc<R> {
    fn fetch_system(
        &self,
        id: SystemId,
    ) -> impl Future<Output = Result<StarSystemState, PersistenceError>> + Send {
        (**self).fetch_system(id)
    }

    fn persist_system(
        &self,
        state: &StarSystemState,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send {
        (**self).persist_system(state)
    }

    fn contains_system(
        &self,
        id: SystemId,
    ) -> impl Future<Output = Result<bool, PersistenceError>> + Send {
        (**self).contains_system(id)
    }

    fn delete_system(
        &self,
        id: SystemId,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send {
        (**self).delete_system(id)
    }

    fn list_systems(&self) -> impl Future<Output = Result<Vec<SystemId>, PersistenceError>> + Send {
        (**self).list_systems()
    }
}

/// On-disk record
#[derive(Serialize, Deserialize)]
struct SaveRecord {
    /// Save format version, always the first field
    version: u32,
    state: StarSystemState,
}

/// Serialize a state tree into a versioned record
pub fn encode_state(state: &StarSystemState) -> Result<Vec<u8>, PersistenceError> {
    #[derive(Serialize)]
    struct SaveRecordRef<'a> {
        version: u32,
        state: &'a StarSystemState,
    }

    let bytes = bincode::serialize(&SaveRecordRef {
        version: SAVE_VERSION,
        state,
    })?;
    Ok(bytes)
}

/// Deserialize a versioned record, checking the version before the body
pub fn decode_state(bytes: &[u8]) -> Result<StarSystemState, PersistenceError> {
    let found: u32 = bincode::deserialize(bytes)?;
    if found != SAVE_VERSION {
        return Err(PersistenceError::VersionMismatch {
            expected: SAVE_VERSION,
            found,
        });
    }
    let record: SaveRecord = bincode::deserialize(bytes)?;
    Ok(record.state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;
    use crate::generation::generate_system;

    #[test]
    fn test_codec_roundtrip_is_exact() {
        let state = generate_system(&SystemConfig::new(7, 2).with_seed(3)).expect("generation");
        let bytes = encode_state(&state).expect("encode");
        let decoded = decode_state(&bytes).expect("decode");

        assert_eq!(decoded.id, state.id);
        assert_eq!(decoded.star.as_ref().map(|s| s.mass), state.star.as_ref().map(|s| s.mass));
        for (a, b) in decoded.planets().zip(state.planets()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.display_name, b.display_name);
            assert_eq!(a.position.x.to_bits(), b.position.x.to_bits());
            assert_eq!(a.position.y.to_bits(), b.position.y.to_bits());
            assert_eq!(a.velocity.x.to_bits(), b.velocity.x.to_bits());
            assert_eq!(a.mass.to_bits(), b.mass.to_bits());
        }
    }

    #[test]
    fn test_version_mismatch() {
        let state = generate_system(&SystemConfig::new(1, 1).with_seed(3)).expect("generation");
        let mut bytes = encode_state(&state).expect("encode");
        bytes[..4].copy_from_slice(&99u32.to_le_bytes());

        match decode_state(&bytes) {
            Err(PersistenceError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, 99);
            }
            other => panic!("expected version mismatch, got {:?}", other.map(|s| s.id)),
        }
    }

    #[test]
    fn test_truncated_record() {
        let state = generate_system(&SystemConfig::new(2, 1).with_seed(3)).expect("generation");
        let bytes = encode_state(&state).expect("encode");
        assert!(matches!(
            decode_state(&bytes[..bytes.len() / 2]),
            Err(PersistenceError::Codec(_))
        ));
    }
}
