//! Directory-backed repository - one bincode record per star system

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{decode_state, encode_state, SystemRepository};
use crate::error::PersistenceError;
use crate::state::{StarSystemState, SystemId};

const EXTENSION: &str = "orrery";

/// Stores each system as `<dir>/<id>.orrery`
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write never leaves a half-written record under the real name.
#[derive(Debug, Clone)]
pub struct FileRepository {
    root: PathBuf,
}

impl FileRepository {
    /// Open a repository rooted at `root`, creating the directory if needed
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, id: SystemId) -> PathBuf {
        self.root.join(format!("{}.{}", id, EXTENSION))
    }

    fn temp_path(&self, id: SystemId) -> PathBuf {
        self.root.join(format!("{}.{}.tmp", id, EXTENSION))
    }
}

fn not_found_as(id: SystemId, err: std::io::Error) -> PersistenceError {
    if err.kind() == ErrorKind::NotFound {
        PersistenceError::NotFound(id)
    } else {
        PersistenceError::Io(err)
    }
}

impl SystemRepository for FileRepository {
    async fn fetch_system(&self, id: SystemId) -> Result<StarSystemState, PersistenceError> {
        let bytes = tokio::fs::read(self.record_path(id))
            .await
            .map_err(|e| not_found_as(id, e))?;
        decode_state(&bytes)
    }

    async fn persist_system(&self, state: &StarSystemState) -> Result<(), PersistenceError> {
        let bytes = encode_state(state)?;
        let temp = self.temp_path(state.id);

        if let Err(e) = tokio::fs::write(&temp, &bytes).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        tokio::fs::rename(&temp, self.record_path(state.id)).await?;

        log::debug!("Wrote {} bytes for star system {}", bytes.len(), state.id);
        Ok(())
    }

    async fn contains_system(&self, id: SystemId) -> Result<bool, PersistenceError> {
        Ok(tokio::fs::try_exists(self.record_path(id)).await?)
    }

    async fn delete_system(&self, id: SystemId) -> Result<(), PersistenceError> {
        tokio::fs::remove_file(self.record_path(id))
            .await
            .map_err(|e| not_found_as(id, e))
    }

    async fn list_systems(&self) -> Result<Vec<SystemId>, PersistenceError> {
        let mut ids = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let parsed = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| Uuid::parse_str(s).ok());
            if let Some(uuid) = parsed {
                ids.push(SystemId(uuid));
            }
        }
        ids.sort();
        Ok(ids)
    }
}
