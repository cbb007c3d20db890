use super::{EntityKind, MemoryStore, Storage};
use crate::error::DartsResult;
use crate::model::{EntityId, Game, Player};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// `MemoryStore` mirrored to a JSON file after every write.
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    /// Opens the store at `path`, starting empty when the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> DartsResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let store: MemoryStore = serde_json::from_str(&content)?;
            info!("📂 Opened store {}", path.display());
            store
        } else {
            info!("🆕 Creating store {}", path.display());
            MemoryStore::new()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tables(&self) -> &MemoryStore {
        &self.inner
    }

    // Write-then-rename so a crash never leaves a half written file.
    fn flush(&self) -> DartsResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&self.inner)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("flushed store to {}", self.path.display());
        Ok(())
    }

    /// Applies `op` and flushes; a failed flush restores the tables.
    fn commit<T>(&mut self, op: impl FnOnce(&mut MemoryStore) -> DartsResult<T>) -> DartsResult<T> {
        let before = self.inner.clone();
        let value = op(&mut self.inner)?;
        if let Err(e) = self.flush() {
            warn!("Rolling back, could not write {}: {}", self.path.display(), e);
            self.inner = before;
            return Err(e);
        }
        Ok(value)
    }
}

impl Storage for JsonStore {
    fn create(&mut self, kind: EntityKind, fields: Value) -> DartsResult<EntityId> {
        self.commit(|tables| tables.create(kind, fields))
    }

    fn update(&mut self, kind: EntityKind, id: EntityId, fields: Value) -> DartsResult<()> {
        self.commit(|tables| tables.update(kind, id, fields))
    }

    fn delete(&mut self, kind: EntityKind, id: EntityId) -> DartsResult<()> {
        self.commit(|tables| tables.delete(kind, id))
    }

    fn players(&self) -> DartsResult<Vec<Player>> {
        self.inner.players()
    }

    fn unfinished_games(&self) -> DartsResult<Vec<Game>> {
        self.inner.unfinished_games()
    }

    fn all_games(&self) -> DartsResult<Vec<Game>> {
        self.inner.all_games()
    }
}
