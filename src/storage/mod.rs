pub mod json;
pub mod memory;

pub use self::json::JsonStore;
pub use self::memory::MemoryStore;

use crate::error::{DartsError, DartsResult};
use crate::model::{EntityId, Game, Player};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Player,
    Game,
    Set,
    Leg,
    Take,
    Dart,
}

impl EntityKind {
    /// Rows that belong to an entity of this kind, and the field pointing back at it.
    pub fn children(&self) -> Option<(EntityKind, &'static str)> {
        match self {
            EntityKind::Game => Some((EntityKind::Set, "game_id")),
            EntityKind::Set => Some((EntityKind::Leg, "set_id")),
            EntityKind::Leg => Some((EntityKind::Take, "leg_id")),
            EntityKind::Take => Some((EntityKind::Dart, "take_id")),
            EntityKind::Player | EntityKind::Dart => None,
        }
    }
}

/// Persistence collaborator of the engine. Every call is one transaction;
/// a duplicate player name fails with `DartsError::Constraint`.
pub trait Storage: Send {
    fn create(&mut self, kind: EntityKind, fields: Value) -> DartsResult<EntityId>;

    fn update(&mut self, kind: EntityKind, id: EntityId, fields: Value) -> DartsResult<()>;

    /// Removes the row and everything that belongs to it.
    fn delete(&mut self, kind: EntityKind, id: EntityId) -> DartsResult<()>;

    fn players(&self) -> DartsResult<Vec<Player>>;

    fn unfinished_games(&self) -> DartsResult<Vec<Game>>;

    fn all_games(&self) -> DartsResult<Vec<Game>>;
}

/// A store shared between the session and the running game.
pub type SharedStorage = Arc<Mutex<dyn Storage>>;

pub fn shared<S: Storage + 'static>(store: S) -> SharedStorage {
    Arc::new(Mutex::new(store))
}

pub fn lock(storage: &SharedStorage) -> DartsResult<MutexGuard<'_, dyn Storage + 'static>> {
    storage
        .lock()
        .map_err(|e| DartsError::Storage(format!("store lock poisoned: {}", e)))
}
