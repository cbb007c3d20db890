use super::{EntityKind, Storage};
use crate::error::{DartsError, DartsResult};
use crate::model::{EntityId, Game, GameStatus, Player};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

type Table = BTreeMap<EntityId, Value>;

/// In-process tables, one per entity kind. Rows are JSON objects carrying
/// their own `id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    next_id: EntityId,
    tables: BTreeMap<EntityKind, Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.tables.get(&kind).map(BTreeMap::len).unwrap_or(0)
    }

    pub fn row(&self, kind: EntityKind, id: EntityId) -> Option<&Value> {
        self.tables.get(&kind).and_then(|t| t.get(&id))
    }

    fn check_unique_name(&self, fields: &Value, except: Option<EntityId>) -> DartsResult<()> {
        let Some(name) = fields.get("name").and_then(Value::as_str) else {
            return Ok(());
        };
        let taken = self
            .tables
            .get(&EntityKind::Player)
            .into_iter()
            .flat_map(|t| t.iter())
            .any(|(id, row)| Some(*id) != except && row.get("name").and_then(Value::as_str) == Some(name));
        if taken {
            return Err(DartsError::Constraint(format!(
                "a player named '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    fn decode_all<T: for<'de> Deserialize<'de>>(&self, kind: EntityKind) -> DartsResult<Vec<T>> {
        self.tables
            .get(&kind)
            .into_iter()
            .flat_map(|t| t.values())
            .map(|row| serde_json::from_value(row.clone()).map_err(DartsError::from))
            .collect()
    }
}

fn with_id(mut fields: Value, id: EntityId) -> DartsResult<Value> {
    match fields.as_object_mut() {
        Some(obj) => {
            obj.insert("id".to_string(), Value::from(id));
            Ok(fields)
        }
        None => Err(DartsError::Storage(format!(
            "row fields must be a JSON object, got {}",
            fields
        ))),
    }
}

impl Storage for MemoryStore {
    fn create(&mut self, kind: EntityKind, fields: Value) -> DartsResult<EntityId> {
        if kind == EntityKind::Player {
            self.check_unique_name(&fields, None)?;
        }
        let id = self.next_id + 1;
        let row = with_id(fields, id)?;
        self.next_id = id;
        self.tables.entry(kind).or_default().insert(id, row);
        debug!("created {} #{}", kind, id);
        Ok(id)
    }

    fn update(&mut self, kind: EntityKind, id: EntityId, fields: Value) -> DartsResult<()> {
        if kind == EntityKind::Player {
            self.check_unique_name(&fields, Some(id))?;
        }
        let row = with_id(fields, id)?;
        let slot = self
            .tables
            .get_mut(&kind)
            .and_then(|t| t.get_mut(&id))
            .ok_or_else(|| DartsError::NotFound(format!("{} #{}", kind, id)))?;
        *slot = row;
        Ok(())
    }

    fn delete(&mut self, kind: EntityKind, id: EntityId) -> DartsResult<()> {
        let removed = self.tables.get_mut(&kind).and_then(|t| t.remove(&id));
        if removed.is_none() {
            return Err(DartsError::NotFound(format!("{} #{}", kind, id)));
        }

        if let Some((child_kind, parent_field)) = kind.children() {
            let orphans: Vec<EntityId> = self
                .tables
                .get(&child_kind)
                .into_iter()
                .flat_map(|t| t.iter())
                .filter(|(_, row)| row.get(parent_field).and_then(Value::as_u64) == Some(id))
                .map(|(child_id, _)| *child_id)
                .collect();
            for child_id in orphans {
                self.delete(child_kind, child_id)?;
            }
        }
        debug!("deleted {} #{}", kind, id);
        Ok(())
    }

    fn players(&self) -> DartsResult<Vec<Player>> {
        self.decode_all(EntityKind::Player)
    }

    fn unfinished_games(&self) -> DartsResult<Vec<Game>> {
        Ok(self
            .all_games()?
            .into_iter()
            .filter(|g| g.status != GameStatus::Finished)
            .collect())
    }

    fn all_games(&self) -> DartsResult<Vec<Game>> {
        self.decode_all(EntityKind::Game)
    }
}
