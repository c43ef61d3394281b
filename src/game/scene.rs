use super::entity::{EntityId, EntityKind};
use super::types::Position;
use std::collections::HashMap;

/// Registry of visual objects attached to grid entities. The engine only
/// announces spawns and removals; how they are drawn is up to the host.
pub trait Scene {
  fn add(&mut self, id: EntityId, position: Position);
  fn remove(&mut self, id: EntityId);
}

/// Headless scene that just tracks which entities are attached.
#[derive(Debug, Default)]
pub struct EntityRegistry {
  entities: HashMap<EntityId, Position>,
}

impl EntityRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.entities.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entities.is_empty()
  }

  pub fn contains(&self, id: EntityId) -> bool {
    self.entities.contains_key(&id)
  }

  pub fn count(&self, kind: EntityKind) -> usize {
    self.entities.keys().filter(|id| id.kind == kind).count()
  }
}

impl Scene for EntityRegistry {
  fn add(&mut self, id: EntityId, position: Position) {
    tracing::trace!(?id, x = position.x, z = position.z, "scene add");
    self.entities.insert(id, position);
  }

  fn remove(&mut self, id: EntityId) {
    tracing::trace!(?id, "scene remove");
    self.entities.remove(&id);
  }
}
