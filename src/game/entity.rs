use super::math::to_index;
use super::types::{GridResolution, Position, Segment};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
  Segment,
  Food,
  Obstacle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntityId {
  pub kind: EntityKind,
  pub serial: u32,
}

impl EntityId {
  pub fn new(kind: EntityKind, serial: u32) -> Self {
    Self { kind, serial }
  }
}

/// Anything occupying a grid cell.
pub trait Entity {
  fn id(&self) -> EntityId;
  fn position(&self) -> Position;

  fn index(&self, resolution: GridResolution) -> usize {
    to_index(self.position(), resolution)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ObstacleKind {
  Rock,
  Tree,
}

#[derive(Debug, Clone)]
pub struct Food {
  pub id: EntityId,
  pub position: Position,
}

#[derive(Debug, Clone)]
pub struct Obstacle {
  pub id: EntityId,
  pub kind: ObstacleKind,
  pub position: Position,
}

impl Entity for Food {
  fn id(&self) -> EntityId {
    self.id
  }

  fn position(&self) -> Position {
    self.position
  }
}

impl Entity for Obstacle {
  fn id(&self) -> EntityId {
    self.id
  }

  fn position(&self) -> Position {
    self.position
  }
}

impl Entity for Segment {
  fn id(&self) -> EntityId {
    self.id
  }

  fn position(&self) -> Position {
    self.position
  }
}

/// Hands out serials that stay unique across restarts.
#[derive(Debug, Default)]
pub struct EntityIds {
  next_serial: u32,
}

impl EntityIds {
  pub fn next(&mut self, kind: EntityKind) -> EntityId {
    let serial = self.next_serial;
    self.next_serial = self.next_serial.wrapping_add(1);
    EntityId::new(kind, serial)
  }
}
