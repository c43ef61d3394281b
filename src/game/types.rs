use super::entity::{EntityId, ObstacleKind};
use super::math::{dot, to_index};
use serde::{Deserialize, Serialize};

/// Bounds of the toroidal play field. Never mutated once a round is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridResolution {
  pub width: i32,
  pub height: i32,
}

impl GridResolution {
  pub fn new(width: i32, height: i32) -> Self {
    debug_assert!(width > 0 && height > 0, "grid resolution must be positive");
    Self { width, height }
  }

  pub fn cell_count(&self) -> usize {
    (self.width.max(0) as usize) * (self.height.max(0) as usize)
  }

  pub fn center(&self) -> Position {
    Position::new(self.width / 2, self.height / 2)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
  pub x: i32,
  pub z: i32,
}

impl Position {
  pub fn new(x: i32, z: i32) -> Self {
    Self { x, z }
  }

  pub fn offset(self, direction: Direction) -> Self {
    let (dx, dz) = direction.vector();
    Self {
      x: self.x + dx,
      z: self.z + dz,
    }
  }

  pub fn index(self, resolution: GridResolution) -> usize {
    to_index(self, resolution)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
  Up,
  Down,
  Left,
  Right,
}

impl Direction {
  pub fn vector(self) -> (i32, i32) {
    match self {
      Direction::Up => (0, -1),
      Direction::Down => (0, 1),
      Direction::Left => (-1, 0),
      Direction::Right => (1, 0),
    }
  }

  pub fn opposite(self) -> Self {
    match self {
      Direction::Up => Direction::Down,
      Direction::Down => Direction::Up,
      Direction::Left => Direction::Right,
      Direction::Right => Direction::Left,
    }
  }

  /// Same axis as `other`, either the same way or reversed.
  pub fn is_colinear(self, other: Direction) -> bool {
    dot(self.vector(), other.vector()) != 0
  }
}

/// Growth bubble riding along the body, one hop per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoodCarry {
  #[default]
  Empty,
  Carrying(EntityId),
}

impl FoodCarry {
  pub fn is_carrying(&self) -> bool {
    matches!(self, FoodCarry::Carrying(_))
  }
}

#[derive(Debug, Clone)]
pub struct Segment {
  pub id: EntityId,
  pub position: Position,
  pub carried_food: FoodCarry,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObstacleSnapshot {
  pub kind: ObstacleKind,
  pub position: Position,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateSnapshot {
  pub tick: u64,
  pub score: u32,
  pub best_score: u32,
  pub direction: Direction,
  pub snake: Vec<Position>,
  pub indexes: Vec<usize>,
  pub foods: Vec<Position>,
  pub obstacles: Vec<ObstacleSnapshot>,
}
