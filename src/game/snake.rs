use super::constants::STARTING_LENGTH;
use super::digestion::{pass_back, pending_growth, release_at_tail, swallow};
use super::entity::{Entity, EntityId, EntityIds, EntityKind};
use super::input::parse_direction;
use super::linked_list::{LinkedList, NodeId};
use super::math::{to_index, wrap};
use super::scene::Scene;
use super::types::{Direction, FoodCarry, GridResolution, Position, Segment};

/// What one tick did to the snake. The session reacts to it before the
/// next tick is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnakeUpdate {
  pub head: Position,
  pub head_index: usize,
  pub grew: bool,
}

#[derive(Debug)]
pub struct Snake {
  resolution: GridResolution,
  start: Position,
  start_direction: Direction,
  starting_length: usize,
  body: LinkedList<Segment>,
  direction: Direction,
  new_direction: Option<Direction>,
  /// Cell index of every segment, tail first, head last.
  indexes: Vec<usize>,
  ids: EntityIds,
}

impl Snake {
  /// Four segments at the center of the grid, heading right.
  pub fn new(resolution: GridResolution, scene: &mut dyn Scene) -> Self {
    Self::with_layout(
      resolution,
      resolution.center(),
      Direction::Right,
      STARTING_LENGTH,
      scene,
    )
  }

  pub fn with_layout(
    resolution: GridResolution,
    start: Position,
    direction: Direction,
    length: usize,
    scene: &mut dyn Scene,
  ) -> Self {
    let mut ids = EntityIds::default();
    let body = lay_head(&mut ids, wrap(start, resolution), scene);
    let mut snake = Self {
      resolution,
      start,
      start_direction: direction,
      starting_length: length.max(1),
      body,
      direction,
      new_direction: None,
      indexes: Vec::new(),
      ids,
    };
    snake.lay_trailing_segments(scene);
    snake
  }

  fn lay_trailing_segments(&mut self, scene: &mut dyn Scene) {
    let back = self.start_direction.opposite();
    for _ in 1..self.starting_length {
      let position = wrap(self.tail_position().offset(back), self.resolution);
      self.add_tail_node(Some(position), scene);
    }
    self.refresh_indexes();
  }

  /// Queues a turn from a raw key code. Unknown codes and turns along the
  /// current axis are dropped.
  pub fn set_direction(&mut self, key: &str) -> bool {
    match parse_direction(key) {
      Some(direction) => self.set_direction_to(direction),
      None => false,
    }
  }

  pub fn set_direction_to(&mut self, direction: Direction) -> bool {
    if direction.is_colinear(self.direction) {
      tracing::trace!(?direction, current = ?self.direction, "turn dropped");
      return false;
    }
    self.new_direction = Some(direction);
    true
  }

  pub fn update(&mut self, scene: &mut dyn Scene) -> SnakeUpdate {
    if let Some(direction) = self.new_direction.take() {
      self.direction = direction;
    }

    let grew = release_at_tail(&mut self.body).is_some();
    if grew {
      self.add_tail_node(None, scene);
    }

    let mut current = self.body.end();
    while let Some(prev) = self.body.prev(current) {
      pass_back(&mut self.body, prev, current);
      let position = self.body.get(prev).position;
      self.body.get_mut(current).position = position;
      current = prev;
    }

    let head = wrap(
      self.body.get(current).position.offset(self.direction),
      self.resolution,
    );
    self.body.get_mut(current).position = head;
    self.refresh_indexes();

    let head_index = self.head_index();
    tracing::trace!(x = head.x, z = head.z, len = self.len(), grew, "snake moved");
    SnakeUpdate {
      head,
      head_index,
      grew,
    }
  }

  /// Appends a segment at `position`, or on top of the current tail.
  pub fn add_tail_node(&mut self, position: Option<Position>, scene: &mut dyn Scene) -> NodeId {
    let position = position.unwrap_or_else(|| self.tail_position());
    let segment = Segment {
      id: self.ids.next(EntityKind::Segment),
      position,
      carried_food: FoodCarry::Empty,
    };
    scene.add(segment.id, position);
    let node = self.body.add_node(segment);
    self.refresh_indexes();
    node
  }

  /// Drops every segment from the scene and lays out a fresh snake in
  /// place.
  pub fn die(&mut self, scene: &mut dyn Scene) {
    tracing::debug!(len = self.len(), "snake died");
    for segment in self.body.iter() {
      scene.remove(segment.id);
    }
    self.body = lay_head(&mut self.ids, wrap(self.start, self.resolution), scene);
    self.direction = self.start_direction;
    self.new_direction = None;
    self.lay_trailing_segments(scene);
  }

  pub fn swallow(&mut self, food: EntityId) {
    swallow(&mut self.body, food);
  }

  pub fn check_self_collision(&self) -> bool {
    let Some((head, rest)) = self.indexes.split_last() else {
      return false;
    };
    rest.contains(head)
  }

  pub fn check_entities_collision<E: Entity>(&self, entities: &[E]) -> bool {
    let head = self.head_index();
    entities
      .iter()
      .any(|entity| entity.index(self.resolution) == head)
  }

  fn refresh_indexes(&mut self) {
    let resolution = self.resolution;
    self.indexes.clear();
    self.indexes.extend(
      self.body
        .iter_rev()
        .map(|segment| to_index(segment.position, resolution)),
    );
  }

  pub fn indexes(&self) -> &[usize] {
    &self.indexes
  }

  pub fn head_index(&self) -> usize {
    to_index(self.head_position(), self.resolution)
  }

  pub fn head_position(&self) -> Position {
    self.body.get(self.body.head()).position
  }

  pub fn tail_position(&self) -> Position {
    self.body.get(self.body.end()).position
  }

  /// Head first.
  pub fn positions(&self) -> Vec<Position> {
    self.body.iter().map(|segment| segment.position).collect()
  }

  pub fn body(&self) -> &LinkedList<Segment> {
    &self.body
  }

  pub fn direction(&self) -> Direction {
    self.direction
  }

  pub fn pending_direction(&self) -> Option<Direction> {
    self.new_direction
  }

  pub fn pending_growth(&self) -> usize {
    pending_growth(&self.body)
  }

  pub fn len(&self) -> usize {
    self.body.len()
  }

  pub fn is_empty(&self) -> bool {
    self.body.is_empty()
  }

  pub fn resolution(&self) -> GridResolution {
    self.resolution
  }
}

fn lay_head(ids: &mut EntityIds, position: Position, scene: &mut dyn Scene) -> LinkedList<Segment> {
  let head = Segment {
    id: ids.next(EntityKind::Segment),
    position,
    carried_food: FoodCarry::Empty,
  };
  scene.add(head.id, position);
  LinkedList::new(head)
}
