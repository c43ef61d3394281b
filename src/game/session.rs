use super::entity::{Entity, EntityIds, EntityKind, Food, Obstacle, ObstacleKind};
use super::events::{DeathReason, GameEvent, Subscribers};
use super::input::{parse_key, KeyCommand};
use super::math::from_index;
use super::scene::Scene;
use super::snake::{Snake, SnakeUpdate};
use super::types::{Direction, GameStateSnapshot, GridResolution, ObstacleSnapshot};
use crate::app::GameConfig;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
  Moved,
  Ate { score: u32 },
  Died(DeathReason),
}

/// Owns the snake, the food and obstacle pools and the scene. Everything
/// that mutates the board goes through here.
pub struct SessionState {
  config: GameConfig,
  resolution: GridResolution,
  snake: Snake,
  foods: Vec<Food>,
  obstacles: Vec<Obstacle>,
  scene: Box<dyn Scene + Send>,
  rng: StdRng,
  ids: EntityIds,
  score: u32,
  best_score: u32,
  tick: u64,
  subscribers: Subscribers,
}

impl SessionState {
  /// Expects a config that passed `GameConfig::validate`.
  pub fn new(config: GameConfig, mut scene: Box<dyn Scene + Send>) -> Self {
    let resolution = config.resolution();
    let snake = Snake::with_layout(
      resolution,
      resolution.center(),
      Direction::Right,
      config.starting_length,
      scene.as_mut(),
    );
    let rng = match config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    let mut state = Self {
      config,
      resolution,
      snake,
      foods: Vec::new(),
      obstacles: Vec::new(),
      scene,
      rng,
      ids: EntityIds::default(),
      score: 0,
      best_score: 0,
      tick: 0,
      subscribers: Subscribers::default(),
    };
    state.spawn_entities();
    state
  }

  pub fn tick(&mut self) -> TickOutcome {
    let update = self.snake.update(self.scene.as_mut());
    self.tick += 1;
    self.emit(GameEvent::Update {
      tick: self.tick,
      head: update.head,
      length: self.snake.len(),
    });
    self.handle_update(update)
  }

  fn handle_update(&mut self, update: SnakeUpdate) -> TickOutcome {
    if let Some(reason) = self.collision() {
      let (score, length) = (self.score, self.snake.len());
      tracing::debug!(?reason, score, length, tick = self.tick, "round lost");
      self.emit(GameEvent::Died {
        reason,
        score,
        length,
      });
      self.reset_round();
      return TickOutcome::Died(reason);
    }

    let resolution = self.resolution;
    let Some(slot) = self
      .foods
      .iter()
      .position(|food| food.index(resolution) == update.head_index)
    else {
      return TickOutcome::Moved;
    };

    let food = self.foods.remove(slot);
    self.scene.remove(food.id);
    self.snake.swallow(food.id);
    self.score += 1;
    self.best_score = self.best_score.max(self.score);
    tracing::debug!(
      score = self.score,
      x = food.position.x,
      z = food.position.z,
      "food eaten"
    );
    self.emit(GameEvent::FoodEaten {
      food: food.position,
      score: self.score,
    });
    self.spawn_food();
    TickOutcome::Ate { score: self.score }
  }

  fn collision(&self) -> Option<DeathReason> {
    if self.snake.check_self_collision() {
      Some(DeathReason::SelfCollision)
    } else if self.snake.check_entities_collision(&self.obstacles) {
      Some(DeathReason::Obstacle)
    } else {
      None
    }
  }

  pub fn set_direction(&mut self, key: &str) -> bool {
    self.snake.set_direction(key)
  }

  pub fn set_direction_to(&mut self, direction: Direction) -> bool {
    self.snake.set_direction_to(direction)
  }

  /// Fresh snake, fresh entities, score back to zero.
  pub fn reset_round(&mut self) {
    self.snake.die(self.scene.as_mut());
    self.score = 0;
    self.restart();
  }

  /// Clears and respawns food and obstacles. The snake is left alone.
  pub fn restart(&mut self) {
    for food in self.foods.drain(..) {
      self.scene.remove(food.id);
    }
    for obstacle in self.obstacles.drain(..) {
      self.scene.remove(obstacle.id);
    }
    self.spawn_entities();
    tracing::debug!(
      obstacles = self.obstacles.len(),
      foods = self.foods.len(),
      "round restarted"
    );
    self.emit(GameEvent::Restarted);
  }

  fn spawn_entities(&mut self) {
    for _ in 0..self.config.obstacle_count {
      if !self.spawn_obstacle() {
        break;
      }
    }
    for _ in 0..self.config.food_count {
      if !self.spawn_food() {
        break;
      }
    }
  }

  fn spawn_food(&mut self) -> bool {
    let Some(index) = self.free_index() else {
      tracing::warn!(foods = self.foods.len(), "no free cell left for food");
      return false;
    };
    let position = from_index(index, self.resolution);
    let id = self.ids.next(EntityKind::Food);
    self.scene.add(id, position);
    self.foods.push(Food { id, position });
    true
  }

  fn spawn_obstacle(&mut self) -> bool {
    let Some(index) = self.free_index() else {
      tracing::warn!(
        obstacles = self.obstacles.len(),
        "no free cell left for obstacles"
      );
      return false;
    };
    let position = from_index(index, self.resolution);
    let kind = if self.rng.gen_bool(0.5) {
      ObstacleKind::Rock
    } else {
      ObstacleKind::Tree
    };
    let id = self.ids.next(EntityKind::Obstacle);
    self.scene.add(id, position);
    self.obstacles.push(Obstacle { id, kind, position });
    true
  }

  fn occupied(&self) -> HashSet<usize> {
    let resolution = self.resolution;
    self
      .snake
      .indexes()
      .iter()
      .copied()
      .chain(self.foods.iter().map(|food| food.index(resolution)))
      .chain(self.obstacles.iter().map(|obstacle| obstacle.index(resolution)))
      .collect()
  }

  /// Uniform pick of a cell no snake segment, food or obstacle sits on.
  /// Rejection sampling first; a full scan once the attempts run out, so a
  /// crowded board still terminates. `None` means the board is full.
  pub fn free_index(&mut self) -> Option<usize> {
    let occupied = self.occupied();
    let cells = self.resolution.cell_count();
    if occupied.len() >= cells {
      return None;
    }

    for _ in 0..self.config.max_spawn_attempts {
      let candidate = self.rng.gen_range(0..cells);
      if !occupied.contains(&candidate) {
        return Some(candidate);
      }
    }

    let free: Vec<usize> = (0..cells).filter(|index| !occupied.contains(index)).collect();
    tracing::trace!(free = free.len(), "spawn sampling fell back to a scan");
    free.choose(&mut self.rng).copied()
  }

  pub fn subscribe(&mut self) -> UnboundedReceiver<GameEvent> {
    self.subscribers.subscribe()
  }

  fn emit(&mut self, event: GameEvent) {
    self.subscribers.send(event);
  }

  pub fn snapshot(&self) -> GameStateSnapshot {
    GameStateSnapshot {
      tick: self.tick,
      score: self.score,
      best_score: self.best_score,
      direction: self.snake.direction(),
      snake: self.snake.positions(),
      indexes: self.snake.indexes().to_vec(),
      foods: self.foods.iter().map(|food| food.position).collect(),
      obstacles: self
        .obstacles
        .iter()
        .map(|obstacle| ObstacleSnapshot {
          kind: obstacle.kind,
          position: obstacle.position,
        })
        .collect(),
    }
  }

  pub fn snake(&self) -> &Snake {
    &self.snake
  }

  pub fn foods(&self) -> &[Food] {
    &self.foods
  }

  pub fn obstacles(&self) -> &[Obstacle] {
    &self.obstacles
  }

  pub fn score(&self) -> u32 {
    self.score
  }

  pub fn best_score(&self) -> u32 {
    self.best_score
  }

  pub fn ticks(&self) -> u64 {
    self.tick
  }

  pub fn resolution(&self) -> GridResolution {
    self.resolution
  }
}

struct TickTimer {
  generation: u64,
  task: JoinHandle<()>,
}

/// Shared handle around a `SessionState` plus the tick timer. Idle until
/// `start_game`; a lost round stops the timer again.
pub struct GameSession {
  state: Mutex<SessionState>,
  timer: Mutex<Option<TickTimer>>,
  generation: AtomicU64,
  tick_interval: Duration,
}

impl GameSession {
  pub fn new(config: GameConfig, scene: Box<dyn Scene + Send>) -> anyhow::Result<Arc<Self>> {
    config.validate()?;
    let tick_interval = config.tick_interval();
    Ok(Arc::new(Self {
      state: Mutex::new(SessionState::new(config, scene)),
      timer: Mutex::new(None),
      generation: AtomicU64::new(0),
      tick_interval,
    }))
  }

  /// Returns false if the timer was already running.
  pub async fn start_game(self: &Arc<Self>) -> bool {
    let mut timer = self.timer.lock().await;
    if timer.is_some() {
      return false;
    }

    self.state.lock().await.emit(GameEvent::Started);
    let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
    let session = Arc::clone(self);
    let task = tokio::spawn(async move {
      session.run_ticks(generation).await;
    });
    *timer = Some(TickTimer { generation, task });
    tracing::info!(tick_ms = self.tick_interval.as_millis() as u64, "game started");
    true
  }

  /// Returns false if the timer was not running.
  pub async fn stop_game(&self) -> bool {
    let Some(timer) = self.timer.lock().await.take() else {
      return false;
    };
    timer.task.abort();
    self.state.lock().await.emit(GameEvent::Stopped);
    tracing::info!("game stopped");
    true
  }

  /// Returns whether the timer is running afterwards.
  pub async fn toggle(self: &Arc<Self>) -> bool {
    if self.stop_game().await {
      false
    } else {
      self.start_game().await
    }
  }

  pub async fn is_running(&self) -> bool {
    self.timer.lock().await.is_some()
  }

  /// Routes a raw key code: `Space` toggles the timer, direction keys queue
  /// a turn. Returns whether the key changed anything.
  pub async fn handle_key(self: &Arc<Self>, key: &str) -> bool {
    match parse_key(key) {
      Some(KeyCommand::ToggleRunning) => {
        self.toggle().await;
        true
      }
      Some(KeyCommand::Turn(direction)) => self.state.lock().await.set_direction_to(direction),
      None => false,
    }
  }

  pub async fn set_direction(&self, key: &str) -> bool {
    self.state.lock().await.set_direction(key)
  }

  /// Stops the timer and starts a new round from scratch.
  pub async fn restart(&self) {
    self.stop_game().await;
    self.state.lock().await.reset_round();
  }

  pub async fn subscribe(&self) -> UnboundedReceiver<GameEvent> {
    self.state.lock().await.subscribe()
  }

  pub async fn snapshot(&self) -> GameStateSnapshot {
    self.state.lock().await.snapshot()
  }

  async fn run_ticks(self: Arc<Self>, generation: u64) {
    let mut interval =
      tokio::time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
      interval.tick().await;
      let outcome = self.state.lock().await.tick();
      if let TickOutcome::Died(_) = outcome {
        self.finish_timer(generation).await;
        break;
      }
    }
  }

  async fn finish_timer(&self, generation: u64) {
    let mut timer = self.timer.lock().await;
    if !timer
      .as_ref()
      .is_some_and(|timer| timer.generation == generation)
    {
      return;
    }
    *timer = None;
    self.state.lock().await.emit(GameEvent::Stopped);
    tracing::info!("game stopped after a lost round");
  }
}

#[cfg(test)]
mod tests;
