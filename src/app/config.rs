use crate::game::constants::{
  FOOD_COUNT, GRID_HEIGHT, GRID_WIDTH, MAX_GRID_CELLS, MAX_SPAWN_ATTEMPTS, MAX_TICK_MS,
  MIN_TICK_MS, OBSTACLE_COUNT, STARTING_LENGTH, TICK_MS,
};
use crate::game::types::GridResolution;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
  pub grid_width: i32,
  pub grid_height: i32,
  pub tick_ms: u64,
  pub starting_length: usize,
  pub food_count: usize,
  pub obstacle_count: usize,
  pub max_spawn_attempts: usize,
  pub seed: Option<u64>,
}

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      grid_width: GRID_WIDTH,
      grid_height: GRID_HEIGHT,
      tick_ms: TICK_MS,
      starting_length: STARTING_LENGTH,
      food_count: FOOD_COUNT,
      obstacle_count: OBSTACLE_COUNT,
      max_spawn_attempts: MAX_SPAWN_ATTEMPTS,
      seed: None,
    }
  }
}

impl GameConfig {
  pub fn from_env() -> Self {
    Self::default().with_overrides(|key| env::var(key).ok())
  }

  /// Applies `GRID_WIDTH`-style overrides. Missing or unparsable values
  /// keep the current setting.
  pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
    let read = |key: &str| lookup(key).map(|value| value.trim().to_string());
    if let Some(value) = parse_value(read("GRID_WIDTH")) {
      self.grid_width = value;
    }
    if let Some(value) = parse_value(read("GRID_HEIGHT")) {
      self.grid_height = value;
    }
    if let Some(value) = parse_value(read("TICK_MS")) {
      self.tick_ms = value;
    }
    if let Some(value) = parse_value(read("STARTING_LENGTH")) {
      self.starting_length = value;
    }
    if let Some(value) = parse_value(read("FOOD_COUNT")) {
      self.food_count = value;
    }
    if let Some(value) = parse_value(read("OBSTACLE_COUNT")) {
      self.obstacle_count = value;
    }
    if let Some(value) = parse_value(read("MAX_SPAWN_ATTEMPTS")) {
      self.max_spawn_attempts = value;
    }
    if let Some(value) = parse_value(read("GAME_SEED")) {
      self.seed = Some(value);
    }
    self
  }

  pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
    serde_json::from_str(text).context("failed to parse game config")
  }

  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let text = std::fs::read_to_string(path)
      .with_context(|| format!("failed to read game config {}", path.display()))?;
    Self::from_json_str(&text)
  }

  pub fn validate(&self) -> anyhow::Result<()> {
    ensure!(
      self.grid_width >= 2 && self.grid_height >= 2,
      "grid must be at least 2x2, got {}x{}",
      self.grid_width,
      self.grid_height
    );
    ensure!(
      (MIN_TICK_MS..=MAX_TICK_MS).contains(&self.tick_ms),
      "tick interval must be between {MIN_TICK_MS}ms and {MAX_TICK_MS}ms, got {}ms",
      self.tick_ms
    );
    ensure!(
      self.starting_length >= 1 && self.starting_length <= self.grid_width as usize,
      "starting length must be between 1 and the grid width ({}), got {}",
      self.grid_width,
      self.starting_length
    );
    let cells = self.resolution().cell_count();
    ensure!(
      cells <= MAX_GRID_CELLS,
      "grid has {cells} cells, at most {MAX_GRID_CELLS} are supported"
    );
    let occupied = self.starting_length + self.food_count + self.obstacle_count;
    ensure!(
      occupied <= cells,
      "snake, food and obstacles need {occupied} cells but the grid only has {cells}"
    );
    Ok(())
  }

  pub fn resolution(&self) -> GridResolution {
    GridResolution::new(self.grid_width, self.grid_height)
  }

  pub fn tick_interval(&self) -> Duration {
    Duration::from_millis(self.tick_ms)
  }
}

fn parse_value<T: FromStr>(value: Option<String>) -> Option<T> {
  value.and_then(|value| value.parse().ok())
}
