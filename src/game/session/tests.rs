use super::*;
use crate::game::entity::EntityId;
use crate::game::scene::EntityRegistry;
use crate::game::types::Position;
use std::sync::Mutex as StdMutex;

#[derive(Clone, Default)]
struct SharedScene(Arc<StdMutex<EntityRegistry>>);

impl SharedScene {
  fn count(&self, kind: EntityKind) -> usize {
    self.0.lock().unwrap().count(kind)
  }
}

impl Scene for SharedScene {
  fn add(&mut self, id: EntityId, position: Position) {
    self.0.lock().unwrap().add(id, position);
  }

  fn remove(&mut self, id: EntityId) {
    self.0.lock().unwrap().remove(id);
  }
}

fn quiet_config() -> GameConfig {
  GameConfig {
    grid_width: 10,
    grid_height: 10,
    obstacle_count: 0,
    food_count: 1,
    seed: Some(7),
    ..GameConfig::default()
  }
}

fn make_state(config: GameConfig) -> (SessionState, SharedScene) {
  let scene = SharedScene::default();
  let state = SessionState::new(config, Box::new(scene.clone()));
  (state, scene)
}

fn make_session(config: GameConfig) -> Arc<GameSession> {
  GameSession::new(config, Box::new(EntityRegistry::new())).expect("config should be valid")
}

/// Replaces every food with one at `position`.
fn place_food(state: &mut SessionState, position: Position) {
  for food in state.foods.drain(..) {
    state.scene.remove(food.id);
  }
  let id = state.ids.next(EntityKind::Food);
  state.scene.add(id, position);
  state.foods.push(Food { id, position });
}

fn place_obstacle(state: &mut SessionState, position: Position) {
  let id = state.ids.next(EntityKind::Obstacle);
  state.scene.add(id, position);
  state.obstacles.push(Obstacle {
    id,
    kind: ObstacleKind::Rock,
    position,
  });
}

fn tiny_full_row_config(max_spawn_attempts: usize) -> GameConfig {
  GameConfig {
    grid_width: 4,
    grid_height: 2,
    starting_length: 4,
    obstacle_count: 0,
    food_count: 0,
    max_spawn_attempts,
    seed: Some(1),
    ..GameConfig::default()
  }
}

#[test]
fn new_state_spawns_obstacles_and_food_on_distinct_free_cells() {
  let (state, scene) = make_state(GameConfig {
    seed: Some(3),
    ..GameConfig::default()
  });
  assert_eq!(state.obstacles().len(), 12);
  assert_eq!(state.foods().len(), 1);

  let resolution = state.resolution();
  let mut cells: HashSet<usize> = state.snake().indexes().iter().copied().collect();
  for food in state.foods() {
    assert!(cells.insert(food.index(resolution)));
  }
  for obstacle in state.obstacles() {
    assert!(cells.insert(obstacle.index(resolution)));
  }

  assert_eq!(scene.count(EntityKind::Segment), 4);
  assert_eq!(scene.count(EntityKind::Obstacle), 12);
  assert_eq!(scene.count(EntityKind::Food), 1);
}

#[test]
fn a_plain_tick_just_moves() {
  let (mut state, _) = make_state(quiet_config());
  place_food(&mut state, Position::new(0, 0));
  assert_eq!(state.tick(), TickOutcome::Moved);
  assert_eq!(state.snake().head_position(), Position::new(6, 5));
  assert_eq!(state.ticks(), 1);
  assert_eq!(state.score(), 0);
}

#[test]
fn eating_food_scores_and_grows_once_the_bubble_reaches_the_tail() {
  let (mut state, scene) = make_state(quiet_config());
  place_food(&mut state, Position::new(6, 5));

  assert_eq!(state.tick(), TickOutcome::Ate { score: 1 });
  assert_eq!(state.score(), 1);
  assert_eq!(state.best_score(), 1);
  assert_eq!(state.foods().len(), 1);
  assert_ne!(state.foods()[0].position, Position::new(6, 5));
  assert_eq!(scene.count(EntityKind::Food), 1);
  assert_eq!(state.snake().pending_growth(), 1);
  assert_eq!(state.snake().len(), 4);

  place_food(&mut state, Position::new(0, 0));
  for _ in 0..3 {
    assert_eq!(state.tick(), TickOutcome::Moved);
    assert_eq!(state.snake().len(), 4);
  }
  assert_eq!(state.tick(), TickOutcome::Moved);
  assert_eq!(state.snake().len(), 5);
  assert_eq!(state.snake().pending_growth(), 0);
  assert_eq!(scene.count(EntityKind::Segment), 5);
}

#[test]
fn hitting_an_obstacle_resets_the_round() {
  let (mut state, scene) = make_state(quiet_config());
  place_food(&mut state, Position::new(6, 5));
  state.tick();
  assert_eq!(state.score(), 1);

  place_obstacle(&mut state, Position::new(7, 5));
  state.config.obstacle_count = 2;
  assert_eq!(state.tick(), TickOutcome::Died(DeathReason::Obstacle));

  assert_eq!(state.score(), 0);
  assert_eq!(state.best_score(), 1);
  assert_eq!(state.snake().len(), 4);
  assert_eq!(state.snake().head_position(), Position::new(5, 5));
  assert_eq!(state.snake().direction(), Direction::Right);
  assert_eq!(state.snake().pending_growth(), 0);
  assert_eq!(state.obstacles().len(), 2);
  assert_eq!(state.foods().len(), 1);
  assert_eq!(scene.count(EntityKind::Segment), 4);
  assert_eq!(scene.count(EntityKind::Obstacle), 2);
  assert_eq!(scene.count(EntityKind::Food), 1);
}

#[test]
fn biting_the_body_resets_the_round() {
  let (mut state, _) = make_state(GameConfig {
    starting_length: 5,
    food_count: 0,
    ..quiet_config()
  });
  assert_eq!(state.tick(), TickOutcome::Moved);
  assert!(state.set_direction("ArrowDown"));
  assert_eq!(state.tick(), TickOutcome::Moved);
  assert!(state.set_direction("ArrowLeft"));
  assert_eq!(state.tick(), TickOutcome::Moved);
  assert!(state.set_direction("ArrowUp"));
  assert_eq!(state.tick(), TickOutcome::Died(DeathReason::SelfCollision));
  assert_eq!(state.snake().len(), 5);
  assert!(!state.snake().check_self_collision());
}

#[test]
fn reversal_input_is_dropped_at_the_session_level() {
  let (mut state, _) = make_state(quiet_config());
  assert!(!state.set_direction("ArrowLeft"));
  assert!(!state.set_direction("Escape"));
  assert!(state.set_direction("KeyW"));
}

#[test]
fn free_index_finds_the_last_free_cell() {
  let (mut state, _) = make_state(tiny_full_row_config(64));
  assert_eq!(
    state.snake().positions(),
    vec![
      Position::new(2, 1),
      Position::new(1, 1),
      Position::new(0, 1),
      Position::new(3, 1),
    ]
  );
  for x in [0, 1, 3] {
    place_obstacle(&mut state, Position::new(x, 0));
  }
  for _ in 0..20 {
    assert_eq!(state.free_index(), Some(2));
  }

  place_obstacle(&mut state, Position::new(2, 0));
  assert_eq!(state.free_index(), None);
}

#[test]
fn free_index_scans_when_sampling_is_disabled() {
  let (mut state, _) = make_state(tiny_full_row_config(0));
  place_obstacle(&mut state, Position::new(0, 0));
  place_obstacle(&mut state, Position::new(1, 0));
  for _ in 0..20 {
    let index = state.free_index().expect("two cells are free");
    assert!(index == 2 || index == 3, "picked occupied cell {index}");
  }
}

#[test]
fn spawning_on_a_full_board_is_skipped() {
  let (mut state, scene) = make_state(tiny_full_row_config(8));
  for x in 0..4 {
    place_obstacle(&mut state, Position::new(x, 0));
  }
  assert!(!state.spawn_food());
  assert!(state.foods().is_empty());
  assert_eq!(scene.count(EntityKind::Food), 0);
}

#[test]
fn restart_swaps_entities_but_keeps_the_snake() {
  let (mut state, scene) = make_state(GameConfig {
    seed: Some(11),
    ..GameConfig::default()
  });
  let old_ids: HashSet<_> = state
    .obstacles()
    .iter()
    .map(|obstacle| obstacle.id)
    .chain(state.foods().iter().map(|food| food.id))
    .collect();
  let snake_before = state.snake().positions();

  state.restart();

  assert_eq!(state.snake().positions(), snake_before);
  assert_eq!(state.obstacles().len(), 12);
  assert_eq!(state.foods().len(), 1);
  assert!(state
    .obstacles()
    .iter()
    .map(|obstacle| obstacle.id)
    .chain(state.foods().iter().map(|food| food.id))
    .all(|id| !old_ids.contains(&id)));
  assert_eq!(scene.count(EntityKind::Obstacle), 12);
  assert_eq!(scene.count(EntityKind::Food), 1);
}

#[test]
fn events_follow_each_tick() {
  let (mut state, _) = make_state(quiet_config());
  let mut events = state.subscribe();
  place_food(&mut state, Position::new(6, 5));
  state.tick();

  assert_eq!(
    events.try_recv().ok(),
    Some(GameEvent::Update {
      tick: 1,
      head: Position::new(6, 5),
      length: 4,
    })
  );
  assert_eq!(
    events.try_recv().ok(),
    Some(GameEvent::FoodEaten {
      food: Position::new(6, 5),
      score: 1,
    })
  );

  place_obstacle(&mut state, Position::new(7, 5));
  state.tick();
  assert!(matches!(events.try_recv().ok(), Some(GameEvent::Update { tick: 2, .. })));
  assert_eq!(
    events.try_recv().ok(),
    Some(GameEvent::Died {
      reason: DeathReason::Obstacle,
      score: 1,
      length: 4,
    })
  );
  assert_eq!(events.try_recv().ok(), Some(GameEvent::Restarted));
  assert!(events.try_recv().is_err());
}

#[test]
fn snapshot_serializes_the_board() {
  let (state, _) = make_state(quiet_config());
  let json = serde_json::to_value(state.snapshot()).expect("snapshot should serialize");
  assert_eq!(json["tick"], 0);
  assert_eq!(json["bestScore"], 0);
  assert_eq!(json["direction"], "right");
  assert_eq!(json["snake"][0]["x"], 5);
  assert_eq!(json["snake"].as_array().map(Vec::len), Some(4));
  assert_eq!(json["indexes"].as_array().map(Vec::len), Some(4));
  assert_eq!(json["foods"].as_array().map(Vec::len), Some(1));
  assert_eq!(json["obstacles"].as_array().map(Vec::len), Some(0));
}

#[test]
fn session_rejects_an_invalid_config() {
  let config = GameConfig {
    grid_width: 1,
    ..GameConfig::default()
  };
  assert!(GameSession::new(config, Box::new(EntityRegistry::new())).is_err());
}

#[tokio::test]
async fn stop_game_is_idempotent() {
  let session = make_session(quiet_config());
  assert!(!session.stop_game().await);
  assert!(session.timer.lock().await.is_none());
  assert!(!session.stop_game().await);
  assert!(session.timer.lock().await.is_none());
  assert!(!session.is_running().await);
}

#[tokio::test]
async fn timer_ticks_until_stopped() {
  let session = make_session(GameConfig {
    tick_ms: 10,
    food_count: 0,
    ..quiet_config()
  });
  assert!(session.start_game().await);
  assert!(!session.start_game().await);
  tokio::time::sleep(Duration::from_millis(120)).await;
  assert!(session.snapshot().await.tick > 0);

  assert!(session.stop_game().await);
  let frozen = session.snapshot().await.tick;
  tokio::time::sleep(Duration::from_millis(50)).await;
  assert_eq!(session.snapshot().await.tick, frozen);
  assert!(!session.is_running().await);
}

#[tokio::test]
async fn space_toggles_and_arrows_turn() {
  let session = make_session(quiet_config());
  let mut events = session.subscribe().await;

  assert!(session.handle_key("Space").await);
  assert!(session.is_running().await);
  assert!(session.handle_key("Space").await);
  assert!(!session.is_running().await);
  assert!(!session.handle_key("Enter").await);
  assert!(session.handle_key("ArrowUp").await);
  assert!(!session.handle_key("ArrowLeft").await);

  assert_eq!(events.try_recv().ok(), Some(GameEvent::Started));
  assert_eq!(events.try_recv().ok(), Some(GameEvent::Stopped));
}

#[tokio::test]
async fn losing_a_round_stops_the_timer() {
  let session = make_session(GameConfig {
    tick_ms: 10,
    food_count: 0,
    ..quiet_config()
  });
  place_obstacle(&mut *session.state.lock().await, Position::new(6, 5));
  let mut events = session.subscribe().await;
  assert!(session.start_game().await);

  let mut seen = Vec::new();
  let waited = tokio::time::timeout(Duration::from_secs(2), async {
    while let Some(event) = events.recv().await {
      let stopped = event == GameEvent::Stopped;
      seen.push(event);
      if stopped {
        break;
      }
    }
  })
  .await;
  assert!(waited.is_ok(), "timer never stopped");

  assert_eq!(seen.first(), Some(&GameEvent::Started));
  assert!(seen.contains(&GameEvent::Died {
    reason: DeathReason::Obstacle,
    score: 0,
    length: 4,
  }));
  assert!(seen.contains(&GameEvent::Restarted));
  assert!(!session.is_running().await);
  assert!(session.start_game().await);
  assert!(session.stop_game().await);
}

#[tokio::test]
async fn restart_stops_the_timer_and_resets_the_round() {
  let session = make_session(GameConfig {
    tick_ms: 10,
    food_count: 0,
    ..quiet_config()
  });
  session.start_game().await;
  tokio::time::sleep(Duration::from_millis(40)).await;
  session.restart().await;

  assert!(!session.is_running().await);
  let snapshot = session.snapshot().await;
  assert_eq!(snapshot.score, 0);
  assert_eq!(snapshot.snake[0], Position::new(5, 5));
  assert_eq!(snapshot.direction, Direction::Right);
}
