use anyhow::Context;
use grid_snake::app::GameConfig;
use grid_snake::game::{EntityRegistry, GameSession};
use std::env;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let config = match env::var("GAME_CONFIG") {
    Ok(path) => GameConfig::load(&PathBuf::from(path))?,
    Err(_) => GameConfig::default(),
  }
  .with_overrides(|key| env::var(key).ok());

  let (width, height, tick_ms) = (config.grid_width, config.grid_height, config.tick_ms);
  let session = GameSession::new(config, Box::new(EntityRegistry::new()))
    .context("invalid game config")?;

  let mut events = session.subscribe().await;
  let printer = tokio::spawn(async move {
    while let Some(event) = events.recv().await {
      match serde_json::to_string(&event) {
        Ok(line) => println!("{line}"),
        Err(error) => tracing::warn!(?error, "failed to encode event"),
      }
    }
  });

  tracing::info!(width, height, tick_ms, "ready: Space starts, arrows or WASD steer, `quit` exits");

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
    let key = line.trim();
    match key {
      "quit" | "exit" => break,
      "restart" => session.restart().await,
      "snapshot" => {
        let snapshot = session.snapshot().await;
        println!("{}", serde_json::to_string(&snapshot)?);
      }
      _ => {
        if !session.handle_key(key).await {
          tracing::debug!(key, "key ignored");
        }
      }
    }
  }

  session.stop_game().await;
  drop(session);
  printer.await.context("event printer failed")?;
  Ok(())
}
