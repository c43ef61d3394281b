//! Grid snake engine: an arena-backed snake body moving on a toroidal grid,
//! growth that travels down the body, collision checks and a tick-driven
//! session that respawns food and obstacles. Rendering is left to the host,
//! which plugs in through [`game::Scene`] and the [`game::GameEvent`] stream.

pub mod app;
pub mod game;
