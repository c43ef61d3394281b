pub mod constants;
pub mod digestion;
pub mod entity;
pub mod events;
pub mod input;
pub mod linked_list;
pub mod math;
pub mod scene;
pub mod session;
pub mod snake;
pub mod types;

pub use events::{DeathReason, GameEvent};
pub use scene::{EntityRegistry, Scene};
pub use session::{GameSession, SessionState, TickOutcome};
pub use snake::Snake;
pub use types::{Direction, GameStateSnapshot, GridResolution, Position};
