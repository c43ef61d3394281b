use super::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
  Turn(Direction),
  ToggleRunning,
}

pub fn parse_key(code: &str) -> Option<KeyCommand> {
  let command = match code.trim() {
    "Space" => KeyCommand::ToggleRunning,
    other => KeyCommand::Turn(parse_direction(other)?),
  };
  Some(command)
}

pub fn parse_direction(code: &str) -> Option<Direction> {
  match code.trim() {
    "ArrowUp" | "KeyW" | "w" | "W" => Some(Direction::Up),
    "ArrowDown" | "KeyS" | "s" | "S" => Some(Direction::Down),
    "ArrowLeft" | "KeyA" | "a" | "A" => Some(Direction::Left),
    "ArrowRight" | "KeyD" | "d" | "D" => Some(Direction::Right),
    _ => None,
  }
}
