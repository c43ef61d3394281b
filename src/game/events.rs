use super::types::Position;
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeathReason {
  SelfCollision,
  Obstacle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
  #[serde(rename = "update")]
  Update {
    tick: u64,
    head: Position,
    length: usize,
  },
  #[serde(rename = "foodEaten")]
  FoodEaten { food: Position, score: u32 },
  #[serde(rename = "died")]
  Died {
    reason: DeathReason,
    score: u32,
    length: usize,
  },
  #[serde(rename = "restarted")]
  Restarted,
  #[serde(rename = "started")]
  Started,
  #[serde(rename = "stopped")]
  Stopped,
}

#[derive(Debug, Default)]
pub struct Subscribers {
  senders: Vec<UnboundedSender<GameEvent>>,
}

impl Subscribers {
  pub fn subscribe(&mut self) -> UnboundedReceiver<GameEvent> {
    let (sender, receiver) = mpsc::unbounded_channel();
    self.senders.push(sender);
    receiver
  }

  pub fn send(&mut self, event: GameEvent) {
    self.senders.retain(|sender| sender.send(event.clone()).is_ok());
  }

  pub fn len(&self) -> usize {
    self.senders.len()
  }

  pub fn is_empty(&self) -> bool {
    self.senders.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn events_serialize_with_a_type_tag() {
    let json = serde_json::to_value(GameEvent::Died {
      reason: DeathReason::SelfCollision,
      score: 3,
      length: 7,
    })
    .expect("event should serialize");
    assert_eq!(json["type"], "died");
    assert_eq!(json["reason"], "selfCollision");
    assert_eq!(json["score"], 3);

    let json = serde_json::to_value(GameEvent::Update {
      tick: 2,
      head: Position::new(1, 4),
      length: 4,
    })
    .expect("event should serialize");
    assert_eq!(json["type"], "update");
    assert_eq!(json["head"]["z"], 4);
  }

  #[test]
  fn closed_receivers_are_pruned_on_send() {
    let mut subscribers = Subscribers::default();
    let mut kept = subscribers.subscribe();
    let dropped = subscribers.subscribe();
    drop(dropped);

    subscribers.send(GameEvent::Started);
    assert_eq!(subscribers.len(), 1);
    assert_eq!(kept.try_recv().ok(), Some(GameEvent::Started));
  }
}
