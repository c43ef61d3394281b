use super::entity::EntityId;
use super::linked_list::{LinkedList, NodeId};
use super::types::{FoodCarry, Segment};

/// Marks the head segment as carrying `food`. The marker then travels one
/// segment per tick until it reaches the tail and becomes a new segment.
pub fn swallow(body: &mut LinkedList<Segment>, food: EntityId) {
  let head = body.head();
  body.get_mut(head).carried_food = FoodCarry::Carrying(food);
}

/// Clears the tail marker if the bubble has arrived there.
pub fn release_at_tail(body: &mut LinkedList<Segment>) -> Option<EntityId> {
  let end = body.end();
  let segment = body.get_mut(end);
  match std::mem::take(&mut segment.carried_food) {
    FoodCarry::Carrying(food) => Some(food),
    FoodCarry::Empty => None,
  }
}

/// Moves a marker from `from` onto `to` (its successor toward the tail).
pub fn pass_back(body: &mut LinkedList<Segment>, from: NodeId, to: NodeId) {
  let carried = std::mem::take(&mut body.get_mut(from).carried_food);
  if carried.is_carrying() {
    body.get_mut(to).carried_food = carried;
  }
}

pub fn pending_growth(body: &LinkedList<Segment>) -> usize {
  body
    .iter()
    .filter(|segment| segment.carried_food.is_carrying())
    .count()
}
