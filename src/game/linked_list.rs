//! Append-only doubly linked list backed by an arena.
//!
//! Nodes are never unlinked individually, so a node's arena slot doubles as
//! its stable id. `head` leads movement, `end` is the tail.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Node<T> {
  pub data: T,
  next: Option<NodeId>,
  prev: Option<NodeId>,
}

impl<T> Node<T> {
  fn detached(data: T) -> Self {
    Self {
      data,
      next: None,
      prev: None,
    }
  }
}

#[derive(Debug, Clone)]
pub struct LinkedList<T> {
  nodes: Vec<Node<T>>,
  head: NodeId,
  end: NodeId,
}

impl<T> LinkedList<T> {
  pub fn new(head: T) -> Self {
    Self {
      nodes: vec![Node::detached(head)],
      head: NodeId(0),
      end: NodeId(0),
    }
  }

  pub fn add_node(&mut self, data: T) -> NodeId {
    let id = NodeId(self.nodes.len());
    let mut node = Node::detached(data);
    node.prev = Some(self.end);
    self.nodes.push(node);
    self.nodes[self.end.0].next = Some(id);
    self.end = id;
    id
  }

  pub fn head(&self) -> NodeId {
    self.head
  }

  pub fn end(&self) -> NodeId {
    self.end
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// Always false; a list holds at least its head.
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn get(&self, id: NodeId) -> &T {
    &self.nodes[id.0].data
  }

  pub fn get_mut(&mut self, id: NodeId) -> &mut T {
    &mut self.nodes[id.0].data
  }

  pub fn next(&self, id: NodeId) -> Option<NodeId> {
    self.nodes[id.0].next
  }

  pub fn prev(&self, id: NodeId) -> Option<NodeId> {
    self.nodes[id.0].prev
  }

  /// Head to end.
  pub fn iter(&self) -> Iter<'_, T> {
    Iter {
      list: self,
      cursor: Some(self.head),
      forward: true,
    }
  }

  /// End to head.
  pub fn iter_rev(&self) -> Iter<'_, T> {
    Iter {
      list: self,
      cursor: Some(self.end),
      forward: false,
    }
  }
}

pub struct Iter<'a, T> {
  list: &'a LinkedList<T>,
  cursor: Option<NodeId>,
  forward: bool,
}

impl<'a, T> Iterator for Iter<'a, T> {
  type Item = &'a T;

  fn next(&mut self) -> Option<Self::Item> {
    let id = self.cursor?;
    self.cursor = if self.forward {
      self.list.next(id)
    } else {
      self.list.prev(id)
    };
    Some(self.list.get(id))
  }
}
