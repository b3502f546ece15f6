//! BFS frontier queue and visited set.
//!
//! FIFO order gives breadth-first semantics: all depth-d entries are
//! dequeued before any depth-(d+1) entry, given the crawler enqueues
//! discoveries at depth+1. Duplicate names may sit in the queue; the
//! crawler suppresses them at dequeue time via the visited set.

use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<(String, u32)>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unconditionally; duplicates are allowed in the queue.
    pub fn enqueue(&mut self, name: &str, depth: u32) {
        self.queue.push_back((name.to_string(), depth));
    }

    /// Pop the oldest entry, or `None` when the queue is exhausted.
    pub fn dequeue(&mut self) -> Option<(String, u32)> {
        self.queue.pop_front()
    }

    pub fn mark_visited(&mut self, name: &str) {
        self.visited.insert(name.to_string());
    }

    pub fn is_visited(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    /// Number of names processed so far (including not-found ones).
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}
