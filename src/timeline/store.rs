//! Timeline Store: the bounded, newest-first rolling window of blocks.
//!
//! Insertion is always at the head, eviction always trims the tail, and
//! retained blocks never change relative order.

use std::collections::VecDeque;

use super::block::{Block, BlockId};

#[derive(Debug, Clone)]
pub struct TimelineStore {
    blocks: VecDeque<Block>,
    capacity: usize,
}

impl TimelineStore {
    /// `capacity` is `MAX_BLOCKS`; zero is rejected by config validation.
    pub fn new(capacity: usize) -> Self {
        Self {
            blocks: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Prepend `block`; returns the ids trimmed off the tail.
    pub fn insert(&mut self, block: Block) -> Vec<BlockId> {
        self.blocks.push_front(block);
        if self.blocks.len() <= self.capacity {
            return Vec::new();
        }
        self.blocks
            .drain(self.capacity..)
            .map(|evicted| evicted.id)
            .collect()
    }

    /// Drop every block.
    pub fn reset(&mut self) {
        self.blocks.clear();
    }

    /// Read view, newest first.
    pub fn all(&self) -> std::collections::vec_deque::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn newest(&self) -> Option<&Block> {
        self.blocks.front()
    }

    /// Replace the newest block with `f(newest)`. No-op when empty.
    pub fn update_newest(&mut self, f: impl FnOnce(&Block) -> Block) {
        if let Some(head) = self.blocks.front_mut() {
            *head = f(head);
        }
    }
}
