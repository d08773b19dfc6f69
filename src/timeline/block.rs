//! Block records.

use std::fmt;
use std::time::Instant;

use crate::sky::ColorDescriptor;

/// Height (percent) every block starts growing from.
pub const INITIAL_HEIGHT: f64 = 0.05;

/// Creation-order identifier. Unique for the lifetime of a factory, resets included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block-{}", self.0)
    }
}

/// Horizontal layout of a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    /// One region across the full width.
    Full,
    /// Two side-by-side regions; `position` is the split point in percent of width.
    Split { position: f64 },
}

/// One simulated hour in the stack.
///
/// Identity, color, layout and sizing inputs are fixed at creation;
/// `current_height` and `growth_progress` move forward while the block is
/// the newest one.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    /// Stable per-block seed for breathing and split drift.
    pub seed: u64,
    /// Simulated hour (0-23).
    pub hour: u8,
    pub color: ColorDescriptor,
    pub layout: Layout,
    /// Nominal share of the stack (percent) before redistribution.
    pub target_height_share: f64,
    /// Multiplier used both for growth and for redistribution weight.
    pub height_factor: f64,
    /// Percent of the stack, as last advanced.
    pub current_height: f64,
    /// Growth completion in [0, 1].
    pub growth_progress: f64,
    pub created_at: Instant,
}

impl Block {
    /// Redistribution weight: nominal share × height factor.
    pub fn weight(&self) -> f64 {
        self.target_height_share * self.height_factor
    }
}

/// Announcement of a freshly inserted block, for the presentation side.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockCreated {
    pub id: BlockId,
    pub hour: u8,
    pub color: ColorDescriptor,
    pub layout: Layout,
    pub initial_height: f64,
    /// Blocks pushed out of the window by this insertion.
    pub evicted: Vec<BlockId>,
}

impl BlockCreated {
    pub fn new(block: &Block, evicted: Vec<BlockId>) -> Self {
        Self {
            id: block.id,
            hour: block.hour,
            color: block.color,
            layout: block.layout,
            initial_height: block.current_height,
            evicted,
        }
    }
}
