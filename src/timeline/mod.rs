//! The block timeline: records, their factory, and the rolling window that owns them.

pub mod block;
pub mod factory;
pub mod store;

pub use block::{Block, BlockCreated, BlockId, Layout, INITIAL_HEIGHT};
pub use factory::BlockFactory;
pub use store::TimelineStore;
