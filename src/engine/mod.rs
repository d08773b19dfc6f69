//! Engine: the polled scheduler that drives the timeline.

pub mod cadence;
pub mod timelapse;

pub use cadence::{Cadence, MAX_CATCH_UP};
pub use timelapse::{Pump, Timelapse};
