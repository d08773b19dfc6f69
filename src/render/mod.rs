pub mod animator;
pub mod resolver;

pub use animator::{split_position, AnimationSettings, BreathClock, Breathing};
pub use resolver::{advance, depth_blur, scale_factor, HeightUpdate, Resolver, FULL_SPAN};
