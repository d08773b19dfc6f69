pub mod clock;
pub mod config;
pub mod engine;
pub mod fast_math;
pub mod render;
pub mod sky;
pub mod timeline;
