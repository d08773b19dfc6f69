//! Timelapse configuration.
//!
//! One `TimelapseConfig` drives the whole engine. It deserializes from RON
//! with every field optional (missing fields take the stock values), and
//! `validate()` rejects values the engine cannot run with. The engine itself
//! assumes a validated config and never re-checks.
//!
//! ```ron
//! (
//!     max_blocks: 12,
//!     sky: (gradient_chance: 0.8),
//!     animation: (pause_policy: ClockOnly),
//! )
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Environment variable naming a RON config file for the binary.
pub const CONFIG_ENV: &str = "HORIZON_CONFIG";

/// Configuration load/validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// What a pause suspends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PausePolicy {
    /// Only the clock stops. Growth, breathing and drift keep following wall time.
    ClockOnly,
    /// The animation timebase stops too; everything resumes where it left off.
    #[default]
    FreezeAll,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimelapseConfig {
    /// Rolling-window capacity of the timeline.
    pub max_blocks: usize,
    pub clock: ClockConfig,
    pub blocks: BlockConfig,
    pub sky: SkyConfig,
    pub animation: AnimationConfig,
    pub split_motion: SplitMotionConfig,
}

impl Default for TimelapseConfig {
    fn default() -> Self {
        Self {
            max_blocks: 24,
            clock: ClockConfig::default(),
            blocks: BlockConfig::default(),
            sky: SkyConfig::default(),
            animation: AnimationConfig::default(),
            split_motion: SplitMotionConfig::default(),
        }
    }
}

/// Simulated clock.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub initial_hour: u8,
    pub initial_minute: u8,
    /// Real time per simulated minute.
    pub tick_interval_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            initial_hour: 5,
            initial_minute: 0,
            tick_interval_ms: 1000,
        }
    }
}

impl ClockConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Block factory randomness.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    pub min_height_factor: f64,
    pub max_height_factor: f64,
    /// Shrinks the baseline share so the adapter's 1.05 scaling still fits.
    pub height_headroom: f64,
    /// Probability of an extra-short / extra-tall block.
    pub dramatic_chance: f64,
    pub split_chance: f64,
    /// Candidate split points (percent of width).
    pub split_positions: Vec<f64>,
    /// Sunrise and sunset hours always split.
    pub split_at_transitions: bool,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            min_height_factor: 0.1,
            max_height_factor: 2.2,
            height_headroom: 0.98,
            dramatic_chance: 0.2,
            split_chance: 0.3,
            split_positions: vec![25.0, 33.0, 50.0, 67.0, 75.0],
            split_at_transitions: true,
        }
    }
}

/// Sky color randomness.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub gradient_chance: f64,
    /// Probability of `to bottom` over `to right`.
    pub vertical_gradient_chance: f64,
    /// Night zone only.
    pub aurora_chance: f64,
    /// Probability that an aurora gradient mixes two palette hues.
    pub aurora_mix_chance: f64,
    pub saturation_boost_chance: f64,
    /// Saturation points added by a boost.
    pub saturation_boost: f64,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            gradient_chance: 0.5,
            vertical_gradient_chance: 0.5,
            aurora_chance: 0.35,
            aurora_mix_chance: 0.5,
            saturation_boost_chance: 0.05,
            saturation_boost: 15.0,
        }
    }
}

/// Resolver timing and depth styling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub growth_duration_ms: u64,
    pub height_update_interval_ms: u64,
    pub blur_base: f64,
    pub blur_variation: f64,
    /// Lower bound on the redistribution scale (only when there is something to scale).
    pub min_scale_factor: f64,
    /// Floor height (percent) for non-newest blocks.
    pub min_block_height: f64,
    pub pause_policy: PausePolicy,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            growth_duration_ms: 60_000,
            height_update_interval_ms: 100,
            blur_base: 0.1,
            blur_variation: 0.5,
            min_scale_factor: 0.0,
            min_block_height: 0.0,
            pause_policy: PausePolicy::default(),
        }
    }
}

impl AnimationConfig {
    pub fn growth_duration(&self) -> Duration {
        Duration::from_millis(self.growth_duration_ms)
    }

    pub fn height_update_interval(&self) -> Duration {
        Duration::from_millis(self.height_update_interval_ms)
    }
}

/// Horizontal drift of split points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SplitMotionConfig {
    pub enabled: bool,
    /// Glide duration bounds (seconds).
    pub duration_min_s: f64,
    pub duration_max_s: f64,
    /// Drift bounds (percent of width).
    pub min_position: f64,
    pub max_position: f64,
    /// Hold between glides (milliseconds).
    pub update_min_ms: u64,
    pub update_max_ms: u64,
}

impl Default for SplitMotionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_min_s: 60.0,
            duration_max_s: 120.0,
            min_position: 10.0,
            max_position: 90.0,
            update_min_ms: 5000,
            update_max_ms: 12_000,
        }
    }
}

impl TimelapseConfig {
    /// Parse and validate a RON document.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&text)
    }

    /// Load from `$HORIZON_CONFIG` when set, stock defaults otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                log::info!("Loading config from {}", Path::new(&path).display());
                Self::load(path)
            }
            None => {
                log::info!("{} not set, using default config", CONFIG_ENV);
                Ok(Self::default())
            }
        }
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_blocks == 0 {
            return Err(ConfigError::invalid("max_blocks", "must be at least 1"));
        }

        let clock = &self.clock;
        if clock.initial_hour >= 24 {
            return Err(ConfigError::invalid("clock.initial_hour", "must be 0-23"));
        }
        if clock.initial_minute >= 60 {
            return Err(ConfigError::invalid("clock.initial_minute", "must be 0-59"));
        }
        if clock.tick_interval_ms == 0 {
            return Err(ConfigError::invalid("clock.tick_interval_ms", "must be non-zero"));
        }

        let blocks = &self.blocks;
        if blocks.min_height_factor <= 0.0 || blocks.min_height_factor.is_nan() {
            return Err(ConfigError::invalid("blocks.min_height_factor", "must be positive"));
        }
        if blocks.max_height_factor < blocks.min_height_factor {
            return Err(ConfigError::invalid(
                "blocks.max_height_factor",
                format!("{} is below min_height_factor", blocks.max_height_factor),
            ));
        }
        if !(blocks.height_headroom > 0.0 && blocks.height_headroom <= 1.0) {
            return Err(ConfigError::invalid("blocks.height_headroom", "must be in (0, 1]"));
        }
        check_probability("blocks.dramatic_chance", blocks.dramatic_chance)?;
        check_probability("blocks.split_chance", blocks.split_chance)?;
        if blocks.split_positions.is_empty() {
            return Err(ConfigError::invalid("blocks.split_positions", "must not be empty"));
        }
        if let Some(p) = blocks
            .split_positions
            .iter()
            .find(|p| !(10.0..=90.0).contains(*p))
        {
            return Err(ConfigError::invalid(
                "blocks.split_positions",
                format!("{} is outside 10-90", p),
            ));
        }

        let sky = &self.sky;
        check_probability("sky.gradient_chance", sky.gradient_chance)?;
        check_probability("sky.vertical_gradient_chance", sky.vertical_gradient_chance)?;
        check_probability("sky.aurora_chance", sky.aurora_chance)?;
        check_probability("sky.aurora_mix_chance", sky.aurora_mix_chance)?;
        check_probability("sky.saturation_boost_chance", sky.saturation_boost_chance)?;
        if !(0.0..=100.0).contains(&sky.saturation_boost) {
            return Err(ConfigError::invalid("sky.saturation_boost", "must be 0-100"));
        }

        let anim = &self.animation;
        if anim.growth_duration_ms == 0 {
            return Err(ConfigError::invalid("animation.growth_duration_ms", "must be non-zero"));
        }
        if anim.height_update_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "animation.height_update_interval_ms",
                "must be non-zero",
            ));
        }
        if !(anim.blur_base >= 0.0 && anim.blur_variation >= 0.0) {
            return Err(ConfigError::invalid("animation.blur_base", "blur must be non-negative"));
        }
        if anim.min_scale_factor < 0.0 || anim.min_scale_factor.is_nan() {
            return Err(ConfigError::invalid("animation.min_scale_factor", "must be non-negative"));
        }
        if !(0.0..=100.0).contains(&anim.min_block_height) {
            return Err(ConfigError::invalid("animation.min_block_height", "must be 0-100"));
        }

        let split = &self.split_motion;
        if !(split.duration_min_s > 0.0 && split.duration_max_s >= split.duration_min_s) {
            return Err(ConfigError::invalid(
                "split_motion.duration_min_s",
                "need 0 < duration_min_s <= duration_max_s",
            ));
        }
        if !(0.0 <= split.min_position
            && split.min_position <= split.max_position
            && split.max_position <= 100.0)
        {
            return Err(ConfigError::invalid(
                "split_motion.min_position",
                "need 0 <= min_position <= max_position <= 100",
            ));
        }
        if split.update_max_ms < split.update_min_ms {
            return Err(ConfigError::invalid(
                "split_motion.update_max_ms",
                "is below update_min_ms",
            ));
        }

        Ok(())
    }
}

fn check_probability(field: &'static str, p: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{} is not a probability", p)))
    }
}
