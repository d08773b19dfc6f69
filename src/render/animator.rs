/// Continuous per-block motion.
///
/// Turns a block's stable seed plus a timebase into motion:
/// - Breathing: gentle sine-wave height oscillation with a per-block speed,
///   depth and phase so neighbours never pulse together. All blocks read one
///   shared `BreathClock`, which integrates the speed slider over time.
/// - Split drift: the split point glides between seeded targets, holding
///   still for a while after each glide. Stateless, driven by block age.

use std::time::Instant;

use crate::config::SplitMotionConfig;
use crate::fast_math::{lerp, seed_unit, smoothstep};
use crate::timeline::{Block, Layout};

/// Slowest breathing period is `BREATH_PERIOD_MIN_MS + 4 * BREATH_PERIOD_STEP_MS`.
const BREATH_PERIOD_MIN_MS: f64 = 3000.0;
const BREATH_PERIOD_STEP_MS: f64 = 500.0;
/// Depth spans 1.0% to 2.8%.
const BREATH_DEPTH_MIN: f64 = 0.01;
const BREATH_DEPTH_STEP: f64 = 0.002;
/// Phase steps of ~2π/100.
const BREATH_PHASE_STEP: f64 = 0.0628;

const SALT_GLIDE: u64 = 0;
const SALT_HOLD: u64 = 1;
/// Drift target `k` uses salt `SALT_TARGET_BASE + k`.
const SALT_TARGET_BASE: u64 = 2;

/// Global breathing multipliers (the intensity/speed sliders).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSettings {
    /// Scales breathing depth. 0 disables breathing.
    pub intensity: f64,
    /// Scales breathing rate from here on. 0 freezes the phase.
    pub speed: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            speed: 1.0,
        }
    }
}

/// Per-block breathing parameters, derived from the block seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breathing {
    /// Milliseconds per radian.
    pub period_ms: f64,
    /// Relative amplitude.
    pub depth: f64,
    /// Radians.
    pub phase: f64,
}

impl Breathing {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            period_ms: BREATH_PERIOD_MIN_MS + (seed % 5) as f64 * BREATH_PERIOD_STEP_MS,
            depth: BREATH_DEPTH_MIN + ((seed >> 8) % 10) as f64 * BREATH_DEPTH_STEP,
            phase: ((seed >> 16) % 100) as f64 * BREATH_PHASE_STEP,
        }
    }

    /// Multiplicative height factor `1 + intensity·depth·sin(breath/period + phase)`.
    pub fn factor(&self, breath_ms: f64, intensity: f64) -> f64 {
        let angle = breath_ms / self.period_ms + self.phase;
        1.0 + self.depth * intensity * angle.sin()
    }
}

/// Shared breathing time in milliseconds.
///
/// Each `advance` adds the wall time since the previous one, scaled by the
/// speed in effect now. Changing speed changes the rate, never the phase.
#[derive(Debug, Clone, Default)]
pub struct BreathClock {
    elapsed_ms: f64,
    last: Option<Instant>,
}

impl BreathClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to `now` at `speed`; returns the accumulated breathing time.
    /// A `now` earlier than the last call adds nothing.
    pub fn advance(&mut self, now: Instant, speed: f64) -> f64 {
        match self.last {
            Some(last) if now > last => {
                let dt_ms = now.duration_since(last).as_secs_f64() * 1000.0;
                self.elapsed_ms += dt_ms * speed.max(0.0);
                self.last = Some(now);
            }
            Some(_) => {}
            None => self.last = Some(now),
        }
        self.elapsed_ms
    }
}

/// Where a block's split point sits at `now`. `None` for full-width blocks.
pub fn split_position(block: &Block, now: Instant, cfg: &SplitMotionConfig) -> Option<f64> {
    let home = match block.layout {
        Layout::Full => return None,
        Layout::Split { position } => position,
    };
    if !cfg.enabled {
        return Some(home);
    }

    let glide_ms = lerp(cfg.duration_min_s, cfg.duration_max_s, seed_unit(block.seed, SALT_GLIDE))
        * 1000.0;
    let hold_ms = lerp(
        cfg.update_min_ms as f64,
        cfg.update_max_ms as f64,
        seed_unit(block.seed, SALT_HOLD),
    );
    let cycle_ms = glide_ms + hold_ms;
    if cycle_ms <= 0.0 || cycle_ms.is_nan() {
        return Some(home);
    }

    let elapsed_ms = now.saturating_duration_since(block.created_at).as_secs_f64() * 1000.0;
    let cycle = (elapsed_ms / cycle_ms).floor();
    let within = elapsed_ms - cycle * cycle_ms;
    let k = cycle as u64;

    let from = drift_target(block.seed, k, home, cfg);
    let to = drift_target(block.seed, k + 1, home, cfg);
    let t = if glide_ms > 0.0 { within / glide_ms } else { 1.0 };
    Some(lerp(from, to, smoothstep(t)))
}

/// Target 0 is the block's own split point; later targets are seeded positions.
fn drift_target(seed: u64, k: u64, home: f64, cfg: &SplitMotionConfig) -> f64 {
    if k == 0 {
        home.clamp(cfg.min_position, cfg.max_position)
    } else {
        lerp(
            cfg.min_position,
            cfg.max_position,
            seed_unit(seed, SALT_TARGET_BASE.wrapping_add(k)),
        )
    }
}
