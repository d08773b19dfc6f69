//! Height/Blur Resolver
//!
//! Per-frame transform from the timeline to visual parameters:
//!
//! 1. Newest block grows: `progress = min(elapsed / growth_duration, 1)`,
//!    `height = 0.05 + span · progress^(1/3)`, where `span` is the block's
//!    weighted share, or the whole remaining stack when it is the only block.
//! 2. Older blocks split what is left: `scale = (100 − head) / Σ weight`.
//! 3. Older blocks breathe around their scaled height.
//! 4. Deeper blocks blur more: `blur = base + variation · i/(n−1)`.
//! 5. Newest on top: `z = n − i`.
//!
//! `advance` is the only growth state transition; `resolve` is pure and
//! recomputes the head's growth itself, so it is correct with or without a
//! prior `advance`.

use std::time::Instant;

use super::animator::{split_position, AnimationSettings, Breathing};
use crate::config::{AnimationConfig, SplitMotionConfig};
use crate::fast_math::ease_out_cbrt;
use crate::timeline::{Block, BlockId, INITIAL_HEIGHT};

/// Total stack height, in percent.
pub const FULL_SPAN: f64 = 100.0;

/// Visual parameters for one block on one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightUpdate {
    pub id: BlockId,
    /// Percent of the stack height, before the adapter's own scaling.
    pub target_height: f64,
    /// Stacking order; the newest block is highest.
    pub z_index: u32,
    /// Depth blur in pixels.
    pub blur_amount: f64,
    /// Current split point for split blocks.
    pub split_position: Option<f64>,
}

/// Growth step for the newest block. Returns the updated record.
///
/// `sole` marks the only block in the store, which grows toward the full span
/// instead of its own share. Progress never moves backwards.
pub fn advance(block: &Block, now: Instant, sole: bool, cfg: &AnimationConfig) -> Block {
    let elapsed = now.saturating_duration_since(block.created_at);
    let duration = cfg.growth_duration().as_secs_f64();
    let progress = if duration > 0.0 {
        (elapsed.as_secs_f64() / duration).min(1.0)
    } else {
        1.0
    }
    .max(block.growth_progress);

    let span = if sole {
        FULL_SPAN - INITIAL_HEIGHT
    } else {
        block.weight()
    };

    Block {
        current_height: INITIAL_HEIGHT + span * ease_out_cbrt(progress),
        growth_progress: progress,
        ..block.clone()
    }
}

/// Redistribution scale for the non-newest blocks.
///
/// `remaining / needed`, floored at `min_scale`; zero when nothing needs space.
pub fn scale_factor(remaining: f64, needed: f64, min_scale: f64) -> f64 {
    if needed > 0.0 {
        (remaining / needed).max(min_scale)
    } else {
        0.0
    }
}

/// Blur for stack position `index` out of `len`.
pub fn depth_blur(index: usize, len: usize, cfg: &AnimationConfig) -> f64 {
    let denom = len.saturating_sub(1).max(1) as f64;
    let position = (index as f64 / denom).min(1.0);
    cfg.blur_base + position * cfg.blur_variation
}

/// Stateless frame resolver.
#[derive(Debug, Clone)]
pub struct Resolver {
    animation: AnimationConfig,
    split_motion: SplitMotionConfig,
}

impl Resolver {
    pub fn new(animation: AnimationConfig, split_motion: SplitMotionConfig) -> Self {
        Self {
            animation,
            split_motion,
        }
    }

    /// Growth step for the head of a store of `len` blocks.
    pub fn advance(&self, head: &Block, now: Instant, len: usize) -> Block {
        advance(head, now, len == 1, &self.animation)
    }

    /// One update per block, newest first. Empty input resolves to nothing.
    ///
    /// `breath_ms` is the shared breathing time from a `BreathClock`.
    pub fn resolve<'a, I>(
        &self,
        blocks: I,
        now: Instant,
        settings: &AnimationSettings,
        breath_ms: f64,
    ) -> Vec<HeightUpdate>
    where
        I: IntoIterator<Item = &'a Block>,
        I::IntoIter: ExactSizeIterator + Clone,
    {
        let blocks = blocks.into_iter();
        let len = blocks.len();
        let head = match blocks.clone().next() {
            Some(head) => self.advance(head, now, len),
            None => return Vec::new(),
        };

        let remaining = FULL_SPAN - head.current_height;
        let needed: f64 = blocks.clone().skip(1).map(Block::weight).sum();
        let scale = scale_factor(remaining, needed, self.animation.min_scale_factor);

        blocks
            .enumerate()
            .map(|(i, block)| {
                let target_height = if i == 0 {
                    head.current_height
                } else {
                    let breath =
                        Breathing::from_seed(block.seed).factor(breath_ms, settings.intensity);
                    (block.weight() * scale * breath).max(self.animation.min_block_height)
                };

                HeightUpdate {
                    id: block.id,
                    target_height,
                    z_index: (len - i) as u32,
                    blur_amount: depth_blur(i, len, &self.animation),
                    split_position: split_position(block, now, &self.split_motion),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_math::splitmix64;
    use crate::sky::{ColorDescriptor, Hsl};
    use crate::timeline::Layout;
    use std::time::Duration;

    fn block(n: u64, share: f64, factor: f64, created_at: Instant) -> Block {
        Block {
            id: BlockId(n),
            seed: splitmix64(n),
            hour: (n % 24) as u8,
            color: ColorDescriptor::Solid(Hsl::new(210.0, 50.0, 70.0)),
            layout: Layout::Full,
            target_height_share: share,
            height_factor: factor,
            current_height: INITIAL_HEIGHT,
            growth_progress: 0.0,
            created_at,
        }
    }

    fn resolver() -> Resolver {
        Resolver::new(AnimationConfig::default(), SplitMotionConfig::default())
    }

    /// `n` blocks created a minute apart from `t0`, newest first like the store.
    fn stack(t0: Instant, n: u64) -> Vec<Block> {
        (0..n)
            .rev()
            .map(|k| {
                let created_at = t0 + Duration::from_secs(60 * k);
                block(k, 4.0 + k as f64 * 0.1, 1.0 + (k % 3) as f64 * 0.3, created_at)
            })
            .collect()
    }

    /// Just after the newest block of `stack(t0, n)` was created.
    fn after(t0: Instant, n: u64) -> Instant {
        t0 + Duration::from_secs(60 * n)
    }

    #[test]
    fn empty_store_resolves_to_nothing() {
        let blocks: Vec<Block> = Vec::new();
        assert!(resolver()
            .resolve(&blocks, Instant::now(), &AnimationSettings::default(), 0.0)
            .is_empty());
    }

    #[test]
    fn single_block_reaches_full_span() {
        let t0 = Instant::now();
        let cfg = AnimationConfig::default();
        let head = block(0, 4.0, 1.0, t0);
        let grown = advance(&head, t0 + cfg.growth_duration(), true, &cfg);
        assert_eq!(grown.growth_progress, 1.0);
        assert!((grown.current_height - FULL_SPAN).abs() < 1e-9);

        let updates = resolver().resolve(
            &[grown],
            t0 + cfg.growth_duration(),
            &AnimationSettings::default(),
            0.0,
        );
        assert_eq!(updates.len(), 1);
        assert!((updates[0].target_height - FULL_SPAN).abs() < 1e-9);
        assert_eq!(updates[0].z_index, 1);
        assert!((updates[0].blur_amount - cfg.blur_base).abs() < 1e-12);
    }

    #[test]
    fn growth_starts_at_floor_and_eases_out() {
        let t0 = Instant::now();
        let cfg = AnimationConfig::default();
        let head = block(0, 4.0, 1.5, t0);

        let start = advance(&head, t0, false, &cfg);
        assert_eq!(start.current_height, INITIAL_HEIGHT);

        // 1/8 of the way in time is half the way in height.
        let eighth = advance(&head, t0 + cfg.growth_duration() / 8, false, &cfg);
        assert!((eighth.current_height - (INITIAL_HEIGHT + 6.0 * 0.5)).abs() < 1e-9);

        let done = advance(&head, t0 + cfg.growth_duration() * 3, false, &cfg);
        assert_eq!(done.growth_progress, 1.0);
        assert!((done.current_height - (INITIAL_HEIGHT + 6.0)).abs() < 1e-9);
    }

    #[test]
    fn growth_is_monotonic() {
        let t0 = Instant::now();
        let cfg = AnimationConfig::default();
        let mut head = block(0, 4.0, 2.0, t0);
        let mut last = head.current_height;
        for ms in (0..90_000u64).step_by(100) {
            head = advance(&head, t0 + Duration::from_millis(ms), false, &cfg);
            assert!(head.current_height >= last);
            last = head.current_height;
        }
        // A stale clock never rewinds stored progress.
        let rewound = advance(&head, t0, false, &cfg);
        assert_eq!(rewound.growth_progress, 1.0);
    }

    #[test]
    fn one_update_per_block_with_descending_z() {
        let t0 = Instant::now();
        let blocks = stack(t0, 10);
        let updates = resolver().resolve(&blocks, after(t0, 10), &AnimationSettings::default(), 0.0);
        assert_eq!(updates.len(), blocks.len());
        for (u, b) in updates.iter().zip(&blocks) {
            assert_eq!(u.id, b.id);
        }
        for pair in updates.windows(2) {
            assert!(pair[0].z_index > pair[1].z_index);
            assert!(pair[0].blur_amount < pair[1].blur_amount);
        }
        assert_eq!(updates[0].z_index, 10);
        assert_eq!(updates[9].z_index, 1);
        let cfg = AnimationConfig::default();
        assert!((updates[9].blur_amount - (cfg.blur_base + cfg.blur_variation)).abs() < 1e-12);
    }

    #[test]
    fn older_blocks_fill_the_remaining_span() {
        let t0 = Instant::now();
        let blocks = stack(t0, 8);
        let still = AnimationSettings {
            intensity: 0.0,
            speed: 1.0,
        };
        let updates = resolver().resolve(&blocks, after(t0, 8), &still, 0.0);
        let total: f64 = updates.iter().map(|u| u.target_height).sum();
        assert!((total - FULL_SPAN).abs() < 1e-9, "total {}", total);
    }

    #[test]
    fn breathing_stays_close_to_the_scaled_height() {
        let t0 = Instant::now();
        let blocks = stack(t0, 6);
        let r = resolver();
        let still = AnimationSettings {
            intensity: 0.0,
            speed: 1.0,
        };
        let now = after(t0, 6) + Duration::from_millis(1700);
        let base = r.resolve(&blocks, now, &still, 1700.0);
        let live = r.resolve(&blocks, now, &AnimationSettings::default(), 1700.0);
        for (b, l) in base.iter().zip(&live).skip(1) {
            let ratio = l.target_height / b.target_height;
            assert!((ratio - 1.0).abs() <= 0.028 + 1e-9, "ratio {}", ratio);
        }
        assert_eq!(base[0].target_height, live[0].target_height);
    }

    #[test]
    fn scale_factor_bounds() {
        assert_eq!(scale_factor(80.0, 40.0, 0.0), 2.0);
        assert_eq!(scale_factor(80.0, 0.0, 0.0), 0.0);
        assert_eq!(scale_factor(80.0, 0.0, 0.5), 0.0);
        assert_eq!(scale_factor(1.0, 40.0, 0.5), 0.5);
    }

    #[test]
    fn zero_weight_tail_collapses_to_floor() {
        let t0 = Instant::now();
        let blocks = vec![block(1, 4.0, 1.0, t0), block(0, 0.0, 1.0, t0)];
        let cfg = AnimationConfig {
            min_block_height: 0.5,
            ..AnimationConfig::default()
        };
        let r = Resolver::new(cfg, SplitMotionConfig::default());
        let updates = r.resolve(&blocks, t0, &AnimationSettings::default(), 0.0);
        assert_eq!(updates[1].target_height, 0.5);

        let updates = resolver().resolve(&blocks, t0, &AnimationSettings::default(), 0.0);
        assert_eq!(updates[1].target_height, 0.0);
    }

    #[test]
    fn split_blocks_report_position() {
        let t0 = Instant::now();
        let mut blocks = stack(t0, 3);
        blocks[1].layout = Layout::Split { position: 67.0 };
        let updates = resolver().resolve(&blocks, after(t0, 3), &AnimationSettings::default(), 0.0);
        assert_eq!(updates[0].split_position, None);
        let pos = updates[1].split_position.expect("split block has a position");
        assert!((10.0..=90.0).contains(&pos));
    }
}
