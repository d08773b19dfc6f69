//! Block Factory
//!
//! Turns an hour into a fresh `Block`:
//! - color from the sky model
//! - layout: split during sunrise/sunset (optional) or by chance, else full width
//! - nominal height: baseline × (dramatic outlier 20% | moderate variation 80%)
//! - height factor: uniform in the configured range
//! - id/seed: creation-order counter, seed hashed from it

use std::ops::Range;
use std::time::Instant;

use rand::Rng;

use super::block::{Block, BlockId, Layout, INITIAL_HEIGHT};
use crate::config::BlockConfig;
use crate::fast_math::{chance, pick_index, splitmix64, uniform};
use crate::sky::{SkyColorModel, SkyZone};

/// Baseline is computed for at most this many visible hours.
const BASELINE_HOURS: usize = 24;

/// Extra-short outlier multiplier.
const DRAMATIC_SHORT: Range<f64> = 0.4..0.7;
/// Extra-tall outlier multiplier.
const DRAMATIC_TALL: Range<f64> = 1.5..2.2;
/// Everyday variation multiplier.
const MODERATE: Range<f64> = 0.8..1.4;

pub struct BlockFactory<R> {
    rng: R,
    sky: SkyColorModel,
    config: BlockConfig,
    /// Nominal per-block share before randomization.
    baseline: f64,
    next_id: u64,
}

impl<R: Rng> BlockFactory<R> {
    pub fn new(config: BlockConfig, sky: SkyColorModel, max_blocks: usize, rng: R) -> Self {
        let visible = max_blocks.clamp(1, BASELINE_HOURS) as f64;
        Self {
            baseline: 100.0 / visible * config.height_headroom,
            rng,
            sky,
            config,
            next_id: 0,
        }
    }

    /// Nominal share before any random multiplier.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Build the block for `hour`, stamped with `now`.
    pub fn create_block(&mut self, hour: u8, now: Instant) -> Block {
        let hour = hour % 24;
        let color = self.sky.derive_color(hour, &mut self.rng);
        let layout = self.pick_layout(hour);
        let target_height_share = self.pick_height_share();
        let height_factor = uniform(
            &mut self.rng,
            self.config.min_height_factor,
            self.config.max_height_factor,
        );

        let id = BlockId(self.next_id);
        self.next_id += 1;

        Block {
            id,
            seed: splitmix64(id.0),
            hour,
            color,
            layout,
            target_height_share,
            height_factor,
            current_height: INITIAL_HEIGHT,
            growth_progress: 0.0,
            created_at: now,
        }
    }

    fn pick_layout(&mut self, hour: u8) -> Layout {
        let forced = self.config.split_at_transitions && SkyZone::of(hour).is_transition();
        if forced || chance(&mut self.rng, self.config.split_chance) {
            let positions = &self.config.split_positions;
            let position = positions[pick_index(&mut self.rng, positions.len())];
            Layout::Split { position }
        } else {
            Layout::Full
        }
    }

    fn pick_height_share(&mut self) -> f64 {
        let range = if chance(&mut self.rng, self.config.dramatic_chance) {
            if chance(&mut self.rng, 0.5) {
                DRAMATIC_TALL
            } else {
                DRAMATIC_SHORT
            }
        } else {
            MODERATE
        };
        self.baseline * uniform(&mut self.rng, range.start, range.end)
    }
}
