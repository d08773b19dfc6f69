//! The timelapse pipeline: Clock → Factory → Store → Resolver
//!
//! `Timelapse` owns every piece of mutable state and is driven by polling:
//! the host calls `pump(now)` from its frame loop and applies what comes back.
//! Within one pump all due clock ticks run before the frame tick, so a block
//! created by an hour rollover is always part of the very next resolve.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::cadence::Cadence;
use crate::clock::Clock;
use crate::config::{PausePolicy, TimelapseConfig};
use crate::render::{AnimationSettings, BreathClock, HeightUpdate, Resolver};
use crate::sky::{ColorDescriptor, SkyColorModel};
use crate::timeline::{Block, BlockCreated, BlockFactory, TimelineStore};

// ─── Timebase ───────────────────────────────────────────────────────

/// Animation time, which under `FreezeAll` stands still while paused.
#[derive(Debug, Clone)]
struct Timebase {
    policy: PausePolicy,
    /// Total time spent paused before the current pause.
    frozen: Duration,
    paused_since: Option<Instant>,
}

impl Timebase {
    fn new(policy: PausePolicy) -> Self {
        Self {
            policy,
            frozen: Duration::ZERO,
            paused_since: None,
        }
    }

    fn pause(&mut self, now: Instant) {
        if self.paused_since.is_none() {
            self.paused_since = Some(now);
        }
    }

    fn resume(&mut self, now: Instant) {
        if let Some(since) = self.paused_since.take() {
            self.frozen += now.saturating_duration_since(since);
        }
    }

    /// Wall time `now` mapped onto the animation timeline.
    fn effective(&self, now: Instant) -> Instant {
        match self.policy {
            PausePolicy::ClockOnly => now,
            PausePolicy::FreezeAll => {
                let current = self
                    .paused_since
                    .map(|since| now.saturating_duration_since(since))
                    .unwrap_or_default();
                now.checked_sub(self.frozen + current).unwrap_or(now)
            }
        }
    }
}

// ─── Pump ───────────────────────────────────────────────────────────

/// Everything one `pump` produced, in the order it must be applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pump {
    /// Blocks created by hour rollovers, oldest first.
    pub created: Vec<BlockCreated>,
    /// Resolver output, when the frame tick was due.
    pub frame: Option<Vec<HeightUpdate>>,
}

// ─── Timelapse ──────────────────────────────────────────────────────

pub struct Timelapse<R = StdRng> {
    clock: Clock,
    factory: BlockFactory<R>,
    store: TimelineStore,
    resolver: Resolver,
    settings: AnimationSettings,
    timebase: Timebase,
    breath: BreathClock,
    clock_cadence: Cadence,
    frame_cadence: Cadence,
}

impl Timelapse<StdRng> {
    /// Engine seeded from OS entropy. `config` must already be validated.
    pub fn new(config: TimelapseConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> Timelapse<R> {
    /// Engine drawing all randomness from `rng`.
    pub fn with_rng(config: TimelapseConfig, rng: R) -> Self {
        let now = Instant::now();
        let sky = SkyColorModel::new(config.sky.clone());
        let factory = BlockFactory::new(config.blocks.clone(), sky, config.max_blocks, rng);
        log::debug!(
            "Timelapse: {} blocks max, baseline share {:.2}%",
            config.max_blocks,
            factory.baseline()
        );
        Self {
            clock: Clock::new(&config.clock),
            store: TimelineStore::new(config.max_blocks),
            resolver: Resolver::new(config.animation.clone(), config.split_motion.clone()),
            settings: AnimationSettings::default(),
            timebase: Timebase::new(config.animation.pause_policy),
            breath: BreathClock::new(),
            clock_cadence: Cadence::new(config.clock.tick_interval(), now),
            frame_cadence: Cadence::new(config.animation.height_update_interval(), now),
            factory,
        }
    }

    /// Create the first block and arm both cadences from `now`.
    pub fn start(&mut self, now: Instant) -> BlockCreated {
        self.clock_cadence.rearm(now);
        self.frame_cadence.rearm(now);
        log::info!("Timelapse started at {}", self.clock);
        self.create_block(now)
    }

    /// One clock tick. Returns the new block on an hour rollover.
    pub fn tick_clock(&mut self, now: Instant) -> Option<BlockCreated> {
        if !self.clock.tick() {
            return None;
        }
        Some(self.create_block(now))
    }

    /// One resolver tick: grow the newest block, then resolve the whole stack.
    pub fn tick_frame(&mut self, now: Instant) -> Vec<HeightUpdate> {
        let at = self.timebase.effective(now);
        let breath_ms = self.breath.advance(at, self.settings.speed);
        let len = self.store.len();
        let resolver = &self.resolver;
        self.store.update_newest(|head| resolver.advance(head, at, len));
        self.resolver.resolve(self.store.all(), at, &self.settings, breath_ms)
    }

    /// Run whatever is due at `now`: clock ticks first, then at most one frame.
    pub fn pump(&mut self, now: Instant) -> Pump {
        let mut pump = Pump::default();
        for _ in 0..self.clock_cadence.due(now) {
            if let Some(created) = self.tick_clock(now) {
                pump.created.push(created);
            }
        }
        if self.frame_cadence.due(now) > 0 {
            pump.frame = Some(self.tick_frame(now));
        }
        pump
    }

    /// Clear the timeline, rewind the clock and start over with one block.
    ///
    /// The paused/running state is kept.
    pub fn reset(&mut self, now: Instant) -> BlockCreated {
        self.store.reset();
        self.clock.reset();
        self.clock_cadence.rearm(now);
        self.frame_cadence.rearm(now);
        log::info!("Timelapse reset to {}", self.clock);
        self.create_block(now)
    }

    pub fn set_paused(&mut self, paused: bool, now: Instant) {
        if paused == self.clock.is_paused() {
            return;
        }
        self.clock.set_paused(paused);
        if paused {
            self.timebase.pause(now);
        } else {
            self.timebase.resume(now);
            self.clock_cadence.rearm(now);
        }
        log::info!(
            "Timelapse {} at {}",
            if paused { "paused" } else { "resumed" },
            self.clock
        );
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Current timeline, newest first.
    pub fn blocks(&self) -> impl ExactSizeIterator<Item = &Block> + Clone + '_ {
        self.store.all()
    }

    pub fn block_count(&self) -> usize {
        self.store.len()
    }

    /// Page background: the newest block's color.
    pub fn background(&self) -> Option<ColorDescriptor> {
        self.store.newest().map(|b| b.color)
    }

    /// Breathing multipliers, read by every subsequent frame.
    pub fn settings_mut(&mut self) -> &mut AnimationSettings {
        &mut self.settings
    }

    /// How long the host may sleep before something is due.
    pub fn next_wakeup(&self, now: Instant) -> Duration {
        self.clock_cadence
            .until_due(now)
            .min(self.frame_cadence.until_due(now))
    }

    fn create_block(&mut self, now: Instant) -> BlockCreated {
        let at = self.timebase.effective(now);
        let block = self.factory.create_block(self.clock.hour(), at);
        let evicted = self.store.insert(block.clone());
        log::debug!(
            "Created {} for {:02}:00 ({:?}, share {:.2}%), evicted {}",
            block.id,
            block.hour,
            block.layout,
            block.target_height_share,
            evicted.len()
        );
        BlockCreated::new(&block, evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FULL_SPAN;
    use crate::timeline::BlockId;
    use rand::rngs::mock::StepRng;

    const SECOND: Duration = Duration::from_secs(1);

    fn engine_with(config: TimelapseConfig) -> Timelapse<StepRng> {
        Timelapse::with_rng(config, StepRng::new(0, 0))
    }

    fn engine() -> Timelapse<StepRng> {
        engine_with(TimelapseConfig::default())
    }

    fn head_height(frame: &[HeightUpdate]) -> f64 {
        frame[0].target_height
    }

    /// One simulated hour of clock ticks, calling `tick_clock` directly.
    fn run_hour(engine: &mut Timelapse<StepRng>, now: Instant) -> Option<BlockCreated> {
        let mut created = None;
        for _ in 0..60 {
            if let Some(c) = engine.tick_clock(now) {
                created = Some(c);
            }
        }
        created
    }

    #[test]
    fn test_start_creates_one_block_for_the_initial_hour() {
        let t0 = Instant::now();
        let mut e = engine();
        let created = e.start(t0);
        assert_eq!(created.hour, 5);
        assert_eq!(created.id, BlockId(0));
        assert!(created.evicted.is_empty());
        assert_eq!(created.initial_height, 0.05);
        assert_eq!(e.block_count(), 1);
        assert_eq!(e.background(), Some(created.color));
        assert_eq!(e.clock().to_string(), "05:00");
    }

    #[test]
    fn test_hour_rollover_creates_a_block() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        for _ in 0..59 {
            assert!(e.tick_clock(t0).is_none());
        }
        let created = e.tick_clock(t0).expect("rollover creates a block");
        assert_eq!(created.hour, 6);
        assert_eq!(created.id, BlockId(1));
        assert_eq!(e.block_count(), 2);
        assert_eq!(e.blocks().next().map(|b| b.id), Some(created.id));
    }

    #[test]
    fn test_pump_resolves_new_block_in_the_same_pump() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        let mut rollover = None;
        for s in 1..=60u32 {
            let pump = e.pump(t0 + SECOND * s);
            assert!(pump.frame.is_some());
            if let Some(created) = pump.created.first() {
                rollover = Some((s, created.id, pump.frame.clone()));
            }
        }
        let (s, id, frame) = rollover.expect("one rollover in sixty seconds");
        assert_eq!(s, 60);
        let frame = frame.expect("frame was due");
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[0].id, id);
        assert_eq!(frame[0].z_index, 2);
    }

    #[test]
    fn test_pump_does_nothing_before_anything_is_due() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        assert_eq!(e.pump(t0), Pump::default());
        assert_eq!(e.next_wakeup(t0), Duration::from_millis(100));
        assert!(e.pump(t0 + Duration::from_millis(100)).frame.is_some());
    }

    #[test]
    fn test_tick_frame_on_single_block_reaches_full_span() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        let growth = TimelapseConfig::default().animation.growth_duration();
        let frame = e.tick_frame(t0 + growth);
        assert_eq!(frame.len(), 1);
        assert!((head_height(&frame) - FULL_SPAN).abs() < 1e-9);
        let head = e.blocks().next().expect("one block");
        assert_eq!(head.growth_progress, 1.0);
    }

    #[test]
    fn test_pause_freezes_growth_and_clock() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        let before = head_height(&e.tick_frame(t0 + SECOND * 30));

        e.set_paused(true, t0 + SECOND * 30);
        assert!(e.is_paused());
        for s in 31..=150u32 {
            let pump = e.pump(t0 + SECOND * s);
            assert!(pump.created.is_empty());
        }
        assert_eq!(e.clock().to_string(), "05:00");
        let frozen = head_height(&e.tick_frame(t0 + SECOND * 150));
        assert_eq!(frozen, before);

        // Ten more seconds of animation after resuming equals 40s unpaused.
        e.set_paused(false, t0 + SECOND * 150);
        let resumed = head_height(&e.tick_frame(t0 + SECOND * 160));

        let mut reference = engine();
        reference.start(t0);
        let expected = head_height(&reference.tick_frame(t0 + SECOND * 40));
        assert!((resumed - expected).abs() < 1e-9);
        assert!(resumed > before);
    }

    #[test]
    fn test_clock_only_pause_keeps_animating() {
        let t0 = Instant::now();
        let mut config = TimelapseConfig::default();
        config.animation.pause_policy = PausePolicy::ClockOnly;
        let mut e = engine_with(config);
        e.start(t0);
        e.set_paused(true, t0);
        assert!(run_hour(&mut e, t0).is_none());
        let frame = e.tick_frame(t0 + SECOND * 60);
        assert!((head_height(&frame) - FULL_SPAN).abs() < 1e-9);
    }

    #[test]
    fn test_reset_starts_over_with_one_block() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        for _ in 0..3 {
            run_hour(&mut e, t0);
        }
        assert_eq!(e.block_count(), 4);
        assert_eq!(e.clock().to_string(), "08:00");

        e.set_paused(true, t0);
        let created = e.reset(t0 + SECOND);
        assert_eq!(e.block_count(), 1);
        assert_eq!(created.hour, 5);
        assert_eq!(created.id, BlockId(4));
        assert!(created.evicted.is_empty());
        assert_eq!(e.clock().to_string(), "05:00");
        assert!(e.is_paused());
    }

    #[test]
    fn test_rollovers_evict_oldest_blocks() {
        let t0 = Instant::now();
        let mut e = engine_with(TimelapseConfig {
            max_blocks: 3,
            ..TimelapseConfig::default()
        });
        e.start(t0);
        let mut evicted = Vec::new();
        for _ in 0..4 {
            let created = run_hour(&mut e, t0).expect("one rollover per hour");
            evicted.extend(created.evicted);
        }
        assert_eq!(e.block_count(), 3);
        assert_eq!(evicted, vec![BlockId(0), BlockId(1)]);
        let ids: Vec<u64> = e.blocks().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![4, 3, 2]);
    }

    #[test]
    fn test_settings_reach_the_resolver() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        run_hour(&mut e, t0);
        e.settings_mut().intensity = 0.0;
        let a = e.tick_frame(t0 + SECOND * 61);
        let b = e.tick_frame(t0 + SECOND * 63);
        // Head fully grown and no breathing: the older block holds still.
        assert!((a[1].target_height - b[1].target_height).abs() < 1e-9);
    }

    #[test]
    fn test_speed_change_does_not_jump_breathing() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        run_hour(&mut e, t0);
        e.tick_frame(t0 + SECOND * 61);
        let a = e.tick_frame(t0 + SECOND * 90);
        e.settings_mut().speed = 3.0;
        let b = e.tick_frame(t0 + SECOND * 90);
        assert_eq!(a[1].target_height, b[1].target_height);
        let c = e.tick_frame(t0 + SECOND * 91);
        assert_ne!(b[1].target_height, c[1].target_height);
    }
}
