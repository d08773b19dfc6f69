//! `TimelapseApp`: the top-level egui application state.
//!
//! This module declares the `TimelapseApp` struct, its constructor and the
//! `eframe::App` impl. All other methods are split across the sibling
//! sub-modules:
//!
//! - `commands`: engine events, pause/reset, keyboard shortcuts
//! - `toolbar`:  clock display, block counter and controls overlay
//! - `content`:  the block stack itself

pub mod commands;
pub mod content;
pub mod toolbar;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use eframe::egui;

use horizon_timelapse::config::TimelapseConfig;
use horizon_timelapse::engine::Timelapse;
use horizon_timelapse::sky::ColorDescriptor;
use horizon_timelapse::timeline::BlockId;

/// Repaint at least this often even when nothing is due, so the overlay
/// keeps responding to hover.
const MAX_IDLE: Duration = Duration::from_millis(250);

// ─── Rendered state ──────────────────────────────────────────────────────────

/// What the adapter knows about one block: its creation event plus the last
/// resolver output applied to it.
#[derive(Debug, Clone)]
pub struct RenderedBlock {
    pub color: ColorDescriptor,
    pub height: f64,
    pub z_index: u32,
    pub blur: f64,
    pub split: Option<f64>,
}

// ─── Application state ───────────────────────────────────────────────────────

pub struct TimelapseApp {
    pub engine: Timelapse,
    pub blocks: HashMap<BlockId, RenderedBlock>,
    pub show_interface: bool,
}

impl TimelapseApp {
    pub fn new(config: TimelapseConfig) -> Self {
        let mut app = Self {
            engine: Timelapse::new(config),
            blocks: HashMap::new(),
            show_interface: true,
        };
        let created = app.engine.start(Instant::now());
        app.apply_created(created);
        app
    }
}

impl eframe::App for TimelapseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.handle_shortcuts(ctx, now);

        let pump = self.engine.pump(now);
        self.apply_pump(pump);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.draw_stack(ui);
            });

        self.draw_overlay(ctx);

        ctx.request_repaint_after(self.engine.next_wakeup(Instant::now()).min(MAX_IDLE));
    }
}
