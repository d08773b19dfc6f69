//! Commands for `TimelapseApp`.
//!
//! Applies engine output to the rendered state and turns user input
//! (buttons, keyboard shortcuts) into engine commands.

use std::time::Instant;

use eframe::egui;

use horizon_timelapse::engine::Pump;
use horizon_timelapse::render::HeightUpdate;
use horizon_timelapse::timeline::{BlockCreated, Layout};

use super::{RenderedBlock, TimelapseApp};

impl TimelapseApp {
    // ── Engine events ────────────────────────────────────────────────────────

    /// New element for a created block; drop the ones it evicted.
    pub fn apply_created(&mut self, created: BlockCreated) {
        for id in &created.evicted {
            self.blocks.remove(id);
        }
        let z_index = self.blocks.len() as u32 + 1;
        self.blocks.insert(
            created.id,
            RenderedBlock {
                color: created.color,
                height: created.initial_height,
                z_index,
                blur: 0.0,
                split: match created.layout {
                    Layout::Split { position } => Some(position),
                    Layout::Full => None,
                },
            },
        );
    }

    /// Write one resolver frame onto the existing elements.
    pub fn apply_frame(&mut self, frame: &[HeightUpdate]) {
        for update in frame {
            match self.blocks.get_mut(&update.id) {
                Some(block) => {
                    block.height = update.target_height;
                    block.z_index = update.z_index;
                    block.blur = update.blur_amount;
                    block.split = update.split_position;
                }
                None => log::warn!("Height update for unknown {}", update.id),
            }
        }
    }

    /// Creations first, then the frame that already includes them.
    pub fn apply_pump(&mut self, pump: Pump) {
        for created in pump.created {
            self.apply_created(created);
        }
        if let Some(frame) = pump.frame {
            self.apply_frame(&frame);
        }
    }

    // ── User commands ────────────────────────────────────────────────────────

    pub fn toggle_pause(&mut self, now: Instant) {
        let paused = !self.engine.is_paused();
        self.engine.set_paused(paused, now);
    }

    /// Clear everything on screen and start over from the initial hour.
    pub fn reset(&mut self, now: Instant) {
        self.blocks.clear();
        let created = self.engine.reset(now);
        self.apply_created(created);
    }

    pub fn toggle_interface(&mut self) {
        self.show_interface = !self.show_interface;
    }

    /// Space: pause/play, R: reset, H: hide/show the overlay.
    pub fn handle_shortcuts(&mut self, ctx: &egui::Context, now: Instant) {
        // Leave keys alone while a widget (a slider being dragged) has focus.
        if ctx.memory(|m| m.focused().is_some()) {
            return;
        }
        let (space, r, h) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::R),
                i.key_pressed(egui::Key::H),
            )
        });
        if space {
            self.toggle_pause(now);
        }
        if r {
            self.reset(now);
        }
        if h {
            self.toggle_interface();
        }
    }
}
