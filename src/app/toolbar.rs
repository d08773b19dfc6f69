//! Overlay rendering for `TimelapseApp`.
//!
//! Draws the simulated time, the block counter, the Pause/Reset/Hide buttons
//! and the breathing sliders. When the interface is hidden only a small
//! "Show UI" button remains.

use std::time::Instant;

use eframe::egui;

use super::TimelapseApp;

const OVERLAY_MARGIN: f32 = 16.0;

impl TimelapseApp {
    /// Render the floating overlay.
    pub fn draw_overlay(&mut self, ctx: &egui::Context) {
        if !self.show_interface {
            egui::Area::new(egui::Id::new("show_ui"))
                .anchor(egui::Align2::RIGHT_BOTTOM, [-OVERLAY_MARGIN, -OVERLAY_MARGIN])
                .show(ctx, |ui| {
                    if ui.small_button("Show UI").clicked() {
                        self.toggle_interface();
                    }
                });
            return;
        }

        egui::Area::new(egui::Id::new("clock"))
            .anchor(egui::Align2::LEFT_TOP, [OVERLAY_MARGIN, OVERLAY_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(self.engine.clock().to_string())
                            .size(32.0)
                            .monospace()
                            .strong(),
                    );
                    ui.label(format!("Blocks: {}", self.engine.block_count()));
                });
            });

        egui::Area::new(egui::Id::new("controls"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-OVERLAY_MARGIN, -OVERLAY_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    self.draw_controls(ui);
                });
            });
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let pause_label = if self.engine.is_paused() { "Play" } else { "Pause" };
            if ui.button(pause_label).clicked() {
                self.toggle_pause(Instant::now());
            }
            if ui.button("Reset").clicked() {
                self.reset(Instant::now());
            }
            if ui.button("Hide UI").clicked() {
                self.toggle_interface();
            }
        });

        ui.add_space(4.0);

        let settings = self.engine.settings_mut();
        ui.add(
            egui::Slider::new(&mut settings.intensity, 0.0..=3.0)
                .text("Intensity")
                .fixed_decimals(1),
        );
        ui.add(
            egui::Slider::new(&mut settings.speed, 0.1..=3.0)
                .text("Speed")
                .fixed_decimals(1),
        );

        ui.add_space(2.0);
        ui.weak("Space: pause · R: reset · H: hide");
    }
}
