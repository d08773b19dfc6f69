//! Content-area rendering for `TimelapseApp`.
//!
//! Paints the page background (the newest block's color) and the block
//! stack, newest at the top.

use eframe::egui;

use horizon_timelapse::sky::Rgba;

use super::{RenderedBlock, TimelapseApp};
use crate::ui::{paint_block, paint_descriptor, stack_rects, to_color32};

impl TimelapseApp {
    /// Fill the whole panel with the stack.
    pub fn draw_stack(&self, ui: &mut egui::Ui) {
        let area = ui.max_rect();
        let painter = ui.painter_at(area);

        match self.engine.background() {
            Some(color) => paint_descriptor(&painter, area, &color),
            None => {
                painter.rect_filled(area, 0.0, to_color32(Rgba::BLACK));
            }
        }

        let stack = self.stack_order();
        let heights: Vec<f64> = stack.iter().map(|b| b.height).collect();
        let rects = stack_rects(area, &heights);

        // Deepest first, so every block's halo sits under its newer neighbour.
        for (block, rect) in stack.iter().zip(rects).rev() {
            paint_block(&painter, rect, &block.color, block.split, block.blur as f32);
        }
    }

    /// Rendered blocks by descending z-index: newest first.
    fn stack_order(&self) -> Vec<&RenderedBlock> {
        let mut stack: Vec<&RenderedBlock> = self.blocks.values().collect();
        stack.sort_by(|a, b| b.z_index.cmp(&a.z_index));
        stack
    }
}
