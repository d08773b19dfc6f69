//! Stateless egui painting helpers for the block stack.
//!
//! Geometry (`stack_rects`, `split_rects`) is kept separate from painting so
//! it can be tested without a `Context`.

use egui::{Color32, Mesh, Painter, Pos2, Rect, Shape, Vec2};
use horizon_timelapse::sky::{ColorDescriptor, GradientDirection, Hsl, Rgba};

/// Each block is drawn this much taller than its resolved share, closing the
/// hairline gaps between neighbours. The factory leaves headroom for it.
pub const HEIGHT_SCALE: f32 = 1.05;

/// Halo layers used to fake the depth blur.
const FEATHER_STEPS: u32 = 4;
/// Halo reach per pixel of blur.
const FEATHER_SPREAD: f32 = 6.0;
const FEATHER_ALPHA: f32 = 90.0;

// ─── Colors ───────────────────────────────────────────────────────────────────

pub fn to_color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

pub fn hsl_color32(c: Hsl) -> Color32 {
    to_color32(c.to_rgba())
}

// ─── Geometry ─────────────────────────────────────────────────────────────────

/// Stack rectangles top-down inside `area`, one per height percentage.
///
/// Heights are scaled by `HEIGHT_SCALE`; whatever overflows the bottom is
/// left for the painter's clip rect to cut.
pub fn stack_rects(area: Rect, heights: &[f64]) -> Vec<Rect> {
    let mut top = area.top();
    heights
        .iter()
        .map(|&pct| {
            let h = (pct.max(0.0) as f32 / 100.0) * HEIGHT_SCALE * area.height();
            let rect = Rect::from_min_size(Pos2::new(area.left(), top), Vec2::new(area.width(), h));
            top += h;
            rect
        })
        .collect()
}

/// Left and right halves of `rect` split at `position` percent of its width.
pub fn split_rects(rect: Rect, position: f64) -> (Rect, Rect) {
    let x = rect.left() + rect.width() * (position.clamp(0.0, 100.0) as f32 / 100.0);
    (
        Rect::from_min_max(rect.min, Pos2::new(x, rect.bottom())),
        Rect::from_min_max(Pos2::new(x, rect.top()), rect.max),
    )
}

/// Two-triangle quad over `rect` shading from `from` to `to`.
pub fn gradient_mesh(rect: Rect, from: Color32, to: Color32, direction: GradientDirection) -> Mesh {
    // Corners clockwise from the top-left.
    let corners = match direction {
        GradientDirection::ToRight => [from, to, to, from],
        GradientDirection::ToBottom => [from, from, to, to],
    };
    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), corners[0]);
    mesh.colored_vertex(rect.right_top(), corners[1]);
    mesh.colored_vertex(rect.right_bottom(), corners[2]);
    mesh.colored_vertex(rect.left_bottom(), corners[3]);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    mesh
}

// ─── Painting ─────────────────────────────────────────────────────────────────

/// Fill `rect` with a solid color or a two-stop gradient mesh.
pub fn paint_descriptor(painter: &Painter, rect: Rect, color: &ColorDescriptor) {
    match *color {
        ColorDescriptor::Solid(c) => {
            painter.rect_filled(rect, 0.0, hsl_color32(c));
        }
        ColorDescriptor::Gradient {
            from,
            to,
            direction,
        } => {
            let mesh = gradient_mesh(rect, hsl_color32(from), hsl_color32(to), direction);
            painter.add(Shape::mesh(mesh));
        }
    }
}

/// Soft vertical halo around `rect`, standing in for a Gaussian blur.
pub fn paint_feather(painter: &Painter, rect: Rect, color: Color32, blur: f32) {
    if blur <= 0.0 {
        return;
    }
    let reach = blur * FEATHER_SPREAD;
    for i in (1..=FEATHER_STEPS).rev() {
        let t = i as f32 / FEATHER_STEPS as f32;
        let alpha = ((1.0 - t) * FEATHER_ALPHA + 8.0) as u8;
        let halo = Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha);
        painter.rect_filled(rect.expand2(Vec2::new(0.0, reach * t)), 0.0, halo);
    }
}

/// One block: halo, then the body, split into halves when `split` is set.
pub fn paint_block(
    painter: &Painter,
    rect: Rect,
    color: &ColorDescriptor,
    split: Option<f64>,
    blur: f32,
) {
    paint_feather(painter, rect, hsl_color32(color.primary()), blur);
    match split {
        Some(position) => {
            let (left, right) = split_rects(rect, position);
            let (left_color, right_color) = color.split_halves();
            paint_descriptor(painter, left, &left_color);
            paint_descriptor(painter, right, &right_color);
        }
        None => paint_descriptor(painter, rect, color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(200.0, 1000.0))
    }

    #[test]
    fn stack_is_contiguous_and_scaled() {
        let rects = stack_rects(area(), &[50.0, 30.0, 20.0]);
        assert_eq!(rects.len(), 3);
        assert!((rects[0].height() - 525.0).abs() < 1e-3);
        assert!((rects[1].top() - rects[0].bottom()).abs() < 1e-3);
        assert!((rects[2].top() - rects[1].bottom()).abs() < 1e-3);
        assert!((rects[2].bottom() - 1050.0).abs() < 1e-2);
        assert!(rects.iter().all(|r| r.width() == 200.0));
    }

    #[test]
    fn negative_heights_collapse() {
        let rects = stack_rects(area(), &[-5.0, 10.0]);
        assert_eq!(rects[0].height(), 0.0);
        assert_eq!(rects[1].top(), 0.0);
    }

    #[test]
    fn split_at_position() {
        let (l, r) = split_rects(area(), 25.0);
        assert_eq!(l.width(), 50.0);
        assert_eq!(r.width(), 150.0);
        assert_eq!(l.height(), r.height());
        let (l, r) = split_rects(area(), 140.0);
        assert_eq!(l.width(), 200.0);
        assert_eq!(r.width(), 0.0);
    }

    #[test]
    fn gradient_mesh_colors_corners() {
        let (a, b) = (Color32::RED, Color32::BLUE);
        let rect = area();

        let mesh = gradient_mesh(rect, a, b, GradientDirection::ToRight);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        let colors: Vec<Color32> = mesh.vertices.iter().map(|v| v.color).collect();
        assert_eq!(colors, vec![a, b, b, a]);
        assert_eq!(mesh.vertices[0].pos, rect.left_top());
        assert_eq!(mesh.vertices[2].pos, rect.right_bottom());

        let mesh = gradient_mesh(rect, a, b, GradientDirection::ToBottom);
        let colors: Vec<Color32> = mesh.vertices.iter().map(|v| v.color).collect();
        assert_eq!(colors, vec![a, a, b, b]);
    }

    #[test]
    fn color_conversion_keeps_channels() {
        let c = to_color32(Rgba { r: 255, g: 255, b: 255, a: 255 });
        assert_eq!(c, Color32::WHITE);
        let c = hsl_color32(Hsl::new(0.0, 0.0, 0.0));
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (0, 0, 0, 255));
    }
}
