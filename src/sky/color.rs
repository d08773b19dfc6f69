//! Color values produced by the sky model.
//!
//! Colors are kept in HSL (the space the zone curves are written in) and
//! converted to RGBA only at paint time. CSS output matches what a browser
//! would accept: `hsl(240, 30%, 5%)`, `linear-gradient(to right, …, …)`.

use std::fmt;

use crate::fast_math::clamp_percent;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };
}

/// Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Hue wrapped into [0, 360), saturation/lightness clamped into [0, 100].
    pub fn normalized(self) -> Self {
        Self {
            h: self.h.rem_euclid(360.0),
            s: clamp_percent(self.s),
            l: clamp_percent(self.l),
        }
    }

    /// Component-wise offset (no normalization).
    pub fn offset(self, dh: f64, ds: f64, dl: f64) -> Self {
        Self {
            h: self.h + dh,
            s: self.s + ds,
            l: self.l + dl,
        }
    }

    /// True when every component is already inside its CSS range.
    #[cfg(test)]
    pub(crate) fn in_range(&self) -> bool {
        (0.0..360.0).contains(&self.h)
            && (0.0..=100.0).contains(&self.s)
            && (0.0..=100.0).contains(&self.l)
    }

    /// Standard HSL → RGB conversion (CSS Color 3).
    pub fn to_rgba(self) -> Rgba {
        let Hsl { h, s, l } = self.normalized();
        let s = s / 100.0;
        let l = l / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = h / 60.0;
        let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;

        Rgba {
            r: to_u8(r1),
            g: to_u8(g1),
            b: to_u8(b1),
            a: 255,
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

/// Gradient axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    /// Horizontal, left → right
    ToRight,
    /// Vertical, top → bottom
    ToBottom,
}

impl fmt::Display for GradientDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ToRight => "to right",
            Self::ToBottom => "to bottom",
        })
    }
}

/// A block's fill: one color or a two-stop linear gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorDescriptor {
    Solid(Hsl),
    Gradient {
        from: Hsl,
        to: Hsl,
        direction: GradientDirection,
    },
}

impl ColorDescriptor {
    /// The representative color (the solid color or the first stop).
    pub fn primary(&self) -> Hsl {
        match *self {
            Self::Solid(c) => c,
            Self::Gradient { from, .. } => from,
        }
    }

    /// Every HSL stop in this descriptor.
    #[cfg(test)]
    pub(crate) fn stops(&self) -> Vec<Hsl> {
        match *self {
            Self::Solid(c) => vec![c],
            Self::Gradient { from, to, .. } => vec![from, to],
        }
    }

    /// Fills for the left and right halves of a split block.
    ///
    /// Solid colors are shaded apart (cooler/darker left, warmer/lighter right);
    /// gradients run forward on the left and reversed on the right.
    pub fn split_halves(&self) -> (ColorDescriptor, ColorDescriptor) {
        match *self {
            Self::Solid(c) => (
                Self::Solid(c.offset(-5.0, 0.0, -3.0).normalized()),
                Self::Solid(c.offset(5.0, 0.0, 3.0).normalized()),
            ),
            Self::Gradient {
                from,
                to,
                direction,
            } => (
                Self::Gradient {
                    from,
                    to,
                    direction,
                },
                Self::Gradient {
                    from: to,
                    to: from,
                    direction,
                },
            ),
        }
    }
}

impl fmt::Display for ColorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(c) => write!(f, "{}", c),
            Self::Gradient {
                from,
                to,
                direction,
            } => write!(f, "linear-gradient({}, {}, {})", direction, from, to),
        }
    }
}
