//! Sky Color Model
//!
//! Maps an hour of the simulated day to a block fill.
//!
//! The day is split into six zones, each with linear hue/saturation/lightness
//! curves over the hour:
//!
//! | zone             | hours   | hue          | saturation    | lightness     |
//! |------------------|---------|--------------|---------------|---------------|
//! | deep night       | 0 – 5   | 240          | 30 + 5h       | 5 + 2h        |
//! | sunrise          | 5 – 7   | 30 − 10(h−5) | 80 − 10(h−5)  | 50 + 10(h−5)  |
//! | morning          | 7 – 12  | 210          | 70 − 5(h−7)   | 70 + 2(h−7)   |
//! | midday/afternoon | 12 – 17 | 210          | 55 − 5(h−12)  | 80 − 2(h−12)  |
//! | sunset           | 17 – 20 | 25 + 5(h−17) | 80 − 10(h−17) | 60 − 15(h−17) |
//! | night            | 20 – 24 | 240          | 40 − 5(h−20)  | 15 − 3(h−20)  |
//!
//! On top of the base color, random draws (in this order) pick:
//! gradient vs solid → gradient axis → (night only) aurora palette →
//! rare saturation boost. Output is always normalized into CSS range.

pub mod color;

use rand::Rng;

use crate::config::SkyConfig;
use crate::fast_math::{chance, pick_index};

pub use color::{ColorDescriptor, GradientDirection, Hsl, Rgba};

/// Aurora hues: deep blue, purple, green, teal.
pub const AURORA_HUES: [f64; 4] = [230.0, 275.0, 140.0, 175.0];

/// Saturation points an aurora color gains over the night base.
const AURORA_SATURATION_LIFT: f64 = 20.0;

/// Named part of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyZone {
    DeepNight,
    Sunrise,
    Morning,
    Midday,
    Sunset,
    Night,
}

impl SkyZone {
    /// Zone for an hour. Hours past 23 wrap.
    pub fn of(hour: u8) -> Self {
        match hour % 24 {
            0..=4 => Self::DeepNight,
            5..=6 => Self::Sunrise,
            7..=11 => Self::Morning,
            12..=16 => Self::Midday,
            17..=19 => Self::Sunset,
            _ => Self::Night,
        }
    }

    /// First hour of the zone.
    pub fn start_hour(self) -> u8 {
        match self {
            Self::DeepNight => 0,
            Self::Sunrise => 5,
            Self::Morning => 7,
            Self::Midday => 12,
            Self::Sunset => 17,
            Self::Night => 20,
        }
    }

    /// Sunrise and sunset.
    pub fn is_transition(self) -> bool {
        matches!(self, Self::Sunrise | Self::Sunset)
    }

    /// Base color for `hour` inside this zone (linear in hours since zone start).
    pub fn base_color(self, hour: u8) -> Hsl {
        let t = f64::from((hour % 24).saturating_sub(self.start_hour()));
        match self {
            Self::DeepNight => Hsl::new(240.0, 30.0 + 5.0 * t, 5.0 + 2.0 * t),
            Self::Sunrise => Hsl::new(30.0 - 10.0 * t, 80.0 - 10.0 * t, 50.0 + 10.0 * t),
            Self::Morning => Hsl::new(210.0, 70.0 - 5.0 * t, 70.0 + 2.0 * t),
            Self::Midday => Hsl::new(210.0, 55.0 - 5.0 * t, 80.0 - 2.0 * t),
            Self::Sunset => Hsl::new(25.0 + 5.0 * t, 80.0 - 10.0 * t, 60.0 - 15.0 * t),
            Self::Night => Hsl::new(240.0, 40.0 - 5.0 * t, 15.0 - 3.0 * t),
        }
    }

    /// Half-distance between gradient stops, as (hue, saturation, lightness).
    pub fn gradient_spread(self) -> (f64, f64, f64) {
        match self {
            Self::DeepNight => (10.0, 3.0, 2.0),
            Self::Sunrise => (10.0, 5.0, 8.0),
            Self::Morning => (5.0, 5.0, 5.0),
            Self::Midday => (5.0, 5.0, 3.0),
            Self::Sunset => (10.0, 10.0, 8.0),
            Self::Night => (10.0, 5.0, 2.0),
        }
    }
}

/// Symmetric two-stop gradient around `base`.
///
/// The first stop is cooler in hue, more saturated and darker; the second
/// mirrors it.
fn symmetric_stops(base: Hsl, (dh, ds, dl): (f64, f64, f64)) -> (Hsl, Hsl) {
    (base.offset(-dh, ds, -dl), base.offset(dh, -ds, dl))
}

/// Hour → fill, driven by a caller-supplied random source.
#[derive(Debug, Clone)]
pub struct SkyColorModel {
    config: SkyConfig,
}

impl SkyColorModel {
    pub fn new(config: SkyConfig) -> Self {
        Self { config }
    }

    /// Derive the fill for `hour`.
    pub fn derive_color<R: Rng + ?Sized>(&self, hour: u8, rng: &mut R) -> ColorDescriptor {
        let cfg = &self.config;
        let zone = SkyZone::of(hour);
        let use_gradient = chance(rng, cfg.gradient_chance);
        let direction = if chance(rng, cfg.vertical_gradient_chance) {
            GradientDirection::ToBottom
        } else {
            GradientDirection::ToRight
        };

        let base = zone.base_color(hour);
        let spread = zone.gradient_spread();

        let aurora = zone == SkyZone::Night && chance(rng, cfg.aurora_chance);
        let mut color = if aurora {
            self.aurora_color(base, spread, use_gradient, direction, rng)
        } else if use_gradient {
            let (from, to) = symmetric_stops(base, spread);
            ColorDescriptor::Gradient {
                from,
                to,
                direction,
            }
        } else {
            ColorDescriptor::Solid(base)
        };

        if chance(rng, cfg.saturation_boost_chance) {
            color = boost_saturation(color, cfg.saturation_boost);
        }

        normalize(color)
    }

    fn aurora_color<R: Rng + ?Sized>(
        &self,
        base: Hsl,
        spread: (f64, f64, f64),
        use_gradient: bool,
        direction: GradientDirection,
        rng: &mut R,
    ) -> ColorDescriptor {
        let first = pick_index(rng, AURORA_HUES.len());
        let tint = |hue: f64| Hsl::new(hue, base.s + AURORA_SATURATION_LIFT, base.l);

        if !use_gradient {
            return ColorDescriptor::Solid(tint(AURORA_HUES[first]));
        }

        if chance(rng, self.config.aurora_mix_chance) {
            // Second hue is drawn from the remaining palette entries.
            let step = 1 + pick_index(rng, AURORA_HUES.len() - 1);
            let second = (first + step) % AURORA_HUES.len();
            ColorDescriptor::Gradient {
                from: tint(AURORA_HUES[first]).offset(0.0, 0.0, -spread.2),
                to: tint(AURORA_HUES[second]).offset(0.0, 0.0, spread.2),
                direction,
            }
        } else {
            let (from, to) = symmetric_stops(tint(AURORA_HUES[first]), spread);
            ColorDescriptor::Gradient {
                from,
                to,
                direction,
            }
        }
    }
}

fn map_stops(color: ColorDescriptor, f: impl Fn(Hsl) -> Hsl) -> ColorDescriptor {
    match color {
        ColorDescriptor::Solid(c) => ColorDescriptor::Solid(f(c)),
        ColorDescriptor::Gradient {
            from,
            to,
            direction,
        } => ColorDescriptor::Gradient {
            from: f(from),
            to: f(to),
            direction,
        },
    }
}

fn boost_saturation(color: ColorDescriptor, points: f64) -> ColorDescriptor {
    map_stops(color, |c| c.offset(0.0, points, 0.0))
}

fn normalize(color: ColorDescriptor) -> ColorDescriptor {
    map_stops(color, Hsl::normalized)
}
