//! Fast Math: small numeric helpers shared by the sky model and the resolver.
//!
//! ## Interpolation
//! Every zone curve, growth curve and split glide is a lerp in disguise.
//!   lerp(a, b, t) = a + t * (b - a) = fma(t, b - a, a)
//!
//! ## Easing
//! - `ease_out_cbrt`: t^(1/3). Fast start in value, slow finish. Used for growth.
//! - `smoothstep`: 3t² - 2t³. Zero velocity at both ends. Used for split glides.
//!
//! ## Randomness
//! Draws go through `uniform` / `chance` / `pick_index` so any `rand::Rng`
//! (including a mock that always returns 0) drives them identically.
//! Per-block stable pseudo-randomness comes from `splitmix64` over a seed,
//! never from the RNG, so breathing and drift never change between frames.

use rand::Rng;

/// Pre-computed reciprocal of 2^53 (unit-interval conversion of a 53-bit mantissa).
const INV_2_POW_53: f64 = 1.0 / (1u64 << 53) as f64;

/// Fused Multiply-Add: a * b + c
#[inline(always)]
pub fn fma(a: f64, b: f64, c: f64) -> f64 {
    a.mul_add(b, c)
}

/// Linear interpolation using FMA for precision.
#[inline(always)]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    fma(t, b - a, a)
}

/// Cube-root ease-out on [0, 1]. Inputs outside the interval are clamped.
#[inline]
pub fn ease_out_cbrt(t: f64) -> f64 {
    t.clamp(0.0, 1.0).cbrt()
}

/// Hermite smoothstep on [0, 1]. Inputs outside the interval are clamped.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * fma(-2.0, t, 3.0)
}

/// Clamp a percentage-like value into [0, 100].
#[inline(always)]
pub fn clamp_percent(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// SplitMix64 finalizer. Bijective, so distinct counters give distinct seeds.
#[inline]
pub fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Stable unit-interval value for `(seed, salt)`. Same inputs, same output.
#[inline]
pub fn seed_unit(seed: u64, salt: u64) -> f64 {
    let mixed = splitmix64(seed ^ splitmix64(salt));
    (mixed >> 11) as f64 * INV_2_POW_53
}

/// Uniform sample in `[lo, hi)`. Degenerate ranges return `lo`.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lerp(lo, hi, rng.gen::<f64>())
}

/// Probability roll: fires when the sample lands in the top `p` of [0, 1).
///
/// `p <= 0` never fires, `p >= 1` always fires.
#[inline]
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() >= 1.0 - p
}

/// Uniform index into a collection of `len` items. `len` must be non-zero.
#[inline]
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    let idx = (rng.gen::<f64>() * len as f64) as usize;
    idx.min(len.saturating_sub(1))
}
