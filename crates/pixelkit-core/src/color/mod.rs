//! Pointwise color operations: fixed filters and parameterized adjustments.
//!
//! Every operation maps each pixel's R, G, B independently of every other
//! pixel and leaves alpha untouched. Results are clamped to `[0, 255]` and
//! truncated toward zero.

pub mod adjustments;
pub mod filters;

pub use adjustments::Adjustment;
pub use filters::Filter;

use crate::buffer::PixelBuffer;

/// BT.601 luma weights, in thousandths.
const LUMA_WEIGHTS: [u32; 3] = [299, 587, 114];

/// Map every pixel's RGB through `f`, leaving alpha untouched.
pub fn map_rgb<F>(buffer: &mut PixelBuffer, mut f: F)
where
    F: FnMut([u8; 3]) -> [u8; 3],
{
    for px in buffer.pixels_mut() {
        let [r, g, b] = f([px[0], px[1], px[2]]);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    }
}

/// Luma `0.299R + 0.587G + 0.114B`, scaled by 1000.
///
/// Integer arithmetic keeps gray pixels exactly on their own value, so a
/// gray input maps to itself.
pub fn luma_milli(rgb: [u8; 3]) -> u32 {
    rgb.iter()
        .zip(LUMA_WEIGHTS)
        .map(|(&c, w)| u32::from(c) * w)
        .sum()
}

/// Luma `0.299R + 0.587G + 0.114B`, truncated.
///
/// Exact in integers, so it can come out one above a float evaluation that
/// lands just under a whole number: `(0, 72, 24)` is 45 here where f64 gives
/// 44.999... and truncates to 44.
pub fn luma(rgb: [u8; 3]) -> u8 {
    // max is 255_000 / 1000
    (luma_milli(rgb) / 1000) as u8
}

pub(crate) fn clamp_f32(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

pub(crate) fn clamp_f64(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

pub(crate) fn clamp_i32(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_of_gray_is_identity() {
        for v in 0..=255u8 {
            assert_eq!(luma([v, v, v]), v);
        }
    }

    #[test]
    fn test_luma_red() {
        // 0.299 * 255 = 76.245
        assert_eq!(luma([255, 0, 0]), 76);
        assert_eq!(luma_milli([255, 0, 0]), 76_245);
    }

    #[test]
    fn test_luma_on_exact_boundary() {
        // 72 * 587 + 24 * 114 = 45_000
        assert_eq!(luma_milli([0, 72, 24]), 45_000);
        assert_eq!(luma([0, 72, 24]), 45);
    }

    #[test]
    fn test_clamp_truncates_toward_zero() {
        assert_eq!(clamp_f32(12.99), 12);
        assert_eq!(clamp_f32(-0.5), 0);
        assert_eq!(clamp_f32(300.0), 255);
        assert_eq!(clamp_f64(254.999), 254);
        assert_eq!(clamp_i32(-40), 0);
        assert_eq!(clamp_i32(256), 255);
    }

    #[test]
    fn test_map_rgb_leaves_alpha() {
        let mut buf = PixelBuffer::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        map_rgb(&mut buf, |[r, g, b]| [b, g, r]);
        assert_eq!(buf.as_bytes(), &[3, 2, 1, 4, 7, 6, 5, 8]);
    }
}
