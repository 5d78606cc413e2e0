//! Bilinear resampling for export at a different resolution.
//!
//! # Algorithm
//! For destination pixel `(x, y)` the source position is
//! `(x / factor, y / factor)`. Its integer part selects the top-left
//! neighbor `p00`; the fractional part `(fx, fy)` weights the four
//! neighbors:
//! ```text
//! out = p00·(1−fx)(1−fy) + p10·fx(1−fy) + p01·(1−fx)fy + p11·fx·fy
//! ```
//! On the last column/row the right/bottom neighbor collapses onto the
//! pixel itself. All four channels, alpha included, are interpolated and
//! truncated.

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::error::{PixelError, Result};
use crate::limits::Limits;

/// Output size for scaling a `width x height` buffer by `factor`:
/// `floor(width × factor) x floor(height × factor)`.
pub fn scaled_dimensions(width: u32, height: u32, factor: f32) -> Result<(u32, u32)> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(PixelError::InvalidParameter {
            name: "scale",
            value: f64::from(factor),
            reason: "expected a finite factor greater than zero",
        });
    }
    let new_width = (width as f32 * factor).floor();
    let new_height = (height as f32 * factor).floor();
    let representable = |v: f32| (1.0..=u32::MAX as f32).contains(&v);
    if !representable(new_width) || !representable(new_height) {
        return Err(PixelError::InvalidDimensions {
            width: new_width as i64,
            height: new_height as i64,
        });
    }
    Ok((new_width as u32, new_height as u32))
}

/// Resample `buffer` by `factor` into a new buffer. The input is untouched.
pub fn scale(buffer: &PixelBuffer, factor: f32) -> Result<PixelBuffer> {
    scale_with_limits(buffer, factor, &Limits::default())
}

/// [`scale`], with the output allocation checked against `limits`.
pub fn scale_with_limits(buffer: &PixelBuffer, factor: f32, limits: &Limits) -> Result<PixelBuffer> {
    let (width, height) = buffer.dimensions();
    let (new_width, new_height) = scaled_dimensions(width, height, factor)?;
    tracing::debug!("scaling {width}x{height} by {factor} to {new_width}x{new_height}");

    let mut out = PixelBuffer::allocate_with_limits(new_width, new_height, limits)?;
    let src = buffer.pixels();
    let w = width as usize;
    let last_x = w - 1;
    let last_y = height as usize - 1;

    for (y, row) in out
        .pixels_mut()
        .chunks_exact_mut(new_width as usize)
        .enumerate()
    {
        let src_y = y as f32 / factor;
        let y0 = (src_y as usize).min(last_y);
        let fy = src_y - y0 as f32;
        let y1 = if y0 < last_y { y0 + 1 } else { y0 };

        for (x, px) in row.iter_mut().enumerate() {
            let src_x = x as f32 / factor;
            let x0 = (src_x as usize).min(last_x);
            let fx = src_x - x0 as f32;
            let x1 = if x0 < last_x { x0 + 1 } else { x0 };

            let p00 = src[y0 * w + x0];
            let p10 = src[y0 * w + x1];
            let p01 = src[y1 * w + x0];
            let p11 = src[y1 * w + x1];

            for c in 0..CHANNELS {
                let value = f32::from(p00[c]) * (1.0 - fx) * (1.0 - fy)
                    + f32::from(p10[c]) * fx * (1.0 - fy)
                    + f32::from(p01[c]) * (1.0 - fx) * fy
                    + f32::from(p11[c]) * fx * fy;
                px[c] = value as u8;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x * 20) as u8, (y * 20) as u8, 128, 255 - x as u8]);
            }
        }
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn test_scale_one_is_identity() {
        let buf = gradient(7, 5);
        let out = scale(&buf, 1.0).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn test_half_scale_size() {
        let buf = gradient(10, 10);
        let out = scale(&buf, 0.5).unwrap();
        assert_eq!(out.dimensions(), (5, 5));
        assert_eq!(out.as_bytes().len(), 5 * 5 * 4);
        // Even destination pixels land exactly on source pixels.
        assert_eq!(out.pixel(2, 3), buf.pixel(4, 6));
    }

    #[test]
    fn test_double_scale_interpolates_midpoints() {
        let buf = PixelBuffer::from_raw(2, 1, vec![0, 0, 0, 255, 100, 200, 50, 255]).unwrap();
        let out = scale(&buf, 2.0).unwrap();
        assert_eq!(out.dimensions(), (4, 2));
        assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(out.pixel(1, 0), Some([50, 100, 25, 255]));
        assert_eq!(out.pixel(2, 0), Some([100, 200, 50, 255]));
        // Past the last column the neighbor collapses onto the edge pixel.
        assert_eq!(out.pixel(3, 0), Some([100, 200, 50, 255]));
        assert_eq!(out.pixel(1, 1), out.pixel(1, 0));
    }

    #[test]
    fn test_scale_leaves_input_untouched() {
        let buf = gradient(4, 4);
        let before = buf.clone();
        let _ = scale(&buf, 1.5).unwrap();
        assert_eq!(buf, before);
    }

    #[test]
    fn test_scale_checks_output_limits() {
        let buf = gradient(4, 4);
        let limits = Limits {
            max_width: 10,
            ..Limits::default()
        };
        assert!(scale_with_limits(&buf, 2.0, &limits).is_ok());
        assert!(matches!(
            scale_with_limits(&buf, 3.0, &limits),
            Err(PixelError::DimensionsExceedLimits { .. })
        ));
    }

    #[test]
    fn test_scaled_dimensions_floor() {
        assert_eq!(scaled_dimensions(10, 7, 0.5).unwrap(), (5, 3));
        assert_eq!(scaled_dimensions(3, 3, 2.5).unwrap(), (7, 7));
    }

    #[test]
    fn test_invalid_factors() {
        for factor in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                scaled_dimensions(10, 10, factor),
                Err(PixelError::InvalidParameter { name: "scale", .. })
            ));
        }
        assert!(matches!(
            scaled_dimensions(10, 10, 0.05),
            Err(PixelError::InvalidDimensions { .. })
        ));
    }
}
