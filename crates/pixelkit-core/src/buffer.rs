//! Pixel buffer representation and lifecycle.
//!
//! A [`PixelBuffer`] is the one binary contract shared with hosts: RGBA8,
//! row-major, no row padding, `width * height * 4` bytes.

use crate::error::{PixelError, Result};
use crate::limits::Limits;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Number of bytes a `width x height` RGBA8 buffer occupies.
///
/// Fails on zero dimensions or when the size does not fit in `usize`.
pub fn byte_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(PixelError::dimensions(width, height));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(CHANNELS))
        .ok_or_else(|| PixelError::dimensions(width, height))
}

/// An owned RGBA8 image buffer.
///
/// Releasing consumes the buffer, so a released buffer cannot be used or
/// released again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer under the default [`Limits`].
    pub fn allocate(width: u32, height: u32) -> Result<Self> {
        Self::allocate_with_limits(width, height, &Limits::default())
    }

    /// Allocate a zero-filled buffer, rejecting dimensions above `limits`.
    pub fn allocate_with_limits(width: u32, height: u32, limits: &Limits) -> Result<Self> {
        let len = byte_len(width, height)?;
        limits.check(width, height)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| PixelError::AllocationFailure { bytes: len })?;
        data.resize(len, 0);

        tracing::debug!("allocated {width}x{height} pixel buffer ({len} bytes)");
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap existing RGBA8 bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(PixelError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Copy an [`image::RgbaImage`] into a new buffer.
    pub fn from_rgba_image(image: &image::RgbaImage) -> Result<Self> {
        Self::from_raw(image.width(), image.height(), image.as_raw().clone())
    }

    /// Copy this buffer into an [`image::RgbaImage`].
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixels()[self.index(x, y)])
        })
    }

    /// Release the buffer and its memory.
    pub fn release(self) {
        tracing::debug!("released {}x{} pixel buffer", self.width, self.height);
    }

    /// Take the buffer apart into `(width, height, bytes)`.
    pub fn into_raw(self) -> (u32, u32, Vec<u8>) {
        (self.width, self.height, self.data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixels as `[R, G, B, A]` quadruples in row-major order.
    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    /// The pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels()[self.index(x, y)])
    }

    /// Overwrite the contents with `bytes` at a new size no larger than the
    /// current one. The backing allocation is kept, so the data pointer handed
    /// to a host stays valid.
    pub(crate) fn shrink_to_contents(&mut self, width: u32, height: u32, bytes: &[u8]) {
        debug_assert_eq!(bytes.len(), width as usize * height as usize * CHANNELS);
        debug_assert!(bytes.len() <= self.data.len());
        self.data.truncate(bytes.len());
        self.data.copy_from_slice(bytes);
        self.width = width;
        self.height = height;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_is_zeroed() {
        let buf = PixelBuffer::allocate(3, 2).unwrap();
        assert_eq!(buf.as_bytes().len(), 3 * 2 * 4);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buf.dimensions(), (3, 2));
    }

    #[test]
    fn test_allocate_rejects_zero_dimensions() {
        assert_eq!(
            PixelBuffer::allocate(0, 5),
            Err(PixelError::InvalidDimensions {
                width: 0,
                height: 5
            })
        );
        assert!(PixelBuffer::allocate(5, 0).is_err());
    }

    #[test]
    fn test_allocate_respects_limits() {
        let limits = Limits {
            max_pixels: 10,
            ..Limits::default()
        };
        assert!(matches!(
            PixelBuffer::allocate_with_limits(4, 4, &limits),
            Err(PixelError::DimensionsExceedLimits { .. })
        ));
    }

    #[test]
    fn test_byte_len_overflow() {
        assert!(byte_len(u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn test_from_raw_length_mismatch() {
        let err = PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            PixelError::LengthMismatch {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_pixel_lookup_is_row_major() {
        let data: Vec<u8> = (0..24).collect();
        let buf = PixelBuffer::from_raw(3, 2, data).unwrap();
        assert_eq!(buf.pixel(0, 0), Some([0, 1, 2, 3]));
        assert_eq!(buf.pixel(2, 0), Some([8, 9, 10, 11]));
        assert_eq!(buf.pixel(0, 1), Some([12, 13, 14, 15]));
        assert_eq!(buf.pixel(3, 0), None);
        assert_eq!(buf.pixel(0, 2), None);
    }

    #[test]
    fn test_rgba_image_conversion() {
        let mut img = image::RgbaImage::new(2, 3);
        img.put_pixel(1, 2, image::Rgba([10, 20, 30, 40]));
        let buf = PixelBuffer::from_rgba_image(&img).unwrap();
        assert_eq!(buf.pixel(1, 2), Some([10, 20, 30, 40]));
        assert_eq!(buf.to_rgba_image(), img);
    }

    #[test]
    fn test_shrink_keeps_allocation() {
        let mut buf = PixelBuffer::allocate(4, 4).unwrap();
        let ptr = buf.as_bytes().as_ptr();
        buf.shrink_to_contents(1, 2, &[7; 8]);
        assert_eq!(buf.dimensions(), (1, 2));
        assert_eq!(buf.as_bytes(), &[7; 8]);
        assert_eq!(buf.as_bytes().as_ptr(), ptr);
    }
}
