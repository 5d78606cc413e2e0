//! Rectangular and round crop.
//!
//! A crop replaces the buffer's contents with the selected region. The
//! buffer keeps its allocation, so a host holding the data pointer keeps a
//! valid handle; the new dimensions are returned to the caller.
//!
//! # Round mask
//! Pixels whose center lies farther than `width / 2` from the center of the
//! crop become fully transparent black `(0, 0, 0, 0)`. The radius is keyed
//! on the crop width alone, so a non-square round crop is a circle clipped
//! by the crop rectangle, not an ellipse. Measuring from pixel centers keeps
//! the mask symmetric; the host application measured from pixel corners,
//! which shifts the circle by half a pixel (e.g. it masks `(0, 0)` of a 6x2
//! crop, which is kept here).

use serde::{Deserialize, Serialize};

use crate::buffer::{CHANNELS, PixelBuffer, byte_len};
use crate::error::{PixelError, Result};

/// Outline of a crop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropShape {
    #[default]
    Square,
    Round,
}

impl From<bool> for CropShape {
    /// `true` selects [`CropShape::Round`].
    fn from(is_round: bool) -> Self {
        if is_round { Self::Round } else { Self::Square }
    }
}

/// Crop rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check that the region is non-empty and lies inside a
    /// `width x height` source.
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PixelError::dimensions(self.width, self.height));
        }
        let fits = |origin: u32, extent: u32, bound: u32| {
            origin.checked_add(extent).is_some_and(|end| end <= bound)
        };
        if fits(self.x, self.width, width) && fits(self.y, self.height, height) {
            return Ok(());
        }
        Err(PixelError::InvalidRegion {
            x: self.x.into(),
            y: self.y.into(),
            region_width: self.width.into(),
            region_height: self.height.into(),
            width,
            height,
        })
    }

    /// Whether the pixel at `(nx, ny)` inside the crop survives the round
    /// mask.
    fn inside_round_mask(&self, nx: u32, ny: u32) -> bool {
        let center_x = self.width as f32 / 2.0;
        let center_y = self.height as f32 / 2.0;
        let dx = nx as f32 + 0.5 - center_x;
        let dy = ny as f32 + 0.5 - center_y;
        (dx * dx + dy * dy).sqrt() <= center_x
    }
}

/// Crop `buffer` to `region` in place and return the new `(width, height)`.
///
/// Nothing is read or written unless the region validates.
pub fn crop(buffer: &mut PixelBuffer, region: CropRegion, shape: CropShape) -> Result<(u32, u32)> {
    region.validate(buffer.width(), buffer.height())?;
    let len = byte_len(region.width, region.height)?;
    tracing::debug!(
        "cropping {}x{} to {:?} {}x{} at ({}, {})",
        buffer.width(),
        buffer.height(),
        shape,
        region.width,
        region.height,
        region.x,
        region.y
    );

    let src_stride = buffer.width() as usize * CHANNELS;
    let row_bytes = region.width as usize * CHANNELS;
    let src = buffer.as_bytes();

    let mut scratch = Vec::new();
    scratch
        .try_reserve_exact(len)
        .map_err(|_| PixelError::AllocationFailure { bytes: len })?;

    for ny in 0..region.height {
        let start = (region.y + ny) as usize * src_stride + region.x as usize * CHANNELS;
        let row = &src[start..start + row_bytes];
        match shape {
            CropShape::Square => scratch.extend_from_slice(row),
            CropShape::Round => {
                for (nx, px) in (0..region.width).zip(row.chunks_exact(CHANNELS)) {
                    if region.inside_round_mask(nx, ny) {
                        scratch.extend_from_slice(px);
                    } else {
                        scratch.extend_from_slice(&[0; CHANNELS]);
                    }
                }
            }
        }
    }

    buffer.shrink_to_contents(region.width, region.height, &scratch);
    Ok((region.width, region.height))
}
