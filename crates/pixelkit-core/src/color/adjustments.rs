//! Slider-based tonal adjustments (brightness, contrast, saturation,
//! highlights, shadows).
//!
//! Each adjustment takes a signed integer slider value. `0` is always the
//! identity and returns without touching the buffer. Values outside an
//! adjustment's [domain](Adjustment::domain) are rejected before any pixel is
//! modified.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::{clamp_f32, clamp_i32, map_rgb};
use crate::error::{PixelError, Result};

/// Channels above this value mark a pixel as a highlight.
pub const HIGHLIGHT_THRESHOLD: u8 = 192;
/// Channels below this value mark a pixel as a shadow.
pub const SHADOW_THRESHOLD: u8 = 64;

/// A parameterized tonal adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    Brightness,
    Contrast,
    Saturation,
    Highlights,
    Shadows,
}

impl Adjustment {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::Highlights => "highlights",
            Self::Shadows => "shadows",
        }
    }

    /// All adjustments, in the order an edit applies them.
    pub fn all() -> &'static [Self] {
        const ALL: [Adjustment; 5] = [
            Adjustment::Brightness,
            Adjustment::Contrast,
            Adjustment::Saturation,
            Adjustment::Highlights,
            Adjustment::Shadows,
        ];
        &ALL
    }

    /// Accepted slider values.
    ///
    /// Contrast stops well short of 259, where its factor divides by zero.
    pub const fn domain(&self) -> RangeInclusive<i32> {
        match self {
            Self::Brightness | Self::Contrast => -255..=255,
            Self::Saturation | Self::Highlights | Self::Shadows => -100..=100,
        }
    }

    pub fn validate(&self, value: i32) -> Result<()> {
        let domain = self.domain();
        if domain.contains(&value) {
            return Ok(());
        }
        Err(PixelError::InvalidParameter {
            name: self.name(),
            value: f64::from(value),
            reason: match self {
                Self::Brightness | Self::Contrast => "expected a value in -255..=255",
                _ => "expected a value in -100..=100",
            },
        })
    }

    /// Apply this adjustment in place.
    pub fn apply(&self, buffer: &mut PixelBuffer, value: i32) -> Result<()> {
        tracing::debug!(
            "applying {} {value} to {}x{}",
            self.name(),
            buffer.width(),
            buffer.height()
        );
        match self {
            Self::Brightness => brightness(buffer, value),
            Self::Contrast => contrast(buffer, value),
            Self::Saturation => saturation(buffer, value),
            Self::Highlights => highlights(buffer, value),
            Self::Shadows => shadows(buffer, value),
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Adjustment {
    type Err = PixelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or_else(|| PixelError::UnknownOperation(s.to_string()))
    }
}

/// Add `value` to every channel.
pub fn brightness(buffer: &mut PixelBuffer, value: i32) -> Result<()> {
    Adjustment::Brightness.validate(value)?;
    if value == 0 {
        return Ok(());
    }
    map_rgb(buffer, |rgb| rgb.map(|c| clamp_i32(i32::from(c) + value)));
    Ok(())
}

/// Stretch channels away from (or toward) mid-gray.
///
/// ```text
/// factor = 259 × (value + 255) / (255 × (259 − value))
/// out    = factor × (in − 128) + 128
/// ```
pub fn contrast(buffer: &mut PixelBuffer, value: i32) -> Result<()> {
    Adjustment::Contrast.validate(value)?;
    if value == 0 {
        return Ok(());
    }
    let v = value as f32;
    let factor = (259.0 * (v + 255.0)) / (255.0 * (259.0 - v));
    map_rgb(buffer, |rgb| {
        rgb.map(|c| clamp_f32(factor * (f32::from(c) - 128.0) + 128.0))
    });
    Ok(())
}

/// Scale each channel's distance from the pixel's luma by `1 + value / 100`.
///
/// `-100` produces grayscale.
pub fn saturation(buffer: &mut PixelBuffer, value: i32) -> Result<()> {
    Adjustment::Saturation.validate(value)?;
    if value == 0 {
        return Ok(());
    }
    let factor = 1.0 + value as f32 / 100.0;
    map_rgb(buffer, |[r, g, b]| {
        let gray = f32::from(r) * 0.299 + f32::from(g) * 0.587 + f32::from(b) * 0.114;
        [r, g, b].map(|c| clamp_f32(gray + (f32::from(c) - gray) * factor))
    });
    Ok(())
}

/// Push bright pixels toward (or away from) white.
///
/// A pixel is adjusted only if any channel exceeds 192; then all three
/// channels move by `(255 − in) × value / 100`.
pub fn highlights(buffer: &mut PixelBuffer, value: i32) -> Result<()> {
    Adjustment::Highlights.validate(value)?;
    if value == 0 {
        return Ok(());
    }
    let factor = value as f32 / 100.0;
    map_rgb(buffer, |rgb| {
        if !rgb.iter().any(|&c| c > HIGHLIGHT_THRESHOLD) {
            return rgb;
        }
        rgb.map(|c| clamp_f32(f32::from(c) + f32::from(255 - c) * factor))
    });
    Ok(())
}

/// Lift (or deepen) dark pixels.
///
/// A pixel is adjusted only if any channel is below 64; then all three
/// channels are scaled by `1 + value / 100`.
pub fn shadows(buffer: &mut PixelBuffer, value: i32) -> Result<()> {
    Adjustment::Shadows.validate(value)?;
    if value == 0 {
        return Ok(());
    }
    let gain = 1.0 + value as f32 / 100.0;
    map_rgb(buffer, |rgb| {
        if !rgb.iter().any(|&c| c < SHADOW_THRESHOLD) {
            return rgb;
        }
        rgb.map(|c| clamp_f32(f32::from(c) * gain))
    });
    Ok(())
}
