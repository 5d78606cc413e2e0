//! One-click filters with fixed constants (monochrome, B&W, vivid, bright).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::{clamp_f64, clamp_i32, luma, luma_milli, map_rgb};
use crate::error::PixelError;

/// Channel multiplier used by [`vivid`].
pub const VIVID_GAIN: f64 = 1.5;
/// Offset added by [`bright`].
pub const BRIGHT_OFFSET: i32 = 50;
/// Luma above which [`black_and_white`] outputs white.
pub const BNW_THRESHOLD: u8 = 127;

/// A parameterless filter, named the way hosts refer to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    Monochrome,
    #[serde(rename = "bnw")]
    BlackAndWhite,
    Vivid,
    Bright,
}

impl Filter {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Monochrome => "monochrome",
            Self::BlackAndWhite => "bnw",
            Self::Vivid => "vivid",
            Self::Bright => "bright",
        }
    }

    pub fn all() -> &'static [Self] {
        const ALL: [Filter; 4] = [
            Filter::Monochrome,
            Filter::BlackAndWhite,
            Filter::Vivid,
            Filter::Bright,
        ];
        &ALL
    }

    /// Apply this filter in place.
    pub fn apply(&self, buffer: &mut PixelBuffer) {
        tracing::debug!(
            "applying {} filter to {}x{}",
            self.name(),
            buffer.width(),
            buffer.height()
        );
        match self {
            Self::Monochrome => monochrome(buffer),
            Self::BlackAndWhite => black_and_white(buffer),
            Self::Vivid => vivid(buffer),
            Self::Bright => bright(buffer),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = PixelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| PixelError::UnknownOperation(s.to_string()))
    }
}

/// Luma-weighted grayscale: `R = G = B = 0.299R + 0.587G + 0.114B`.
pub fn monochrome(buffer: &mut PixelBuffer) {
    map_rgb(buffer, |rgb| {
        let gray = luma(rgb);
        [gray, gray, gray]
    });
}

/// Hard threshold on luma: white above 127, black otherwise.
pub fn black_and_white(buffer: &mut PixelBuffer) {
    let threshold = u32::from(BNW_THRESHOLD) * 1000;
    map_rgb(buffer, |rgb| {
        let v = if luma_milli(rgb) > threshold { 255 } else { 0 };
        [v, v, v]
    });
}

/// Multiply every channel by 1.5.
pub fn vivid(buffer: &mut PixelBuffer) {
    map_rgb(buffer, |rgb| rgb.map(|c| clamp_f64(f64::from(c) * VIVID_GAIN)));
}

/// Add 50 to every channel.
pub fn bright(buffer: &mut PixelBuffer) {
    map_rgb(buffer, |rgb| rgb.map(|c| clamp_i32(i32::from(c) + BRIGHT_OFFSET)));
}
