//! Allocation limits for pixel buffers.
//!
//! Limits are checked before any memory is reserved. Defaults are generous
//! enough for any photo an editor will realistically load; hosts with tighter
//! memory budgets (e.g. a 32-bit wasm heap) can lower them through the
//! environment or by deserializing a [`Limits`] from their own config.

use serde::{Deserialize, Serialize};

use crate::error::{PixelError, Result};

/// Default maximum width or height in pixels.
const DEFAULT_MAX_DIMENSION: u32 = 32_768;
/// Default maximum pixel count (256 megapixels, 1 GiB of RGBA8).
const DEFAULT_MAX_PIXELS: u64 = 1 << 28;

/// Environment variable overriding [`Limits::max_width`].
pub const ENV_MAX_WIDTH: &str = "PIXELKIT_MAX_WIDTH";
/// Environment variable overriding [`Limits::max_height`].
pub const ENV_MAX_HEIGHT: &str = "PIXELKIT_MAX_HEIGHT";
/// Environment variable overriding [`Limits::max_pixels`].
pub const ENV_MAX_PIXELS: &str = "PIXELKIT_MAX_PIXELS";

/// Caps on buffer dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum buffer width in pixels.
    pub max_width: u32,
    /// Maximum buffer height in pixels.
    pub max_height: u32,
    /// Maximum `width * height`.
    pub max_pixels: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl Limits {
    /// Defaults, with each field overridable through its environment variable.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_width: env_or(ENV_MAX_WIDTH, defaults.max_width),
            max_height: env_or(ENV_MAX_HEIGHT, defaults.max_height),
            max_pixels: env_or(ENV_MAX_PIXELS, defaults.max_pixels),
        }
    }

    /// Check a prospective `width x height` buffer against these limits.
    pub fn check(&self, width: u32, height: u32) -> Result<()> {
        let reason = if width > self.max_width {
            "width"
        } else if height > self.max_height {
            "height"
        } else if u64::from(width) * u64::from(height) > self.max_pixels {
            "pixel count"
        } else {
            return Ok(());
        };
        Err(PixelError::DimensionsExceedLimits {
            width,
            height,
            reason,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(fallback)
}
