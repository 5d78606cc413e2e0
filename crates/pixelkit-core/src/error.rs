//! Error taxonomy for buffer and transform operations.
//!
//! Every check runs before the first pixel is read or written, so an `Err`
//! always leaves the buffer untouched.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PixelError {
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },
    #[error("dimensions {width}x{height} exceed configured limits ({reason})")]
    DimensionsExceedLimits {
        width: u32,
        height: u32,
        reason: &'static str,
    },
    #[error(
        "crop region {region_width}x{region_height} at ({x}, {y}) is outside the {width}x{height} source"
    )]
    InvalidRegion {
        x: i64,
        y: i64,
        region_width: i64,
        region_height: i64,
        width: u32,
        height: u32,
    },
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),
    #[error("failed to allocate {bytes} bytes")]
    AllocationFailure { bytes: usize },
    #[error("buffer holds {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl PixelError {
    pub(crate) fn dimensions(width: impl Into<i64>, height: impl Into<i64>) -> Self {
        Self::InvalidDimensions {
            width: width.into(),
            height: height.into(),
        }
    }
}

pub type Result<T, E = PixelError> = std::result::Result<T, E>;
