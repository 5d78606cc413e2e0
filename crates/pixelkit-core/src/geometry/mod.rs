//! Geometric operations: crop and bilinear quality scale.

pub mod crop;
pub mod scale;

pub use crop::{CropRegion, CropShape, crop};
pub use scale::{scale, scale_with_limits, scaled_dimensions};
