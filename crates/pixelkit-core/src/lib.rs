//! pixelkit core: RGBA8 pixel buffers and the transforms that run on them.
//!
//! This crate contains the buffer lifecycle, pointwise color operations,
//! crop and bilinear scale, and whole-image edit parameters. It has no FFI
//! surface of its own; see `pixelkit-ffi` for the C ABI.

pub mod buffer;
pub mod color;
pub mod edit;
pub mod error;
pub mod geometry;
pub mod limits;

// Re-exports for convenience.
pub use buffer::PixelBuffer;
pub use color::{Adjustment, Filter};
pub use edit::{Adjustments, EditParams, EditSession, apply_edit};
pub use error::{PixelError, Result};
pub use geometry::{CropRegion, CropShape, crop, scale};
pub use limits::Limits;
