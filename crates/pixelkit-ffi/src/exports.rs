//! The exported C ABI.
//!
//! Buffers are identified by the address of their first pixel byte. Status
//! returns are `0` on success and a negative [`ErrorCode`](crate::ErrorCode)
//! otherwise; pointer returns are null on failure. Either way the details are
//! available through [`last_error_code`] and [`last_error_message`].

use std::ffi::c_char;

use pixelkit_core::geometry::scale_with_limits;
use pixelkit_core::{
    Adjustment, CropRegion, CropShape, EditParams, Filter, PixelBuffer, PixelError, apply_edit,
    crop,
};

use crate::error::{self, FfiError};
use crate::registry::with_registry;

fn non_negative(v: i32) -> Option<u32> {
    u32::try_from(v).ok()
}

fn positive_dimensions(width: i32, height: i32) -> Result<(u32, u32), FfiError> {
    match (non_negative(width), non_negative(height)) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(PixelError::InvalidDimensions {
            width: width.into(),
            height: height.into(),
        }
        .into()),
    }
}

fn pointer_result(result: Result<*mut u8, FfiError>) -> *mut u8 {
    match result {
        Ok(ptr) => {
            error::clear();
            ptr
        }
        Err(err) => {
            error::record(err);
            std::ptr::null_mut()
        }
    }
}

fn apply_filter(buffer: *mut u8, width: i32, height: i32, filter: Filter) -> i32 {
    error::status(with_registry(|registry| {
        filter.apply(registry.checked(buffer, width, height)?);
        Ok(())
    }))
}

fn apply_adjustment(
    buffer: *mut u8,
    width: i32,
    height: i32,
    adjustment: Adjustment,
    value: i32,
) -> i32 {
    error::status(with_registry(|registry| {
        adjustment.apply(registry.checked(buffer, width, height)?, value)?;
        Ok(())
    }))
}

/// Allocate a zero-filled `width x height` RGBA8 buffer.
///
/// Returns the address of its first byte, or null on failure.
#[unsafe(no_mangle)]
pub extern "C" fn create_buffer(width: i32, height: i32) -> *mut u8 {
    pointer_result(with_registry(|registry| {
        let (w, h) = positive_dimensions(width, height)?;
        let limits = registry.limits();
        let buffer = PixelBuffer::allocate_with_limits(w, h, &limits)?;
        Ok(registry.insert(buffer))
    }))
}

/// Release a buffer. Releasing an unknown or already-released pointer
/// returns [`ErrorCode::UnknownBuffer`](crate::ErrorCode::UnknownBuffer) and
/// frees nothing.
#[unsafe(no_mangle)]
pub extern "C" fn destroy_buffer(buffer: *mut u8) -> i32 {
    error::status(with_registry(|registry| {
        registry.remove(buffer)?.release();
        Ok(())
    }))
}

/// Current width of a live buffer, or a negative [`ErrorCode`](crate::ErrorCode).
#[unsafe(no_mangle)]
pub extern "C" fn buffer_width(buffer: *mut u8) -> i32 {
    dimension(buffer, |b| b.width())
}

/// Current height of a live buffer, or a negative [`ErrorCode`](crate::ErrorCode).
#[unsafe(no_mangle)]
pub extern "C" fn buffer_height(buffer: *mut u8) -> i32 {
    dimension(buffer, |b| b.height())
}

fn dimension(buffer: *mut u8, pick: impl Fn(&PixelBuffer) -> u32) -> i32 {
    let result = with_registry(|registry| registry.get_mut(buffer).map(|b| pick(b)));
    match result {
        // Allocation limits keep dimensions far below i32::MAX.
        Ok(v) => {
            error::clear();
            i32::try_from(v).unwrap_or(i32::MAX)
        }
        Err(err) => error::record(err) as i32,
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn apply_monochrome(buffer: *mut u8, width: i32, height: i32) -> i32 {
    apply_filter(buffer, width, height, Filter::Monochrome)
}

#[unsafe(no_mangle)]
pub extern "C" fn apply_bnw(buffer: *mut u8, width: i32, height: i32) -> i32 {
    apply_filter(buffer, width, height, Filter::BlackAndWhite)
}

#[unsafe(no_mangle)]
pub extern "C" fn apply_vivid(buffer: *mut u8, width: i32, height: i32) -> i32 {
    apply_filter(buffer, width, height, Filter::Vivid)
}

#[unsafe(no_mangle)]
pub extern "C" fn apply_bright(buffer: *mut u8, width: i32, height: i32) -> i32 {
    apply_filter(buffer, width, height, Filter::Bright)
}

#[unsafe(no_mangle)]
pub extern "C" fn apply_brightness_adjustment(
    buffer: *mut u8,
    width: i32,
    height: i32,
    value: i32,
) -> i32 {
    apply_adjustment(buffer, width, height, Adjustment::Brightness, value)
}

#[unsafe(no_mangle)]
pub extern "C" fn apply_contrast_adjustment(
    buffer: *mut u8,
    width: i32,
    height: i32,
    value: i32,
) -> i32 {
    apply_adjustment(buffer, width, height, Adjustment::Contrast, value)
}

#[unsafe(no_mangle)]
pub extern "C" fn apply_saturation_adjustment(
    buffer: *mut u8,
    width: i32,
    height: i32,
    value: i32,
) -> i32 {
    apply_adjustment(buffer, width, height, Adjustment::Saturation, value)
}

#[unsafe(no_mangle)]
pub extern "C" fn apply_highlights_adjustment(
    buffer: *mut u8,
    width: i32,
    height: i32,
    value: i32,
) -> i32 {
    apply_adjustment(buffer, width, height, Adjustment::Highlights, value)
}

#[unsafe(no_mangle)]
pub extern "C" fn apply_shadows_adjustment(
    buffer: *mut u8,
    width: i32,
    height: i32,
    value: i32,
) -> i32 {
    apply_adjustment(buffer, width, height, Adjustment::Shadows, value)
}

/// Crop a buffer in place. The pointer stays valid; query the new size with
/// [`buffer_width`] / [`buffer_height`].
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub extern "C" fn apply_crop(
    buffer: *mut u8,
    width: i32,
    height: i32,
    x: i32,
    y: i32,
    crop_width: i32,
    crop_height: i32,
    is_round: i32,
) -> i32 {
    error::status(with_registry(|registry| {
        let target = registry.checked(buffer, width, height)?;
        let (region_width, region_height) = positive_dimensions(crop_width, crop_height)?;
        let (Some(x), Some(y)) = (non_negative(x), non_negative(y)) else {
            return Err(PixelError::InvalidRegion {
                x: x.into(),
                y: y.into(),
                region_width: crop_width.into(),
                region_height: crop_height.into(),
                width: target.width(),
                height: target.height(),
            }
            .into());
        };
        let region = CropRegion::new(x, y, region_width, region_height);
        crop(target, region, CropShape::from(is_round != 0))?;
        debug_assert_eq!(target.as_bytes().as_ptr(), buffer.cast_const());
        Ok(())
    }))
}

/// Resample a buffer into a newly allocated one, which the caller must
/// release with [`destroy_buffer`]. Returns null on failure.
#[unsafe(no_mangle)]
pub extern "C" fn apply_quality_scale(
    buffer: *mut u8,
    width: i32,
    height: i32,
    scale: f32,
) -> *mut u8 {
    pointer_result(with_registry(|registry| {
        let limits = registry.limits();
        let source = registry.checked(buffer, width, height)?;
        let scaled = scale_with_limits(source, scale, &limits)?;
        Ok(registry.insert(scaled))
    }))
}

/// Apply a JSON-encoded [`EditParams`] (filter, then adjustments).
///
/// # Safety
/// `json` must point to `json_len` readable bytes, or be null with
/// `json_len == 0`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn apply_edit_params(
    buffer: *mut u8,
    width: i32,
    height: i32,
    json: *const u8,
    json_len: usize,
) -> i32 {
    let bytes: &[u8] = if json_len == 0 {
        &[]
    } else if json.is_null() {
        return error::record(FfiError::NullPointer) as i32;
    } else {
        // SAFETY: caller guarantees `json` is valid for `json_len` bytes.
        unsafe { std::slice::from_raw_parts(json, json_len) }
    };
    error::status(with_registry(|registry| {
        let target = registry.checked(buffer, width, height)?;
        let params: EditParams = serde_json::from_slice(bytes)?;
        apply_edit(target, &params)?;
        Ok(())
    }))
}

/// Status code of the most recent call on this thread (`0` if it succeeded).
#[unsafe(no_mangle)]
pub extern "C" fn last_error_code() -> i32 {
    error::last_code() as i32
}

/// NUL-terminated message for the most recent failure on this thread, or
/// null if the last call succeeded. Valid until the next call.
#[unsafe(no_mangle)]
pub extern "C" fn last_error_message() -> *const c_char {
    error::last_message_ptr()
}
