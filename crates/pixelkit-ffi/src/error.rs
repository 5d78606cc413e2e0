use std::cell::RefCell;
use std::ffi::{CString, c_char};

use pixelkit_core::PixelError;

/// Status codes returned across the C ABI. `0` is success.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Ok = 0,
    InvalidDimensions = -1,
    InvalidRegion = -2,
    InvalidParameter = -3,
    AllocationFailure = -4,
    UnknownBuffer = -5,
    DimensionMismatch = -6,
    NullPointer = -7,
    InvalidParams = -8,
    LimitExceeded = -9,
    LengthMismatch = -10,
}

#[derive(Debug, thiserror::Error)]
pub enum FfiError {
    #[error(transparent)]
    Pixel(#[from] PixelError),
    #[error("null buffer pointer")]
    NullPointer,
    #[error("pointer {0:#x} is not a live buffer (already released or never allocated)")]
    UnknownBuffer(usize),
    #[error("caller passed {given_width}x{given_height} for a {width}x{height} buffer")]
    DimensionMismatch {
        given_width: i32,
        given_height: i32,
        width: u32,
        height: u32,
    },
    #[error("invalid edit parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),
}

impl FfiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Pixel(err) => match err {
                PixelError::InvalidDimensions { .. } => ErrorCode::InvalidDimensions,
                PixelError::DimensionsExceedLimits { .. } => ErrorCode::LimitExceeded,
                PixelError::InvalidRegion { .. } => ErrorCode::InvalidRegion,
                PixelError::InvalidParameter { .. } | PixelError::UnknownOperation(_) => {
                    ErrorCode::InvalidParameter
                }
                PixelError::AllocationFailure { .. } => ErrorCode::AllocationFailure,
                PixelError::LengthMismatch { .. } => ErrorCode::LengthMismatch,
            },
            Self::NullPointer => ErrorCode::NullPointer,
            Self::UnknownBuffer(_) => ErrorCode::UnknownBuffer,
            Self::DimensionMismatch { .. } => ErrorCode::DimensionMismatch,
            Self::InvalidParams(_) => ErrorCode::InvalidParams,
        }
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<(ErrorCode, CString)>> = const { RefCell::new(None) };
}

/// Log `err`, remember it as this thread's last error, and return its code.
pub(crate) fn record(err: FfiError) -> ErrorCode {
    let code = err.code();
    let message = err.to_string();
    tracing::warn!("pixelkit call rejected ({code:?}): {message}");
    let message = CString::new(message.replace('\0', "")).unwrap_or_default();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some((code, message)));
    code
}

pub(crate) fn clear() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

pub(crate) fn last_code() -> ErrorCode {
    LAST_ERROR.with(|slot| slot.borrow().as_ref().map_or(ErrorCode::Ok, |(code, _)| *code))
}

/// Pointer to the last error message, or null. Valid until the next call on
/// this thread.
pub(crate) fn last_message_ptr() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |(_, message)| message.as_ptr())
    })
}

/// Collapse a result into a C status code.
pub(crate) fn status(result: Result<(), FfiError>) -> i32 {
    match result {
        Ok(()) => {
            clear();
            ErrorCode::Ok as i32
        }
        Err(err) => record(err) as i32,
    }
}
