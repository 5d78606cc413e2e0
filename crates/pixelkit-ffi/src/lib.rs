//! C ABI for pixelkit.
//!
//! This crate exposes the `pixelkit-core` transforms to hosts such as a
//! browser editor compiled against the wasm build. Buffers live on the Rust
//! side; hosts receive the address of the first pixel byte, read and write
//! pixels through it, and pass it back to every call. Addresses are checked
//! against the set of live buffers before use.
#![allow(unsafe_code)]
// `no_mangle` exports and the raw JSON slice in `apply_edit_params`.

mod error;
mod exports;
mod registry;

pub use error::{ErrorCode, FfiError};
pub use exports::*;
