//! Live buffers handed out across the boundary.
//!
//! Hosts only ever see the address of a buffer's first byte. Every call looks
//! that address up here before touching pixels, so a stale, foreign or
//! already-released pointer is reported instead of dereferenced.
//!
//! Released addresses are tombstoned for the life of the process and never
//! handed out again, so a stale pointer cannot alias a buffer allocated later
//! at the same address.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::{Mutex, const_mutex};
use pixelkit_core::{Limits, PixelBuffer, PixelError};

use crate::error::FfiError;

static REGISTRY: Mutex<Registry> = const_mutex(Registry::new());

pub(crate) struct Registry {
    buffers: BTreeMap<usize, PixelBuffer>,
    released: BTreeSet<usize>,
    limits: Option<Limits>,
}

fn address(buffer: &PixelBuffer) -> usize {
    buffer.as_bytes().as_ptr() as usize
}

impl Registry {
    const fn new() -> Self {
        Self {
            buffers: BTreeMap::new(),
            released: BTreeSet::new(),
            limits: None,
        }
    }

    /// Limits from the environment, read on first use.
    pub(crate) fn limits(&mut self) -> Limits {
        *self.limits.get_or_insert_with(|| {
            let limits = Limits::from_env();
            tracing::debug!("pixelkit limits: {limits:?}");
            limits
        })
    }

    /// Take ownership of `buffer` and return its host-visible address.
    ///
    /// A buffer that landed on a tombstoned address is moved to a fresh
    /// allocation. Rejected allocations stay alive until a clean address is
    /// found so the allocator cannot return them again.
    pub(crate) fn insert(&mut self, mut buffer: PixelBuffer) -> *mut u8 {
        let mut rejected = Vec::new();
        while self.released.contains(&address(&buffer)) {
            tracing::debug!("skipping released address {:#x}", address(&buffer));
            let copy = buffer.clone();
            rejected.push(std::mem::replace(&mut buffer, copy));
        }
        drop(rejected);

        let ptr = buffer.as_bytes_mut().as_mut_ptr();
        self.buffers.insert(ptr as usize, buffer);
        ptr
    }

    /// Unregister a live buffer and tombstone its address.
    pub(crate) fn remove(&mut self, ptr: *mut u8) -> Result<PixelBuffer, FfiError> {
        if ptr.is_null() {
            return Err(FfiError::NullPointer);
        }
        let buffer = self
            .buffers
            .remove(&(ptr as usize))
            .ok_or(FfiError::UnknownBuffer(ptr as usize))?;
        self.released.insert(ptr as usize);
        Ok(buffer)
    }

    /// Look up a live buffer by address.
    pub(crate) fn get_mut(&mut self, ptr: *mut u8) -> Result<&mut PixelBuffer, FfiError> {
        if ptr.is_null() {
            return Err(FfiError::NullPointer);
        }
        self.buffers
            .get_mut(&(ptr as usize))
            .ok_or(FfiError::UnknownBuffer(ptr as usize))
    }

    /// Look up a live buffer and check that the caller's idea of its size
    /// matches.
    pub(crate) fn checked(
        &mut self,
        ptr: *mut u8,
        width: i32,
        height: i32,
    ) -> Result<&mut PixelBuffer, FfiError> {
        if width <= 0 || height <= 0 {
            return Err(PixelError::InvalidDimensions {
                width: width.into(),
                height: height.into(),
            }
            .into());
        }
        let buffer = self.get_mut(ptr)?;
        let (w, h) = buffer.dimensions();
        if width as u32 != w || height as u32 != h {
            return Err(FfiError::DimensionMismatch {
                given_width: width,
                given_height: height,
                width: w,
                height: h,
            });
        }
        Ok(buffer)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.buffers.len()
    }
}

/// Run `f` with exclusive access to the registry.
pub(crate) fn with_registry<T>(f: impl FnOnce(&mut Registry) -> T) -> T {
    f(&mut REGISTRY.lock())
}
