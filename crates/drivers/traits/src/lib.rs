//! Block Device Driver Traits for fatio
//!
//! This crate defines the trait interface that storage backends implement.
//! The disk adapter fronting the filesystem layer uses these traits to drive
//! storage without knowing the specific driver implementation.
//!
//! # Debug Features
//!
//! Enable debug output for the storage subsystem at compile time:
//! ```toml
//! fatio-driver-traits = { path = "...", features = ["debug-storage"] }
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

// Re-export trait modules
pub mod block;
mod debug;

pub use block::*;
pub use debug::*;

/// Common error type for block device operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// No medium in the drive
    NoMedia,
    /// Device has not been initialized
    NotInitialized,
    /// Requested range lies outside the medium
    OutOfRange,
    /// Buffer too small for the requested transfer
    BufferTooSmall,
    /// Medium is write protected
    WriteProtected,
    /// Not supported by this device
    NotSupported,
    /// I/O error
    Io,
    /// Device-specific error
    Device(u32),
}

pub type DeviceResult<T> = Result<T, DeviceError>;

/// Device lifecycle state
///
/// A drive is either uninitialized or ready; the absent-media condition is
/// reported separately via [`BlockDevice::media_present`] and can be observed
/// from either state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Device is known but has not completed initialization
    Uninitialized,
    /// Device is initialized and accepting transfers
    Ready,
}
