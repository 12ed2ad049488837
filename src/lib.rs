//! fatio - block device glue for FAT filesystem drivers
//!
//! This crate sits between a FAT filesystem implementation and the storage
//! drivers underneath it. The filesystem layer addresses drives by a small
//! numeric identifier; fatio resolves that number through a [`DeviceRegistry`]
//! and forwards reads, writes and control requests to whichever
//! [`BlockDevice`](fatio_driver_traits::BlockDevice) is mapped there.
//!
//! ```text
//!   +--------------------+
//!   |  FAT filesystem    |
//!   +--------------------+
//!        | status / initialize / read / write / ioctl
//!   +--------------------+
//!   |  DiskAdapter       |   this crate
//!   +--------------------+
//!        | DeviceRegistry lookup (drive number -> device)
//!   +--------------------+
//!   | BlockDevice impls  |   RAM disk, MMC, USB mass storage, ...
//!   +--------------------+
//! ```
//!
//! The adapter never interprets sector contents. Its job is translation:
//! drive numbers to device handles, device errors to the small result
//! vocabulary the filesystem layer understands, and byte counts to the
//! exact-transfer rule (a partial transfer is an error, never a short
//! success).
//!
//! # Features
//!
//! * `write` (default) - compile the write path. Disable for read-only
//!   builds; the write entry point disappears entirely.
//! * `lba64` - widen [`Lba`] from `u32` to `u64` for media past 2 TiB
//!   at 512-byte sectors.
//! * `std` - build against the host standard library (tests do this
//!   automatically).
//! * `debug` - enable storage subsystem debug output.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod adapter;
mod error;
mod ioctl;
mod registry;
mod status;
pub mod timestamp;

pub use adapter::DiskAdapter;
pub use error::{DiskError, DiskResult};
pub use ioctl::{IoctlCmd, IoctlData};
pub use registry::{share, DeviceRegistry, DriveTable, DriveTableBuilder, SharedDevice, TableError};
pub use status::DiskStatus;

/// Logical drive identifier as used by the filesystem layer
pub type DriveNumber = u8;

/// Sector address on a logical drive
#[cfg(feature = "lba64")]
pub type Lba = u64;

/// Sector address on a logical drive
#[cfg(not(feature = "lba64"))]
pub type Lba = u32;
