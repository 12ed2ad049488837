//! Result vocabulary for disk operations
//!
//! The filesystem layer only distinguishes three failure classes; every
//! backend error collapses into one of these before crossing the boundary.

/// Error returned by disk adapter operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskError {
    /// The transfer failed at the device level
    Io,
    /// The drive is not ready to accept transfers
    NotReady,
    /// The request itself is malformed (bad drive, zero count,
    /// undersized buffer, unsupported control command)
    InvalidParameter,
}

pub type DiskResult<T> = Result<T, DiskError>;
