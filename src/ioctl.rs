//! Control requests
//!
//! Miscellaneous drive functions that don't fit the read/write shape.
//! Commands carry their arguments; replies carry their payloads. This
//! replaces the untyped pointer-argument convention with request and
//! response enums the compiler can check.

use crate::Lba;

/// Control command for a logical drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoctlCmd {
    /// Flush cached writes to the medium
    Sync,
    /// Query the number of sectors on the medium
    GetSectorCount,
    /// Query the sector size in bytes
    GetSectorSize,
    /// Query the erase block size in sectors
    GetBlockSize,
    /// Discard a sector range the filesystem no longer uses
    Trim {
        /// First sector of the range
        start: Lba,
        /// Number of sectors to discard
        sectors: Lba,
    },
}

/// Reply payload for a control command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoctlData {
    /// Command completed with no payload
    Ack,
    /// Reply to [`IoctlCmd::GetSectorCount`]
    SectorCount(u64),
    /// Reply to [`IoctlCmd::GetSectorSize`]
    SectorSize(u32),
    /// Reply to [`IoctlCmd::GetBlockSize`]
    BlockSize(u32),
}
