//! fatio RAM Disk Driver
//!
//! Implements the BlockDevice trait over an in-memory sector store. Serves as
//! the reference backend for the disk adapter and for filesystem testing.
//!
//! Writes land in a write-back cache and reach the durable store only on
//! `flush`. `discard_unflushed` drops the cache, which models power loss for
//! crash-consistency tests. The medium is removable: `eject` and `insert`
//! drive the no-media paths of the layers above.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fatio_driver_ramdisk::RamDisk;
//! use fatio_driver_traits::BlockDevice;
//!
//! let mut disk = RamDisk::new(512, 1000);
//! disk.initialize().expect("Failed to initialize");
//!
//! let mut buffer = [0u8; 512];
//! disk.read_sectors(0, &mut buffer).expect("Read failed");
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use fatio_driver_traits::debug_storage;
use fatio_driver_traits::{
    BlockDevice, BlockGeometry, DeviceError, DeviceResult, DeviceState,
};

/// RAM-backed block device with a write-back cache
pub struct RamDisk {
    /// Sectors that have survived a flush
    durable: Vec<u8>,
    /// Written sectors not yet committed, keyed by LBA
    pending: BTreeMap<u64, Vec<u8>>,
    sector_size: u32,
    total_sectors: u64,
    state: DeviceState,
    media_present: bool,
    write_protected: bool,
}

impl RamDisk {
    /// Create a zero-filled disk with the given geometry
    pub fn new(sector_size: u32, total_sectors: u64) -> Self {
        let capacity = (total_sectors * sector_size as u64) as usize;
        RamDisk {
            durable: vec![0u8; capacity],
            pending: BTreeMap::new(),
            sector_size,
            total_sectors,
            state: DeviceState::Uninitialized,
            media_present: true,
            write_protected: false,
        }
    }

    /// Create a disk over a preformatted image
    ///
    /// Trailing bytes that do not fill a whole sector are dropped.
    pub fn from_image(mut image: Vec<u8>, sector_size: u32) -> Self {
        let total_sectors = image.len() as u64 / sector_size as u64;
        image.truncate((total_sectors * sector_size as u64) as usize);
        RamDisk {
            durable: image,
            pending: BTreeMap::new(),
            sector_size,
            total_sectors,
            state: DeviceState::Uninitialized,
            media_present: true,
            write_protected: false,
        }
    }

    /// Remove the medium
    ///
    /// Uncommitted writes are lost, as they would be on a physical pull.
    pub fn eject(&mut self) {
        self.pending.clear();
        self.media_present = false;
        self.state = DeviceState::Uninitialized;
    }

    /// Insert the medium back
    ///
    /// The device stays uninitialized until the next `initialize` call.
    pub fn insert(&mut self) {
        self.media_present = true;
    }

    /// Toggle write protection
    pub fn set_write_protected(&mut self, protected: bool) {
        self.write_protected = protected;
    }

    /// Drop all uncommitted writes (power-loss simulation)
    pub fn discard_unflushed(&mut self) {
        self.pending.clear();
    }

    /// Number of written sectors not yet committed
    pub fn unflushed_sectors(&self) -> usize {
        self.pending.len()
    }

    /// View of the durable store, as a crash-and-remount would see it
    pub fn durable_image(&self) -> &[u8] {
        &self.durable
    }

    /// Sectors available starting at `start`, capped by the medium size
    fn sectors_in_range(&self, start: u64, wanted: u64) -> u64 {
        self.total_sectors.saturating_sub(start).min(wanted)
    }

    fn check_online(&self) -> DeviceResult<()> {
        if !self.media_present {
            return Err(DeviceError::NoMedia);
        }
        if self.state != DeviceState::Ready {
            return Err(DeviceError::NotInitialized);
        }
        Ok(())
    }
}

impl BlockDevice for RamDisk {
    fn geometry(&self) -> BlockGeometry {
        BlockGeometry {
            sector_size: self.sector_size,
            total_sectors: self.total_sectors,
            erase_block_sectors: 1, // no erase granularity
        }
    }

    fn state(&self) -> DeviceState {
        self.state
    }

    fn media_present(&self) -> bool {
        self.media_present
    }

    fn initialize(&mut self) -> DeviceResult<()> {
        if !self.media_present {
            return Err(DeviceError::NoMedia);
        }
        self.state = DeviceState::Ready;
        debug_storage!("ramdisk: online, {} sectors", self.total_sectors);
        Ok(())
    }

    fn read_sectors(&mut self, start: u64, buffer: &mut [u8]) -> DeviceResult<usize> {
        self.check_online()?;

        let sector_size = self.sector_size as usize;
        let wanted = (buffer.len() / sector_size) as u64;
        let sectors = self.sectors_in_range(start, wanted);

        for i in 0..sectors {
            let lba = start + i;
            let dst = &mut buffer[(i as usize * sector_size)..((i as usize + 1) * sector_size)];
            // Uncommitted writes shadow the durable store
            match self.pending.get(&lba) {
                Some(sector) => dst.copy_from_slice(sector),
                None => {
                    let offset = lba as usize * sector_size;
                    dst.copy_from_slice(&self.durable[offset..offset + sector_size]);
                }
            }
        }

        Ok(sectors as usize * sector_size)
    }

    fn write_sectors(&mut self, start: u64, buffer: &[u8]) -> DeviceResult<usize> {
        self.check_online()?;
        if self.write_protected {
            return Err(DeviceError::WriteProtected);
        }

        let sector_size = self.sector_size as usize;
        let wanted = (buffer.len() / sector_size) as u64;
        let sectors = self.sectors_in_range(start, wanted);

        for i in 0..sectors {
            let src = &buffer[(i as usize * sector_size)..((i as usize + 1) * sector_size)];
            self.pending.insert(start + i, src.to_vec());
        }

        Ok(sectors as usize * sector_size)
    }

    fn flush(&mut self) -> DeviceResult<()> {
        if !self.media_present {
            return Err(DeviceError::NoMedia);
        }

        let committed = self.pending.len();
        let sector_size = self.sector_size as usize;
        while let Some((lba, sector)) = self.pending.pop_first() {
            let offset = lba as usize * sector_size;
            self.durable[offset..offset + sector_size].copy_from_slice(&sector);
        }
        debug_storage!("ramdisk: flushed {} sectors", committed);
        let _ = committed;
        Ok(())
    }

    fn trim(&mut self, start: u64, sectors: u64) -> DeviceResult<()> {
        self.check_online()?;
        if self.write_protected {
            return Err(DeviceError::WriteProtected);
        }
        if start + sectors > self.total_sectors {
            return Err(DeviceError::OutOfRange);
        }

        let sector_size = self.sector_size as usize;
        for lba in start..start + sectors {
            self.pending.remove(&lba);
            let offset = lba as usize * sector_size;
            self.durable[offset..offset + sector_size].fill(0);
        }
        Ok(())
    }
}
