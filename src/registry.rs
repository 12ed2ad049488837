//! Drive number to device mapping
//!
//! The filesystem layer names drives with small integers. A
//! [`DeviceRegistry`] resolves those numbers to shared device handles.
//! [`DriveTable`] is the standard implementation: a fixed-size slot
//! table populated once at bring-up through [`DriveTableBuilder`].

use alloc::sync::Arc;
use alloc::vec::Vec;

use fatio_driver_traits::BlockDevice;
use spin::Mutex;

use crate::DriveNumber;

/// Shared handle to a block device
///
/// Devices are shared between the adapter and whatever interrupt or
/// driver context services them, so they live behind `Arc<Mutex<..>>`.
pub type SharedDevice = Arc<Mutex<dyn BlockDevice + Send>>;

/// Wrap a device in a shared handle
pub fn share<D: BlockDevice + Send + 'static>(device: D) -> SharedDevice {
    Arc::new(Mutex::new(device))
}

/// Resolves drive numbers to devices
pub trait DeviceRegistry {
    /// Number of drive slots, mapped or not
    ///
    /// Drive numbers at or past this value are malformed requests,
    /// not merely unmapped drives.
    fn slots(&self) -> u8;

    /// Look up the device mapped at `drive`, if any
    fn resolve(&self, drive: DriveNumber) -> Option<SharedDevice>;
}

/// Error building or populating a drive table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// Drive number is outside the table
    DriveOutOfRange,
    /// Slot already has a device mapped
    SlotOccupied,
}

/// Fixed-size drive table
///
/// Built once via [`DriveTableBuilder`]; lookups after that are
/// read-only, so the table itself needs no locking.
pub struct DriveTable {
    slots: Vec<Option<SharedDevice>>,
}

impl DeviceRegistry for DriveTable {
    fn slots(&self) -> u8 {
        self.slots.len() as u8
    }

    fn resolve(&self, drive: DriveNumber) -> Option<SharedDevice> {
        self.slots.get(drive as usize)?.clone()
    }
}

/// Builder for [`DriveTable`]
pub struct DriveTableBuilder {
    slots: Vec<Option<SharedDevice>>,
}

impl DriveTableBuilder {
    /// Create a builder with `slots` empty drive slots
    pub fn new(slots: u8) -> Self {
        let mut table = Vec::with_capacity(slots as usize);
        table.resize_with(slots as usize, || None);
        Self { slots: table }
    }

    /// Map `device` at drive number `drive`
    pub fn register(
        &mut self,
        drive: DriveNumber,
        device: SharedDevice,
    ) -> Result<(), TableError> {
        let slot = self
            .slots
            .get_mut(drive as usize)
            .ok_or(TableError::DriveOutOfRange)?;
        if slot.is_some() {
            return Err(TableError::SlotOccupied);
        }
        *slot = Some(device);
        Ok(())
    }

    /// Finish building
    pub fn build(self) -> DriveTable {
        DriveTable { slots: self.slots }
    }
}
