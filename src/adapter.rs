//! Disk adapter
//!
//! Front end the filesystem layer calls into. Each operation resolves a
//! drive number through the registry, drives the device, and translates
//! the outcome into [`DiskStatus`] flags or a [`DiskError`].
//!
//! Transfer rule: a read or write succeeds only if the device moves the
//! exact number of bytes requested. Anything short is reported as an
//! I/O error, never as a partial success.

use fatio_driver_traits::{debug_storage, BlockDevice, DeviceError, DeviceState};

use crate::{
    DeviceRegistry, DiskError, DiskResult, DiskStatus, DriveNumber, IoctlCmd, IoctlData, Lba,
};
use crate::registry::SharedDevice;

/// Translates filesystem-layer disk calls into block device operations
pub struct DiskAdapter<R: DeviceRegistry> {
    registry: R,
}

impl<R: DeviceRegistry> DiskAdapter<R> {
    /// Create an adapter over a device registry
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Access the underlying registry
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Report the current status of a drive
    ///
    /// Never fails: a drive with nothing behind it reports
    /// [`DiskStatus::absent`].
    pub fn status(&self, drive: DriveNumber) -> DiskStatus {
        match self.registry.resolve(drive) {
            Some(device) => device_flags(&*device.lock()),
            None => DiskStatus::absent(),
        }
    }

    /// Initialize a drive and report its resulting status
    ///
    /// Idempotent: re-initializing a ready drive re-validates media
    /// presence rather than erroring. Like [`status`](Self::status),
    /// this reports failure through the returned flags.
    pub fn initialize(&self, drive: DriveNumber) -> DiskStatus {
        let device = match self.registry.resolve(drive) {
            Some(device) => device,
            None => return DiskStatus::absent(),
        };

        let mut device = device.lock();
        if !device.media_present() {
            return DiskStatus::absent();
        }
        match device.initialize() {
            Ok(()) => {
                debug_storage!("drive {} initialized", drive);
                device_flags(&*device)
            }
            Err(DeviceError::NoMedia) => DiskStatus::absent(),
            Err(_) => DiskStatus::NOT_INITIALIZED,
        }
    }

    /// Read `count` sectors starting at `sector` into `buffer`
    ///
    /// `buffer` must hold at least `count` sectors; extra space is left
    /// untouched.
    pub fn read(
        &self,
        drive: DriveNumber,
        sector: Lba,
        count: Lba,
        buffer: &mut [u8],
    ) -> DiskResult<()> {
        let device = self.device_for_io(drive)?;
        let mut device = device.lock();
        check_online(&*device)?;

        let requested = transfer_bytes(&*device, count)?;
        if buffer.len() < requested {
            return Err(DiskError::InvalidParameter);
        }

        let transferred = device
            .read_sectors(sector as u64, &mut buffer[..requested])
            .map_err(translate_io)?;
        if transferred != requested {
            debug_storage!(
                "short read on drive {}: {} of {} bytes",
                drive,
                transferred,
                requested
            );
            return Err(DiskError::Io);
        }
        Ok(())
    }

    /// Write `count` sectors starting at `sector` from `buffer`
    ///
    /// `buffer` must hold at least `count` sectors; extra bytes are
    /// ignored. Compiled out of read-only builds.
    #[cfg(feature = "write")]
    pub fn write(
        &self,
        drive: DriveNumber,
        sector: Lba,
        count: Lba,
        buffer: &[u8],
    ) -> DiskResult<()> {
        let device = self.device_for_io(drive)?;
        let mut device = device.lock();
        check_online(&*device)?;

        let requested = transfer_bytes(&*device, count)?;
        if buffer.len() < requested {
            return Err(DiskError::InvalidParameter);
        }

        let transferred = device
            .write_sectors(sector as u64, &buffer[..requested])
            .map_err(translate_io)?;
        if transferred != requested {
            debug_storage!(
                "short write on drive {}: {} of {} bytes",
                drive,
                transferred,
                requested
            );
            return Err(DiskError::Io);
        }
        Ok(())
    }

    /// Issue a control command to a drive
    pub fn ioctl(&self, drive: DriveNumber, cmd: IoctlCmd) -> DiskResult<IoctlData> {
        let device = self.device_for_io(drive)?;
        let mut device = device.lock();
        check_online(&*device)?;

        match cmd {
            IoctlCmd::Sync => {
                device.flush().map_err(translate_io)?;
                Ok(IoctlData::Ack)
            }
            IoctlCmd::GetSectorCount => Ok(IoctlData::SectorCount(device.geometry().total_sectors)),
            IoctlCmd::GetSectorSize => Ok(IoctlData::SectorSize(device.geometry().sector_size)),
            IoctlCmd::GetBlockSize => {
                Ok(IoctlData::BlockSize(device.geometry().erase_block_sectors))
            }
            IoctlCmd::Trim { start, sectors } => {
                match device.trim(start as u64, sectors as u64) {
                    Ok(()) => Ok(IoctlData::Ack),
                    Err(DeviceError::NotSupported) => Err(DiskError::InvalidParameter),
                    Err(err) => Err(translate_io(err)),
                }
            }
        }
    }

    /// Resolve a drive for a data-path operation
    ///
    /// Unlike status reporting, data-path failures are errors: a drive
    /// number past the table is a malformed request, an unmapped slot
    /// is a drive that is not ready.
    fn device_for_io(&self, drive: DriveNumber) -> DiskResult<SharedDevice> {
        if drive >= self.registry.slots() {
            return Err(DiskError::InvalidParameter);
        }
        self.registry.resolve(drive).ok_or(DiskError::NotReady)
    }
}

/// Reject transfers before the drive is up
fn check_online(device: &dyn BlockDevice) -> DiskResult<()> {
    if !device.media_present() {
        return Err(DiskError::NotReady);
    }
    match device.state() {
        DeviceState::Ready => Ok(()),
        DeviceState::Uninitialized => Err(DiskError::NotReady),
    }
}

/// Byte length of a `count`-sector transfer, rejecting zero and overflow
fn transfer_bytes(device: &dyn BlockDevice, count: Lba) -> DiskResult<usize> {
    if count == 0 {
        return Err(DiskError::InvalidParameter);
    }
    let sector_size = device.geometry().sector_size as usize;
    (count as usize)
        .checked_mul(sector_size)
        .ok_or(DiskError::InvalidParameter)
}

/// Collapse a device error into the data-path vocabulary
fn translate_io(err: DeviceError) -> DiskError {
    match err {
        DeviceError::NoMedia => DiskError::NotReady,
        _ => DiskError::Io,
    }
}

/// Status flags for a resolved device
fn device_flags(device: &dyn BlockDevice) -> DiskStatus {
    if !device.media_present() {
        return DiskStatus::absent();
    }
    match device.state() {
        DeviceState::Uninitialized => DiskStatus::NOT_INITIALIZED,
        DeviceState::Ready => DiskStatus::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{share, DriveTableBuilder};
    use fatio_driver_traits::{BlockGeometry, DeviceResult};

    /// Scripted device for exercising adapter translation paths
    struct MockDisk {
        state: DeviceState,
        media_present: bool,
        read_result: Option<DeviceError>,
        write_result: Option<DeviceError>,
        flush_result: Option<DeviceError>,
        short_by: usize,
    }

    impl MockDisk {
        fn ready() -> Self {
            Self {
                state: DeviceState::Ready,
                media_present: true,
                read_result: None,
                write_result: None,
                flush_result: None,
                short_by: 0,
            }
        }
    }

    impl BlockDevice for MockDisk {
        fn geometry(&self) -> BlockGeometry {
            BlockGeometry {
                sector_size: 512,
                total_sectors: 64,
                erase_block_sectors: 8,
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
            Ok(())
        }

        fn read_sectors(&mut self, _start: u64, buffer: &mut [u8]) -> DeviceResult<usize> {
            match self.read_result {
                Some(err) => Err(err),
                None => Ok(buffer.len() - self.short_by),
            }
        }

        fn write_sectors(&mut self, _start: u64, buffer: &[u8]) -> DeviceResult<usize> {
            match self.write_result {
                Some(err) => Err(err),
                None => Ok(buffer.len() - self.short_by),
            }
        }

        fn flush(&mut self) -> DeviceResult<()> {
            match self.flush_result {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    fn adapter_with(device: MockDisk) -> DiskAdapter<crate::DriveTable> {
        let mut builder = DriveTableBuilder::new(4);
        builder.register(0, share(device)).unwrap();
        DiskAdapter::new(builder.build())
    }

    #[test]
    fn test_status_unmapped_drive() {
        let adapter = adapter_with(MockDisk::ready());
        assert_eq!(adapter.status(3), DiskStatus::absent());
    }

    #[test]
    fn test_status_out_of_range_drive() {
        let adapter = adapter_with(MockDisk::ready());
        assert_eq!(adapter.status(200), DiskStatus::absent());
    }

    #[test]
    fn test_status_ready_drive() {
        let adapter = adapter_with(MockDisk::ready());
        assert!(adapter.status(0).is_ready());
    }

    #[test]
    fn test_status_uninitialized_drive() {
        let mut disk = MockDisk::ready();
        disk.state = DeviceState::Uninitialized;
        let adapter = adapter_with(disk);
        assert_eq!(adapter.status(0), DiskStatus::NOT_INITIALIZED);
    }

    #[test]
    fn test_status_no_media() {
        let mut disk = MockDisk::ready();
        disk.media_present = false;
        let adapter = adapter_with(disk);
        assert_eq!(adapter.status(0), DiskStatus::absent());
    }

    #[test]
    fn test_initialize_brings_drive_up() {
        let mut disk = MockDisk::ready();
        disk.state = DeviceState::Uninitialized;
        let adapter = adapter_with(disk);
        assert!(adapter.initialize(0).is_ready());
    }

    #[test]
    fn test_initialize_repeat_reports_same_flags() {
        let mut disk = MockDisk::ready();
        disk.state = DeviceState::Uninitialized;
        let adapter = adapter_with(disk);
        let first = adapter.initialize(0);
        let second = adapter.initialize(0);
        assert_eq!(first, second);
        assert!(second.is_ready());
    }

    #[test]
    fn test_initialize_unmapped_drive() {
        let adapter = adapter_with(MockDisk::ready());
        assert_eq!(adapter.initialize(2), DiskStatus::absent());
    }

    #[test]
    fn test_initialize_without_media() {
        let mut disk = MockDisk::ready();
        disk.media_present = false;
        disk.state = DeviceState::Uninitialized;
        let adapter = adapter_with(disk);
        assert_eq!(adapter.initialize(0), DiskStatus::absent());
    }

    #[test]
    fn test_read_full_transfer() {
        let adapter = adapter_with(MockDisk::ready());
        let mut buffer = [0u8; 1024];
        assert_eq!(adapter.read(0, 0, 2, &mut buffer), Ok(()));
    }

    #[test]
    fn test_read_short_transfer_is_io_error() {
        let mut disk = MockDisk::ready();
        disk.short_by = 512;
        let adapter = adapter_with(disk);
        let mut buffer = [0u8; 1024];
        assert_eq!(adapter.read(0, 0, 2, &mut buffer), Err(DiskError::Io));
    }

    #[test]
    fn test_read_device_error_translates() {
        let mut disk = MockDisk::ready();
        disk.read_result = Some(DeviceError::Device(0x42));
        let adapter = adapter_with(disk);
        let mut buffer = [0u8; 512];
        assert_eq!(adapter.read(0, 0, 1, &mut buffer), Err(DiskError::Io));
    }

    #[test]
    fn test_read_media_loss_translates_to_not_ready() {
        let mut disk = MockDisk::ready();
        disk.read_result = Some(DeviceError::NoMedia);
        let adapter = adapter_with(disk);
        let mut buffer = [0u8; 512];
        assert_eq!(adapter.read(0, 0, 1, &mut buffer), Err(DiskError::NotReady));
    }

    #[test]
    fn test_read_zero_count_rejected() {
        let adapter = adapter_with(MockDisk::ready());
        let mut buffer = [0u8; 512];
        assert_eq!(
            adapter.read(0, 0, 0, &mut buffer),
            Err(DiskError::InvalidParameter)
        );
    }

    #[test]
    fn test_read_undersized_buffer_rejected() {
        let adapter = adapter_with(MockDisk::ready());
        let mut buffer = [0u8; 512];
        assert_eq!(
            adapter.read(0, 0, 2, &mut buffer),
            Err(DiskError::InvalidParameter)
        );
    }

    #[test]
    fn test_read_out_of_range_drive_is_parameter_error() {
        let adapter = adapter_with(MockDisk::ready());
        let mut buffer = [0u8; 512];
        assert_eq!(
            adapter.read(200, 0, 1, &mut buffer),
            Err(DiskError::InvalidParameter)
        );
    }

    #[test]
    fn test_read_unmapped_drive_is_not_ready() {
        let adapter = adapter_with(MockDisk::ready());
        let mut buffer = [0u8; 512];
        assert_eq!(adapter.read(1, 0, 1, &mut buffer), Err(DiskError::NotReady));
    }

    #[test]
    fn test_read_uninitialized_drive_is_not_ready() {
        let mut disk = MockDisk::ready();
        disk.state = DeviceState::Uninitialized;
        let adapter = adapter_with(disk);
        let mut buffer = [0u8; 512];
        assert_eq!(adapter.read(0, 0, 1, &mut buffer), Err(DiskError::NotReady));
    }

    #[cfg(feature = "write")]
    #[test]
    fn test_write_full_transfer() {
        let adapter = adapter_with(MockDisk::ready());
        let buffer = [0xA5u8; 1024];
        assert_eq!(adapter.write(0, 4, 2, &buffer), Ok(()));
    }

    #[cfg(feature = "write")]
    #[test]
    fn test_write_short_transfer_is_io_error() {
        let mut disk = MockDisk::ready();
        disk.short_by = 100;
        let adapter = adapter_with(disk);
        let buffer = [0u8; 512];
        assert_eq!(adapter.write(0, 0, 1, &buffer), Err(DiskError::Io));
    }

    #[cfg(feature = "write")]
    #[test]
    fn test_write_protected_is_io_error() {
        let mut disk = MockDisk::ready();
        disk.write_result = Some(DeviceError::WriteProtected);
        let adapter = adapter_with(disk);
        let buffer = [0u8; 512];
        assert_eq!(adapter.write(0, 0, 1, &buffer), Err(DiskError::Io));
    }

    #[test]
    fn test_ioctl_sync() {
        let adapter = adapter_with(MockDisk::ready());
        assert_eq!(adapter.ioctl(0, IoctlCmd::Sync), Ok(IoctlData::Ack));
    }

    #[test]
    fn test_ioctl_sync_failure() {
        let mut disk = MockDisk::ready();
        disk.flush_result = Some(DeviceError::Io);
        let adapter = adapter_with(disk);
        assert_eq!(adapter.ioctl(0, IoctlCmd::Sync), Err(DiskError::Io));
    }

    #[test]
    fn test_ioctl_geometry_queries() {
        let adapter = adapter_with(MockDisk::ready());
        assert_eq!(
            adapter.ioctl(0, IoctlCmd::GetSectorCount),
            Ok(IoctlData::SectorCount(64))
        );
        assert_eq!(
            adapter.ioctl(0, IoctlCmd::GetSectorSize),
            Ok(IoctlData::SectorSize(512))
        );
        assert_eq!(
            adapter.ioctl(0, IoctlCmd::GetBlockSize),
            Ok(IoctlData::BlockSize(8))
        );
    }

    #[test]
    fn test_ioctl_trim_unsupported_is_parameter_error() {
        // MockDisk keeps the default trim, which reports NotSupported
        let adapter = adapter_with(MockDisk::ready());
        assert_eq!(
            adapter.ioctl(0, IoctlCmd::Trim { start: 0, sectors: 8 }),
            Err(DiskError::InvalidParameter)
        );
    }

    #[test]
    fn test_ioctl_not_ready_drive() {
        let mut disk = MockDisk::ready();
        disk.state = DeviceState::Uninitialized;
        let adapter = adapter_with(disk);
        assert_eq!(
            adapter.ioctl(0, IoctlCmd::GetSectorCount),
            Err(DiskError::NotReady)
        );
    }

    #[test]
    fn test_ioctl_unmapped_drive() {
        let adapter = adapter_with(MockDisk::ready());
        assert_eq!(
            adapter.ioctl(1, IoctlCmd::Sync),
            Err(DiskError::NotReady)
        );
    }
}
