//! Drive status flags
//!
//! Status is a flag set rather than an enum: a drive can be both
//! uninitialized and missing its medium at the same time, and the
//! filesystem layer tests the bits independently.

use bitflags::bitflags;

bitflags! {
    /// Status flags for a logical drive
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DiskStatus: u8 {
        /// Drive has not completed initialization
        const NOT_INITIALIZED = 1 << 0;
        /// No medium in the drive
        const NO_MEDIA = 1 << 1;
    }
}

impl DiskStatus {
    /// Status reported for a drive number with no device behind it
    pub const fn absent() -> Self {
        Self::NOT_INITIALIZED.union(Self::NO_MEDIA)
    }

    /// True when the drive is initialized and a medium is present
    pub fn is_ready(&self) -> bool {
        self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_status_is_ready() {
        assert!(DiskStatus::empty().is_ready());
    }

    #[test]
    fn test_absent_sets_both_flags() {
        let status = DiskStatus::absent();
        assert!(status.contains(DiskStatus::NOT_INITIALIZED));
        assert!(status.contains(DiskStatus::NO_MEDIA));
        assert!(!status.is_ready());
    }

    #[test]
    fn test_single_flag_not_ready() {
        assert!(!DiskStatus::NOT_INITIALIZED.is_ready());
        assert!(!DiskStatus::NO_MEDIA.is_ready());
    }
}
