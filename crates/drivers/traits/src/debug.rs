//! Debug macros for the storage subsystem
//!
//! These macros compile to nothing when the debug feature is disabled.

/// Debug print for storage subsystem
#[macro_export]
#[cfg(feature = "debug-storage")]
macro_rules! debug_storage {
    ($($arg:tt)*) => {
        $crate::_debug_print("[STORAGE] ", format_args!($($arg)*))
    };
}

#[macro_export]
#[cfg(not(feature = "debug-storage"))]
macro_rules! debug_storage {
    ($($arg:tt)*) => {};
}

/// Debug output function - can be replaced with actual serial output
#[doc(hidden)]
#[cfg(feature = "debug-storage")]
pub fn _debug_print(_prefix: &str, _args: core::fmt::Arguments) {
    // Hooked up to the platform console by the embedding kernel
}
