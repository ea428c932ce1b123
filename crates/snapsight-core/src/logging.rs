//! Logging utilities for the session controller
//!
//! These macros forward to the `log` facade so the embedding application
//! decides where the output goes.

pub use log;

/// Print an informational message
#[macro_export]
macro_rules! print_info {
    ($($arg:tt)*) => {
        $crate::logging::log::info!($($arg)*);
    };
}

/// Print a warning message
#[macro_export]
macro_rules! print_warn {
    ($($arg:tt)*) => {
        $crate::logging::log::warn!($($arg)*);
    };
}

/// Print an error message
#[macro_export]
macro_rules! print_err {
    ($($arg:tt)*) => {
        $crate::logging::log::error!($($arg)*);
    };
}

/// Print a debug message
#[macro_export]
macro_rules! print_debug {
    ($($arg:tt)*) => {
        $crate::logging::log::debug!($($arg)*);
    };
}
