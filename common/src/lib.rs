pub mod config;
pub mod error;
pub mod network;
pub mod report;

/// Logs a regular status message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "sweepr::status", $($arg)*)
    };
}

/// Logs a message that marks a completed step.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "sweepr::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
