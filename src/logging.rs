//! Logging abstraction layer.
//!
//! The router logs through a small set of macros that forward to either the
//! [`log`](https://docs.rs/log) or [`tracing`](https://docs.rs/tracing)
//! crate, selected by Cargo feature. Enable at most one of the two.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! With neither feature enabled the macros expand to nothing and their
//! arguments are never evaluated.
//!
//! Levels used inside the crate:
//!
//! - `info_log!`: table construction and committed navigations
//! - `debug_log!`: pipeline decisions (guards, redirects, fallbacks)
//! - `trace_log!`: per-record matching
//! - `warn_log!` / `error_log!`: rejected input and failed loads
//!
//! ```ignore
//! use route_navigator::{debug_log, warn_log};
//!
//! debug_log!("Resolving '{}'", path);
//! warn_log!("Ignoring unknown param '{}' for route '{}'", key, name);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __navigator_log {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!($($arg)*);
    };
}

/// Emit a **trace**-level message (route matching internals).
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        $crate::__navigator_log!(trace, $($arg)*)
    };
}

/// Emit a **debug**-level message (pipeline decisions).
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::__navigator_log!(debug, $($arg)*)
    };
}

/// Emit an **info**-level message.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        $crate::__navigator_log!(info, $($arg)*)
    };
}

/// Emit a **warn**-level message.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        $crate::__navigator_log!(warn, $($arg)*)
    };
}

/// Emit an **error**-level message.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        $crate::__navigator_log!(error, $($arg)*)
    };
}
