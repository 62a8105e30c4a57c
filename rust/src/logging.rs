//! Logging macros with verbosity level control.
//!
//! Events go through `tracing`; installing a subscriber is left to the caller.
//! Nothing is emitted at verbosity 0.
//! - 0: SILENT
//! - 1: CHANGES (schedule results, applied scenario transforms) -> `info`
//! - 2: CHECKS (validation outcomes, status decisions) -> `debug`
//! - 3: DEBUG (per-task pass values) -> `trace`

#[doc(hidden)]
pub use tracing;

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            $crate::logging::tracing::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            $crate::logging::tracing::debug!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            $crate::logging::tracing::trace!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_CHANGES);
        assert!(VERBOSITY_CHANGES < VERBOSITY_CHECKS);
        assert!(VERBOSITY_CHECKS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_log_macros_compile() {
        // No subscriber installed; only checks expansion at every level.
        for verbosity in [VERBOSITY_SILENT, VERBOSITY_DEBUG] {
            log_changes!(verbosity, "fastest completion {}", 18);
            log_checks!(verbosity, task = "a", "status {:?}", "pending");
            log_debug!(verbosity, "es={} ef={}", 0, 3);
        }
    }
}
