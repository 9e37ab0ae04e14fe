//! Conditional logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! Every record is written under the `reco_content` target so hosts can filter
//! the controller's output with `RUST_LOG=reco_content=debug` without pulling
//! in reqwest or tokio noise.
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_warn};
//!
//! log_info!("session {} started", session_id);
//! ```

/// Target shared by every controller log record.
pub const LOG_TARGET: &str = "reco_content";

/// Conditional debug logging. The calling module must define `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!(target: $crate::utils::logging::LOG_TARGET, $($arg)*);
        }
    };
}

/// Conditional info logging. The calling module must define `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!(target: $crate::utils::logging::LOG_TARGET, $($arg)*);
        }
    };
}

/// Conditional warn logging. The calling module must define `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!(target: $crate::utils::logging::LOG_TARGET, $($arg)*);
        }
    };
}

/// Conditional error logging. The calling module must define `ENABLE_LOGS`.
/// Failures that abort a load always go through here so they reach the host log.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!(target: $crate::utils::logging::LOG_TARGET, $($arg)*);
        }
    };
}

/// Initializes `env_logger` for the binary. `RUST_LOG` wins when set; otherwise
/// the level is Info, or Debug when `RECO_CONTENT_DEBUG` is `1`/`true`.
pub fn init() {
    let debug_mode = std::env::var("RECO_CONTENT_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let level = if debug_mode {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
