//! Logging setup
//!
//! The engine only uses the `log` facade; binaries call [`init`] once at
//! startup. `RUST_LOG` overrides the configured default filter.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system with a default filter such as `"info"`
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let result = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}
