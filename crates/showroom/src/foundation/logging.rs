//! Logging utilities

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system with a default level.
///
/// `RUST_LOG` still overrides the default. Calling this twice is harmless;
/// the second call is ignored with a warning.
pub fn init(default_level: log::LevelFilter) {
    if let Err(e) = env_logger::Builder::from_default_env()
        .filter_level(default_level)
        .parse_default_env()
        .try_init()
    {
        log::warn!("Logger already initialized: {}", e);
    }
}
