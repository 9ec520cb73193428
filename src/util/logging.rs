//! Structured logging setup.
//!
//! The analyzer emits `tracing` events throughout the pipeline but
//! installs no subscriber on its own; embedding applications call one
//! of these initializers (or wire their own subscriber) to see them.
//! Initialization is guarded so repeated calls are harmless.

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display.
    pub level: Level,

    /// Emit JSON lines instead of human-readable output.
    pub use_json: bool,

    /// Include the module target (e.g. `repolens::scan`) in events.
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }
}

/// Initializes logging with the given configuration. Subsequent calls
/// are no-ops.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.to_string().to_lowercase()));

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(config.include_target))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(config.include_target))
                .init();
        }
    });
}

/// Initializes logging with defaults (INFO, pretty console output).
pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Initializes logging from `RUST_LOG` and `REPOLENS_LOG_FORMAT`
/// (`json` for JSON lines).
pub fn init_from_env() {
    let use_json = env::var("REPOLENS_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    init_logging(LoggingConfig {
        use_json,
        ..Default::default()
    });
}
