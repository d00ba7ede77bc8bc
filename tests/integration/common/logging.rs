//! Test logging initialization
//!
//! Uses `std::sync::Once` so that initialization only happens once, even if called
//! from multiple tests.

use std::sync::Once;

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

static INIT: Once = Once::new();

/// Initializes a terminal logger for integration tests.
///
/// Loads `.env.integration` if present, so the node URL can be kept out of the shell.
/// The level comes from `LOG_LEVEL`, defaulting to `info`.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = dotenvy::from_filename(".env.integration");
        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Info);

        let _ = TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Never,
        );
    });
}
