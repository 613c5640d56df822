//! Tracing setup for hosts embedding the engine.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "COSTGATE_LOG";

static INIT: Once = Once::new();

/// Install a fmt subscriber filtered by `COSTGATE_LOG` (default `info`).
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}
