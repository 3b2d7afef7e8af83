use tracing_subscriber::EnvFilter;

/// Environment variable that forces debug-level logging.
const DEBUG_ENV: &str = "ZTP_DEBUG_LOG";

/// Install the global stderr subscriber.
///
/// Stdout carries the report contracts, so logs never go there. The filter
/// comes from `RUST_LOG` (default `warn`) unless `ZTP_DEBUG_LOG` is truthy.
pub fn init() {
    let debug_enabled = std::env::var(DEBUG_ENV)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
