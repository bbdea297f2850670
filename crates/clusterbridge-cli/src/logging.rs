use anyhow::{anyhow, Result};
use clusterbridge_core::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Logs go to stderr so that graph output
/// on stdout stays machine-readable.
pub fn init_tracing(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let default_level = if verbose {
        "debug".to_string()
    } else {
        config.level.to_ascii_lowercase()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "clusterbridge={0},clusterbridge_core={0},clusterbridge_graph={0}",
            default_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let installed = match config.format.as_str() {
        "json" => registry.with(fmt.json()).try_init(),
        "compact" => registry.with(fmt.compact()).try_init(),
        _ => registry.with(fmt.pretty()).try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
