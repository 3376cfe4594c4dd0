use noi_workflow::NoiError;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `verbose` forces `debug`. Calling this twice keeps the first subscriber.
pub fn init_logging(level: &str, verbose: bool) -> Result<(), NoiError> {
    let level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_new(level)
        .map_err(|e| NoiError::Config(format!("invalid log level `{level}`: {e}")))?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Global tracing subscriber already initialized");
    }
    Ok(())
}
