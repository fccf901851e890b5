use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the crate logs warnings, or info
/// messages as well when `verbose` is on. Logs go to stderr so they never mix
/// with the per-file status lines on stdout.
pub fn initialize_logger(verbose: bool) {
    let default_filter = if verbose { "diffex=info" } else { "diffex=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Logger already initialized");
    }
}
