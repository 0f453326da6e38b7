use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

/// Installs the stderr subscriber. `RUST_LOG` wins over the verbosity flag.
/// Returns false when a subscriber was already installed.
pub fn init(verbose: bool) -> bool {
    let default_level = if verbose { "subsync=debug,info" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
