use tracing_subscriber::{fmt, EnvFilter};

pub fn initialize_logger(verbose: bool) {
    let default_filter = if verbose {
        "avd_toolkit=debug,avd_block_processor=debug"
    } else {
        "avd_toolkit=info,avd_block_processor=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global logger");
}
