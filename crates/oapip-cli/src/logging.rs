use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "warn";

/// Installs the stderr subscriber. `--verbose` forces debug; otherwise `RUST_LOG` applies.
pub fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    };

    // Stdout carries the command output only.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
