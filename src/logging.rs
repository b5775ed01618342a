use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "auto_sales_report=info";

/// Install the global fmt subscriber. `RUST_LOG` overrides the default filter.
///
/// Log lines go to stderr so they never interleave with the report previews
/// printed on stdout.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
