use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,berth_dock=debug";

/// Install a `fmt` subscriber filtered by `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install a `fmt` subscriber with an explicit fallback filter.
pub fn init_with_filter(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
