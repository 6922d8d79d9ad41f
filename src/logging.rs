//! Tracing setup shared by the binaries.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `--debug` is passed.
pub const DEBUG_FILTER: &str = "git_genie=debug";

/// Filter used when neither `RUST_LOG` nor `--debug` is set.
pub const DEFAULT_FILTER: &str = "warn";

pub fn filter_for(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new(DEBUG_FILTER);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a stderr subscriber so logs never mix with command output.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init_tracing(debug: bool) {
    let _ = tracing_subscriber::registry()
        .with(filter_for(debug))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
