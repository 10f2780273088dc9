//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or
/// debug output for this crate with `--verbose`.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "warn,voice_auditor=debug"
    } else {
        "warn"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
