//! Logger setup for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to whoever hosts it.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a compact stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks debug or info for
/// this crate.
pub fn init_logger(verbose: bool) {
    let default_directive = if verbose {
        "optic_pricing=debug,info"
    } else {
        "optic_pricing=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
