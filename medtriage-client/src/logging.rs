//! Tracing setup for binaries and UI shells embedding the core.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG` when set, defaulting to `info`. Calling this twice
/// logs a warning instead of panicking so embedding shells can call it
/// unconditionally.
pub fn init() {
    let result = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::warn!("Tracing subscriber already initialized");
    }
}
