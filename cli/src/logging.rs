use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INSTALL_GUARD: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber. Filtering follows `RUST_LOG` and defaults
/// to `warn`; events go to stderr so that stdout stays machine readable.
pub(crate) fn init_tracing() {
    INSTALL_GUARD.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact();

        if tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_err()
        {
            // Someone else installed a subscriber first.
        }
    });
}
