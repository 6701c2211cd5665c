use std::sync::Once;

use tracing::debug;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs a stderr subscriber. `RUST_LOG` wins over `verbose` when set.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let default = if verbose { "romanizer_core=debug" } else { "romanizer_core=info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let installed = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_env_filter(filter)
            .try_init();
        // An embedding host may already own the global subscriber; log into it.
        if let Err(e) = installed {
            debug!("keeping existing tracing subscriber: {e}");
        }
    });
}
