//! Console logging.
//!
//! Filters follow `RUST_LOG` conventions and are read from `FINTRACK_LOG`.
//! Executed SQL is logged at `debug` on the `fintrack.sql` target, so
//! `FINTRACK_LOG=info,fintrack.sql=debug` shows every statement.

use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

pub const LOG_ENV: &str = "FINTRACK_LOG";

/// Install the global subscriber. Logs go to stderr so stdout only carries replies.
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
