use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};

/// Install the JSON subscriber. `RUST_LOG` wins over `default_filter`.
///
/// Returns an error instead of panicking when a global subscriber is
/// already set, so hosts and tests can call it more than once.
pub fn init_tracing(default_filter: &str) -> AppResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))
}
