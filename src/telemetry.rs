use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{PortalError, Result};

/// `RUST_LOG` when set, otherwise the configured filter.
pub fn env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(logging: &LoggingConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(logging))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| PortalError::Config(format!("logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let logging = LoggingConfig::default();
        let _ = init(&logging);
        assert!(matches!(init(&logging), Err(PortalError::Config(_))));
    }
}
