//! Client settings: built-in defaults, then an optional TOML file, then
//! `INVENTARIO_*` environment variables, then command-line flags.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use inventario_core::ClientConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "inventario=info,inventario_core=warn";

pub fn load(
    file: &Path,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<ClientConfig, ConfigError> {
    let mut settings: ClientConfig = Config::builder()
        .add_source(File::from(file).required(false))
        .add_source(Environment::with_prefix("INVENTARIO"))
        .build()?
        .try_deserialize()?;

    if let Some(base_url) = base_url {
        settings.base_url = base_url;
    }
    if let Some(timeout_secs) = timeout_secs {
        settings.timeout_secs = timeout_secs;
    }
    Ok(settings)
}

/// Log to stderr so stdout carries only results. `RUST_LOG` overrides the
/// default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
