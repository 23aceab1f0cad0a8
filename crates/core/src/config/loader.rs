use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment prefix for overrides, e.g. `SKTORRENT_TRACKER__UID`.
const ENV_PREFIX: &str = "SKTORRENT_";

/// Load configuration from file with environment variable overrides.
///
/// The older `SKT_UID` / `SKT_PASS` variables are still honoured and land
/// on `tracker.uid` / `tracker.pass`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(legacy_credentials_env())
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn legacy_credentials_env() -> Env {
    Env::raw()
        .only(&["SKT_UID", "SKT_PASS"])
        .map(|key| {
            key.as_str()
                .to_ascii_lowercase()
                .replacen("skt_", "tracker.", 1)
                .into()
        })
}
