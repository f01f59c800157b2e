/// Configuration utilities - loading, environment overrides and validation
///
/// Configuration is loaded once at startup and passed explicitly to the
/// components that need it.
use super::schemas::Config;
use crate::errors::ConfigError;
use crate::logger::{self, LogTag};
use std::path::Path;

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

/// Environment variable overriding `openfda.api_key`
pub const ENV_API_KEY: &str = "OPENFDA_API_KEY";

/// Environment variable overriding `openfda.base_url`
pub const ENV_BASE_URL: &str = "OPENFDA_BASE_URL";

/// Load configuration from a TOML file
///
/// A missing file is not an error: defaults are used and a warning is logged.
/// A file that exists but cannot be read or parsed is an error.
pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        logger::warning(
            LogTag::Config,
            &format!(
                "Config file '{}' not found, using default values",
                path.display()
            ),
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = toml::from_str::<Config>(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    logger::debug(
        LogTag::Config,
        &format!("Loaded configuration from {}", path.display()),
    );

    Ok(config)
}

/// Apply overrides from the process environment
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_from(config, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary variable lookup
///
/// Empty values are ignored.
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(api_key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
        config.openfda.api_key = api_key.trim().to_string();
        logger::debug(LogTag::Config, &format!("openfda.api_key set from {}", ENV_API_KEY));
    }

    if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
        config.openfda.base_url = base_url.trim().to_string();
        logger::debug(
            LogTag::Config,
            &format!("openfda.base_url set from {}", ENV_BASE_URL),
        );
    }
}

/// Check cross-field constraints the schema cannot express
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.openfda.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::invalid("openfda.base_url", "must not be empty"));
    }
    let parsed = url::Url::parse(base_url)
        .map_err(|e| ConfigError::invalid("openfda.base_url", e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::invalid(
            "openfda.base_url",
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }

    if config.openfda.timeout_secs == 0 {
        return Err(ConfigError::invalid(
            "openfda.timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.signals.cache_ttl_secs == 0 {
        return Err(ConfigError::invalid(
            "signals.cache_ttl_secs",
            "must be greater than zero",
        ));
    }

    if config.signals.max_limit == 0 {
        return Err(ConfigError::invalid(
            "signals.max_limit",
            "must be greater than zero",
        ));
    }

    if config.signals.default_limit == 0 || config.signals.default_limit > config.signals.max_limit
    {
        return Err(ConfigError::invalid(
            "signals.default_limit",
            format!("must be between 1 and {}", config.signals.max_limit),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.signals.cache_ttl_secs, 3600);
        assert_eq!(config.signals.default_limit, 50);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[openfda]\napi_key = \"abc\"\n\n[webserver]\nport = 9090").unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.openfda.api_key, "abc");
        assert_eq!(config.openfda.base_url, "https://api.fda.gov");
        assert_eq!(config.webserver.port, 9090);
        assert_eq!(config.webserver.host, "127.0.0.1");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[signals]\ncache_ttl_secs = \"soon\"").unwrap();

        let err = load_config_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [(ENV_API_KEY, " secret "), (ENV_BASE_URL, "")]
            .into_iter()
            .collect();

        let mut config = Config::default();
        apply_overrides_from(&mut config, |name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.openfda.api_key, "secret");
        assert_eq!(config.openfda.base_url, "https://api.fda.gov");
    }

    #[test]
    fn test_validate_config() {
        assert!(validate_config(&Config::default()).is_ok());

        let mut config = Config::default();
        config.openfda.base_url = "ftp://example.org".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.signals.default_limit = 2000;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("signals.default_limit"));

        let mut config = Config::default();
        config.openfda.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
