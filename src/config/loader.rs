/// Configuration loader - JSON config files and environment overrides
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::schema::Configuration;
use crate::error::ConfigError;
use crate::filters::Rule;

/// On-disk configuration document
///
/// Every key is optional and named after the option it sets. Callables have
/// no JSON form; `params_filters` and `ignore_user_agent` entries spelled
/// `/.../` become regex rules.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub proxy_host: Option<String>,
    pub proxy_port: Option<u16>,
    pub proxy_user: Option<String>,
    pub proxy_pass: Option<String>,
    pub project_root: Option<String>,
    pub environment_name: Option<String>,
    pub notifier_version: Option<String>,
    pub notifier_name: Option<String>,
    pub notifier_url: Option<String>,
    pub secure: Option<bool>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub http_open_timeout: Option<u64>,
    pub http_read_timeout: Option<u64>,
    pub ignore_user_agent: Option<Vec<String>>,
    pub params_filters: Option<Vec<String>>,
    pub ignore: Option<Vec<String>>,
    pub framework: Option<String>,
    pub source_extract_radius: Option<usize>,
    pub send_request_session: Option<bool>,
    pub debug: Option<bool>,
    pub development_environments: Option<Vec<String>>,
    pub hostname: Option<String>,
}

impl ConfigFile {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Lay the file's values over `config`. Scalars overwrite; lists replace.
    ///
    /// Rules are compiled before anything is written, so on error `config`
    /// is left untouched.
    pub fn apply(self, config: &mut Configuration) -> Result<(), ConfigError> {
        let ConfigFile {
            api_key,
            proxy_host,
            proxy_port,
            proxy_user,
            proxy_pass,
            project_root,
            environment_name,
            notifier_version,
            notifier_name,
            notifier_url,
            secure,
            host,
            port,
            http_open_timeout,
            http_read_timeout,
            ignore_user_agent,
            params_filters,
            ignore,
            framework,
            source_extract_radius,
            send_request_session,
            debug,
            development_environments,
            hostname,
        } = self;

        let ignore_user_agent = ignore_user_agent.as_deref().map(parse_rules).transpose()?;
        let params_filters = params_filters.as_deref().map(parse_rules).transpose()?;

        // Optional options: a present key sets the value
        config.api_key = api_key.or(config.api_key.take());
        config.proxy_host = proxy_host.or(config.proxy_host.take());
        config.proxy_port = proxy_port.or(config.proxy_port);
        config.proxy_user = proxy_user.or(config.proxy_user.take());
        config.proxy_pass = proxy_pass.or(config.proxy_pass.take());
        config.project_root = project_root.or(config.project_root.take());
        config.environment_name = environment_name.or(config.environment_name.take());
        config.hostname = hostname.or(config.hostname.take());

        if let Some(value) = notifier_version {
            config.notifier_version = value;
        }
        if let Some(value) = notifier_name {
            config.notifier_name = value;
        }
        if let Some(value) = notifier_url {
            config.notifier_url = value;
        }
        if let Some(value) = secure {
            config.secure = value;
        }
        if let Some(value) = host {
            config.host = value;
        }
        if let Some(value) = port {
            config.set_port(Some(value));
        }
        if let Some(value) = http_open_timeout {
            config.http_open_timeout = value;
        }
        if let Some(value) = http_read_timeout {
            config.http_read_timeout = value;
        }
        if let Some(value) = ignore {
            config.ignore = value;
        }
        if let Some(value) = framework {
            config.framework = value;
        }
        if let Some(value) = source_extract_radius {
            config.source_extract_radius = value;
        }
        if let Some(value) = send_request_session {
            config.send_request_session = value;
        }
        if let Some(value) = debug {
            config.debug = value;
        }
        if let Some(value) = development_environments {
            config.development_environments = value;
        }
        if let Some(rules) = ignore_user_agent {
            config.ignore_user_agent = rules;
        }
        if let Some(rules) = params_filters {
            config.params_filters = rules;
        }

        Ok(())
    }
}

fn parse_rules(raw: &[String]) -> Result<Vec<Rule>, ConfigError> {
    raw.iter().map(|r| Rule::parse(r)).collect()
}

/// Load configuration from a JSON file on top of the defaults
pub fn load_config(path: impl AsRef<Path>) -> Result<Configuration, ConfigError> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file = ConfigFile::from_json(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = Configuration::new();
    file.apply(&mut config)?;

    tracing::info!(path = %path.display(), "Loaded notifier configuration");
    Ok(config)
}

/// Path of the `<executable>.config` file next to the running binary
pub fn adjacent_config_path() -> Result<PathBuf, ConfigError> {
    let exe_path = std::env::current_exe().map_err(ConfigError::ExecutablePath)?;
    Ok(PathBuf::from(format!("{}.config", exe_path.display())))
}

/// Load configuration from the `<executable>.config` file next to the binary
pub fn load_adjacent_config() -> Result<Configuration, ConfigError> {
    load_config(adjacent_config_path()?)
}

/// Apply `HONEYBADGER_*` overrides from the process environment
pub fn apply_env(config: &mut Configuration) -> Result<(), ConfigError> {
    apply_env_from(config, std::env::vars())
}

/// Environment overrides, parsed but not yet applied
#[derive(Debug, Default)]
struct EnvOverrides {
    api_key: Option<String>,
    environment_name: Option<String>,
    host: Option<String>,
    project_root: Option<String>,
    port: Option<u16>,
    secure: Option<bool>,
    debug: Option<bool>,
}

/// Apply `HONEYBADGER_*` overrides from an explicit variable list.
///
/// Unrecognized variables are skipped. Every recognized value is parsed
/// before any is applied, so a malformed one leaves `config` unchanged.
pub fn apply_env_from<I, K, V>(config: &mut Configuration, vars: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut overrides = EnvOverrides::default();

    for (key, value) in vars {
        let key = key.as_ref();
        let value = value.into();

        match key {
            "HONEYBADGER_API_KEY" => overrides.api_key = Some(value),
            "HONEYBADGER_ENV" => overrides.environment_name = Some(value),
            "HONEYBADGER_HOST" => overrides.host = Some(value),
            "HONEYBADGER_PROJECT_ROOT" => overrides.project_root = Some(value),
            "HONEYBADGER_PORT" => {
                let port = value.parse::<u16>().map_err(|_| invalid_env(key, &value))?;
                overrides.port = Some(port);
            }
            "HONEYBADGER_SECURE" => overrides.secure = Some(parse_bool(key, &value)?),
            "HONEYBADGER_DEBUG" => overrides.debug = Some(parse_bool(key, &value)?),
            _ => continue,
        }

        tracing::debug!(var = key, "Read environment override");
    }

    let EnvOverrides {
        api_key,
        environment_name,
        host,
        project_root,
        port,
        secure,
        debug,
    } = overrides;

    if api_key.is_some() {
        config.api_key = api_key;
    }
    if environment_name.is_some() {
        config.environment_name = environment_name;
    }
    if project_root.is_some() {
        config.project_root = project_root;
    }
    if let Some(host) = host {
        config.host = host;
    }
    if port.is_some() {
        config.set_port(port);
    }
    if let Some(secure) = secure {
        config.secure = secure;
    }
    if let Some(debug) = debug {
        config.debug = debug;
    }

    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid_env(key, value)),
    }
}

fn invalid_env(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        var: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_config() {
        let json = r#"{
            "api_key": "abc123",
            "environment_name": "production",
            "secure": false,
            "port": 8080,
            "http_read_timeout": 30,
            "ignore": ["NotFound"],
            "ignore_user_agent": ["/[Bb]ot/", "curl/7.0"],
            "development_environments": ["dev"]
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.environment_name.as_deref(), Some("production"));
        assert!(!config.secure);
        assert_eq!(config.port(), 8080);
        assert_eq!(config.protocol(), "http");
        assert_eq!(config.http_read_timeout, 30);
        assert_eq!(config.http_open_timeout, 2);
        assert_eq!(config.ignore, vec!["NotFound".to_string()]);
        assert_eq!(config.development_environments, vec!["dev".to_string()]);
        assert!(config.is_ignored_user_agent("curl/7.0"));
        assert!(config.is_ignored_user_agent("Googlebot/2.1"));
        assert!(config.is_public());
    }

    #[test]
    fn test_empty_document_keeps_defaults() {
        let mut config = Configuration::new();
        ConfigFile::from_json("{}").unwrap().apply(&mut config).unwrap();

        assert_eq!(config.host, "api.honeybadger.io");
        assert_eq!(config.port(), 443);
        assert_eq!(config.params_filters, crate::config::defaults::default_params_filters());
    }

    #[test]
    fn test_pattern_rules_compiled() {
        let mut config = Configuration::new();
        ConfigFile::from_json(r#"{ "params_filters": ["/^secret_/", "token"] }"#)
            .unwrap()
            .apply(&mut config)
            .unwrap();

        assert!(config.is_filtered_param("secret_key"));
        assert!(config.is_filtered_param("token"));
        assert!(!config.is_filtered_param("password"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut config = Configuration::new();
        let err = ConfigFile::from_json(r#"{ "ignore_user_agent": ["/(unclosed/"] }"#)
            .unwrap()
            .apply(&mut config)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ invalid json }").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_adjacent_config_path() {
        let path = adjacent_config_path().unwrap();
        assert!(path.to_string_lossy().ends_with(".config"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Configuration::new();
        apply_env_from(
            &mut config,
            [
                ("HONEYBADGER_API_KEY", "env-key"),
                ("HONEYBADGER_ENV", "staging"),
                ("HONEYBADGER_HOST", "collector.local"),
                ("HONEYBADGER_SECURE", "false"),
                ("HONEYBADGER_DEBUG", "1"),
                ("PATH", "/usr/bin"),
            ],
        )
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.environment_name.as_deref(), Some("staging"));
        assert_eq!(config.host, "collector.local");
        assert!(!config.secure);
        assert_eq!(config.port(), 80);
        assert!(config.debug);
    }

    #[test]
    fn test_env_port_override() {
        let mut config = Configuration::new();
        apply_env_from(&mut config, [("HONEYBADGER_PORT", "8443")]).unwrap();
        config.secure = false;
        assert_eq!(config.port(), 8443);
    }

    #[test]
    fn test_env_invalid_values() {
        let mut config = Configuration::new();

        let err = apply_env_from(&mut config, [("HONEYBADGER_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref var, .. } if var == "HONEYBADGER_PORT"));

        let err = apply_env_from(&mut config, [("HONEYBADGER_SECURE", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
        assert!(config.secure);
    }

    #[test]
    fn test_env_error_leaves_config_unchanged() {
        let mut config = Configuration::new();

        // The bad value comes last, after overrides that would otherwise land
        let err = apply_env_from(
            &mut config,
            [
                ("HONEYBADGER_HOST", "evil.local"),
                ("HONEYBADGER_SECURE", "false"),
                ("HONEYBADGER_PORT", "x"),
            ],
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
        assert_eq!(config.host, "api.honeybadger.io");
        assert!(config.secure);
        assert_eq!(config.port(), 443);
    }

    #[test]
    fn test_file_error_leaves_config_unchanged() {
        let mut config = Configuration::new();
        let file = ConfigFile::from_json(
            r#"{ "host": "evil.local", "secure": false, "ignore_user_agent": ["/(bad/"] }"#,
        )
        .unwrap();

        let err = file.apply(&mut config).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
        assert_eq!(config.host, "api.honeybadger.io");
        assert!(config.secure);
        assert!(config.ignore_user_agent.is_empty());
        assert_eq!(config.params_filters, crate::config::defaults::default_params_filters());
    }
}
