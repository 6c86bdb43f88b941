use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "CATALOG_ENV";
const CONFIG_DIR_ENV: &str = "CATALOG_CONFIG_DIR";
const ENV_PREFIX: &str = "CATALOG";

/// Deployment environment the service is running in.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Plain process variables honoured on top of every other source.
///
/// These predate the layered configuration and deployments still set them, so
/// they take precedence over files and `CATALOG_*` variables alike.
#[derive(Debug, Clone, Default)]
pub struct LegacyEnv {
    pub port: Option<String>,
    pub mongo_uri: Option<String>,
    pub mongo_db: Option<String>,
}

impl LegacyEnv {
    pub fn from_process() -> Self {
        Self {
            port: std::env::var("PORT").ok().filter(|v| !v.is_empty()),
            mongo_uri: std::env::var("MONGO_URI").ok().filter(|v| !v.is_empty()),
            mongo_db: std::env::var("MONGO_DB").ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// `CATALOG_*` variables and finally `PORT`/`MONGO_URI`/`MONGO_DB`.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&config_dir, &environment, LegacyEnv::from_process())
    }

    /// Load configuration from an explicit config directory and environment name.
    pub fn load_from(config_dir: &Path, environment: &str, legacy: LegacyEnv) -> anyhow::Result<Self> {
        let parsed_environment = Environment::parse(environment)?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", legacy.port)
            .with_context(|| "invalid PORT override")?
            .set_override_option("database.uri", legacy.mongo_uri)
            .with_context(|| "invalid MONGO_URI override")?
            .set_override_option("database.name", legacy.mongo_db)
            .with_context(|| "invalid MONGO_DB override")?;

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = parsed_environment;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Name reported by the health endpoint.
    #[serde(default = "ServerSettings::default_service_name")]
    pub service_name: String,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        3002
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }

    fn default_service_name() -> String {
        "catalog-service".to_string()
    }

    /// `host:port` string suitable for binding a listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
            service_name: Self::default_service_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_uri")]
    pub uri: String,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
    #[serde(default = "DatabaseSettings::default_collection")]
    pub collection: String,
    /// Upper bound for establishing and verifying the initial connection.
    #[serde(default = "DatabaseSettings::default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Upper bound for every individual store operation.
    #[serde(default = "DatabaseSettings::default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

impl DatabaseSettings {
    fn default_uri() -> String {
        "mongodb://localhost:27017".to_string()
    }

    fn default_name() -> String {
        "catalogdb".to_string()
    }

    fn default_collection() -> String {
        "books".to_string()
    }

    fn default_connect_timeout_ms() -> u64 {
        10_000
    }

    fn default_operation_timeout_ms() -> u64 {
        5_000
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: Self::default_uri(),
            name: Self::default_name(),
            collection: Self::default_collection(),
            connect_timeout_ms: Self::default_connect_timeout_ms(),
            operation_timeout_ms: Self::default_operation_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn defaults_match_service_conventions() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 3002);
        assert_eq!(settings.server.service_name, "catalog-service");
        assert_eq!(settings.database.uri, "mongodb://localhost:27017");
        assert_eq!(settings.database.name, "catalogdb");
        assert_eq!(settings.database.collection, "books");
        assert_eq!(settings.database.connect_timeout_ms, 10_000);
        assert_eq!(settings.database.operation_timeout_ms, 5_000);
    }

    #[test]
    fn load_from_missing_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(dir.path(), "local", LegacyEnv::default()).unwrap();
        assert_eq!(settings.server.port, 3002);
        assert_eq!(settings.database.name, "catalogdb");
    }

    #[test]
    fn environment_file_overlays_base_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            "[server]\nport = 4000\n\n[database]\nname = \"basedb\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("staging.toml"),
            "[database]\nname = \"stagingdb\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(dir.path(), "staging", LegacyEnv::default()).unwrap();
        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.database.name, "stagingdb");
    }

    #[test]
    fn legacy_variables_override_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("base.toml"), "[server]\nport = 4000\n").unwrap();

        let legacy = LegacyEnv {
            port: Some("9191".to_string()),
            mongo_uri: Some("mongodb://db.internal:27017".to_string()),
            mongo_db: Some("shelf".to_string()),
        };
        let settings = Settings::load_from(dir.path(), "local", legacy).unwrap();
        assert_eq!(settings.server.port, 9191);
        assert_eq!(settings.database.uri, "mongodb://db.internal:27017");
        assert_eq!(settings.database.name, "shelf");
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(dir.path(), "qa", LegacyEnv::default()).unwrap_err();
        assert!(err.to_string().contains("unsupported environment 'qa'"));
    }
}
