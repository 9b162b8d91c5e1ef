use crate::core::{ScoreMode, MAX_PAGE_SIZE};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    pub appwrite: Option<AppwriteSettings>,
    #[serde(default)]
    pub collection: CollectionSettings,
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which backend holds profiles and chats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Appwrite,
    Postgres,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: BackendKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    #[serde(default = "default_profiles_collection")]
    pub profiles: String,
    #[serde(default = "default_chats_collection")]
    pub chats: String,
    #[serde(default = "default_messages_collection")]
    pub messages: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            profiles: default_profiles_collection(),
            chats: default_chats_collection(),
            messages: default_messages_collection(),
        }
    }
}

fn default_profiles_collection() -> String { "users".to_string() }
fn default_chats_collection() -> String { "chats".to_string() }
fn default_messages_collection() -> String { "messages".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { page_size: default_page_size() }
    }
}

fn default_page_size() -> usize { MAX_PAGE_SIZE }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub mode: ScoreMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self { history_limit: default_history_limit() }
    }
}

fn default_history_limit() -> usize { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MATCHME_)
    /// 5. DATABASE_URL, APPWRITE_API_KEY and JWT_SECRET
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MATCHME__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Parse settings from a TOML document
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

fn environment() -> Environment {
    Environment::with_prefix("MATCHME")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the conventional unprefixed variables on top of everything else
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("DATABASE_URL", "database.url"),
        ("APPWRITE_API_KEY", "appwrite.api_key"),
        ("JWT_SECRET", "auth.jwt_secret"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

    #[test]
    fn test_default_config_parses() {
        let settings = Settings::from_toml(DEFAULT_CONFIG).unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.store.backend, BackendKind::Appwrite);
        assert_eq!(settings.collection.profiles, "users");
        assert_eq!(settings.search.page_size, 20);
        assert_eq!(settings.scoring.mode, ScoreMode::Fixed100);
        assert_eq!(settings.chat.history_limit, 100);
        assert!(settings.appwrite.is_some());
        assert!(settings.database.is_some());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let settings = Settings::from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [store]
            backend = "postgres"

            [database]
            url = "postgres://localhost/matchme"

            [scoring]
            mode = "rescale_to_active_filters"

            [auth]
            jwt_secret = "s3cret"
            "#,
        )
        .unwrap();

        assert_eq!(settings.store.backend, BackendKind::Postgres);
        assert!(settings.appwrite.is_none());
        assert_eq!(settings.collection.messages, "messages");
        assert_eq!(settings.search.page_size, MAX_PAGE_SIZE);
        assert_eq!(settings.scoring.mode, ScoreMode::RescaleToActiveFilters);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, "json");
    }

    #[test]
    fn test_missing_auth_rejected() {
        let result = Settings::from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            "#,
        );
        assert!(result.is_err());
    }
}
