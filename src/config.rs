use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::QuizSchema;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    #[serde(default)]
    pub quiz: QuizSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which backend holds answers and likes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

fn default_backend() -> StorageBackend { StorageBackend::Postgres }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_top_n() -> usize { 5 }
fn default_max_limit() -> usize { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct QuizSettings {
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_option_count")]
    pub option_count: i32,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            option_count: default_option_count(),
        }
    }
}

impl From<&QuizSettings> for QuizSchema {
    fn from(value: &QuizSettings) -> Self {
        QuizSchema {
            question_count: value.question_count,
            option_count: value.option_count,
        }
    }
}

fn default_question_count() -> usize { 10 }
fn default_option_count() -> i32 { 4 }

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
    /// 3. Environment variables (prefixed with QUIZMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Development overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., QUIZMATCH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        let settings = apply_database_url(settings)?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("QUIZMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// The conventional DATABASE_URL wins over the file value
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_ranking() {
        let ranking = RankingSettings::default();
        assert_eq!(ranking.top_n, 5);
        assert_eq!(ranking.max_limit, 50);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_minimal_file_fills_defaults() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [storage]
            backend = "memory"

            [database]
            url = "postgres://localhost/test"

            [cache]
            enabled = false
            redis_url = "redis://localhost"
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert!(!settings.cache.enabled);
        assert_eq!(settings.ranking.top_n, 5);
        assert_eq!(QuizSchema::from(&settings.quiz), QuizSchema::default());
    }
}
