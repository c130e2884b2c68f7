//! Typed settings for the storage adapters, loaded from an optional
//! `config.toml` plus `BLOG`-prefixed environment variables (`__` as the
//! section separator, e.g. `BLOG__DATABASE__URL`). A `.env` file is
//! honored when present.

use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: SecretString,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    5
}

impl DatabaseSettings {
    /// The DSN for the pool. Kept behind `secrecy` so it never ends up in
    /// debug output or logs.
    pub fn connection_string(&self) -> &str {
        self.url.expose_secret()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("BLOG")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        tracing::debug!("configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn deserializes_with_defaults() {
        let settings = Config::builder()
            .add_source(File::from_str(
                "[database]\nurl = \"postgres://localhost/blog\"",
                FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: AppConfig = settings.try_deserialize().unwrap();
        assert_eq!(
            config.database.connection_string(),
            "postgres://localhost/blog"
        );
        assert_eq!(config.database.max_connections, 5);
        assert!(!config.database.run_migrations);
    }

    #[test]
    fn environment_overrides_the_file() {
        std::env::set_var("BLOG__DATABASE__URL", "postgres://db/override");
        std::env::set_var("BLOG__DATABASE__MAX_CONNECTIONS", "12");

        let settings = Config::builder()
            .add_source(File::from_str(
                "[database]\nurl = \"postgres://localhost/blog\"",
                FileFormat::Toml,
            ))
            .add_source(
                Environment::with_prefix("BLOG")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .unwrap();

        let config: AppConfig = settings.try_deserialize().unwrap();
        assert_eq!(
            config.database.connection_string(),
            "postgres://db/override"
        );
        assert_eq!(config.database.max_connections, 12);

        std::env::remove_var("BLOG__DATABASE__URL");
        std::env::remove_var("BLOG__DATABASE__MAX_CONNECTIONS");
    }

    #[test]
    fn secrets_stay_out_of_debug_output() {
        let settings = DatabaseSettings {
            url: String::from("postgres://user:hunter2@db/blog").into(),
            max_connections: 5,
            run_migrations: false,
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("hunter2"));
    }
}
