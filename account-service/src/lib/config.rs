use std::env;

use auth::PasswordPolicy;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Absent means accounts are kept in process memory
    pub database: Option<DatabaseConfig>,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Longest accepted token lifetime: one year
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 366;

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if !(1..=MAX_EXPIRATION_HOURS).contains(&self.jwt.expiration_hours) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be between 1 and {}",
                MAX_EXPIRATION_HOURS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(source: &str) -> Result<Config, ConfigError> {
        let config: Config = ConfigBuilder::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_defaults_apply() {
        let config = from_toml(
            r#"
            [server]
            http_port = 3333

            [jwt]
            secret = "s3cret"
            expiration_hours = 24
            "#,
        )
        .unwrap();

        assert!(config.database.is_none());
        assert_eq!(config.password, PasswordPolicy::default());
        assert_eq!(config.jwt.expiration_hours, 24);
    }

    #[test]
    fn test_database_section() {
        let config = from_toml(
            r#"
            [database]
            url = "postgresql://localhost/accounts"

            [server]
            http_port = 3333

            [jwt]
            secret = "s3cret"
            expiration_hours = 1
            "#,
        )
        .unwrap();

        let database = config.database.unwrap();
        assert_eq!(database.url, "postgresql://localhost/accounts");
        assert_eq!(database.max_connections, 5);
    }

    #[test]
    fn test_rejects_empty_secret() {
        let result = from_toml(
            r#"
            [server]
            http_port = 3333

            [jwt]
            secret = ""
            expiration_hours = 24
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_positive_ttl() {
        let result = from_toml(
            r#"
            [server]
            http_port = 3333

            [jwt]
            secret = "s3cret"
            expiration_hours = 0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_oversized_ttl() {
        let result = from_toml(
            r#"
            [server]
            http_port = 3333

            [jwt]
            secret = "s3cret"
            expiration_hours = 10000000000
            "#,
        );
        assert!(result.is_err());

        let config = from_toml(&format!(
            r#"
            [server]
            http_port = 3333

            [jwt]
            secret = "s3cret"
            expiration_hours = {}
            "#,
            MAX_EXPIRATION_HOURS
        ))
        .unwrap();
        assert_eq!(config.jwt.expiration_hours, MAX_EXPIRATION_HOURS);
    }
}
