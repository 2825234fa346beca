use std::env;

use blog_auth::HashingCost;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

const ENV_PREFIX: &str = "BLOG";
const DEVELOPMENT_MODE: &str = "development";
/// Key committed in `config/development.toml`.
const DEVELOPMENT_SECRET: &str = "local-development-secret-change-me-please";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: HashingCost,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_minutes: i64,
}

impl JwtConfig {
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.expiration_minutes)
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (BLOG_JWT__SECRET, BLOG_SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// * Missing or malformed values, including an unset `jwt.secret`
    /// * `jwt.expiration_minutes` not positive
    /// * The development signing key outside `RUN_MODE=development`
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| DEVELOPMENT_MODE.to_string());

        let config: Config = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        config.validate(&run_mode)?;

        Ok(config)
    }

    fn validate(&self, run_mode: &str) -> Result<(), ConfigError> {
        if self.jwt.expiration_minutes <= 0 {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_minutes must be positive, got {}",
                self.jwt.expiration_minutes
            )));
        }

        if run_mode != DEVELOPMENT_MODE && self.jwt.secret == DEVELOPMENT_SECRET {
            return Err(ConfigError::Message(format!(
                "jwt.secret is the development key but RUN_MODE is {}; set BLOG_JWT__SECRET",
                run_mode
            )));
        }

        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
