//! Connection settings, layered from defaults, an optional file and the environment.
//!
//! Keys: `host`, `port`, `username`, `password`, `database`. Environment
//! variables use the `AQLCLAD_` prefix, e.g. `AQLCLAD_DATABASE=school`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl ConnectionConfig {
    pub const DEFAULT_HOST: &'static str = "localhost";
    pub const DEFAULT_PORT: u16 = 8529;
    pub const DEFAULT_USERNAME: &'static str = "root";
    pub const DEFAULT_DATABASE: &'static str = "_system";
    pub const ENV_PREFIX: &'static str = "AQLCLAD";

    pub fn new(database: impl Into<String>) -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_owned(),
            port: Self::DEFAULT_PORT,
            username: Self::DEFAULT_USERNAME.to_owned(),
            password: String::new(),
            database: database.into(),
        }
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("host", Self::DEFAULT_HOST)?
            .set_default("port", i64::from(Self::DEFAULT_PORT))?
            .set_default("username", Self::DEFAULT_USERNAME)?
            .set_default("password", "")?
            .set_default("database", Self::DEFAULT_DATABASE)?)
    }

    /// Reads `path` (format picked from its extension, missing file allowed),
    /// then overrides from `AQLCLAD_*` environment variables.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Self::defaults()?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(Self::ENV_PREFIX))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Settings from a TOML document, without consulting the environment.
    pub fn from_toml(toml: &str) -> Result<Self> {
        let settings = Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Value of the `Authorization` header for HTTP Basic authentication.
    pub fn authorization(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}
