use anyhow::Context;
use std::env;
use std::fmt;

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5434;
pub const DEFAULT_DB_NAME: &str = "laboratorio_mcp";
pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_DB_PASSWORD: &str = "mcp_password";

/// Connection settings for the pedidos database. Built once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.into(),
            port: DEFAULT_DB_PORT,
            database: DEFAULT_DB_NAME.into(),
            user: DEFAULT_DB_USER.into(),
            password: DEFAULT_DB_PASSWORD.into(),
        }
    }
}

impl DbConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; missing keys fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let port = match lookup("DB_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("DB_PORT must be a port number, got {raw:?}"))?,
            None => defaults.port,
        };
        Ok(Self {
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port,
            database: lookup("DB_NAME").unwrap_or(defaults.database),
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
        })
    }

    /// `database@host:port`, safe to log.
    pub fn target(&self) -> String {
        format!("{}@{}:{}", self.database, self.host, self.port)
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}
