use pedidos_types::config::DbConfig;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// JSON-RPC tool protocol over stdin/stdout.
    Stdio,
    Http,
}

impl FromStr for Transport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "http" => Ok(Transport::Http),
            other => anyhow::bail!("MCP_TRANSPORT must be `stdio` or `http`, got {other:?}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub transport: Transport,
    pub server_port: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db = DbConfig::from_lookup(&lookup)?;
        let transport = match lookup("MCP_TRANSPORT") {
            Some(raw) => raw.parse()?,
            None => Transport::Stdio,
        };
        let server_port = lookup("SERVER_PORT").unwrap_or_else(|| "3000".into());
        Ok(Self {
            db,
            transport,
            server_port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_stdio() {
        let cfg = Config::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.transport, Transport::Stdio);
        assert_eq!(cfg.server_port, "3000");
        assert_eq!(cfg.db, DbConfig::default());
    }

    #[test]
    fn reads_transport_and_port() {
        let cfg = Config::from_lookup(|key| match key {
            "MCP_TRANSPORT" => Some("HTTP".into()),
            "SERVER_PORT" => Some("8080".into()),
            "DB_NAME" => Some("pedidos_test".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.transport, Transport::Http);
        assert_eq!(cfg.server_port, "8080");
        assert_eq!(cfg.db.database, "pedidos_test");
    }

    #[test]
    fn rejects_unknown_transport() {
        let res = Config::from_lookup(|key| (key == "MCP_TRANSPORT").then(|| "sse".to_string()));
        assert!(res.is_err());
    }
}
