use pedidos_types::config::DbConfig;
use pedidos_types::ports::order_repository::RepoError;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

const APPLICATION_NAME: &str = "mcp-pedidos";

/// Opens one PostgreSQL connection per call. There is no pool.
#[derive(Clone)]
pub struct ConnectionProvider {
    options: PgConnectOptions,
    target: String,
}

impl ConnectionProvider {
    pub fn new(config: &DbConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password)
            .application_name(APPLICATION_NAME);
        Self {
            options,
            target: config.target(),
        }
    }

    pub async fn connect(&self) -> Result<PgConnection, RepoError> {
        PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| {
                tracing::error!(target_db = %self.target, error = %e, "failed to connect to PostgreSQL");
                RepoError::Connection(e.to_string())
            })
    }

    /// Opens a connection and closes it straight away.
    pub async fn verify(&self) -> Result<(), RepoError> {
        let conn = self.connect().await?;
        release(conn).await;
        Ok(())
    }
}

/// Closes the connection gracefully. A failed close only gets logged; the socket is dropped either way.
pub async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "error closing PostgreSQL connection");
    }
}
