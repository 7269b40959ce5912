use pedidos_hex::application::order_service::OrderService;
use pedidos_hex::config::{Config, Transport};
use pedidos_hex::inbound::http::{HttpServer, HttpServerConfig};
use pedidos_hex::inbound::stdio::StdioServer;
use pedidos_repo::{build_repo, Repo};
use pedidos_types::ports::order_repository::OrderRepository;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DB_* / MCP_TRANSPORT when present.
    let _ = dotenvy::dotenv();
    // stdout belongs to the stdio transport, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        db = %config.db.target(),
        transport = ?config.transport,
        "starting pedidos server"
    );

    let repo: Repo = build_repo(Some(&config.db)).await?;
    if let Err(e) = repo.ping().await {
        tracing::error!(db = %config.db.target(), error = %e, "fatal: database unreachable");
        std::process::exit(1);
    }
    tracing::info!("database connection verified");

    let service = OrderService::new(repo);
    match config.transport {
        Transport::Stdio => StdioServer::new(service).run().await,
        Transport::Http => {
            let server_cfg = HttpServerConfig {
                port: config.server_port.clone(),
            };
            HttpServer::new(service, server_cfg).await?.run().await
        }
    }
}
