use pedidos_repo::{build_repo, Repo};
use pedidos_types::config::DbConfig;
use pedidos_types::ports::order_repository::{OrderRepository, RepoError};

#[tokio::test]
async fn startup_ping_fails_without_database() {
    // Nothing listens on port 1; the startup check must report a connection error.
    let config = DbConfig {
        host: "127.0.0.1".into(),
        port: 1,
        ..DbConfig::default()
    };

    let repo: Repo = build_repo(Some(&config)).await.expect("build repo");
    let err = repo.ping().await.unwrap_err();
    assert!(matches!(err, RepoError::Connection(_)));
}
