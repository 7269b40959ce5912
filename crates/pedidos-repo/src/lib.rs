#[cfg(not(any(feature = "memory", feature = "postgres")))]
compile_error!("Enable a repo feature: `memory` or `postgres`.");

use pedidos_types::config::DbConfig;
use pedidos_types::domain::order::{NewOrder, Order, OrderLookup};
use pedidos_types::ports::order_repository::{OrderRepository, RepoError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

/// Repository selected at startup from the enabled backends.
pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "postgres")]
    Postgres(postgres::PgOrderRepo),
}

/// `Some(config)` selects PostgreSQL, `None` the in-memory store.
pub async fn build_repo(db: Option<&DbConfig>) -> anyhow::Result<Repo> {
    Repo::build_repo(db).await
}

impl Repo {
    pub async fn build_repo(db: Option<&DbConfig>) -> anyhow::Result<Self> {
        match db {
            #[cfg(feature = "postgres")]
            Some(config) => Ok(Repo::Postgres(postgres::PgOrderRepo::new(config.clone()))),
            #[cfg(feature = "memory")]
            None => Ok(Repo::Memory(memory::InMemoryRepo::new())),
            #[allow(unreachable_patterns)]
            _ => anyhow::bail!("no repository backend enabled for this configuration"),
        }
    }
}

#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create(&self, order: NewOrder) -> Result<Order, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(repo) => repo.create(order).await,
            #[cfg(feature = "postgres")]
            Repo::Postgres(repo) => repo.create(order).await,
        }
    }

    async fn get(&self, id: i64) -> Result<OrderLookup, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(repo) => repo.get(id).await,
            #[cfg(feature = "postgres")]
            Repo::Postgres(repo) => repo.get(id).await,
        }
    }

    async fn ping(&self) -> Result<(), RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(repo) => repo.ping().await,
            #[cfg(feature = "postgres")]
            Repo::Postgres(repo) => repo.ping().await,
        }
    }
}
