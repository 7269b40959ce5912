use async_trait::async_trait;

use crate::domain::order::{NewOrder, Order, OrderLookup};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// The database could not be reached or rejected the credentials.
    #[error("connection error: {0}")]
    Connection(String),

    /// A statement failed after the connection was established.
    #[error("query error: {0}")]
    Query(String),

    /// An insert reported success without returning the new row.
    #[error("No se pudo obtener el pedido creado")]
    MissingRow,

    #[error("invalid row: {0}")]
    InvalidRow(String),
}

#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    async fn create(&self, order: NewOrder) -> Result<Order, RepoError>;
    async fn get(&self, id: i64) -> Result<OrderLookup, RepoError>;
    /// Opens and releases a connection without running a statement.
    async fn ping(&self) -> Result<(), RepoError>;
}
