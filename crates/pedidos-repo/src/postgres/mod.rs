use async_trait::async_trait;
use chrono::NaiveDateTime;
use pedidos_types::config::DbConfig;
use pedidos_types::domain::order::{NewOrder, Order, OrderLookup, INITIAL_STATUS};
use pedidos_types::ports::order_repository::{OrderRepository, RepoError};
use rust_decimal::Decimal;
use sqlx::FromRow;

pub mod connection;
pub mod executor;

use connection::ConnectionProvider;
use executor::{QueryExecutor, Statement};

// Casts pin the decoded types regardless of the exact column definitions (serial vs bigserial,
// timestamp vs timestamptz).
const SELECT_BY_ID: &str = "SELECT id::BIGINT AS id, cliente, monto::NUMERIC AS monto, estado, descripcion, created_at::TIMESTAMP AS created_at
     FROM pedidos
     WHERE id = $1";

const INSERT_RETURNING: &str = "INSERT INTO pedidos (cliente, monto, descripcion, estado, created_at)
     VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP)
     RETURNING id::BIGINT AS id, cliente, monto::NUMERIC AS monto, estado, descripcion, created_at::TIMESTAMP AS created_at";

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    cliente: String,
    monto: Decimal,
    estado: String,
    descripcion: Option<String>,
    created_at: Option<NaiveDateTime>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepoError> {
        if self.id <= 0 {
            return Err(RepoError::InvalidRow(format!(
                "non-positive id {}",
                self.id
            )));
        }
        Ok(Order {
            id: self.id,
            client_name: self.cliente,
            amount: self.monto,
            status: self.estado,
            description: self.descripcion,
            created_at: self.created_at,
        })
    }
}

/// `OrderRepository` over the `pedidos` table, one connection per call.
#[derive(Clone)]
pub struct PgOrderRepo {
    executor: QueryExecutor,
}

impl PgOrderRepo {
    pub fn new(config: DbConfig) -> Self {
        Self {
            executor: QueryExecutor::new(ConnectionProvider::new(&config)),
        }
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepo {
    async fn create(&self, order: NewOrder) -> Result<Order, RepoError> {
        let stmt = Statement::new(INSERT_RETURNING)
            .bind(order.client_name)
            .bind(order.amount)
            .bind(order.description)
            .bind(INITIAL_STATUS);
        let row: OrderRow = self.executor.insert_returning(&stmt).await?;
        row.into_order()
    }

    async fn get(&self, id: i64) -> Result<OrderLookup, RepoError> {
        let stmt = Statement::new(SELECT_BY_ID).bind(id).one_row();
        let rows: Vec<OrderRow> = self.executor.fetch(&stmt).await?;
        rows.into_iter()
            .next()
            .map(OrderRow::into_order)
            .transpose()
            .map(OrderLookup::from)
    }

    async fn ping(&self) -> Result<(), RepoError> {
        self.executor.provider().verify().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn row(id: i64) -> OrderRow {
        OrderRow {
            id,
            cliente: "Ana García".into(),
            monto: Decimal::from_str("150.50").unwrap(),
            estado: INITIAL_STATUS.into(),
            descripcion: None,
            created_at: None,
        }
    }

    #[test]
    fn row_maps_onto_order() {
        let order = row(12).into_order().unwrap();
        assert_eq!(order.id, 12);
        assert_eq!(order.client_name, "Ana García");
        assert_eq!(order.amount_f64(), 150.5);
        assert_eq!(order.status, "pendiente");
        assert!(order.description.is_none());
    }

    #[test]
    fn row_with_non_positive_id_is_rejected() {
        assert!(matches!(row(0).into_order(), Err(RepoError::InvalidRow(_))));
    }

    #[test]
    fn statements_are_classified_as_expected() {
        use executor::StatementKind;
        assert_eq!(StatementKind::classify(SELECT_BY_ID), StatementKind::Read);
        assert_eq!(
            StatementKind::classify(INSERT_RETURNING),
            StatementKind::Write
        );
    }
}
