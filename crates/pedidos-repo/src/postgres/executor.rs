//! Single-statement execution over a scoped connection.
//!
//! Every call acquires a fresh connection from the [`ConnectionProvider`], runs the statement
//! inside a transaction, commits on success or rolls back on failure, and closes the
//! connection before returning, whatever the outcome.

use pedidos_types::ports::order_repository::RepoError;
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, PgConnection, PgRow};
use sqlx::{Arguments, Connection, FromRow, Postgres, Transaction};

use super::connection::{release, ConnectionProvider};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
    Numeric(Decimal),
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<Decimal> for SqlParam {
    fn from(value: Decimal) -> Self {
        SqlParam::Numeric(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Read,
    Write,
}

impl StatementKind {
    /// Reads are statements starting with `SELECT`; everything else is treated as a write.
    pub fn classify(sql: &str) -> Self {
        let keyword = sql
            .trim_start()
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or_default();
        if keyword.eq_ignore_ascii_case("select") {
            StatementKind::Read
        } else {
            StatementKind::Write
        }
    }
}

/// SQL text plus its positional parameters (`$1`, `$2`, ...).
#[derive(Debug, Clone)]
pub struct Statement<'a> {
    sql: &'a str,
    params: Vec<SqlParam>,
    one_row: bool,
}

impl<'a> Statement<'a> {
    pub fn new(sql: &'a str) -> Self {
        Self {
            sql,
            params: Vec::new(),
            one_row: false,
        }
    }

    pub fn bind(mut self, param: impl Into<SqlParam>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Return at most one row from a read.
    pub fn one_row(mut self) -> Self {
        self.one_row = true;
        self
    }

    pub fn sql(&self) -> &str {
        self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn kind(&self) -> StatementKind {
        StatementKind::classify(self.sql)
    }

    fn arguments(&self) -> Result<PgArguments, RepoError> {
        let mut args = PgArguments::default();
        for param in &self.params {
            let added = match param {
                SqlParam::Int(v) => args.add(*v),
                SqlParam::Text(v) => args.add(v.clone()),
                SqlParam::Numeric(v) => args.add(*v),
            };
            added.map_err(|e| RepoError::Query(e.to_string()))?;
        }
        Ok(args)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub success: bool,
    pub affected_rows: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    Rows(Vec<T>),
    Written(WriteOutcome),
}

#[derive(Clone)]
pub struct QueryExecutor {
    provider: ConnectionProvider,
}

impl QueryExecutor {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &ConnectionProvider {
        &self.provider
    }

    /// Dispatches on the statement kind: reads return rows, writes the affected-row count.
    pub async fn run<T>(&self, stmt: &Statement<'_>) -> Result<QueryOutcome<T>, RepoError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        match stmt.kind() {
            StatementKind::Read => self.fetch(stmt).await.map(QueryOutcome::Rows),
            StatementKind::Write => self.execute(stmt).await.map(QueryOutcome::Written),
        }
    }

    /// Runs a read. An empty result set is an empty vector.
    pub async fn fetch<T>(&self, stmt: &Statement<'_>) -> Result<Vec<T>, RepoError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut conn = self.provider.connect().await?;
        let result = fetch_in_tx(&mut conn, stmt).await;
        release(conn).await;
        result
    }

    pub async fn execute(&self, stmt: &Statement<'_>) -> Result<WriteOutcome, RepoError> {
        let mut conn = self.provider.connect().await?;
        let result = execute_in_tx(&mut conn, stmt).await;
        release(conn).await;
        result
    }

    /// Runs a write with a `RETURNING` clause and yields the returned row.
    /// No returned row is a failure and the transaction is rolled back.
    pub async fn insert_returning<T>(&self, stmt: &Statement<'_>) -> Result<T, RepoError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut conn = self.provider.connect().await?;
        let result = insert_returning_in_tx(&mut conn, stmt).await;
        release(conn).await;
        result
    }
}

async fn fetch_in_tx<T>(
    conn: &mut PgConnection,
    stmt: &Statement<'_>,
) -> Result<Vec<T>, RepoError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let args = stmt.arguments()?;
    let mut tx = begin(conn).await?;
    let query = sqlx::query_as_with::<Postgres, T, PgArguments>(stmt.sql, args);
    let fetched = if stmt.one_row {
        query
            .fetch_optional(&mut *tx)
            .await
            .map(|row| row.into_iter().collect::<Vec<_>>())
    } else {
        query.fetch_all(&mut *tx).await
    };
    match fetched {
        Ok(rows) => {
            commit(tx).await?;
            Ok(rows)
        }
        Err(e) => Err(fail(tx, e).await),
    }
}

async fn execute_in_tx(
    conn: &mut PgConnection,
    stmt: &Statement<'_>,
) -> Result<WriteOutcome, RepoError> {
    let args = stmt.arguments()?;
    let mut tx = begin(conn).await?;
    let executed = sqlx::query_with::<Postgres, PgArguments>(stmt.sql, args)
        .execute(&mut *tx)
        .await;
    match executed {
        Ok(done) => {
            commit(tx).await?;
            Ok(WriteOutcome {
                success: true,
                affected_rows: done.rows_affected(),
            })
        }
        Err(e) => Err(fail(tx, e).await),
    }
}

async fn insert_returning_in_tx<T>(
    conn: &mut PgConnection,
    stmt: &Statement<'_>,
) -> Result<T, RepoError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let args = stmt.arguments()?;
    let mut tx = begin(conn).await?;
    let returned = sqlx::query_as_with::<Postgres, T, PgArguments>(stmt.sql, args)
        .fetch_optional(&mut *tx)
        .await;
    match returned {
        Ok(Some(row)) => {
            commit(tx).await?;
            Ok(row)
        }
        Ok(None) => {
            rollback(tx).await;
            tracing::error!("write returned no row, rolled back");
            Err(RepoError::MissingRow)
        }
        Err(e) => Err(fail(tx, e).await),
    }
}

async fn begin(conn: &mut PgConnection) -> Result<Transaction<'_, Postgres>, RepoError> {
    conn.begin().await.map_err(|e| {
        tracing::error!(error = %e, "failed to open transaction");
        RepoError::Query(e.to_string())
    })
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), RepoError> {
    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, "commit failed");
        RepoError::Query(e.to_string())
    })
}

async fn rollback(tx: Transaction<'_, Postgres>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "rollback failed");
    }
}

async fn fail(tx: Transaction<'_, Postgres>, err: sqlx::Error) -> RepoError {
    rollback(tx).await;
    tracing::error!(error = %err, "query failed, rolled back");
    RepoError::Query(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn classifies_reads_and_writes() {
        assert_eq!(StatementKind::classify("SELECT 1"), StatementKind::Read);
        assert_eq!(
            StatementKind::classify("\n   select id FROM pedidos"),
            StatementKind::Read
        );
        assert_eq!(
            StatementKind::classify("INSERT INTO pedidos DEFAULT VALUES"),
            StatementKind::Write
        );
        assert_eq!(
            StatementKind::classify("UPDATE pedidos SET estado = $1"),
            StatementKind::Write
        );
        assert_eq!(StatementKind::classify("selected"), StatementKind::Write);
        assert_eq!(StatementKind::classify(""), StatementKind::Write);
    }

    #[test]
    fn statement_collects_params_in_order() {
        let stmt = Statement::new("INSERT INTO pedidos (cliente, monto) VALUES ($1, $2)")
            .bind("Ana")
            .bind(Decimal::from_str("19.99").unwrap());
        assert_eq!(stmt.kind(), StatementKind::Write);
        assert_eq!(
            stmt.params(),
            &[
                SqlParam::Text("Ana".into()),
                SqlParam::Numeric(Decimal::from_str("19.99").unwrap())
            ]
        );
        assert!(stmt.arguments().is_ok());
    }

    #[test]
    fn one_row_flag_is_opt_in() {
        let stmt = Statement::new("SELECT * FROM pedidos WHERE id = $1").bind(3_i64);
        assert!(!stmt.one_row);
        assert!(stmt.one_row().one_row);
    }
}
