use std::collections::VecDeque;

use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, OptsBuilder, Row, Value};
use passo_core::connection_manager::{BackendError, ConnectionBackend};
use passo_core::credentials::{Credentials, DB_HOST, DB_PORT};
use passo_core::query_executor::QueryBackend;
use passo_core::value::SqlValue;

#[derive(Debug, Clone, Default)]
pub struct MysqlBackend;

#[async_trait]
impl ConnectionBackend for MysqlBackend {
    type Connection = Conn;

    async fn connect(&self, credentials: &Credentials) -> Result<Self::Connection, BackendError> {
        Conn::new(opts_from_credentials(credentials))
            .await
            .map_err(to_backend_error)
    }

    async fn ping(&self, connection: &mut Self::Connection) -> Result<(), BackendError> {
        connection.ping().await.map_err(to_backend_error)
    }

    async fn disconnect(&self, connection: Self::Connection) -> Result<(), BackendError> {
        connection.disconnect().await.map_err(to_backend_error)
    }
}

/// Buffered text-protocol result set. Rows are drained from the driver while
/// the statement borrow is still alive; a mid-stream driver error is kept
/// aside and surfaced once the reader reaches the failing position.
#[derive(Debug)]
pub struct MysqlResultSet {
    columns: Vec<String>,
    rows: VecDeque<Vec<SqlValue>>,
    pending_error: Option<BackendError>,
}

#[async_trait]
impl QueryBackend for MysqlBackend {
    type ResultSet = MysqlResultSet;

    async fn execute(
        &self,
        connection: &mut Self::Connection,
        sql: &str,
    ) -> Result<Self::ResultSet, BackendError> {
        let mut result = connection.query_iter(sql).await.map_err(to_backend_error)?;
        let columns = result.columns().map_or_else(Vec::new, |columns| {
            columns
                .iter()
                .map(|column| column.name_str().into_owned())
                .collect()
        });

        let mut rows = VecDeque::new();
        let mut pending_error = None;
        loop {
            match result.next().await {
                Ok(Some(row)) => rows.push_back(row_to_values(row)),
                Ok(None) => break,
                Err(error) => {
                    pending_error = Some(to_backend_error(error));
                    break;
                }
            }
        }

        Ok(MysqlResultSet {
            columns,
            rows,
            pending_error,
        })
    }

    fn columns(&self, results: &Self::ResultSet) -> Result<Vec<String>, BackendError> {
        Ok(results.columns.clone())
    }

    async fn next_row(
        &self,
        results: &mut Self::ResultSet,
    ) -> Result<Option<Vec<SqlValue>>, BackendError> {
        if let Some(row) = results.rows.pop_front() {
            return Ok(Some(row));
        }
        if let Some(error) = results.pending_error.take() {
            return Err(error);
        }
        Ok(None)
    }

    async fn finish(&self, _results: Self::ResultSet) -> Result<(), BackendError> {
        Ok(())
    }
}

fn opts_from_credentials(credentials: &Credentials) -> OptsBuilder {
    // prefer_socket(false) keeps the driver on the fixed TCP endpoint even
    // for localhost.
    OptsBuilder::default()
        .ip_or_hostname(DB_HOST)
        .tcp_port(DB_PORT)
        .user(Some(credentials.user.clone()))
        .pass(Some(credentials.password.clone()))
        .db_name(Some(credentials.database.clone()))
        .prefer_socket(false)
}

fn row_to_values(row: Row) -> Vec<SqlValue> {
    row.unwrap().into_iter().map(mysql_value_to_sql).collect()
}

fn mysql_value_to_sql(value: Value) -> SqlValue {
    match value {
        Value::NULL => SqlValue::Null,
        Value::Bytes(bytes) => SqlValue::Bytes(bytes),
        Value::Int(value) => SqlValue::Int(value),
        Value::UInt(value) => SqlValue::UInt(value),
        Value::Float(value) => SqlValue::Double(f64::from(value)),
        Value::Double(value) => SqlValue::Double(value),
        Value::Date(year, month, day, hour, minute, second, micros) => SqlValue::Text(format!(
            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{micros:06}"
        )),
        Value::Time(is_negative, days, hours, minutes, seconds, micros) => {
            let sign = if is_negative { "-" } else { "" };
            SqlValue::Text(format!(
                "{sign}{days:03} {hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
            ))
        }
    }
}

fn to_backend_error(error: mysql_async::Error) -> BackendError {
    BackendError::new(error.to_string())
}
