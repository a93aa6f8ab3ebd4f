use async_trait::async_trait;

use crate::connection_manager::{BackendError, ConnectionBackend};
use crate::value::SqlValue;

/// Shown instead of an empty string when a statement yields zero rows.
pub const NO_RESULTS_MESSAGE: &str = "no results found";

/// Driver seam for one statement round trip, split into the four stages
/// that can fail independently: running the statement, fetching column
/// metadata, reading rows, and the post-iteration check.
#[async_trait]
pub trait QueryBackend: ConnectionBackend {
    type ResultSet: Send;

    async fn execute(
        &self,
        connection: &mut Self::Connection,
        sql: &str,
    ) -> Result<Self::ResultSet, BackendError>;

    fn columns(&self, results: &Self::ResultSet) -> Result<Vec<String>, BackendError>;

    async fn next_row(
        &self,
        results: &mut Self::ResultSet,
    ) -> Result<Option<Vec<SqlValue>>, BackendError>;

    async fn finish(&self, results: Self::ResultSet) -> Result<(), BackendError>;
}

/// Runs one SQL statement and renders the outcome as display text. Never
/// fails: every stage error maps to its own message and the session keeps
/// going. Rows stay in engine order, columns joined by tabs, rows by
/// newlines.
pub async fn execute_statement<B: QueryBackend>(
    backend: &B,
    connection: &mut B::Connection,
    sql: &str,
) -> String {
    let mut results = match backend.execute(connection, sql).await {
        Ok(results) => results,
        Err(error) => return format!("error executing statement: {error}"),
    };

    if let Err(error) = backend.columns(&results) {
        return format!("error retrieving columns: {error}");
    }

    let mut lines = Vec::new();
    loop {
        match backend.next_row(&mut results).await {
            Ok(Some(row)) => {
                let rendered = row.iter().map(SqlValue::render).collect::<Vec<_>>();
                lines.push(rendered.join("\t"));
            }
            Ok(None) => break,
            // remaining rows are abandoned on the first read failure
            Err(error) => return format!("error reading row: {error}"),
        }
    }

    if let Err(error) = backend.finish(results).await {
        return format!("error during row iteration: {error}");
    }

    if lines.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    lines.join("\n")
}
