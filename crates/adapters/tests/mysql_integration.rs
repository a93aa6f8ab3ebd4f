use passo_adapters::mysql::MysqlBackend;
use passo_core::connection_manager::ConnectionManager;
use passo_core::credentials::Credentials;
use passo_core::query_executor::{self, NO_RESULTS_MESSAGE};

fn mysql_integration_enabled() -> bool {
    matches!(
        std::env::var("PASSO_RUN_MYSQL_INTEGRATION").ok().as_deref(),
        Some("1")
    )
}

fn integration_credentials() -> Credentials {
    let user = std::env::var("PASSO_TEST_DB_USER").unwrap_or_else(|_| "root".to_string());
    let password = std::env::var("PASSO_TEST_DB_PASSWORD").unwrap_or_default();
    let database = std::env::var("PASSO_TEST_DB_NAME").unwrap_or_else(|_| "mysql".to_string());
    Credentials::new(user, password, database)
}

#[tokio::test(flavor = "current_thread")]
async fn mysql_backend_connection_and_statement_paths() {
    if !mysql_integration_enabled() {
        return;
    }

    let mut manager = ConnectionManager::new(MysqlBackend);
    manager
        .connect(&integration_credentials())
        .await
        .expect("connect should succeed");

    let (backend, connection) = manager.split_mut();
    let connection = connection.expect("connection should be open");

    let output = query_executor::execute_statement(backend, connection, "SELECT 1").await;
    assert_eq!(output, "1");

    let output = query_executor::execute_statement(
        backend,
        connection,
        "SELECT 1 FROM DUAL WHERE 1 = 0",
    )
    .await;
    assert_eq!(output, NO_RESULTS_MESSAGE);

    let output = query_executor::execute_statement(backend, connection, "SELEC 1").await;
    assert!(output.starts_with("error executing statement:"), "{output}");

    manager
        .disconnect()
        .await
        .expect("disconnect should succeed");
    manager
        .disconnect()
        .await
        .expect("disconnect should stay idempotent");
}
