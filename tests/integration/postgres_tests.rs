//! Integration tests for PostgresProvider and catalog introspection
//!
//! These tests require a PostgreSQL database and skip themselves when
//! none is reachable. Each test works in its own schema and drops it
//! afterwards.

use joinwise::completer::{CompletionKind, Position, SuggestionEngine};
use joinwise::config::ConnectionConfig;
use joinwise::config::connections::SslMode;
use joinwise::db::postgres::PostgresProvider;
use joinwise::db::types::CellValue;
use joinwise::db::QueryProvider;
use joinwise::error::DbError;
use joinwise::schema::{JoinDirection, load_snapshot};

/// Get test database connection config
fn test_config() -> ConnectionConfig {
    ConnectionConfig {
        name: "integration-test".to_string(),
        host: std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: std::env::var("TEST_DB_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5433),
        database: std::env::var("TEST_DB_NAME").unwrap_or_else(|_| "test_db".to_string()),
        username: std::env::var("TEST_DB_USER").unwrap_or_else(|_| "test_user".to_string()),
        password: Some(
            std::env::var("TEST_DB_PASSWORD").unwrap_or_else(|_| "test_password".to_string()),
        ),
        ssl_mode: SslMode::Disable,
    }
}

async fn connect() -> Option<PostgresProvider> {
    let config = test_config();
    match PostgresProvider::connect(&config).await {
        Ok((provider, _)) => Some(provider),
        Err(e) => {
            eprintln!(
                "Skipping test: Database not available at {}:{} - {}",
                config.host, config.port, e
            );
            None
        }
    }
}

/// Create `schema` with customer <- orders <- order_line and an
/// unrelated audit_log
async fn create_shop(provider: &PostgresProvider, schema: &str) {
    let statements = [
        format!("DROP SCHEMA IF EXISTS {} CASCADE", schema),
        format!("CREATE SCHEMA {}", schema),
        format!("CREATE TABLE {}.customer (id int PRIMARY KEY)", schema),
        format!(
            "CREATE TABLE {s}.orders (id int PRIMARY KEY, customer_id int REFERENCES {s}.customer (id))",
            s = schema
        ),
        format!(
            "CREATE TABLE {s}.order_line (id int PRIMARY KEY, order_id int REFERENCES {s}.orders (id))",
            s = schema
        ),
        format!("CREATE TABLE {}.audit_log (id int)", schema),
    ];
    for sql in &statements {
        provider.run_query(sql).await.unwrap();
    }
}

async fn drop_schema(provider: &PostgresProvider, schema: &str) {
    let _ = provider
        .run_query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", schema))
        .await;
}

#[tokio::test]
async fn test_run_simple_query() {
    let Some(provider) = connect().await else {
        return;
    };

    let results = provider
        .run_query("SELECT 1 as num, 'hello' as msg, NULL::text as nothing")
        .await
        .unwrap();
    assert_eq!(results.columns.len(), 3);
    assert_eq!(results.columns[0].name, "num");
    assert_eq!(results.rows.len(), 1);

    let row = &results.rows[0];
    match &row.values[0] {
        CellValue::Integer(n) => assert_eq!(*n, 1),
        other => panic!("Expected Integer, got {:?}", other),
    }
    assert_eq!(row.text(1).as_deref(), Some("hello"));
    assert_eq!(row.text(2), None);
}

#[tokio::test]
async fn test_invalid_query_fails() {
    let Some(provider) = connect().await else {
        return;
    };

    let result = provider.run_query("SELECT * FROM no_such_table_here").await;
    assert!(matches!(result, Err(DbError::QueryFailed(_))));
}

#[tokio::test]
async fn test_load_snapshot_from_catalog() {
    let Some(provider) = connect().await else {
        return;
    };
    create_shop(&provider, "joinwise_it_load").await;

    let snapshot = load_snapshot(&provider).await.unwrap();

    for table in ["customer", "orders", "order_line", "audit_log"] {
        let name = format!("joinwise_it_load.{}", table);
        assert!(snapshot.tables.contains(&name), "missing {}", name);
    }
    assert!(snapshot.graph.node("joinwise_it_load.audit_log").is_none());

    let orders = snapshot.graph.node("joinwise_it_load.orders").unwrap();
    let to_customer = orders
        .joins
        .iter()
        .find(|e| e.neighbor_table == "joinwise_it_load.customer")
        .unwrap();
    assert_eq!(to_customer.own_column, "customer_id");
    assert_eq!(to_customer.neighbor_column, "id");
    assert_eq!(to_customer.direction, JoinDirection::ToChild);

    let customer = snapshot.graph.node("joinwise_it_load.customer").unwrap();
    assert_eq!(customer.joins.len(), 1);
    assert_eq!(customer.joins[0].direction, JoinDirection::ToParent);

    drop_schema(&provider, "joinwise_it_load").await;
}

#[tokio::test]
async fn test_join_completion_against_catalog() {
    let Some(provider) = connect().await else {
        return;
    };
    create_shop(&provider, "joinwise_it_join").await;

    let snapshot = load_snapshot(&provider).await.unwrap();
    let engine = SuggestionEngine::default();
    let text = "SELECT * FROM joinwise_it_join.customer c JOIN ";
    let joins: Vec<String> = engine
        .complete(&snapshot, text, Position::new(0, text.len()))
        .into_iter()
        .filter(|c| c.kind == CompletionKind::Join)
        .map(|c| c.label)
        .collect();
    assert_eq!(
        joins,
        vec!["joinwise_it_join.orders orders ON c.id = orders.customer_id"]
    );

    drop_schema(&provider, "joinwise_it_join").await;
}
