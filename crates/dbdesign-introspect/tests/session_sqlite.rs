use anyhow::Result;
use dbdesign_introspect::{
    Adapter, IntrospectOptions, Request, Response, SessionError, SessionHost, SqliteSession,
};
use serde_json::json;

const SEED: &str = "
CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE orders (
    id INTEGER PRIMARY KEY,
    user_id INTEGER,
    total REAL,
    FOREIGN KEY (user_id) REFERENCES users(id)
);
INSERT INTO users (id, name) VALUES (1, 'Ada'), (2, 'Linus');
INSERT INTO orders (id, user_id, total) VALUES (10, 1, 9.5);
";

#[tokio::test]
async fn seeded_session_reports_tables_in_name_order() -> Result<()> {
    let mut session = SqliteSession::open_seeded(SEED).await?;
    let schema = session.read_schema().await?;

    let names: Vec<&str> = schema.iter().map(|table| table.name.as_str()).collect();
    assert_eq!(names, vec!["orders", "users"]);

    let orders = &schema[0];
    assert_eq!(orders.columns.len(), 3);
    assert_eq!(orders.columns[0].name, "id");
    assert!(orders.columns[0].is_primary_key);
    assert_eq!(orders.columns[2].data_type, "REAL");
    assert_eq!(orders.foreign_keys.len(), 1);
    assert_eq!(orders.foreign_keys[0].column_name, "user_id");
    assert_eq!(orders.foreign_keys[0].referenced_table, "users");
    assert_eq!(orders.foreign_keys[0].referenced_column, "id");

    session.close().await?;
    Ok(())
}

#[tokio::test]
async fn adapter_can_skip_foreign_keys() -> Result<()> {
    let mut session = SqliteSession::open_seeded(SEED).await?;
    assert_eq!(session.engine(), "sqlite");

    let opts = IntrospectOptions {
        include_foreign_keys: false,
        ..IntrospectOptions::default()
    };
    let schema = session.introspect(&opts).await?;
    assert!(schema.iter().all(|table| table.foreign_keys.is_empty()));
    Ok(())
}

#[tokio::test]
async fn select_returns_rows_as_json_objects() -> Result<()> {
    let mut session = SqliteSession::open_seeded(SEED).await?;
    let outcome = session
        .run_query("SELECT id, name FROM users ORDER BY id")
        .await?;

    assert_eq!(outcome.columns, vec!["id".to_string(), "name".to_string()]);
    assert_eq!(outcome.row_count, 2);
    assert_eq!(outcome.message, "2 Zeilen gelesen.");
    assert_eq!(outcome.rows[0].get("id"), Some(&json!(1)));
    assert_eq!(outcome.rows[1].get("name"), Some(&json!("Linus")));
    Ok(())
}

#[tokio::test]
async fn batch_reports_only_the_last_statement_with_rows() -> Result<()> {
    let mut session = SqliteSession::open_seeded(SEED).await?;
    let outcome = session
        .run_query("SELECT name FROM users; SELECT name FROM users WHERE id = 2;")
        .await?;

    assert_eq!(outcome.row_count, 1);
    assert_eq!(outcome.message, "1 Zeilen gelesen.");
    assert_eq!(outcome.rows[0].get("name"), Some(&json!("Linus")));
    Ok(())
}

#[tokio::test]
async fn trailing_modification_keeps_earlier_select_rows() -> Result<()> {
    let mut session = SqliteSession::open_seeded(SEED).await?;
    let outcome = session
        .run_query("SELECT id FROM users ORDER BY id; UPDATE users SET name = 'Grace' WHERE id = 1;")
        .await?;

    assert_eq!(outcome.columns, vec!["id".to_string()]);
    assert_eq!(outcome.row_count, 2);
    Ok(())
}

#[tokio::test]
async fn modifying_statement_reports_changed_rows() -> Result<()> {
    let mut session = SqliteSession::open_seeded(SEED).await?;
    let outcome = session
        .run_query("UPDATE users SET name = 'Grace' WHERE id = 2")
        .await?;

    assert!(outcome.columns.is_empty());
    assert_eq!(outcome.row_count, 0);
    assert_eq!(outcome.message, "1 Zeilen veraendert.");
    Ok(())
}

#[tokio::test]
async fn blank_query_is_rejected() -> Result<()> {
    let mut session = SqliteSession::open().await?;
    let err = session.run_query("   \n").await.unwrap_err();
    assert!(matches!(err, SessionError::EmptyQuery));
    assert_eq!(err.to_string(), "Bitte eine SQL-Abfrage eingeben.");
    Ok(())
}

#[tokio::test]
async fn replacing_the_database_discards_old_tables() -> Result<()> {
    let mut session = SqliteSession::open_seeded(SEED).await?;
    session
        .replace_database("CREATE TABLE kurse (id INTEGER PRIMARY KEY);")
        .await?;

    let schema = session.read_schema().await?;
    assert_eq!(schema.len(), 1);
    assert_eq!(schema[0].name, "kurse");
    Ok(())
}

#[tokio::test]
async fn host_requires_a_database_before_queries() {
    let mut host = SessionHost::new();
    let response = host
        .handle(Request::RunQuery {
            sql: "SELECT 1".to_string(),
        })
        .await;

    assert_eq!(
        response,
        Response::Error {
            message: "Keine Datenbank geladen.".to_string()
        }
    );
    assert!(!host.has_database());
}

#[tokio::test]
async fn host_answers_init_and_query_with_schema() -> Result<()> {
    let mut host = SessionHost::new();

    let ready = host
        .handle(Request::Init {
            seed_sql: SEED.to_string(),
            name: "shop".to_string(),
        })
        .await;
    match ready {
        Response::Ready { name, schema } => {
            assert_eq!(name, "shop");
            assert_eq!(schema.len(), 2);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    let result = host
        .handle(Request::RunQuery {
            sql: "CREATE TABLE notes (id INTEGER PRIMARY KEY)".to_string(),
        })
        .await;
    match result {
        Response::QueryResult {
            row_count, schema, ..
        } => {
            assert_eq!(row_count, 0);
            assert!(schema.iter().any(|table| table.name == "notes"));
        }
        other => panic!("unexpected response: {other:?}"),
    }

    host.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn host_reports_sqlite_errors() {
    let mut host = SessionHost::new();
    host.handle(Request::LoadDatabase {
        sql: String::new(),
        name: "leer".to_string(),
    })
    .await;

    let response = host
        .handle(Request::RunQuery {
            sql: "SELEC nonsense".to_string(),
        })
        .await;
    assert!(matches!(response, Response::Error { .. }));
    assert!(host.has_database());
}

#[tokio::test]
async fn failed_first_seed_keeps_applied_statements() {
    let mut host = SessionHost::new();
    let response = host
        .handle(Request::Init {
            seed_sql: "CREATE TABLE a (id INTEGER); INSERT INTO missing VALUES (1);".to_string(),
            name: "kaputt".to_string(),
        })
        .await;
    assert!(matches!(response, Response::Error { .. }));
    assert!(host.has_database());

    let result = host
        .handle(Request::RunQuery {
            sql: "SELECT count(*) AS n FROM a".to_string(),
        })
        .await;
    match result {
        Response::QueryResult { rows, schema, .. } => {
            assert_eq!(rows[0].get("n"), Some(&json!(0)));
            assert_eq!(schema.len(), 1);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn requests_use_adjacent_tagging() -> Result<()> {
    let request: Request = serde_json::from_value(json!({
        "type": "init",
        "payload": { "seedSql": "SELECT 1;", "name": "demo" }
    }))?;
    assert_eq!(
        request,
        Request::Init {
            seed_sql: "SELECT 1;".to_string(),
            name: "demo".to_string()
        }
    );

    let response = Response::Error {
        message: "kaputt".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&response)?,
        json!({ "type": "error", "payload": { "message": "kaputt" } })
    );
    Ok(())
}
