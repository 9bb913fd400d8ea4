use std::str::FromStr;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Column, ConnectOptions, Connection, Either, Row, SqliteConnection, TypeInfo, ValueRef};
use tracing::{debug, info};

use dbdesign_core::RelationalSchema;

use super::{mapper, queries};
use crate::adapter::Adapter;
use crate::errors::{SessionError, SessionResult};
use crate::options::IntrospectOptions;

const MEMORY_URL: &str = "sqlite::memory:";

/// Result of running a statement batch against the session database.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutcome {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub row_count: usize,
    pub message: String,
}

/// A single in-memory SQLite database owned by one task.
#[derive(Debug)]
pub struct SqliteSession {
    conn: SqliteConnection,
}

impl SqliteSession {
    /// Open an empty in-memory database.
    pub async fn open() -> SessionResult<Self> {
        Ok(Self {
            conn: connect_memory().await?,
        })
    }

    /// Open a database and execute `seed_sql` into it.
    pub async fn open_seeded(seed_sql: &str) -> SessionResult<Self> {
        let mut session = Self::open().await?;
        session.seed(seed_sql).await?;
        Ok(session)
    }

    /// Drop the current database and start over from `seed_sql`.
    ///
    /// The old database is gone even when seeding fails; statements that ran
    /// before the failing one stay applied.
    pub async fn replace_database(&mut self, seed_sql: &str) -> SessionResult<()> {
        let fresh = connect_memory().await?;
        let previous = std::mem::replace(&mut self.conn, fresh);
        previous.close().await?;
        self.seed(seed_sql).await
    }

    pub(crate) async fn seed(&mut self, seed_sql: &str) -> SessionResult<()> {
        if seed_sql.trim().is_empty() {
            return Ok(());
        }
        sqlx::raw_sql(seed_sql).execute(&mut self.conn).await?;
        info!(
            event = "database_loaded",
            bytes = seed_sql.len(),
            "seed script executed"
        );
        Ok(())
    }

    /// Execute a batch of statements and report the rows of the last result set.
    ///
    /// When no statement returns rows the message reports how many rows the
    /// last modifying statement changed.
    pub async fn run_query(&mut self, sql: &str) -> SessionResult<QueryOutcome> {
        let statement = sql.trim();
        if statement.is_empty() {
            return Err(SessionError::EmptyQuery);
        }

        let last_set = self.last_result_set(statement).await?;

        if last_set.is_empty() {
            let changed: i64 = sqlx::query_scalar("SELECT changes()")
                .fetch_one(&mut self.conn)
                .await?;
            debug!(event = "query_modified", changed, "statement executed");
            return Ok(QueryOutcome {
                columns: Vec::new(),
                rows: Vec::new(),
                row_count: 0,
                message: format!("{changed} Zeilen veraendert."),
            });
        }

        let columns = column_names(&last_set[0]);
        let mut json_rows = Vec::with_capacity(last_set.len());
        for row in &last_set {
            json_rows.push(row_to_json(row)?);
        }
        let row_count = json_rows.len();
        debug!(event = "query_read", rows = row_count, "statement executed");

        Ok(QueryOutcome {
            columns,
            rows: json_rows,
            row_count,
            message: format!("{row_count} Zeilen gelesen."),
        })
    }

    /// Run every statement and keep the rows of the last one that returned any.
    async fn last_result_set(&mut self, statement: &str) -> SessionResult<Vec<SqliteRow>> {
        let mut stream = sqlx::raw_sql(statement).fetch_many(&mut self.conn);
        let mut current: Vec<SqliteRow> = Vec::new();
        let mut last: Vec<SqliteRow> = Vec::new();

        // Each statement ends with a `Left` carrying its query result.
        while let Some(step) = stream.try_next().await? {
            match step {
                Either::Left(_) => {
                    if !current.is_empty() {
                        last = std::mem::take(&mut current);
                    }
                }
                Either::Right(row) => current.push(row),
            }
        }
        if !current.is_empty() {
            last = current;
        }

        Ok(last)
    }

    /// Read the user tables, their columns and foreign keys.
    pub async fn read_schema(&mut self) -> SessionResult<RelationalSchema> {
        self.read_schema_with(&IntrospectOptions::default()).await
    }

    pub async fn read_schema_with(
        &mut self,
        opts: &IntrospectOptions,
    ) -> SessionResult<RelationalSchema> {
        let columns = queries::fetch_columns(&mut self.conn, opts).await?;
        let mut tables = mapper::map_tables(columns);
        if opts.include_foreign_keys {
            let foreign_keys = queries::fetch_foreign_keys(&mut self.conn, opts).await?;
            mapper::attach_foreign_keys(&mut tables, foreign_keys);
        }
        debug!(event = "schema_read", tables = tables.len(), "schema introspected");
        Ok(tables)
    }

    /// Close the underlying connection.
    pub async fn close(self) -> SessionResult<()> {
        self.conn.close().await?;
        Ok(())
    }
}

#[async_trait]
impl Adapter for SqliteSession {
    fn engine(&self) -> &'static str {
        "sqlite"
    }

    async fn introspect(&mut self, opts: &IntrospectOptions) -> SessionResult<RelationalSchema> {
        self.read_schema_with(opts).await
    }
}

async fn connect_memory() -> SessionResult<SqliteConnection> {
    // Dumps are loaded in file order, so referential checks stay off.
    let options = SqliteConnectOptions::from_str(MEMORY_URL)?.foreign_keys(false);
    Ok(options.connect().await?)
}

fn column_names(row: &SqliteRow) -> Vec<String> {
    row.columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect()
}

fn row_to_json(row: &SqliteRow) -> SessionResult<Map<String, Value>> {
    let mut object = Map::new();
    for column in row.columns() {
        let index = column.ordinal();
        let storage = {
            let raw = row.try_get_raw(index)?;
            if raw.is_null() {
                None
            } else {
                Some(raw.type_info().name().to_string())
            }
        };

        let value = match storage.as_deref() {
            None => Value::Null,
            Some("INTEGER") => Value::from(row.try_get_unchecked::<i64, _>(index)?),
            Some("REAL") => Number::from_f64(row.try_get_unchecked::<f64, _>(index)?)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Some("BLOB") => Value::from(row.try_get_unchecked::<Vec<u8>, _>(index)?),
            Some(_) => Value::String(row.try_get_unchecked::<String, _>(index)?),
        };
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}
