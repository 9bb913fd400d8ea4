//! Request/response messages exchanged with a database session host.
//!
//! Messages are adjacently tagged: `{"type": "runQuery", "payload": {...}}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use dbdesign_core::RelationalSchema;

use crate::errors::{SessionError, SessionResult};
use crate::sqlite::SqliteSession;

/// Reported when a failure carries no message of its own.
pub const UNKNOWN_ERROR: &str = "Unbekannter Fehler im SQL-Worker.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Request {
    #[serde(rename_all = "camelCase")]
    Init { seed_sql: String, name: String },
    LoadDatabase { sql: String, name: String },
    RunQuery { sql: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Response {
    Ready {
        name: String,
        schema: RelationalSchema,
    },
    DatabaseLoaded {
        name: String,
        schema: RelationalSchema,
    },
    #[serde(rename_all = "camelCase")]
    QueryResult {
        columns: Vec<String>,
        rows: Vec<Map<String, Value>>,
        row_count: usize,
        message: String,
        schema: RelationalSchema,
    },
    Error {
        message: String,
    },
}

/// Owns at most one live session and answers requests in arrival order.
#[derive(Debug, Default)]
pub struct SessionHost {
    session: Option<SqliteSession>,
}

impl SessionHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_database(&self) -> bool {
        self.session.is_some()
    }

    /// Handle one request. Failures become [`Response::Error`].
    pub async fn handle(&mut self, request: Request) -> Response {
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(event = "request_failed", error = %err, "session request failed");
                let mut message = err.to_string();
                if message.trim().is_empty() {
                    message = UNKNOWN_ERROR.to_string();
                }
                Response::Error { message }
            }
        }
    }

    async fn dispatch(&mut self, request: Request) -> SessionResult<Response> {
        match request {
            Request::Init { seed_sql, name } => {
                let session = self.load(&seed_sql).await?;
                let schema = session.read_schema().await?;
                Ok(Response::Ready { name, schema })
            }
            Request::LoadDatabase { sql, name } => {
                let session = self.load(&sql).await?;
                let schema = session.read_schema().await?;
                Ok(Response::DatabaseLoaded { name, schema })
            }
            Request::RunQuery { sql } => {
                let session = self.session.as_mut().ok_or(SessionError::NoDatabase)?;
                let outcome = session.run_query(&sql).await?;
                let schema = session.read_schema().await?;
                Ok(Response::QueryResult {
                    columns: outcome.columns,
                    rows: outcome.rows,
                    row_count: outcome.row_count,
                    message: outcome.message,
                    schema,
                })
            }
        }
    }

    async fn load(&mut self, seed_sql: &str) -> SessionResult<&mut SqliteSession> {
        let fresh = self.session.is_none();
        let session = match self.session.take() {
            Some(session) => session,
            None => SqliteSession::open().await?,
        };
        // Stored before seeding so a failing script leaves a usable database.
        let session = self.session.insert(session);
        if fresh {
            session.seed(seed_sql).await?;
        } else {
            session.replace_database(seed_sql).await?;
        }
        Ok(session)
    }

    /// Close the live session, if any.
    pub async fn shutdown(self) -> SessionResult<()> {
        match self.session {
            Some(session) => session.close().await,
            None => Ok(()),
        }
    }
}
