use std::io;

use thiserror::Error;

use dbdesign_core::Error as CoreError;
use dbdesign_introspect::SessionError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("query failed: {0}")]
    Query(String),
    #[error("invalid input {path}: {issues}")]
    InvalidInput { path: String, issues: String },
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

pub type CliResult<T> = Result<T, CliError>;
