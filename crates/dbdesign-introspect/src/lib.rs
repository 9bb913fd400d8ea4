//! SQLite session runtime: owns the live database, introspects its schema
//! and answers the request/response protocol used by front ends.

pub mod adapter;
pub mod errors;
pub mod options;
pub mod protocol;
pub mod sqlite;

pub use adapter::Adapter;
pub use errors::{SessionError, SessionResult};
pub use options::IntrospectOptions;
pub use protocol::{Request, Response, SessionHost};
pub use sqlite::{QueryOutcome, SqliteSession};

pub use dbdesign_core::RelationalSchema;
