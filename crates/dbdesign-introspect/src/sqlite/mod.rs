mod mapper;
mod queries;
mod session;

pub use session::{QueryOutcome, SqliteSession};
