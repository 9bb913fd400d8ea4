//! SQL text generation and dialect rewriting.

pub mod ddl;
pub mod dialect;

pub use ddl::relational_schema_to_sql;
pub use dialect::mysql_to_sqlite;
