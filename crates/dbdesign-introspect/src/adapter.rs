use async_trait::async_trait;

use dbdesign_core::RelationalSchema;

use crate::errors::SessionResult;
use crate::options::IntrospectOptions;

/// Trait implemented by database sessions that can introspect their schema.
#[async_trait]
pub trait Adapter {
    /// Returns the engine identifier (e.g. `sqlite`).
    fn engine(&self) -> &'static str;

    /// Introspect the database and return a schema snapshot.
    async fn introspect(&mut self, opts: &IntrospectOptions) -> SessionResult<RelationalSchema>;
}
