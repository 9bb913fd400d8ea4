/// Options that control how introspection behaves.
#[derive(Debug, Clone)]
pub struct IntrospectOptions {
    /// Include SQLite's own `sqlite_*` tables.
    pub include_internal_tables: bool,
    /// Read foreign keys; when false every table has none.
    pub include_foreign_keys: bool,
}

impl Default for IntrospectOptions {
    fn default() -> Self {
        Self {
            include_internal_tables: false,
            include_foreign_keys: true,
        }
    }
}
