use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Relational schema snapshot: tables in declaration order.
pub type RelationalSchema = Vec<Table>;

/// A table with its columns and foreign keys, both in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

/// Column metadata. An empty `data_type` means the column is untyped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "type", default)]
    pub data_type: String,
    #[serde(default)]
    pub is_primary_key: bool,
}

/// Single-column foreign key reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub column_name: String,
    pub referenced_table: String,
    #[serde(default)]
    pub referenced_column: String,
}

impl Table {
    /// Create a table without columns or foreign keys.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Names of the primary-key columns in column order.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|column| column.is_primary_key)
            .map(|column| column.name.as_str())
    }

    /// Returns true if some foreign key originates from `column`.
    pub fn is_foreign_key_column(&self, column: &str) -> bool {
        self.foreign_keys.iter().any(|fk| fk.column_name == column)
    }
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, is_primary_key: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key,
        }
    }
}

impl ForeignKey {
    pub fn new(
        column_name: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            referenced_table: referenced_table.into(),
            referenced_column: referenced_column.into(),
        }
    }
}
