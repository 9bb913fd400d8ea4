use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::Table;

/// Validate internal consistency of a relational schema snapshot.
///
/// This checks:
/// - duplicate tables/columns
/// - foreign key columns exist in their owning table
///
/// Referenced tables are not required to exist; the transforms skip
/// references they cannot resolve.
pub fn validate_schema(schema: &[Table]) -> Result<()> {
    let mut tables = BTreeSet::new();

    for table in schema {
        if !tables.insert(table.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate table name: {}",
                table.name
            )));
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate column name: {}.{}",
                    table.name, column.name
                )));
            }
        }

        for fk in &table.foreign_keys {
            if !columns.contains(fk.column_name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "foreign key column not found: {}.{}",
                    table.name, fk.column_name
                )));
            }
        }
    }

    Ok(())
}
