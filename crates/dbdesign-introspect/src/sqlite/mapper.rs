use std::collections::HashMap;

use dbdesign_core::{Column, ForeignKey, RelationalSchema, Table};

use super::queries::{RawColumn, RawForeignKey};

/// Group column rows into tables, keeping the query's table order.
pub fn map_tables(columns: Vec<RawColumn>) -> RelationalSchema {
    let mut tables: Vec<Table> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for raw in columns {
        let index = match positions.get(&raw.table_name) {
            Some(index) => *index,
            None => {
                positions.insert(raw.table_name.clone(), tables.len());
                tables.push(Table::new(raw.table_name.clone()));
                tables.len() - 1
            }
        };
        tables[index].columns.push(Column::new(
            raw.column_name,
            raw.column_type,
            raw.pk > 0,
        ));
    }

    tables
}

/// Attach foreign keys to their owning tables. Rows for unknown tables are ignored.
pub fn attach_foreign_keys(tables: &mut [Table], foreign_keys: Vec<RawForeignKey>) {
    for raw in foreign_keys {
        let Some(table) = tables.iter_mut().find(|table| table.name == raw.table_name) else {
            continue;
        };
        table.foreign_keys.push(ForeignKey::new(
            raw.column_name,
            raw.referenced_table,
            raw.referenced_column.unwrap_or_default(),
        ));
    }
}
