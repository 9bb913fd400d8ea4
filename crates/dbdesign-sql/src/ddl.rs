use dbdesign_core::{Table, quote_identifier};

const FALLBACK_TYPE: &str = "TEXT";

/// Render `DROP TABLE IF EXISTS` and `CREATE TABLE` statements for a schema.
///
/// Drops run in reverse table order so that tables created later, which are
/// the ones more likely to hold foreign keys, go first. This is a heuristic;
/// no dependency ordering is computed.
pub fn relational_schema_to_sql(schema: &[Table]) -> String {
    let drops = schema
        .iter()
        .rev()
        .map(|table| format!("DROP TABLE IF EXISTS {};", quote_identifier(&table.name)))
        .collect::<Vec<_>>()
        .join("\n");

    let creates = schema
        .iter()
        .map(create_table)
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{drops}\n\n{creates}\n")
}

fn create_table(table: &Table) -> String {
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|column| {
            let data_type = if column.data_type.trim().is_empty() {
                FALLBACK_TYPE
            } else {
                column.data_type.as_str()
            };
            format!("  {} {}", quote_identifier(&column.name), data_type)
        })
        .collect();

    let primary: Vec<String> = table.primary_key_columns().map(quote_identifier).collect();
    if !primary.is_empty() {
        lines.push(format!("  PRIMARY KEY ({})", primary.join(", ")));
    }

    for fk in &table.foreign_keys {
        lines.push(format!(
            "  FOREIGN KEY ({}) REFERENCES {} ({})",
            quote_identifier(&fk.column_name),
            quote_identifier(&fk.referenced_table),
            quote_identifier(&fk.referenced_column)
        ));
    }

    format!(
        "CREATE TABLE {} (\n{}\n);",
        quote_identifier(&table.name),
        lines.join(",\n")
    )
}
