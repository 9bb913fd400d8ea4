use sqlx::SqliteConnection;

use crate::errors::SessionResult;
use crate::options::IntrospectOptions;

#[derive(Debug, sqlx::FromRow)]
pub struct RawColumn {
    pub table_name: String,
    pub column_name: String,
    pub column_type: String,
    pub pk: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawForeignKey {
    pub table_name: String,
    pub column_name: String,
    pub referenced_table: String,
    pub referenced_column: Option<String>,
}

const USER_TABLES_ONLY: &str = "AND m.name NOT LIKE 'sqlite_%'";

fn table_filter(opts: &IntrospectOptions) -> &'static str {
    if opts.include_internal_tables {
        ""
    } else {
        USER_TABLES_ONLY
    }
}

pub async fn fetch_columns(
    conn: &mut SqliteConnection,
    opts: &IntrospectOptions,
) -> SessionResult<Vec<RawColumn>> {
    let sql = format!(
        r#"
        SELECT
            m.name AS table_name,
            p.name AS column_name,
            p.type AS column_type,
            p.pk AS pk
        FROM sqlite_master m
        JOIN pragma_table_info(m.name) p
        WHERE m.type = 'table' {}
        ORDER BY m.name, p.cid
        "#,
        table_filter(opts)
    );

    let rows = sqlx::query_as::<_, RawColumn>(&sql)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

pub async fn fetch_foreign_keys(
    conn: &mut SqliteConnection,
    opts: &IntrospectOptions,
) -> SessionResult<Vec<RawForeignKey>> {
    let sql = format!(
        r#"
        SELECT
            m.name AS table_name,
            fk."from" AS column_name,
            fk."table" AS referenced_table,
            fk."to" AS referenced_column
        FROM sqlite_master m
        JOIN pragma_foreign_key_list(m.name) fk
        WHERE m.type = 'table' {}
        ORDER BY m.name, fk.id, fk.seq
        "#,
        table_filter(opts)
    );

    let rows = sqlx::query_as::<_, RawForeignKey>(&sql)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}
