//! Textual MySQL → SQLite rewrite for dump files.
//!
//! This is a fixed list of substitutions, not a SQL parser. It covers what
//! typical teaching dumps contain: `ENUM` columns, `FOREIGN_KEY_CHECKS`
//! pragmas, `INSERT IGNORE`, `AUTO_INCREMENT` keys, `BOOLEAN` and inline
//! `INDEX` declarations.

use std::sync::LazyLock;

use regex::Regex;

/// Lines starting with this marker are dropped before any other rule runs.
const END_OF_DATA_MARKER: &str = "-- EOD";

static ENUM_OPEN: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)ENUM\s*\("));

static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\r\n", "\n"),
        (r"(?i)SET\s+FOREIGN_KEY_CHECKS\s*=\s*[01]\s*;\s*", ""),
        (r"(?i)\bINSERT\s+IGNORE\s+INTO\b", "INSERT OR IGNORE INTO"),
        (
            r"(?i)\b(?:INT|INTEGER)\s+PRIMARY\s+KEY\s+AUTO_INCREMENT\b",
            "INTEGER PRIMARY KEY",
        ),
        (r"(?i)\bAUTO_INCREMENT\b", ""),
        (r"(?i)\bBOOLEAN\b", "INTEGER"),
        (r"(?im)^\s*INDEX\s+[^\n]+\n?", ""),
        (r",\s*\)", "\n)"),
        (r"\n{3,}", "\n\n"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (compile(pattern), replacement))
    .collect()
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("rewrite patterns are valid regular expressions")
}

/// Rewrite a MySQL dump so SQLite can execute it.
pub fn mysql_to_sqlite(sql: &str) -> String {
    let without_markers = strip_marker_lines(sql);
    let mut rewritten = replace_enum_types(&without_markers);

    for (pattern, replacement) in RULES.iter() {
        rewritten = pattern
            .replace_all(&rewritten, *replacement)
            .into_owned();
    }

    rewritten.trim().to_string()
}

fn strip_marker_lines(sql: &str) -> String {
    sql.split('\n')
        .filter(|line| !line.trim_start().starts_with(END_OF_DATA_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace every `ENUM(...)` with `TEXT`, skipping nested parentheses.
fn replace_enum_types(sql: &str) -> String {
    let mut output = String::with_capacity(sql.len());
    let mut index = 0;

    while let Some(found) = ENUM_OPEN.find_at(sql, index) {
        output.push_str(&sql[index..found.start()]);
        output.push_str("TEXT");

        let mut depth = 1usize;
        let mut end = found.end();
        for (offset, ch) in sql[found.end()..].char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            end = found.end() + offset + ch.len_utf8();
            if depth == 0 {
                break;
            }
        }
        index = end;
    }

    output.push_str(&sql[index..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_enum_with_nested_parentheses() {
        let sql = "status enum('a', 'b(c)') NOT NULL, kind ENUM ('x')";
        assert_eq!(replace_enum_types(sql), "status TEXT NOT NULL, kind TEXT");
    }

    #[test]
    fn unterminated_enum_consumes_rest() {
        assert_eq!(replace_enum_types("a ENUM('x', 'y'"), "a TEXT");
    }

    #[test]
    fn rewrites_table_definition() {
        let sql = concat!(
            "SET FOREIGN_KEY_CHECKS = 0;\r\n",
            "CREATE TABLE schueler (\r\n",
            "  id INT PRIMARY KEY AUTO_INCREMENT,\r\n",
            "  aktiv BOOLEAN,\r\n",
            "  geschlecht ENUM('m','w','d'),\r\n",
            "  INDEX idx_aktiv (aktiv),\r\n",
            ");\r\n",
            "SET FOREIGN_KEY_CHECKS=1;\r\n",
        );

        let expected = concat!(
            "CREATE TABLE schueler (\n",
            "  id INTEGER PRIMARY KEY,\n",
            "  aktiv INTEGER,\n",
            "  geschlecht TEXT\n",
            ");",
        );
        assert_eq!(mysql_to_sqlite(sql), expected);
    }

    #[test]
    fn rewrites_insert_ignore_and_drops_markers() {
        let sql = "insert ignore into t VALUES (1);\n-- EOD t\n  -- EOD\nSELECT 1;";
        assert_eq!(
            mysql_to_sqlite(sql),
            "INSERT OR IGNORE INTO t VALUES (1);\nSELECT 1;"
        );
    }

    #[test]
    fn collapses_blank_lines_and_strips_auto_increment() {
        let sql = "CREATE TABLE a (id BIGINT AUTO_INCREMENT);\n\n\n\n\nCREATE TABLE b (x INT);";
        assert_eq!(
            mysql_to_sqlite(sql),
            "CREATE TABLE a (id BIGINT );\n\nCREATE TABLE b (x INT);"
        );
    }
}
