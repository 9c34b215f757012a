//! SQL rendering per backing store
//!
//! Values are never spliced into statement text. Every statement is rendered
//! with the dialect's positional markers and the values are bound through the
//! driver.

/// Columns selected for every todo read
pub const TODO_COLUMNS: &str = "id, title, completed, created";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `?1`, `?2`, ... ; no RETURNING on writes
    Sqlite,
    /// `$1`, `$2`, ... ; writes return the affected row
    Postgres,
}

impl Dialect {
    /// Positional parameter marker, 1-based
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Sqlite => format!("?{index}"),
            Dialect::Postgres => format!("${index}"),
        }
    }

    /// Whether writes can hand back the affected row in the same statement
    pub fn supports_returning(self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    pub fn create_table(self) -> &'static str {
        match self {
            Dialect::Sqlite => {
                r#"
                CREATE TABLE IF NOT EXISTS todos (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    title     TEXT    NOT NULL,
                    completed BOOLEAN NOT NULL DEFAULT 0,
                    created   TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                )
                "#
            }
            Dialect::Postgres => {
                r#"
                CREATE TABLE IF NOT EXISTS todos (
                    id        BIGSERIAL   PRIMARY KEY,
                    title     TEXT        NOT NULL,
                    completed BOOLEAN     NOT NULL DEFAULT FALSE,
                    created   TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#
            }
        }
    }

    pub fn insert(self) -> String {
        let mut sql = format!("INSERT INTO todos (title) VALUES ({})", self.placeholder(1));
        if self.supports_returning() {
            sql.push_str(&self.returning());
        }
        sql
    }

    pub fn select_by_id(self) -> String {
        format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = {}",
            self.placeholder(1)
        )
    }

    pub fn select_all(self) -> String {
        format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY created DESC, id DESC")
    }

    /// Partial update: a NULL parameter keeps the stored column value.
    /// Binds: title, completed, id.
    pub fn update(self) -> String {
        let mut sql = format!(
            "UPDATE todos SET title = COALESCE({}, title), completed = COALESCE({}, completed) WHERE id = {}",
            self.placeholder(1),
            self.placeholder(2),
            self.placeholder(3),
        );
        if self.supports_returning() {
            sql.push_str(&self.returning());
        }
        sql
    }

    pub fn delete(self) -> String {
        format!("DELETE FROM todos WHERE id = {}", self.placeholder(1))
    }

    fn returning(self) -> String {
        format!(" RETURNING {TODO_COLUMNS}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameterized(dialect: Dialect) -> Vec<String> {
        vec![
            dialect.insert(),
            dialect.select_by_id(),
            dialect.update(),
            dialect.delete(),
        ]
    }

    #[test]
    fn test_placeholder_styles() {
        assert_eq!(Dialect::Sqlite.placeholder(1), "?1");
        assert_eq!(Dialect::Sqlite.placeholder(3), "?3");
        assert_eq!(Dialect::Postgres.placeholder(1), "$1");
        assert_eq!(Dialect::Postgres.placeholder(3), "$3");
    }

    #[test]
    fn test_sqlite_statements_use_question_marks() {
        for sql in parameterized(Dialect::Sqlite) {
            assert!(sql.contains("?1"), "{sql}");
            assert!(!sql.contains('$'), "{sql}");
        }
    }

    #[test]
    fn test_postgres_statements_use_dollar_markers() {
        for sql in parameterized(Dialect::Postgres) {
            assert!(sql.contains("$1"), "{sql}");
            assert!(!sql.contains('?'), "{sql}");
        }
    }

    #[test]
    fn test_returning_only_on_postgres() {
        assert!(!Dialect::Sqlite.insert().contains("RETURNING"));
        assert!(!Dialect::Sqlite.update().contains("RETURNING"));
        assert!(Dialect::Postgres.insert().ends_with("RETURNING id, title, completed, created"));
        assert!(Dialect::Postgres.update().ends_with("RETURNING id, title, completed, created"));
    }

    #[test]
    fn test_update_binds_in_order() {
        assert_eq!(
            Dialect::Postgres.update(),
            "UPDATE todos SET title = COALESCE($1, title), completed = COALESCE($2, completed) WHERE id = $3 RETURNING id, title, completed, created"
        );
    }

    #[test]
    fn test_listing_order() {
        assert!(Dialect::Sqlite
            .select_all()
            .ends_with("ORDER BY created DESC, id DESC"));
    }

    #[test]
    fn test_schema_is_idempotent_ddl() {
        for dialect in [Dialect::Sqlite, Dialect::Postgres] {
            assert!(dialect.create_table().contains("CREATE TABLE IF NOT EXISTS todos"));
        }
    }
}
