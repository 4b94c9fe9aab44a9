//! The discussion-board schema.
//!
//! One table list feeds both the DDL used to create the store and the schema
//! description given to the language model, so the two cannot drift apart.

/// A column definition.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    /// Type and constraints, in SQLite syntax.
    pub definition: &'static str,
}

/// A table definition.
#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    /// Table-level constraints (e.g. composite UNIQUE).
    pub constraints: &'static [&'static str],
}

const fn col(name: &'static str, definition: &'static str) -> Column {
    Column { name, definition }
}

/// The board tables, parents before children.
pub static TABLES: &[Table] = &[
    Table {
        name: "users",
        columns: &[
            col("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            col("username", "TEXT NOT NULL UNIQUE"),
            col("email", "TEXT NOT NULL UNIQUE"),
            col("passwordHash", "TEXT NOT NULL"),
            col("createdAt", "TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP"),
            col("updatedAt", "TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP"),
        ],
        constraints: &[],
    },
    Table {
        name: "messages",
        columns: &[
            col("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            col("userId", "INTEGER REFERENCES users(id) ON DELETE CASCADE"),
            col("title", "TEXT NOT NULL"),
            col("content", "TEXT NOT NULL"),
            col("createdAt", "TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP"),
        ],
        constraints: &[],
    },
    Table {
        name: "comments",
        columns: &[
            col("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            col("messageId", "INTEGER REFERENCES messages(id) ON DELETE CASCADE"),
            col("userId", "INTEGER REFERENCES users(id) ON DELETE CASCADE"),
            col("content", "TEXT NOT NULL"),
            col("createdAt", "TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP"),
        ],
        constraints: &[],
    },
    Table {
        name: "votes",
        columns: &[
            col("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            col("messageId", "INTEGER REFERENCES messages(id) ON DELETE CASCADE"),
            col("userId", "INTEGER REFERENCES users(id) ON DELETE CASCADE"),
            col("value", "INTEGER NOT NULL CHECK (value IN (-1, 1))"),
        ],
        constraints: &["UNIQUE (\"messageId\", \"userId\")"],
    },
    Table {
        name: "reactions",
        columns: &[
            col("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            col("messageId", "INTEGER REFERENCES messages(id) ON DELETE CASCADE"),
            col("userId", "INTEGER REFERENCES users(id) ON DELETE CASCADE"),
            col("emoji", "TEXT NOT NULL"),
        ],
        constraints: &["UNIQUE (\"messageId\", \"userId\", emoji)"],
    },
];

/// Quote an identifier if it would otherwise be case-folded.
pub fn ident(name: &str) -> String {
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        format!("\"{}\"", name)
    } else {
        name.to_string()
    }
}

impl Table {
    /// `CREATE TABLE IF NOT EXISTS` statement for this table.
    pub fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("    {} {}", ident(c.name), c.definition))
            .collect();
        parts.extend(self.constraints.iter().map(|c| format!("    {}", c)));

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n);",
            self.name,
            parts.join(",\n")
        )
    }

    /// One-line description for the model's schema section.
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", ident(c.name), c.definition))
            .collect();
        parts.extend(self.constraints.iter().map(|c| c.to_string()));
        format!("- {} ({})", self.name, parts.join(", "))
    }
}

/// The full DDL script for the board.
pub fn create_script() -> String {
    TABLES
        .iter()
        .map(Table::create_sql)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The schema section of the system instruction.
pub fn describe() -> String {
    TABLES
        .iter()
        .map(Table::describe)
        .collect::<Vec<_>>()
        .join("\n")
}
