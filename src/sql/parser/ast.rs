use std::fmt::Display;

use crate::storage::Column;

/// Statements accepted by the command front end
///
/// All names and values are plain text: literal quotes are already removed
/// and nothing is typed.
#[derive(Debug, PartialEq)]
pub enum Statement {
    /// CREATE TABLE name (col type, ...)
    CreateTable { name: String, columns: Vec<Column> },
    /// DROP TABLE name
    DropTable { name: String },
    /// INSERT INTO name VALUES (v, ...)
    Insert { table_name: String, values: Vec<String> },
    /// SELECT * FROM name [WHERE col = v]
    Select {
        table_name: String,
        where_clause: Option<Condition>,
    },
    /// DELETE FROM name WHERE col = v
    Delete {
        table_name: String,
        where_clause: Condition,
    },
    /// UPDATE name SET col = v WHERE col = v
    Update {
        table_name: String,
        column: String,
        value: String,
        where_clause: Condition,
    },
    /// EXPORT TABLE name TO 'path'
    Export { table_name: String, path: String },
}

/// Equality condition `column = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub value: String,
}

impl Condition {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.column, self.value)
    }
}
