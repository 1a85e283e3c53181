use std::fmt::Display;

use crate::{
    error::Result,
    sql::{
        executor::{
            mutation::{Delete, Insert, Update},
            query::{Export, Scan},
            schema::{CreateTable, DropTable},
        },
        parser::ast::{Condition, Statement},
    },
    storage::{Record, TableStore},
};

mod mutation;
mod query;
mod schema;

/// Statement executor
pub trait Executor {
    fn execute(self: Box<Self>, store: &TableStore) -> Result<ResultSet>;
}

impl dyn Executor {
    /// Builds the executor for a parsed statement
    pub fn build(stmt: Statement) -> Box<dyn Executor> {
        match stmt {
            Statement::CreateTable { name, columns } => CreateTable::new(name, columns),
            Statement::DropTable { name } => DropTable::new(name),
            Statement::Insert { table_name, values } => Insert::new(table_name, values),
            Statement::Select {
                table_name,
                where_clause,
            } => Scan::new(table_name, where_clause),
            Statement::Delete {
                table_name,
                where_clause,
            } => Delete::new(table_name, where_clause),
            Statement::Update {
                table_name,
                column,
                value,
                where_clause,
            } => Update::new(table_name, column, value, where_clause),
            Statement::Export { table_name, path } => Export::new(table_name, path),
        }
    }
}

/// Execution result
#[derive(Debug, PartialEq)]
pub enum ResultSet {
    CreateTable {
        table_name: String,
        columns: usize,
    },
    DropTable {
        table_name: String,
        dropped: bool,
    },
    Insert {
        table_name: String,
        values: usize,
    },
    Scan {
        table_name: String,
        filter: Option<Condition>,
        columns: Vec<String>,
        rows: Vec<Record>,
    },
    Delete {
        table_name: String,
        filter: Condition,
        count: usize,
    },
    Update {
        table_name: String,
        filter: Condition,
        count: usize,
    },
    Export {
        table_name: String,
        path: String,
        /// None when the table has no schema and nothing was written
        rows: Option<usize>,
    },
}

const RULE: &str = "----------------------------------------";

impl Display for ResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultSet::CreateTable {
                table_name,
                columns,
            } => write!(
                f,
                "Table '{}' created successfully with {} columns.",
                table_name, columns
            ),
            ResultSet::DropTable {
                table_name,
                dropped: true,
            } => write!(f, "Table '{}' dropped successfully.", table_name),
            ResultSet::DropTable {
                table_name,
                dropped: false,
            } => write!(
                f,
                "Failed to drop table '{}'. Please check if the table exists.",
                table_name
            ),
            ResultSet::Insert { table_name, values } => write!(
                f,
                "Successfully inserted {} values into table '{}'.",
                values, table_name
            ),
            ResultSet::Scan {
                table_name,
                filter,
                columns,
                rows,
            } => {
                let filter = filter
                    .as_ref()
                    .map(|c| format!(" where {}", c))
                    .unwrap_or_default();
                if rows.is_empty() {
                    return write!(f, "No records found in table '{}'{}.", table_name, filter);
                }

                writeln!(
                    f,
                    "Found {} record(s) in table '{}'{}:",
                    rows.len(),
                    table_name,
                    filter
                )?;
                writeln!(f, "{}", RULE)?;
                if !columns.is_empty() {
                    writeln!(f, "{}", columns.join("\t"))?;
                }
                for row in rows {
                    writeln!(f, "{}", row.join("\t"))?;
                }
                write!(f, "{}", RULE)
            }
            ResultSet::Delete {
                table_name,
                filter,
                count,
            } => {
                if *count > 0 {
                    write!(
                        f,
                        "Successfully deleted {} record(s) from table '{}' where {}.",
                        count, table_name, filter
                    )
                } else {
                    write!(
                        f,
                        "No records found in table '{}' where {} to delete.",
                        table_name, filter
                    )
                }
            }
            ResultSet::Update {
                table_name,
                filter,
                count,
            } => {
                if *count > 0 {
                    write!(
                        f,
                        "Successfully updated {} record(s) in table '{}' where {}.",
                        count, table_name, filter
                    )
                } else {
                    write!(
                        f,
                        "No records updated in table '{}' where {}.",
                        table_name, filter
                    )
                }
            }
            ResultSet::Export {
                table_name,
                path,
                rows: Some(rows),
            } => write!(
                f,
                "Table '{}' exported to '{}' successfully ({} record(s)).",
                table_name, path, rows
            ),
            ResultSet::Export {
                table_name,
                path,
                rows: None,
            } => write!(
                f,
                "Failed to export table '{}' to '{}'. Please check if the table exists.",
                table_name, path
            ),
        }
    }
}
