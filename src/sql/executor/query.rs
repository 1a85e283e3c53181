use std::fs;

use tracing::debug;

use crate::{
    error::Result,
    sql::{
        executor::{Executor, ResultSet},
        parser::ast::Condition,
    },
    storage::TableStore,
};

/// Table scan executor (SELECT)
pub struct Scan {
    table_name: String,
    filter: Option<Condition>,
}

impl Scan {
    pub fn new(table_name: String, filter: Option<Condition>) -> Box<Self> {
        Box::new(Self { table_name, filter })
    }
}

impl Executor for Scan {
    fn execute(self: Box<Self>, store: &TableStore) -> Result<ResultSet> {
        let columns = store.catalog().resolve_columns(&self.table_name)?;
        let rows = match &self.filter {
            Some(cond) => store.scan_where(&self.table_name, &cond.column, &cond.value)?,
            None => store.scan_all(&self.table_name)?,
        };
        Ok(ResultSet::Scan {
            table_name: self.table_name,
            filter: self.filter,
            columns,
            rows,
        })
    }
}

/// CSV export executor
///
/// Writes a header row with the column names followed by every live record.
pub struct Export {
    table_name: String,
    path: String,
}

impl Export {
    pub fn new(table_name: String, path: String) -> Box<Self> {
        Box::new(Self { table_name, path })
    }
}

impl Executor for Export {
    fn execute(self: Box<Self>, store: &TableStore) -> Result<ResultSet> {
        let Some(schema) = store.catalog().load(&self.table_name)? else {
            return Ok(ResultSet::Export {
                table_name: self.table_name,
                path: self.path,
                rows: None,
            });
        };
        let rows = store.scan_all(&self.table_name)?;

        let mut out = csv_line(&schema.column_names());
        for row in &rows {
            out.push_str(&csv_line(row));
        }
        fs::write(&self.path, out)?;
        debug!(table = %self.table_name, path = %self.path, rows = rows.len(), "exported table");

        Ok(ResultSet::Export {
            table_name: self.table_name,
            path: self.path,
            rows: Some(rows.len()),
        })
    }
}

/// Renders one CSV line. Fields holding a comma, quote or line break are
/// quoted with inner quotes doubled.
fn csv_line(fields: &[String]) -> String {
    let fields: Vec<String> = fields
        .iter()
        .map(|field| {
            if field.contains([',', '"', '\n', '\r']) {
                format!("\"{}\"", field.replace('"', "\"\""))
            } else {
                field.clone()
            }
        })
        .collect();
    format!("{}\n", fields.join(","))
}

#[cfg(test)]
mod tests {
    use super::csv_line;

    #[test]
    fn test_csv_line() {
        let fields = vec![
            "1".to_string(),
            "a,b".to_string(),
            "say \"hi\"".to_string(),
            String::new(),
        ];
        assert_eq!(csv_line(&fields), "1,\"a,b\",\"say \"\"hi\"\"\",\n");
    }
}
