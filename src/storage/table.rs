use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{
    error::Result,
    storage::{
        catalog::{Catalog, column_index},
        record::{self, Line, Record},
    },
};

/// How a table file is replaced after a delete or update pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteMode {
    /// Write the new content to a temporary file in the data directory, then
    /// rename it over the table file.
    #[default]
    Atomic,
    /// Truncate the table file and write the new content into it. A failure
    /// part way leaves a partially written table.
    InPlace,
}

/// Table store
///
/// Appends, scans and rewrites the record file of each table, resolving
/// column names through the [`Catalog`]. A missing table or an unknown
/// column is never an error: scans come back empty and mutations affect
/// zero rows. Only failing to open, write or replace a file is reported as
/// `Err`.
#[derive(Debug)]
pub struct TableStore {
    catalog: Catalog,
    rewrite: RewriteMode,
}

impl TableStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            rewrite: RewriteMode::default(),
        }
    }

    pub fn with_rewrite_mode(mut self, rewrite: RewriteMode) -> Self {
        self.rewrite = rewrite;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Appends one record to the end of the table file.
    ///
    /// The field count is not checked against the schema, and a table
    /// without a schema still accepts records.
    pub fn append<S: AsRef<str>>(&self, table_name: &str, fields: &[S]) -> Result<()> {
        let layout = self.catalog.layout();
        fs::create_dir_all(layout.data_dir())?;

        let values: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();
        let mut line = record::join_fields(&values);
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(layout.table_path(table_name))
            .inspect_err(|err| warn!(table = table_name, %err, "cannot open table for append"))?;
        file.write_all(&line)?;

        debug!(table = table_name, fields = fields.len(), "appended record");
        Ok(())
    }

    /// Returns every live record in file order
    pub fn scan_all(&self, table_name: &str) -> Result<Vec<Record>> {
        let Some(content) = self.read(table_name)? else {
            return Ok(Vec::new());
        };

        let rows: Vec<Record> = record::lines(&content)
            .into_iter()
            .filter_map(|line| match Line::classify(line) {
                Line::Live(line) => Some(record::decode(&record::split_fields(line))),
                _ => None,
            })
            .collect();
        debug!(table = table_name, rows = rows.len(), "scanned table");
        Ok(rows)
    }

    /// Returns every live record whose `column` field equals `value`.
    ///
    /// The comparison value is trimmed and loses one layer of surrounding
    /// quotes; the stored field is only trimmed.
    pub fn scan_where(&self, table_name: &str, column: &str, value: &str) -> Result<Vec<Record>> {
        let Some(index) = self.resolve(table_name, column)? else {
            return Ok(Vec::new());
        };
        let Some(content) = self.read(table_name)? else {
            return Ok(Vec::new());
        };
        let value = record::unquote(value.as_bytes());

        let rows: Vec<Record> = record::lines(&content)
            .into_iter()
            .filter_map(|line| match Line::classify(line) {
                Line::Live(line) => Some(record::split_fields(line)),
                _ => None,
            })
            .filter(|fields| record::field_matches(fields, index, value))
            .map(|fields| record::decode(&fields))
            .collect();
        debug!(table = table_name, column, rows = rows.len(), "filtered scan");
        Ok(rows)
    }

    /// Tombstones every live record whose `column` field equals `value`,
    /// returning the number of newly deleted records.
    ///
    /// Deleted lines keep their original bytes behind the marker. Existing
    /// tombstones and blank lines are copied through unchanged.
    pub fn delete_where(&self, table_name: &str, column: &str, value: &str) -> Result<usize> {
        let Some(content) = self.read(table_name)? else {
            return Ok(0);
        };
        let Some(index) = self.resolve(table_name, column)? else {
            return Ok(0);
        };

        let mut count = 0;
        let mut lines = Vec::new();
        for line in record::lines(&content) {
            match Line::classify(line) {
                Line::Live(live)
                    if record::field_matches(&record::split_fields(live), index, value.as_bytes()) =>
                {
                    lines.push(record::tombstone(live));
                    count += 1;
                }
                _ => lines.push(line.to_vec()),
            }
        }

        self.rewrite(table_name, &lines)?;
        debug!(table = table_name, column, count, "deleted records");
        Ok(count)
    }

    /// Sets `set_column` to `set_value` on every live record whose
    /// `where_column` field equals `where_value`, returning the number of
    /// matching records.
    ///
    /// A matching record too short to hold `set_column` is left as is but
    /// still counted. Every live record is re-joined from its fields, so a
    /// trailing delimiter is dropped from records that were not touched.
    pub fn update_where(
        &self,
        table_name: &str,
        set_column: &str,
        set_value: &str,
        where_column: &str,
        where_value: &str,
    ) -> Result<usize> {
        let Some(set_index) = self.resolve(table_name, set_column)? else {
            return Ok(0);
        };
        let Some(where_index) = self.resolve(table_name, where_column)? else {
            return Ok(0);
        };
        let Some(content) = self.read(table_name)? else {
            return Ok(0);
        };

        let mut count = 0;
        let mut lines = Vec::new();
        for line in record::lines(&content) {
            match Line::classify(line) {
                Line::Live(live) => {
                    let mut fields = record::split_fields(live);
                    if record::field_matches(&fields, where_index, where_value.as_bytes()) {
                        if let Some(field) = fields.get_mut(set_index) {
                            *field = set_value.as_bytes();
                        }
                        count += 1;
                    }
                    lines.push(record::join_fields(&fields));
                }
                _ => lines.push(line.to_vec()),
            }
        }

        self.rewrite(table_name, &lines)?;
        debug!(table = table_name, column = set_column, count, "updated records");
        Ok(count)
    }

    /// Resolves a column name to its record position
    fn resolve(&self, table_name: &str, column: &str) -> Result<Option<usize>> {
        let columns = self.catalog.resolve_columns(table_name)?;
        Ok(column_index(&columns, column))
    }

    /// Reads the whole table file, None if the table has no record file
    fn read(&self, table_name: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.catalog.layout().table_path(table_name)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Replaces the table file with `lines`, each terminated by a newline
    fn rewrite(&self, table_name: &str, lines: &[Vec<u8>]) -> Result<()> {
        let layout = self.catalog.layout();
        let path = layout.table_path(table_name);

        let mut content = Vec::new();
        for line in lines {
            content.extend_from_slice(line);
            content.push(b'\n');
        }

        let result = match self.rewrite {
            RewriteMode::Atomic => replace_atomically(&layout.data_dir(), &path, &content),
            RewriteMode::InPlace => fs::write(&path, content).map_err(Into::into),
        };
        result.inspect_err(|err| warn!(table = table_name, %err, "table rewrite failed"))
    }
}

fn replace_atomically(dir: &Path, path: &Path, content: &[u8]) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
