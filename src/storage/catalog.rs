use std::{cell::RefCell, collections::HashMap, fs, io::ErrorKind, path::Path};

use tracing::debug;

use crate::{error::Result, storage::layout::Layout};

const TABLE_HEADER: &str = "Table:";
const COLUMNS_MARKER: &str = "Columns:";

/// Column schema definition
///
/// The declared type is free-form text. It is persisted and shown back to
/// the user but never used to validate or coerce field values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub datatype: String,
}

impl Column {
    pub fn new(name: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datatype: datatype.into(),
        }
    }
}

/// Table schema definition
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Schema {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Renders the schema file
    fn encode(&self) -> String {
        let mut out = format!("{} {}\n{}\n", TABLE_HEADER, self.name, COLUMNS_MARKER);
        for column in &self.columns {
            if column.datatype.is_empty() {
                out.push_str(&format!("{}\n", column.name));
            } else {
                out.push_str(&format!("{} {}\n", column.name, column.datatype));
            }
        }
        out
    }

    /// Parses a schema file. Lines before the column marker are ignored; the
    /// column block ends at the first empty line or at end of file. Each
    /// column line holds the name as its first whitespace-delimited token and
    /// the declared type as the second.
    fn decode(name: &str, content: &str) -> Self {
        let mut lines = content.lines();
        for line in lines.by_ref() {
            if line.contains(COLUMNS_MARKER) {
                break;
            }
        }

        let columns = lines
            .take_while(|line| !line.is_empty())
            .map(|line| {
                let mut tokens = line.split_whitespace();
                Column {
                    name: tokens.next().unwrap_or_default().to_string(),
                    datatype: tokens.next().unwrap_or_default().to_string(),
                }
            })
            .collect();

        Self {
            name: name.to_string(),
            columns,
        }
    }
}

/// Returns the first position of `name` in `columns` (exact match)
pub fn column_index<S: AsRef<str>>(columns: &[S], name: &str) -> Option<usize> {
    columns.iter().position(|c| c.as_ref() == name)
}

/// Schema catalog
///
/// Persists one schema file per table and resolves column names to record
/// positions. Schemas are re-read from disk on every lookup unless the
/// read-through cache is enabled.
#[derive(Debug)]
pub struct Catalog {
    layout: Layout,
    cache: Option<RefCell<HashMap<String, Schema>>>,
}

impl Catalog {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            cache: None,
        }
    }

    /// Creates a catalog that keeps loaded schemas in memory until the
    /// table is redefined or removed.
    pub fn with_cache(layout: Layout) -> Self {
        Self {
            layout,
            cache: Some(RefCell::new(HashMap::new())),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Persists a table schema, silently replacing any existing one
    pub fn define(&self, table_name: &str, columns: &[Column]) -> Result<()> {
        fs::create_dir_all(self.layout.metadata_dir())?;

        let schema = Schema {
            name: table_name.to_string(),
            columns: columns.to_vec(),
        };
        fs::write(self.layout.schema_path(table_name), schema.encode())?;
        debug!(table = table_name, columns = columns.len(), "defined table");

        self.invalidate(table_name);
        Ok(())
    }

    /// Deletes the schema file and the record file of a table.
    ///
    /// Returns false only when neither file existed.
    pub fn remove(&self, table_name: &str) -> Result<bool> {
        let schema_removed = remove_if_exists(&self.layout.schema_path(table_name))?;
        let table_removed = remove_if_exists(&self.layout.table_path(table_name))?;
        debug!(
            table = table_name,
            schema_removed, table_removed, "removed table"
        );

        self.invalidate(table_name);
        Ok(schema_removed || table_removed)
    }

    /// Loads a table schema, None if the table has no schema file
    pub fn load(&self, table_name: &str) -> Result<Option<Schema>> {
        if let Some(cache) = &self.cache {
            if let Some(schema) = cache.borrow().get(table_name) {
                return Ok(Some(schema.clone()));
            }
        }

        let content = match fs::read(self.layout.schema_path(table_name)) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let schema = Schema::decode(table_name, &String::from_utf8_lossy(&content));

        if let Some(cache) = &self.cache {
            cache
                .borrow_mut()
                .insert(table_name.to_string(), schema.clone());
        }
        Ok(Some(schema))
    }

    /// Returns the ordered column names of a table.
    ///
    /// A missing schema and a schema without columns both give an empty list.
    pub fn resolve_columns(&self, table_name: &str) -> Result<Vec<String>> {
        Ok(self
            .load(table_name)?
            .map(|schema| schema.column_names())
            .unwrap_or_default())
    }

    fn invalidate(&self, table_name: &str) {
        if let Some(cache) = &self.cache {
            cache.borrow_mut().remove(table_name);
        }
    }
}

fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{Catalog, Column, column_index};
    use crate::{error::Result, storage::layout::Layout};

    fn users() -> Vec<Column> {
        vec![Column::new("id", "int"), Column::new("name", "varchar")]
    }

    #[test]
    fn test_define_writes_schema_file() -> Result<()> {
        let dir = tempdir()?;
        let catalog = Catalog::new(Layout::new(dir.path()));
        catalog.define("Users", &users())?;

        let content = fs::read_to_string(catalog.layout().schema_path("Users"))?;
        assert_eq!(content, "Table: Users\nColumns:\nid int\nname varchar\n");
        assert_eq!(catalog.resolve_columns("Users")?, vec!["id", "name"]);

        let schema = catalog.load("Users")?.expect("schema exists");
        assert_eq!(schema.name, "Users");
        assert_eq!(schema.columns, users());
        Ok(())
    }

    #[test]
    fn test_define_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let catalog = Catalog::new(Layout::new(dir.path()));
        catalog.define("t", &users())?;
        catalog.define("t", &[Column::new("x", "text")])?;
        assert_eq!(catalog.resolve_columns("t")?, vec!["x"]);
        Ok(())
    }

    #[test]
    fn test_define_fails_when_root_is_a_file() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("occupied");
        fs::write(&root, "")?;
        let catalog = Catalog::new(Layout::new(root));
        assert!(catalog.define("t", &users()).is_err());
        Ok(())
    }

    #[test]
    fn test_resolve_missing_table() -> Result<()> {
        let dir = tempdir()?;
        let catalog = Catalog::new(Layout::new(dir.path()));
        assert!(catalog.resolve_columns("nope")?.is_empty());
        assert_eq!(catalog.load("nope")?, None);

        catalog.define("empty", &[])?;
        assert!(catalog.resolve_columns("empty")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_decode_stops_at_blank_line() -> Result<()> {
        let dir = tempdir()?;
        let catalog = Catalog::new(Layout::new(dir.path()));
        fs::create_dir_all(catalog.layout().metadata_dir())?;
        fs::write(
            catalog.layout().schema_path("t"),
            "Table: t\nColumns:\na int extra\nb\n\nc text\n",
        )?;

        let schema = catalog.load("t")?.expect("schema exists");
        assert_eq!(
            schema.columns,
            vec![Column::new("a", "int"), Column::new("b", "")]
        );
        Ok(())
    }

    #[test]
    fn test_load_tolerates_invalid_utf8() -> Result<()> {
        let dir = tempdir()?;
        let catalog = Catalog::new(Layout::new(dir.path()));
        fs::create_dir_all(catalog.layout().metadata_dir())?;
        fs::write(
            catalog.layout().schema_path("t"),
            b"Table: t\nColumns:\nid int\nnote t\xffxt\n",
        )?;

        assert_eq!(catalog.resolve_columns("t")?, vec!["id", "note"]);
        Ok(())
    }

    #[test]
    fn test_remove() -> Result<()> {
        let dir = tempdir()?;
        let catalog = Catalog::new(Layout::new(dir.path()));
        assert!(!catalog.remove("t")?);

        catalog.define("t", &users())?;
        assert!(catalog.remove("t")?);
        assert!(!catalog.layout().schema_path("t").exists());
        assert!(!catalog.remove("t")?);

        // a record file without a schema still counts as something removed
        fs::create_dir_all(catalog.layout().data_dir())?;
        fs::write(catalog.layout().table_path("t"), "1,a\n")?;
        assert!(catalog.remove("t")?);
        assert!(!catalog.layout().table_path("t").exists());
        Ok(())
    }

    #[test]
    fn test_cache_is_invalidated() -> Result<()> {
        let dir = tempdir()?;
        let catalog = Catalog::with_cache(Layout::new(dir.path()));
        catalog.define("t", &users())?;
        assert_eq!(catalog.resolve_columns("t")?, vec!["id", "name"]);

        // served from memory while the table is unchanged
        fs::write(catalog.layout().schema_path("t"), "Table: t\nColumns:\nz\n")?;
        assert_eq!(catalog.resolve_columns("t")?, vec!["id", "name"]);

        catalog.define("t", &[Column::new("y", "int")])?;
        assert_eq!(catalog.resolve_columns("t")?, vec!["y"]);

        catalog.remove("t")?;
        assert!(catalog.resolve_columns("t")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_column_index_first_match() {
        let columns = vec!["id", "name", "id"];
        assert_eq!(column_index(&columns, "id"), Some(0));
        assert_eq!(column_index(&columns, "name"), Some(1));
        assert_eq!(column_index(&columns, "Name"), None);
    }
}
