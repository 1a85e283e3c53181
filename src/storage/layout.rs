use std::path::{Path, PathBuf};

const METADATA_DIR: &str = "metadata";
const DATA_DIR: &str = "data";

/// On-disk layout under a storage root
///
/// ```text
/// <root>/metadata/<table>.meta   schema file
/// <root>/data/<table>.tbl        record file
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join(METADATA_DIR)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    /// Schema file for a table
    pub fn schema_path(&self, table_name: &str) -> PathBuf {
        self.metadata_dir().join(format!("{}.meta", table_name))
    }

    /// Record file for a table
    pub fn table_path(&self, table_name: &str) -> PathBuf {
        self.data_dir().join(format!("{}.tbl", table_name))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::Layout;

    #[test]
    fn test_paths_derive_from_table_name() {
        let layout = Layout::new("/var/db");
        assert_eq!(layout.schema_path("Users"), Path::new("/var/db/metadata/Users.meta"));
        assert_eq!(layout.table_path("Users"), Path::new("/var/db/data/Users.tbl"));
        assert_eq!(layout.root(), Path::new("/var/db"));
    }
}
