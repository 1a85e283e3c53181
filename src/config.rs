//! Storage configuration
//!
//! ```toml
//! data_dir = "/var/lib/minidb"
//! rewrite = "atomic"      # or "in_place"
//! schema_cache = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    error::Result,
    storage::{Catalog, Layout, RewriteMode, TableStore},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Storage root holding the `metadata/` and `data/` directories
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// How tables are replaced after delete and update
    #[serde(default)]
    pub rewrite: RewriteMode,

    /// Keep loaded schemas in memory
    #[serde(default)]
    pub schema_cache: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            rewrite: RewriteMode::default(),
            schema_cache: false,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Builds the table store described by this configuration
    pub fn open(&self) -> TableStore {
        let layout = Layout::new(&self.data_dir);
        let catalog = if self.schema_cache {
            Catalog::with_cache(layout)
        } else {
            Catalog::new(layout)
        };
        TableStore::new(catalog).with_rewrite_mode(self.rewrite)
    }
}
