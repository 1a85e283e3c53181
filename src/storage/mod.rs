//! Flat-file table storage
//!
//! - `layout`: where schema and record files live under a storage root
//! - `record`: the record line format and tombstone marker
//! - `catalog`: table schemas and column resolution
//! - `table`: record append, scan, delete and update

pub mod catalog;
pub mod layout;
pub mod record;
pub mod table;

pub use catalog::{Catalog, Column, Schema};
pub use layout::Layout;
pub use record::Record;
pub use table::{RewriteMode, TableStore};
