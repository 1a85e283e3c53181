use crate::{
    error::Result,
    sql::executor::{Executor, ResultSet},
    storage::{Column, TableStore},
};

/// CREATE TABLE executor
///
/// An existing table of the same name gets its schema replaced; its records
/// are kept.
pub struct CreateTable {
    name: String,
    columns: Vec<Column>,
}

impl CreateTable {
    pub fn new(name: String, columns: Vec<Column>) -> Box<Self> {
        Box::new(Self { name, columns })
    }
}

impl Executor for CreateTable {
    fn execute(self: Box<Self>, store: &TableStore) -> Result<ResultSet> {
        store.catalog().define(&self.name, &self.columns)?;
        Ok(ResultSet::CreateTable {
            table_name: self.name,
            columns: self.columns.len(),
        })
    }
}

/// DROP TABLE executor
pub struct DropTable {
    name: String,
}

impl DropTable {
    pub fn new(name: String) -> Box<Self> {
        Box::new(Self { name })
    }
}

impl Executor for DropTable {
    fn execute(self: Box<Self>, store: &TableStore) -> Result<ResultSet> {
        let dropped = store.catalog().remove(&self.name)?;
        Ok(ResultSet::DropTable {
            table_name: self.name,
            dropped,
        })
    }
}
