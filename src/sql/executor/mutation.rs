use crate::{
    error::Result,
    sql::{
        executor::{Executor, ResultSet},
        parser::ast::Condition,
    },
    storage::TableStore,
};

/// INSERT executor
pub struct Insert {
    table_name: String,
    values: Vec<String>,
}

impl Insert {
    pub fn new(table_name: String, values: Vec<String>) -> Box<Self> {
        Box::new(Self { table_name, values })
    }
}

impl Executor for Insert {
    fn execute(self: Box<Self>, store: &TableStore) -> Result<ResultSet> {
        store.append(&self.table_name, &self.values)?;
        Ok(ResultSet::Insert {
            table_name: self.table_name,
            values: self.values.len(),
        })
    }
}

/// UPDATE executor
pub struct Update {
    table_name: String,
    column: String,
    value: String,
    filter: Condition,
}

impl Update {
    pub fn new(table_name: String, column: String, value: String, filter: Condition) -> Box<Self> {
        Box::new(Self {
            table_name,
            column,
            value,
            filter,
        })
    }
}

impl Executor for Update {
    fn execute(self: Box<Self>, store: &TableStore) -> Result<ResultSet> {
        let count = store.update_where(
            &self.table_name,
            &self.column,
            &self.value,
            &self.filter.column,
            &self.filter.value,
        )?;
        Ok(ResultSet::Update {
            table_name: self.table_name,
            filter: self.filter,
            count,
        })
    }
}

/// DELETE executor
pub struct Delete {
    table_name: String,
    filter: Condition,
}

impl Delete {
    pub fn new(table_name: String, filter: Condition) -> Box<Self> {
        Box::new(Self { table_name, filter })
    }
}

impl Executor for Delete {
    fn execute(self: Box<Self>, store: &TableStore) -> Result<ResultSet> {
        let count = store.delete_where(&self.table_name, &self.filter.column, &self.filter.value)?;
        Ok(ResultSet::Delete {
            table_name: self.table_name,
            filter: self.filter,
            count,
        })
    }
}
