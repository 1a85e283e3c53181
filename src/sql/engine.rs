use tracing::debug;

use crate::{
    error::Result,
    sql::{
        executor::{Executor, ResultSet},
        parser::Parser,
    },
    storage::TableStore,
};

/// Command session over one storage root
///
/// Each call parses a single statement and runs it to completion before
/// returning.
pub struct Session {
    store: TableStore,
}

impl Session {
    pub fn new(store: TableStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// Executes one statement
    pub fn execute(&self, sql: &str) -> Result<ResultSet> {
        let stmt = Parser::new(sql).parse()?;
        debug!(?stmt, "executing statement");
        <dyn Executor>::build(stmt).execute(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::{TempDir, tempdir};

    use super::Session;
    use crate::{
        error::{Error, Result},
        sql::{executor::ResultSet, parser::ast::Condition},
        storage::{Catalog, Layout, TableStore},
    };

    fn session() -> Result<(TempDir, Session)> {
        let dir = tempdir()?;
        let store = TableStore::new(Catalog::new(Layout::new(dir.path())));
        Ok((dir, Session::new(store)))
    }

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_session_users() -> Result<()> {
        let (_dir, s) = session()?;

        assert_eq!(
            s.execute("create table Users (id int, name varchar);")?,
            ResultSet::CreateTable {
                table_name: "Users".to_string(),
                columns: 2
            }
        );
        s.execute("insert into Users values (1, 'alice');")?;
        s.execute("insert into Users values (2, 'bob');")?;

        assert_eq!(
            s.execute("select * from Users where name = 'bob';")?,
            ResultSet::Scan {
                table_name: "Users".to_string(),
                filter: Some(Condition::new("name", "bob")),
                columns: row(&["id", "name"]),
                rows: vec![row(&["2", "bob"])],
            }
        );

        assert_eq!(
            s.execute("delete from Users where id = 1;")?,
            ResultSet::Delete {
                table_name: "Users".to_string(),
                filter: Condition::new("id", "1"),
                count: 1,
            }
        );
        assert_eq!(
            s.execute("update Users set name = 'carol' where id = 2;")?,
            ResultSet::Update {
                table_name: "Users".to_string(),
                filter: Condition::new("id", "2"),
                count: 1,
            }
        );

        match s.execute("select * from Users")? {
            ResultSet::Scan { rows, .. } => assert_eq!(rows, vec![row(&["2", "carol"])]),
            other => panic!("unexpected result {:?}", other),
        }

        assert_eq!(
            s.execute("drop table Users")?,
            ResultSet::DropTable {
                table_name: "Users".to_string(),
                dropped: true
            }
        );
        assert_eq!(
            s.execute("drop table Users")?.to_string(),
            "Failed to drop table 'Users'. Please check if the table exists."
        );
        Ok(())
    }

    #[test]
    fn test_session_missing_table_and_column() -> Result<()> {
        let (_dir, s) = session()?;
        assert_eq!(
            s.execute("select * from Ghost")?.to_string(),
            "No records found in table 'Ghost'."
        );
        assert_eq!(
            s.execute("delete from Ghost where id = 1")?.to_string(),
            "No records found in table 'Ghost' where id = 1 to delete."
        );

        s.execute("create table t (id int)")?;
        s.execute("insert into t values (1)")?;
        assert_eq!(
            s.execute("update t set nope = 2 where id = 1")?.to_string(),
            "No records updated in table 't' where id = 1."
        );
        Ok(())
    }

    #[test]
    fn test_session_update_without_where_is_rejected() -> Result<()> {
        let (dir, s) = session()?;
        s.execute("create table t (id int, n text)")?;
        s.execute("insert into t values (1, 'a')")?;
        s.execute("insert into t values (2, 'b')")?;
        let before = fs::read(dir.path().join("data").join("t.tbl"))?;

        assert!(matches!(s.execute("update t set n = 'z'"), Err(Error::Parse(_))));
        assert_eq!(
            s.store().scan_all("t")?,
            vec![row(&["1", "a"]), row(&["2", "b"])]
        );
        assert_eq!(fs::read(dir.path().join("data").join("t.tbl"))?, before);
        Ok(())
    }

    #[test]
    fn test_session_export() -> Result<()> {
        let (dir, s) = session()?;
        s.execute("create table t (id int, note text)")?;
        s.execute("insert into t values (1, 'plain')")?;
        s.execute("insert into t values (2, 'say \"hi\"')")?;
        s.execute("insert into t values (3, 'gone')")?;
        s.execute("delete from t where id = 3")?;

        let path = dir.path().join("t.csv");
        let sql = format!("export table t to '{}'", path.display());
        assert_eq!(
            s.execute(&sql)?,
            ResultSet::Export {
                table_name: "t".to_string(),
                path: path.display().to_string(),
                rows: Some(2),
            }
        );
        assert_eq!(
            fs::read_to_string(&path)?,
            "id,note\n1,plain\n2,\"say \"\"hi\"\"\"\n"
        );

        let missing = format!("export table nope to '{}'", path.display());
        match s.execute(&missing)? {
            ResultSet::Export { rows, .. } => assert_eq!(rows, None),
            other => panic!("unexpected result {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_session_parse_error() -> Result<()> {
        let (_dir, s) = session()?;
        assert!(matches!(s.execute("selec * from t"), Err(Error::Parse(_))));
        Ok(())
    }
}
