//! # SQLite Table Repository
//!
//! `SqliteRepository<T>` maps one `Record` type onto one SQLite table named
//! after the type. It owns no connection: every operation opens one through
//! the `Store`, runs a single statement, and drops the connection before
//! returning.
//!
//! ## Operations
//!
//! | Operation | Statement | Failure modes |
//! |-----------|-----------|---------------|
//! | `create_table` | `CREATE TABLE IF NOT EXISTS` | store |
//! | `drop_table` | `DROP TABLE` | store (missing table) |
//! | `delete_all` | `DELETE FROM` | store |
//! | `add` | `INSERT` | invalid argument, integrity |
//! | `get` | `SELECT ... WHERE pk = ?` | parse |
//! | `get_all` | `SELECT ... WHERE f = ? AND ...` | invalid argument, parse |
//! | `update` | `UPDATE ... WHERE pk = ?` | invalid argument, not found, integrity |
//! | `delete` | `DELETE ... WHERE pk = ?` | not found, integrity |
//!
//! ## Existence Checks
//!
//! `update` and `delete` run no separate existence query. The mutating
//! statement is itself conditional on the identity, and an affected-row
//! count of zero reports `NotFound`, so a concurrent delete cannot land
//! between a check and the write.
//!
//! ## Materialisation
//!
//! Rows are read with `SELECT *` and columns are matched to descriptor
//! fields by name using the statement's column metadata. The first column
//! must be `pk`. Columns the descriptor does not declare are ignored.

use std::marker::PhantomData;

use rusqlite::{params_from_iter, types::Value as SqlValue, Connection, Row, Statement};
use tracing::{debug, info, trace};

use super::codec;
use super::statements::Statements;
use super::{Filter, Pk, Record, RecordValues, Repository, RepositoryError, RepositoryResult};
use crate::store::Store;
use crate::types::{RecordDescriptor, PK_COLUMN};

/// Generic CRUD repository over one SQLite table.
pub struct SqliteRepository<T> {
    store: Store,
    descriptor: RecordDescriptor,
    statements: Statements,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for SqliteRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            descriptor: self.descriptor.clone(),
            statements: self.statements.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for SqliteRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRepository")
            .field("path", &self.store.path())
            .field("table", &self.descriptor.table())
            .finish()
    }
}

/// Result-column index of every descriptor field.
struct RowLayout {
    columns: Vec<usize>,
}

impl<T: Record> SqliteRepository<T> {
    /// Creates a repository for `T` using `T::descriptor()`.
    pub fn new(store: Store) -> RepositoryResult<Self> {
        Self::with_descriptor(store, T::descriptor())
    }

    /// Creates a repository with an explicit descriptor.
    pub fn with_descriptor(store: Store, descriptor: RecordDescriptor) -> RepositoryResult<Self> {
        descriptor.validate()?;
        let statements = Statements::new(&descriptor);
        Ok(Self {
            store,
            descriptor,
            statements,
            _record: PhantomData,
        })
    }

    pub fn descriptor(&self) -> &RecordDescriptor {
        &self.descriptor
    }

    pub fn table(&self) -> &str {
        self.descriptor.table()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Creates the backing table if it does not exist yet.
    pub fn create_table(&self) -> RepositoryResult<()> {
        let conn = self.connect()?;
        conn.execute(&self.statements.create_table, [])?;
        debug!(table = self.table(), "table ready");
        Ok(())
    }

    /// Drops the backing table. Fails if the table does not exist.
    pub fn drop_table(&self) -> RepositoryResult<()> {
        let conn = self.connect()?;
        conn.execute(&self.statements.drop_table, [])?;
        info!(table = self.table(), "table dropped");
        Ok(())
    }

    /// Returns true if the backing table exists.
    pub fn table_exists(&self) -> RepositoryResult<bool> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [self.table()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn connect(&self) -> RepositoryResult<Connection> {
        self.store.connect()
    }

    fn encode(&self, record: &T) -> RepositoryResult<Vec<SqlValue>> {
        let values = self.descriptor.conform_values(record.values())?;
        Ok(values.iter().map(codec::to_sql).collect())
    }

    fn layout(&self, stmt: &Statement<'_>) -> RepositoryResult<RowLayout> {
        let names = stmt.column_names();

        match names.first() {
            Some(first) if first.eq_ignore_ascii_case(PK_COLUMN) => {}
            _ => {
                return Err(RepositoryError::MissingColumn {
                    table: self.table().to_string(),
                    column: PK_COLUMN.to_string(),
                })
            }
        }

        let columns = self
            .descriptor
            .fields()
            .iter()
            .map(|field| {
                names
                    .iter()
                    .position(|n| n.eq_ignore_ascii_case(field.name()))
                    .ok_or_else(|| RepositoryError::MissingColumn {
                        table: self.table().to_string(),
                        column: field.name().to_string(),
                    })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(RowLayout { columns })
    }

    fn materialize(&self, row: &Row<'_>, layout: &RowLayout) -> RepositoryResult<T> {
        let pk: Pk = row.get(0)?;
        let values = self
            .descriptor
            .fields()
            .iter()
            .zip(&layout.columns)
            .map(|(field, &column)| codec::from_sql(field, row.get_ref(column)?))
            .collect::<RepositoryResult<Vec<_>>>()?;

        trace!(table = self.table(), pk, "materialized row");
        T::from_values(RecordValues::new(pk, &self.descriptor, values))
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> RepositoryResult<Vec<T>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let layout = self.layout(&stmt)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(self.materialize(row, &layout)?);
        }
        Ok(records)
    }
}

impl<T: Record> Repository<T> for SqliteRepository<T> {
    fn descriptor(&self) -> &RecordDescriptor {
        &self.descriptor
    }

    fn add(&self, record: &mut T) -> RepositoryResult<Pk> {
        match record.pk() {
            None => {
                return Err(RepositoryError::MissingIdentity {
                    table: self.table().to_string(),
                })
            }
            Some(0) => {}
            Some(pk) => {
                return Err(RepositoryError::IdentityAssigned {
                    table: self.table().to_string(),
                    pk,
                })
            }
        }

        let params = self.encode(record)?;
        let conn = self.connect()?;
        conn.execute(&self.statements.insert, params_from_iter(params.iter()))?;
        let pk = conn.last_insert_rowid();
        record.set_pk(pk);

        debug!(table = self.table(), pk, "inserted record");
        Ok(pk)
    }

    fn get(&self, pk: Pk) -> RepositoryResult<Option<T>> {
        let mut found = self.query(&self.statements.select_one, &[SqlValue::Integer(pk)])?;
        Ok(found.pop())
    }

    fn get_all(&self, filter: Option<&Filter>) -> RepositoryResult<Vec<T>> {
        let conditions = match filter {
            Some(f) => f.resolve(&self.descriptor)?,
            None => Vec::new(),
        };
        let sql = self.statements.select_where(&self.descriptor, &conditions);
        let params: Vec<SqlValue> = conditions.iter().map(|(_, v)| codec::to_sql(v)).collect();

        let records = self.query(&sql, &params)?;
        debug!(
            table = self.table(),
            conditions = conditions.len(),
            rows = records.len(),
            "selected records"
        );
        Ok(records)
    }

    fn update(&self, record: &T) -> RepositoryResult<()> {
        let pk = record.pk().ok_or_else(|| RepositoryError::MissingIdentity {
            table: self.table().to_string(),
        })?;

        let mut params = self.encode(record)?;
        params.push(SqlValue::Integer(pk));

        let conn = self.connect()?;
        let changed = conn.execute(&self.statements.update, params_from_iter(params.iter()))?;
        if changed == 0 {
            return Err(RepositoryError::NotFound {
                table: self.table().to_string(),
                pk,
            });
        }

        debug!(table = self.table(), pk, "updated record");
        Ok(())
    }

    fn delete(&self, pk: Pk) -> RepositoryResult<()> {
        let conn = self.connect()?;
        let changed = conn.execute(&self.statements.delete, [pk])?;
        if changed == 0 {
            return Err(RepositoryError::NotFound {
                table: self.table().to_string(),
                pk,
            });
        }

        debug!(table = self.table(), pk, "deleted record");
        Ok(())
    }

    fn delete_all(&self) -> RepositoryResult<()> {
        let conn = self.connect()?;
        let removed = conn.execute(&self.statements.delete_all, [])?;
        debug!(table = self.table(), rows = removed, "deleted all records");
        Ok(())
    }
}
