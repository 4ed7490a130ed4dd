//! CRUD orchestration: describe the record type, generate the statement,
//! run it through the caller's executor, and scan results back.

mod collect;
mod executor;


pub use collect::{collect_rows, collect_scalars};
pub use executor::{Cursor, Executor, RowCursor};

use crate::{
    config::SessionConfig,
    error::{Error, ScanError},
    extract::{assign_at, scan_row},
    model::TypeDescriptor,
    obs::{
        ExecKind, MetricsEvent, MetricsSink,
        sink::{self, Span},
    },
    query::{InsertStatement, SqlGenerator, Statement},
    registry::{CacheOutcome, Registry},
    traits::{FieldAccess, Record},
    value::Value,
};
use std::sync::Arc;

// metrics label for caller SQL not tied to a record type
const RAW_TABLE: &str = "<raw>";

///
/// InsertPhase
///
/// Progress of one insert. Without a primary key:
/// `Built → Executed → Completed`. With one:
/// `Built → ExecutedReturning → Scanned → Completed`. Any failure ends in
/// `Failed` and leaves the record untouched.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InsertPhase {
    Built,
    Executed,
    ExecutedReturning,
    Scanned,
    Completed,
    Failed,
}

///
/// Session
///
/// Borrowing handle over one executor. Sessions are cheap; build one per
/// unit of work.
///

pub struct Session<'a, X: Executor> {
    executor: &'a mut X,
    registry: &'a Registry,
    config: SessionConfig,
    metrics: Option<&'a dyn MetricsSink>,
    last_insert: Option<InsertPhase>,
}

impl<'a, X: Executor> Session<'a, X> {
    /// Session over `executor` using the process-wide registry.
    pub fn new(executor: &'a mut X) -> Self {
        Self {
            executor,
            registry: Registry::global(),
            config: SessionConfig::default(),
            metrics: None,
            last_insert: None,
        }
    }

    #[must_use]
    pub const fn with_registry(mut self, registry: &'a Registry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub const fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Print every generated statement with a `[debug]` prefix.
    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.config.debug = true;
        self
    }

    /// Route metrics events to `sink` instead of the global counters.
    #[must_use]
    pub const fn metrics_sink(mut self, sink: &'a dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Final phase of the most recent insert, `None` when it failed before
    /// reaching the executor.
    #[must_use]
    pub const fn last_insert_phase(&self) -> Option<InsertPhase> {
        self.last_insert
    }

    #[must_use]
    pub const fn generator(&self) -> SqlGenerator {
        SqlGenerator::new(self.config.placeholder)
    }

    /// Descriptor for `T` through this session's registry.
    pub fn describe<T: Record>(&self) -> Result<Arc<TypeDescriptor>, Error> {
        let (desc, outcome) = self.registry.describe_traced::<T>()?;
        let event = match outcome {
            CacheOutcome::Hit => MetricsEvent::CacheHit { table: &desc.table },
            CacheOutcome::Miss => MetricsEvent::CacheMiss { table: &desc.table },
        };
        sink::record(self.metrics, event);

        Ok(desc)
    }

    fn debug_log(&self, s: impl AsRef<str>) {
        if self.config.debug {
            println!("[debug] {}", s.as_ref());
        }
    }

    // ─────────────────────────────────────────────
    // Caller SQL
    // ─────────────────────────────────────────────

    /// Run a statement that returns no rows.
    pub fn exec(&mut self, sql: &str, args: &[Value]) -> Result<u64, Error> {
        let stmt = Statement::new(sql, args.to_vec());

        self.run_execute(ExecKind::Raw, RAW_TABLE, &stmt)
    }

    /// Run caller SQL whose select list matches `T`'s columns and scan
    /// every row. An empty result is an empty vector.
    pub fn query<T: Record + Default>(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> Result<Vec<T>, Error> {
        let desc = self.describe::<T>()?;
        let stmt = Statement::new(sql, args.to_vec());

        self.fetch_all(&desc, ExecKind::Raw, &stmt)
    }

    /// Run caller SQL and scan its first row into `record`.
    pub fn query_row<T: Record>(
        &mut self,
        record: &mut T,
        sql: &str,
        args: &[Value],
    ) -> Result<(), Error> {
        let desc = self.describe::<T>()?;
        let stmt = Statement::new(sql, args.to_vec());

        self.fetch_one(&desc, ExecKind::Raw, &stmt, record)
    }

    // ─────────────────────────────────────────────
    // Select
    // ─────────────────────────────────────────────

    /// `SELECT <columns> FROM <table> <suffix>`; zero rows is not-found.
    pub fn select_many<T: Record + Default>(
        &mut self,
        suffix: &str,
        args: &[Value],
    ) -> Result<Vec<T>, Error> {
        let desc = self.describe::<T>()?;
        let stmt = self.generator().select(&desc, suffix, args.to_vec());

        let items = self.fetch_all(&desc, ExecKind::Select, &stmt)?;
        if items.is_empty() {
            return Err(Error::NotFound);
        }

        Ok(items)
    }

    /// Every row of `T`'s table.
    pub fn all<T: Record + Default>(&mut self) -> Result<Vec<T>, Error> {
        self.select_many("", &[])
    }

    /// First row matching `suffix`, scanned into `record`.
    pub fn select_one<T: Record>(
        &mut self,
        record: &mut T,
        suffix: &str,
        args: &[Value],
    ) -> Result<(), Error> {
        let desc = self.describe::<T>()?;
        let stmt = self.generator().select(&desc, suffix, args.to_vec());

        self.fetch_one(&desc, ExecKind::Select, &stmt, record)
    }

    /// First row of `T`'s table.
    pub fn first<T: Record>(&mut self, record: &mut T) -> Result<(), Error> {
        self.select_one(record, "", &[])
    }

    /// Reload `record` by its current primary-key value.
    pub fn get_by_id<T: Record>(&mut self, record: &mut T) -> Result<(), Error> {
        let desc = self.describe::<T>()?;
        let stmt = self.generator().select_by_id(&desc, &*record)?;

        self.fetch_one(&desc, ExecKind::Select, &stmt, record)
    }

    // ─────────────────────────────────────────────
    // Insert
    // ─────────────────────────────────────────────

    /// Insert `record`, assigning the store-generated primary key back into
    /// it when the table has one.
    pub fn insert<T: Record>(&mut self, record: &mut T) -> Result<(), Error> {
        self.last_insert = None;
        let desc = self.describe::<T>()?;
        let insert = self.generator().insert(&desc, &*record)?;

        let mut phase = InsertPhase::Built;
        let result = self.run_insert(&desc, insert, record, &mut phase);
        let reached = phase;
        phase = if result.is_ok() {
            InsertPhase::Completed
        } else {
            InsertPhase::Failed
        };
        self.last_insert = Some(phase);

        match &result {
            Ok(()) => self.debug_log(format!("insert into {}: {phase:?}", desc.table)),
            Err(err) => self.debug_log(format!(
                "insert into {}: {phase:?} after {reached:?}: {err}",
                desc.table
            )),
        }

        result
    }

    fn run_insert(
        &mut self,
        desc: &TypeDescriptor,
        insert: InsertStatement,
        record: &mut dyn FieldAccess,
        phase: &mut InsertPhase,
    ) -> Result<(), Error> {
        let InsertStatement {
            statement,
            returning,
        } = insert;

        let Some(returning) = returning else {
            self.run_execute(ExecKind::Insert, &desc.table, &statement)?;
            *phase = InsertPhase::Executed;

            return Ok(());
        };

        self.debug_log(format!("{} ({} args)", statement.sql, statement.args.len()));
        let mut span = Span::new(self.metrics, ExecKind::Insert, &desc.table);

        let row = self
            .executor
            .query_row(&statement.sql, &statement.args)?
            .ok_or(Error::NotFound)?;
        *phase = InsertPhase::ExecutedReturning;

        let found = row.len();
        let Ok([id]) = <[Value; 1]>::try_from(row) else {
            return Err(ScanError::Arity { expected: 1, found }.into());
        };

        assign_at(record, &returning.path, &returning.column, id)?;
        *phase = InsertPhase::Scanned;
        span.set_rows(1);

        Ok(())
    }

    /// Insert every record in one multi-row statement. Generated identities
    /// are not read back; returns the affected row count.
    pub fn insert_many<T: Record>(&mut self, records: &[T]) -> Result<u64, Error> {
        if records.is_empty() {
            return Ok(0);
        }

        let desc = self.describe::<T>()?;
        let stmt = self
            .generator()
            .insert_many(&desc, records.iter().map(|r| r as &dyn FieldAccess))?;

        self.run_execute(ExecKind::Insert, &desc.table, &stmt)
    }

    // ─────────────────────────────────────────────
    // Update
    // ─────────────────────────────────────────────

    /// `UPDATE <table> SET ... <predicate>`; `args` bind the predicate.
    pub fn update<T: Record>(
        &mut self,
        record: &T,
        predicate: &str,
        args: &[Value],
    ) -> Result<u64, Error> {
        let desc = self.describe::<T>()?;
        let stmt = self
            .generator()
            .update(&desc, record, predicate, args.to_vec())?;

        self.run_execute(ExecKind::Update, &desc.table, &stmt)
    }

    /// Update the row identified by `record`'s primary key.
    pub fn update_by_id<T: Record>(&mut self, record: &T) -> Result<u64, Error> {
        let desc = self.describe::<T>()?;
        let stmt = self.generator().update_by_id(&desc, record)?;

        self.run_execute(ExecKind::Update, &desc.table, &stmt)
    }

    /// Update the rows whose `column` equals `record`'s current value of it.
    pub fn update_by_column<T: Record>(&mut self, record: &T, column: &str) -> Result<u64, Error> {
        let desc = self.describe::<T>()?;
        let stmt = self.generator().update_by_column(&desc, record, column)?;

        self.run_execute(ExecKind::Update, &desc.table, &stmt)
    }

    // ─────────────────────────────────────────────
    // Delete
    // ─────────────────────────────────────────────

    /// `DELETE FROM <T's table> <predicate>`
    pub fn delete<T: Record>(&mut self, predicate: &str, args: &[Value]) -> Result<u64, Error> {
        let desc = self.describe::<T>()?;
        let stmt = self.generator().delete(&desc, predicate, args.to_vec());

        self.run_execute(ExecKind::Delete, &desc.table, &stmt)
    }

    /// Delete the row identified by `record`'s primary key.
    pub fn delete_by_id<T: Record>(&mut self, record: &T) -> Result<u64, Error> {
        let desc = self.describe::<T>()?;
        let stmt = self.generator().delete_by_id(&desc, record)?;

        self.run_execute(ExecKind::Delete, &desc.table, &stmt)
    }

    // ─────────────────────────────────────────────
    // Execution
    // ─────────────────────────────────────────────

    fn run_execute(&mut self, kind: ExecKind, table: &str, stmt: &Statement) -> Result<u64, Error> {
        self.debug_log(format!("{} ({} args)", stmt.sql, stmt.args.len()));
        let mut span = Span::new(self.metrics, kind, table);

        let affected = self.executor.execute(&stmt.sql, &stmt.args)?;
        span.set_rows(affected);

        Ok(affected)
    }

    fn fetch_all<T: Record + Default>(
        &mut self,
        desc: &TypeDescriptor,
        kind: ExecKind,
        stmt: &Statement,
    ) -> Result<Vec<T>, Error> {
        self.debug_log(format!("{} ({} args)", stmt.sql, stmt.args.len()));
        let mut span = Span::new(self.metrics, kind, &desc.table);

        let cursor = self.executor.query(&stmt.sql, &stmt.args)?;
        let items = collect::scan_all(desc, cursor)?;
        span.set_rows(items.len() as u64);

        Ok(items)
    }

    fn fetch_one(
        &mut self,
        desc: &TypeDescriptor,
        kind: ExecKind,
        stmt: &Statement,
        record: &mut dyn FieldAccess,
    ) -> Result<(), Error> {
        self.debug_log(format!("{} ({} args)", stmt.sql, stmt.args.len()));
        let mut span = Span::new(self.metrics, kind, &desc.table);

        let row = self
            .executor
            .query_row(&stmt.sql, &stmt.args)?
            .ok_or(Error::NotFound)?;
        scan_row(desc, record, row)?;
        span.set_rows(1);

        Ok(())
    }
}
