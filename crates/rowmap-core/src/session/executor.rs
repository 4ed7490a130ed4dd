use crate::{error::ExecutorError, value::Value};
use std::collections::VecDeque;

///
/// Cursor
/// Forward-only row stream returned by a query.
///

pub trait Cursor {
    /// Next row, or `None` once the result set is exhausted.
    fn next_row(&mut self) -> Result<Option<Vec<Value>>, ExecutorError>;
}

///
/// Executor
///
/// The database connection as seen by a session. Arguments bind
/// positionally; row values arrive in select-list order.
///

pub trait Executor {
    type Cursor<'c>: Cursor
    where
        Self: 'c;

    /// Run a statement that returns no rows; yields the affected row count.
    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<u64, ExecutorError>;

    fn query(&mut self, sql: &str, args: &[Value]) -> Result<Self::Cursor<'_>, ExecutorError>;

    /// First row of a query, if any.
    fn query_row(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> Result<Option<Vec<Value>>, ExecutorError> {
        self.query(sql, args)?.next_row()
    }
}

///
/// RowCursor
/// Cursor over rows already materialized in memory.
///

#[derive(Clone, Debug, Default)]
pub struct RowCursor {
    rows: VecDeque<Vec<Value>>,
}

impl RowCursor {
    #[must_use]
    pub fn new(rows: Vec<Vec<Value>>) -> Self {
        Self { rows: rows.into() }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl From<Vec<Vec<Value>>> for RowCursor {
    fn from(rows: Vec<Vec<Value>>) -> Self {
        Self::new(rows)
    }
}

impl Cursor for RowCursor {
    fn next_row(&mut self) -> Result<Option<Vec<Value>>, ExecutorError> {
        Ok(self.rows.pop_front())
    }
}
