//! In-memory executor that understands the statement forms the generator
//! emits with `$n` placeholders. Tables spring into existence on first
//! insert. Every inserted row draws a serial key from one shared sequence,
//! stored under the `RETURNING` column or `id` when the statement has none.

use rowmap::{
    error::ExecutorError,
    session::{Executor, RowCursor},
    value::Value,
};
use std::collections::{BTreeMap, HashMap};

type Row = BTreeMap<String, Value>;
type Filter = Option<(String, Value)>;

#[derive(Debug, Default)]
pub struct MemoryExecutor {
    tables: HashMap<String, Vec<Row>>,
    next_id: i64,
    pub log: Vec<String>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, Vec::len)
    }

    // (rows inserted, returned key rows)
    fn insert(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> Result<(u64, Vec<Vec<Value>>), ExecutorError> {
        let rest = strip(sql, "INSERT INTO ")?;
        let (body, returning) = match rest.split_once(" RETURNING ") {
            Some((body, column)) => (body, Some(column.trim())),
            None => (rest, None),
        };
        let (table, body) = body.split_once(' ').ok_or_else(|| malformed(sql))?;

        let mut inserted: Vec<Row> = Vec::new();
        if body == "DEFAULT VALUES" {
            inserted.push(Row::new());
        } else {
            let (columns, groups) = body.split_once(" VALUES ").ok_or_else(|| malformed(sql))?;
            let columns: Vec<&str> = unwrap_parens(columns).split(", ").collect();

            for group in unwrap_parens(groups).split("), (") {
                let values = group
                    .split(", ")
                    .map(|token| bind(token, args))
                    .collect::<Result<Vec<_>, _>>()?;
                if values.len() != columns.len() {
                    return Err(malformed(sql));
                }

                let row = columns
                    .iter()
                    .map(ToString::to_string)
                    .zip(values)
                    .collect();
                inserted.push(row);
            }
        }

        let count = inserted.len() as u64;
        let mut returned = Vec::new();
        for mut row in inserted {
            self.next_id += 1;
            let key = Value::Int(self.next_id);
            row.entry(returning.unwrap_or("id").to_string())
                .or_insert_with(|| key.clone());
            if returning.is_some() {
                returned.push(vec![key]);
            }
            self.tables.entry(table.to_string()).or_default().push(row);
        }

        Ok((count, returned))
    }

    fn select(&self, sql: &str, args: &[Value]) -> Result<Vec<Vec<Value>>, ExecutorError> {
        let rest = strip(sql, "SELECT ")?;
        let (columns, rest) = rest.split_once(" FROM ").ok_or_else(|| malformed(sql))?;
        let (table, filter) = split_where(rest, args)?;

        let rows = self
            .tables
            .get(table)
            .into_iter()
            .flatten()
            .filter(|row| matches(row, &filter))
            .map(|row| {
                columns
                    .split(", ")
                    .map(|c| row.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(rows)
    }

    fn update(&mut self, sql: &str, args: &[Value]) -> Result<u64, ExecutorError> {
        let rest = strip(sql, "UPDATE ")?;
        let (table, rest) = rest.split_once(" SET ").ok_or_else(|| malformed(sql))?;
        let (assignments, predicate) = rest.split_once(" WHERE ").ok_or_else(|| malformed(sql))?;
        let filter = parse_filter(predicate, args)?;

        let assignments = assignments
            .split(", ")
            .map(|pair| {
                let (column, token) = pair.split_once(" = ").ok_or_else(|| malformed(sql))?;
                Ok((column.to_string(), bind(token, args)?))
            })
            .collect::<Result<Vec<_>, ExecutorError>>()?;

        let mut touched = 0;
        for row in self.tables.get_mut(table).into_iter().flatten() {
            if matches(row, &filter) {
                row.extend(assignments.iter().cloned());
                touched += 1;
            }
        }

        Ok(touched)
    }

    fn delete(&mut self, sql: &str, args: &[Value]) -> Result<u64, ExecutorError> {
        let rest = strip(sql, "DELETE FROM ")?;
        let (table, filter) = split_where(rest, args)?;

        let Some(rows) = self.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !matches(row, &filter));

        Ok((before - rows.len()) as u64)
    }
}

impl Executor for MemoryExecutor {
    type Cursor<'c>
        = RowCursor
    where
        Self: 'c;

    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<u64, ExecutorError> {
        self.log.push(sql.to_string());

        if sql.starts_with("INSERT ") {
            Ok(self.insert(sql, args)?.0)
        } else if sql.starts_with("UPDATE ") {
            self.update(sql, args)
        } else if sql.starts_with("DELETE ") {
            self.delete(sql, args)
        } else {
            Err(ExecutorError::driver(format!("unsupported statement: {sql}")))
        }
    }

    fn query(&mut self, sql: &str, args: &[Value]) -> Result<RowCursor, ExecutorError> {
        self.log.push(sql.to_string());

        let rows = if sql.starts_with("INSERT ") {
            self.insert(sql, args)?.1
        } else {
            self.select(sql, args)?
        };

        Ok(RowCursor::new(rows))
    }
}

fn malformed(sql: &str) -> ExecutorError {
    ExecutorError::driver(format!("cannot parse: {sql}"))
}

fn strip<'s>(sql: &'s str, prefix: &str) -> Result<&'s str, ExecutorError> {
    sql.strip_prefix(prefix).ok_or_else(|| malformed(sql))
}

fn unwrap_parens(s: &str) -> &str {
    s.trim().trim_start_matches('(').trim_end_matches(')')
}

fn bind(token: &str, args: &[Value]) -> Result<Value, ExecutorError> {
    token
        .trim()
        .strip_prefix('$')
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|n| args.get(n.checked_sub(1)?))
        .cloned()
        .ok_or_else(|| ExecutorError::driver(format!("unbound placeholder {token}")))
}

// `table [WHERE column = $n]`
fn split_where<'s>(rest: &'s str, args: &[Value]) -> Result<(&'s str, Filter), ExecutorError> {
    match rest.split_once(" WHERE ") {
        Some((table, predicate)) => Ok((table.trim(), parse_filter(predicate, args)?)),
        None => Ok((rest.trim(), None)),
    }
}

// `column = $n`
fn parse_filter(predicate: &str, args: &[Value]) -> Result<Filter, ExecutorError> {
    let (column, token) = predicate
        .split_once(" = ")
        .ok_or_else(|| malformed(predicate))?;

    Ok(Some((column.trim().to_string(), bind(token, args)?)))
}

fn matches(row: &Row, filter: &Filter) -> bool {
    filter
        .as_ref()
        .is_none_or(|(column, value)| row.get(column) == Some(value))
}
