//! SQL generation for the CRUD operations.
//!
//! Every builder here is pure: it reads a descriptor and, where values are
//! needed, a record instance, and returns the statement text plus the
//! arguments in binding order. Nothing is executed.

mod columns;


pub use columns::Columns;

use crate::{
    config::Placeholder,
    error::Error,
    extract::{value_at, writable_values},
    model::{IndexPath, TypeDescriptor},
    traits::FieldAccess,
    value::Value,
};
use std::fmt;

///
/// Statement
/// SQL text plus its positional arguments.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Statement {
    #[must_use]
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

///
/// InsertStatement
///
/// An INSERT plus, when the table has a primary key, the path of the field
/// that receives the `RETURNING` value.
///

#[derive(Clone, Debug, PartialEq)]
pub struct InsertStatement {
    pub statement: Statement,
    pub returning: Option<Returning>,
}

///
/// Returning
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Returning {
    pub column: String,
    pub path: IndexPath,
}

///
/// SqlGenerator
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SqlGenerator {
    placeholder: Placeholder,
}

impl SqlGenerator {
    #[must_use]
    pub const fn new(placeholder: Placeholder) -> Self {
        Self { placeholder }
    }

    #[must_use]
    pub const fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    /// `SELECT <every column> FROM <table> <suffix>`
    ///
    /// `suffix` is caller SQL (WHERE / ORDER BY / LIMIT ...) and binds `args`.
    #[must_use]
    pub fn select(&self, desc: &TypeDescriptor, suffix: &str, args: Vec<Value>) -> Statement {
        let sql = format!("SELECT {} FROM {}", desc.columns().list(), desc.table);

        Statement::new(with_suffix(sql, suffix), args)
    }

    /// SELECT filtered on the record's current primary-key value.
    pub fn select_by_id(
        &self,
        desc: &TypeDescriptor,
        record: &dyn FieldAccess,
    ) -> Result<Statement, Error> {
        let (pk, path) = desc.primary_key()?;
        let id = value_at(record, &path)?;
        let column = pk.column_name().unwrap_or(pk.name);

        let suffix = format!("WHERE {column} = {}", self.placeholder.render(1));

        Ok(self.select(desc, &suffix, vec![id]))
    }

    /// `INSERT INTO <table> (<writable>) VALUES (...)`, with
    /// `RETURNING <pk>` when the table has a primary key.
    pub fn insert(
        &self,
        desc: &TypeDescriptor,
        record: &dyn FieldAccess,
    ) -> Result<InsertStatement, Error> {
        let columns = desc.writable_columns();
        let args = writable_values(desc, record)?;

        let mut sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", desc.table)
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                desc.table,
                columns.list(),
                columns.value_list(1, self.placeholder)
            )
        };

        let returning = desc.fields.find_primary_key().map(|(pk, path)| Returning {
            column: pk.column_name().unwrap_or(pk.name).to_string(),
            path,
        });
        if let Some(returning) = &returning {
            sql.push_str(" RETURNING ");
            sql.push_str(&returning.column);
        }

        Ok(InsertStatement {
            statement: Statement::new(sql, args),
            returning,
        })
    }

    /// One multi-row INSERT: `VALUES ($1, $2), ($3, $4), ...`.
    ///
    /// Identities are not read back.
    pub fn insert_many<'r>(
        &self,
        desc: &TypeDescriptor,
        records: impl IntoIterator<Item = &'r dyn FieldAccess>,
    ) -> Result<Statement, Error> {
        let columns = desc.writable_columns();
        if columns.is_empty() {
            return Err(Error::invalid_type(format!(
                "table '{}' has no writable columns for a multi-row insert",
                desc.table
            )));
        }

        let mut args = Vec::new();
        let mut rows = Vec::new();
        for record in records {
            rows.push(format!(
                "({})",
                columns.value_list(args.len() + 1, self.placeholder)
            ));
            args.extend(writable_values(desc, record)?);
        }

        if rows.is_empty() {
            return Err(Error::invalid_type(
                "multi-row insert needs at least one record",
            ));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            desc.table,
            columns.list(),
            rows.join(", ")
        );

        Ok(Statement::new(sql, args))
    }

    /// `UPDATE <table> SET c = $k+1, ... <predicate>`
    ///
    /// Predicate arguments come first and number `$1..$k`. With unnumbered
    /// placeholders the order is reversed to match textual order.
    pub fn update(
        &self,
        desc: &TypeDescriptor,
        record: &dyn FieldAccess,
        predicate: &str,
        args: Vec<Value>,
    ) -> Result<Statement, Error> {
        let (columns, values) = writable(desc, record)?;

        let (start, args): (usize, Vec<Value>) = if self.placeholder.is_numbered() {
            let start = args.len() + 1;
            (start, args.into_iter().chain(values).collect())
        } else {
            (1, values.into_iter().chain(args).collect())
        };

        let sql = format!(
            "UPDATE {} SET {}",
            desc.table,
            columns.assignment_list(start, self.placeholder)
        );

        Ok(Statement::new(with_suffix(sql, predicate), args))
    }

    /// UPDATE keyed on the record's current primary-key value.
    pub fn update_by_id(
        &self,
        desc: &TypeDescriptor,
        record: &dyn FieldAccess,
    ) -> Result<Statement, Error> {
        let (pk, path) = desc.primary_key()?;
        let column = pk.column_name().unwrap_or(pk.name);

        self.update_where(desc, record, column, &path)
    }

    /// UPDATE keyed on the current value of `column`.
    pub fn update_by_column(
        &self,
        desc: &TypeDescriptor,
        record: &dyn FieldAccess,
        column: &str,
    ) -> Result<Statement, Error> {
        let (_, path) = desc.field_by_column(column)?;

        self.update_where(desc, record, column, &path)
    }

    fn update_where(
        &self,
        desc: &TypeDescriptor,
        record: &dyn FieldAccess,
        column: &str,
        path: &IndexPath,
    ) -> Result<Statement, Error> {
        let (columns, mut args) = writable(desc, record)?;
        let key = value_at(record, path)?;

        let sql = format!(
            "UPDATE {} SET {} WHERE {column} = {}",
            desc.table,
            columns.assignment_list(1, self.placeholder),
            self.placeholder.render(columns.len() + 1)
        );
        args.push(key);

        Ok(Statement::new(sql, args))
    }

    /// `DELETE FROM <table> <predicate>`
    #[must_use]
    pub fn delete(&self, desc: &TypeDescriptor, predicate: &str, args: Vec<Value>) -> Statement {
        let sql = format!("DELETE FROM {}", desc.table);

        Statement::new(with_suffix(sql, predicate), args)
    }

    /// `DELETE FROM <table> WHERE <pk> = $1`
    pub fn delete_by_id(
        &self,
        desc: &TypeDescriptor,
        record: &dyn FieldAccess,
    ) -> Result<Statement, Error> {
        let (pk, path) = desc.primary_key()?;
        let id = value_at(record, &path)?;
        let column = pk.column_name().unwrap_or(pk.name);

        let sql = format!(
            "DELETE FROM {} WHERE {column} = {}",
            desc.table,
            self.placeholder.render(1)
        );

        Ok(Statement::new(sql, vec![id]))
    }
}

// writable columns and values; an UPDATE with nothing to SET is rejected
fn writable(
    desc: &TypeDescriptor,
    record: &dyn FieldAccess,
) -> Result<(Columns, Vec<Value>), Error> {
    let columns = desc.writable_columns();
    if columns.is_empty() {
        return Err(Error::FieldNotFound(format!(
            "table '{}' has no writable columns",
            desc.table
        )));
    }

    Ok((columns, writable_values(desc, record)?))
}

fn with_suffix(mut sql: String, suffix: &str) -> String {
    let suffix = suffix.trim();
    if !suffix.is_empty() {
        sql.push(' ');
        sql.push_str(suffix);
    }

    sql
}
