//! Hand-registered records and a scripted executor for core tests.

use crate::{
    error::ExecutorError,
    session::{Cursor, Executor},
    value::Value,
};
use std::collections::VecDeque;

///
/// Macro
///
/// Declares a plain struct plus the `Record`, `Introspect` and `FieldAccess`
/// impls `#[derive(Record)]` would emit. Field kinds:
///
/// - `col name: Ty` / `col name: Ty => "tag"`: mapped leaf
/// - `embed name: Ty`: nested record
/// - `skip name: Ty`: declared but never mapped
///

#[macro_export]
macro_rules! test_record {
    (
        $(#[$meta:meta])*
        struct $name:ident $(in $table:literal)? {
            $( $kind:ident $field:ident : $ty:ty $(=> $tag:literal)? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub(crate) struct $name {
            $( pub(crate) $field: $ty, )*
        }

        impl $crate::traits::Record for $name {
            fn shape() -> &'static $crate::model::RecordShape {
                static SHAPE: $crate::model::RecordShape = $crate::model::RecordShape {
                    type_name: stringify!($name),
                    type_id: ::std::any::TypeId::of::<$name>,
                    table: $crate::test_record!(@table $($table)?),
                    fields: &[
                        $( $crate::test_record!(@declare $kind $field $ty $(, $tag)?) ),*
                    ],
                };

                &SHAPE
            }
        }

        impl $crate::traits::Introspect for $name {
            fn resolve() -> $crate::traits::Resolved {
                $crate::traits::Resolved::Composite(
                    <Self as $crate::traits::Record>::shape(),
                )
            }
        }

        impl $crate::traits::FieldAccess for $name {
            fn fields(&self) -> Vec<$crate::traits::FieldRef<'_>> {
                vec![ $( $crate::test_record!(@ref $kind &self.$field) ),* ]
            }

            fn fields_mut(&mut self) -> Vec<$crate::traits::FieldMut<'_>> {
                vec![ $( $crate::test_record!(@mut $kind &mut self.$field) ),* ]
            }
        }
    };

    (@table) => { None };
    (@table $table:literal) => { Some($table) };

    (@declare col $field:ident $ty:ty) => {
        $crate::model::DeclaredField::column(stringify!($field), None)
    };
    (@declare col $field:ident $ty:ty, $tag:literal) => {
        $crate::model::DeclaredField::column(stringify!($field), Some($tag))
    };
    (@declare embed $field:ident $ty:ty) => {
        $crate::model::DeclaredField::embedded(
            stringify!($field),
            <$ty as $crate::traits::Introspect>::resolve,
        )
    };
    (@declare skip $field:ident $ty:ty) => {
        $crate::model::DeclaredField::excluded(stringify!($field))
    };

    (@ref col $e:expr) => { $crate::traits::FieldRef::Column($e) };
    (@ref embed $e:expr) => { $crate::traits::FieldRef::Embedded($e) };
    (@ref skip $e:expr) => { $crate::traits::FieldRef::Excluded };

    (@mut col $e:expr) => { $crate::traits::FieldMut::Column($e) };
    (@mut embed $e:expr) => { $crate::traits::FieldMut::Embedded($e) };
    (@mut skip $e:expr) => { $crate::traits::FieldMut::Excluded };
}

///
/// MockExecutor
///
/// Records every statement it is handed and replays scripted result sets,
/// one per `query` / `query_row` call, in order.
///

#[derive(Debug, Default)]
pub(crate) struct MockExecutor {
    pub(crate) statements: Vec<(String, Vec<Value>)>,
    results: VecDeque<Vec<Result<Vec<Value>, String>>>,
    affected: u64,
    fail: Option<String>,
}

impl MockExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue one result set.
    pub(crate) fn with_rows(mut self, rows: Vec<Vec<Value>>) -> Self {
        self.results.push_back(rows.into_iter().map(Ok).collect());
        self
    }

    /// Queue one result set whose cursor fails after yielding `rows`.
    pub(crate) fn with_rows_then_error(mut self, rows: Vec<Vec<Value>>, message: &str) -> Self {
        let mut set: Vec<_> = rows.into_iter().map(Ok).collect();
        set.push(Err(message.to_string()));
        self.results.push_back(set);
        self
    }

    pub(crate) const fn with_affected(mut self, affected: u64) -> Self {
        self.affected = affected;
        self
    }

    /// Fail every statement with a driver error.
    pub(crate) fn failing(mut self, message: &str) -> Self {
        self.fail = Some(message.to_string());
        self
    }

    pub(crate) fn sql(&self) -> Vec<&str> {
        self.statements
            .iter()
            .map(|(sql, _)| sql.as_str())
            .collect()
    }

    pub(crate) fn last(&self) -> (&str, &[Value]) {
        let (sql, args) = self.statements.last().expect("no statement was executed");
        (sql, args)
    }

    fn record(&mut self, sql: &str, args: &[Value]) -> Result<(), ExecutorError> {
        self.statements.push((sql.to_string(), args.to_vec()));

        match &self.fail {
            Some(message) => Err(ExecutorError::driver(message.clone())),
            None => Ok(()),
        }
    }
}

impl Executor for MockExecutor {
    type Cursor<'c>
        = MockCursor
    where
        Self: 'c;

    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<u64, ExecutorError> {
        self.record(sql, args)?;

        Ok(self.affected)
    }

    fn query(&mut self, sql: &str, args: &[Value]) -> Result<Self::Cursor<'_>, ExecutorError> {
        self.record(sql, args)?;

        Ok(MockCursor {
            rows: self.results.pop_front().unwrap_or_default().into(),
        })
    }
}

///
/// MockCursor
///

#[derive(Debug)]
pub(crate) struct MockCursor {
    rows: VecDeque<Result<Vec<Value>, String>>,
}

impl Cursor for MockCursor {
    fn next_row(&mut self) -> Result<Option<Vec<Value>>, ExecutorError> {
        match self.rows.pop_front() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(message)) => Err(ExecutorError::driver(message)),
            None => Ok(None),
        }
    }
}

// Shared fixtures

crate::test_record! {
    struct Base {
        col id: crate::types::Id,
        col created_at: i64 => "created_at,ro",
    }
}

crate::test_record! {
    struct User in "users" {
        embed base: Base,
        col name: String,
        col email: Option<String> => "email",
        col foo: String => "foo,readonly",
        skip session: String,
    }
}

crate::test_record! {
    struct Post {
        embed base: Base,
        col author_id: i64 => "author_id,fk=users.id",
        col title: String,
    }
}
