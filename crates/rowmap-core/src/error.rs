use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Every failure surfaced by the mapping engine and the CRUD session.
/// Errors are returned to the immediate caller; nothing is retried or rolled
/// back.
///

#[derive(Debug, ThisError)]
pub enum Error {
    /// The argument cannot be reduced to an introspectable composite, or an
    /// instance disagrees with its descriptor.
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// A primary-key or named-column lookup found no matching leaf.
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// A fetch produced zero rows.
    #[error("not found: no rows in result set")]
    NotFound,

    #[error("table '{0}' declares no foreign keys")]
    NoForeignKeys(String),

    #[error("no foreign key on table '{table}' references table '{target}'")]
    NoForeignKeyMatch { table: String, target: String },

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl Error {
    pub(crate) fn invalid_type(message: impl Into<String>) -> Self {
        Self::InvalidType(message.into())
    }

    pub(crate) fn no_primary_key(table: &str) -> Self {
        Self::FieldNotFound(format!("table '{table}' has no primary key"))
    }

    pub(crate) fn no_column(table: &str, column: &str) -> Self {
        Self::FieldNotFound(format!("table '{table}' has no column '{column}'"))
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidType(_) => ErrorClass::InvalidType,
            Self::FieldNotFound(_) | Self::NoForeignKeys(_) | Self::NoForeignKeyMatch { .. } => {
                ErrorClass::Unresolved
            }
            Self::NotFound | Self::Executor(ExecutorError::NoRows) => ErrorClass::NotFound,
            Self::Scan(_) => ErrorClass::Conversion,
            Self::Executor(_) => ErrorClass::Executor,
        }
    }

    /// True for the engine's not-found sentinel and for the executor's
    /// generic "no rows" condition alike.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class(), ErrorClass::NotFound)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ScanError
///
/// Failures while assigning row values into a record's scan targets.
///

#[derive(Debug, ThisError)]
pub enum ScanError {
    #[error("row has {found} values but {expected} columns were selected")]
    Arity { expected: usize, found: usize },

    #[error("column '{column}' cannot hold a {found} value")]
    Mismatch { column: String, found: &'static str },
}

///
/// ExecutorError
///
/// Failures reported by the externally supplied executor.
///

#[derive(Debug, ThisError)]
pub enum ExecutorError {
    #[error("no rows in result set")]
    NoRows,

    #[error("driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ExecutorError {
    /// Wrap any driver error.
    pub fn driver(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Driver(err.into())
    }
}

///
/// ErrorClass
/// Coarse error taxonomy for callers that branch on failure kind.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidType,
    Unresolved,
    NotFound,
    Conversion,
    Executor,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidType => "invalid_type",
            Self::Unresolved => "unresolved",
            Self::NotFound => "not_found",
            Self::Conversion => "conversion",
            Self::Executor => "executor",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_from_executor_counts_as_not_found() {
        assert!(Error::NotFound.is_not_found());
        assert!(Error::from(ExecutorError::NoRows).is_not_found());
        assert!(!Error::from(ExecutorError::driver("connection reset")).is_not_found());
    }

    #[test]
    fn class_labels_prefix_messages() {
        let err = Error::no_primary_key("audit_log");

        assert_eq!(err.class(), ErrorClass::Unresolved);
        assert_eq!(
            err.display_with_class(),
            "unresolved: field not found: table 'audit_log' has no primary key"
        );
    }

    #[test]
    fn scan_errors_convert_into_conversion_class() {
        let err = Error::from(ScanError::Arity {
            expected: 3,
            found: 2,
        });

        assert_eq!(err.class(), ErrorClass::Conversion);
        assert_eq!(
            err.to_string(),
            "row has 2 values but 3 columns were selected"
        );
    }
}
