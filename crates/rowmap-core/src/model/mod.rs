//! Mapping data model.
//!
//! - `shape` holds what a record *declares* (emitted by `#[derive(Record)]`)
//! - `descriptor` and `field` hold what the introspector *derived* from it
//!
//! Descriptors are immutable once built and shared through `Arc`.

mod descriptor;
mod field;
mod path;
mod shape;

#[cfg(test)]
mod tests;

pub use descriptor::TypeDescriptor;
pub use field::{ColumnMapping, FieldDescriptor, FieldList, FieldMapping, ForeignKey};
pub use path::IndexPath;
pub use shape::{DeclaredField, DeclaredKind, RecordShape};
