//! Core runtime for rowmap: record shapes, descriptors, the descriptor
//! registry, value extraction, SQL generation and the CRUD session.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod extract;
pub mod introspect;
pub mod model;
pub mod normalize;
pub mod obs;
pub mod query;
pub mod registry;
pub mod session;
pub mod traits;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;

///
/// CONSTANTS
///

/// Maximum depth of nested embedded records.
///
/// Deeper chains are rejected as invalid types so a self-embedding record
/// cannot recurse without bound during introspection.
pub const MAX_EMBED_DEPTH: usize = 32;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, executors, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{FieldDescriptor, IndexPath, TypeDescriptor},
        registry::Registry,
        traits::{FieldAccess, FieldValue, Introspect, Record},
        types::Id,
        value::Value,
    };
}
