//! ## Crate layout
//! - `model`, `introspect`, `registry`: record shapes, descriptors and the
//!   process-wide descriptor cache.
//! - `extract`: reading column values out of records and scanning rows in.
//! - `query`: CRUD SQL generation.
//! - `session`: CRUD orchestration over a caller-supplied executor.
//! - `obs`: per-thread counters and the metrics sink boundary.
//!
//! `#[derive(Record)]` is the only way most callers register a type; the
//! `prelude` carries it together with the domain vocabulary.

pub use rowmap_core::{
    config, error, extract, introspect, model, normalize, obs, query, registry, session, traits,
    types, value,
};
pub use rowmap_derive::Record;

// so derive output resolves inside this crate too
extern crate self as rowmap;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use rowmap_core::{Error, MAX_EMBED_DEPTH};

///
/// Prelude
///

pub mod prelude {
    pub use rowmap_core::prelude::*;
    pub use rowmap_core::session::{Executor, Session};
    pub use rowmap_derive::Record;
}
