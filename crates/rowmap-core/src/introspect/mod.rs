//! Type introspection: turns a declared `RecordShape` into a
//! `TypeDescriptor` tree.
//!
//! Nothing here touches the registry; `Registry::describe` decides when an
//! analysis is needed and publishes the result.

mod tag;


pub use tag::{EXCLUDE, column_mapping, is_excluded};

use crate::{
    MAX_EMBED_DEPTH,
    error::Error,
    model::{
        ColumnMapping, DeclaredKind, FieldDescriptor, FieldList, FieldMapping, RecordShape,
        TypeDescriptor,
    },
    normalize::snake_case,
    traits::{Introspect, Resolved},
};
use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, Weak},
};

/// Reduce `V` to the record shape it describes.
///
/// Panics raised by a shape's resolver are reported as invalid-type.
pub fn resolve_shape<V: Introspect + ?Sized>() -> Result<&'static RecordShape, Error> {
    match catch_unwind(V::resolve) {
        Ok(resolved) => composite(resolved, std::any::type_name::<V>()),
        Err(_) => Err(Error::invalid_type(format!(
            "resolving {} panicked",
            std::any::type_name::<V>()
        ))),
    }
}

fn composite(resolved: Resolved, context: &str) -> Result<&'static RecordShape, Error> {
    match resolved {
        Resolved::Composite(shape) => Ok(shape),
        Resolved::Invalid(kind) => Err(Error::invalid_type(format!(
            "{context} reduces to {kind}, not a record"
        ))),
    }
}

/// Table a shape maps to: the override when declared, otherwise the
/// normalized type name.
#[must_use]
pub fn table_name(shape: &RecordShape) -> String {
    shape
        .table
        .map_or_else(|| snake_case(shape.type_name), ToString::to_string)
}

/// Analyze a shape and every record embedded in it.
///
/// The returned descriptor is a root (`parent` unset); embedded descriptors
/// link back to the descriptor that embeds them.
pub fn analyze(shape: &'static RecordShape) -> Result<Arc<TypeDescriptor>, Error> {
    let plan = catch_unwind(AssertUnwindSafe(|| plan(shape, 0))).map_err(|_| {
        Error::invalid_type(format!("introspecting {} panicked", shape.type_name))
    })??;

    Ok(materialize(plan, None))
}

///
/// Plan
///
/// Fallible first pass. Everything that can fail (embedded resolution,
/// depth) happens here so the `Arc` tree can be built infallibly.
///

struct Plan {
    shape: &'static RecordShape,
    table: String,
    fields: Vec<PlannedField>,
}

struct PlannedField {
    name: &'static str,
    slot: usize,
    kind: PlannedKind,
}

enum PlannedKind {
    Column(ColumnMapping),
    Embedded(Plan),
}

fn plan(shape: &'static RecordShape, depth: usize) -> Result<Plan, Error> {
    if depth > MAX_EMBED_DEPTH {
        return Err(Error::invalid_type(format!(
            "{} is embedded deeper than {MAX_EMBED_DEPTH} levels",
            shape.type_name
        )));
    }

    let mut fields = Vec::with_capacity(shape.fields.len());

    for (slot, declared) in shape.fields.iter().enumerate() {
        let kind = match declared.kind {
            DeclaredKind::Excluded => continue,
            DeclaredKind::Embedded(resolve) => {
                let context = format!("{}.{}", shape.type_name, declared.name);
                let inner = composite(resolve(), &context)?;

                PlannedKind::Embedded(plan(inner, depth + 1)?)
            }
            DeclaredKind::Column if is_excluded(declared.tag) => continue,
            DeclaredKind::Column => {
                PlannedKind::Column(column_mapping(declared.name, declared.tag))
            }
        };

        fields.push(PlannedField {
            name: declared.name,
            slot,
            kind,
        });
    }

    Ok(Plan {
        shape,
        table: table_name(shape),
        fields,
    })
}

fn materialize(plan: Plan, parent: Option<Weak<TypeDescriptor>>) -> Arc<TypeDescriptor> {
    Arc::new_cyclic(|this| {
        let fields = plan
            .fields
            .into_iter()
            .map(|field| FieldDescriptor {
                name: field.name,
                slot: field.slot,
                mapping: match field.kind {
                    PlannedKind::Column(column) => FieldMapping::Column(column),
                    PlannedKind::Embedded(inner) => {
                        FieldMapping::Embedded(materialize(inner, Some(this.clone())))
                    }
                },
            })
            .collect();

        TypeDescriptor {
            table: plan.table,
            type_name: plan.shape.type_name,
            type_id: (plan.shape.type_id)(),
            fields: FieldList::new(fields),
            parent,
        }
    })
}
