//! Value extraction and addressing over record instances.
//!
//! Every walk here follows the descriptor, not the instance: the descriptor
//! decides which slots are read and in what order, and the instance must
//! agree with it slot for slot. Disagreement is reported as invalid-type.


use crate::{
    error::{Error, ScanError},
    model::{FieldDescriptor, FieldMapping, IndexPath, TypeDescriptor},
    traits::{ColumnSlot, FieldAccess, FieldMut, FieldRef},
    value::Value,
};

/// Values of the writable leaves, in `writable_columns()` order.
///
/// Unset optional fields come out as `Value::Null`.
pub fn writable_values(
    desc: &TypeDescriptor,
    record: &dyn FieldAccess,
) -> Result<Vec<Value>, Error> {
    let mut out = Vec::new();
    collect_values(desc, record, &FieldDescriptor::is_writable, &mut out)?;

    Ok(out)
}

/// Values of every leaf, in `columns()` order.
pub fn all_values(desc: &TypeDescriptor, record: &dyn FieldAccess) -> Result<Vec<Value>, Error> {
    let mut out = Vec::new();
    collect_values(desc, record, &|_| true, &mut out)?;

    Ok(out)
}

fn collect_values(
    desc: &TypeDescriptor,
    record: &dyn FieldAccess,
    keep: &dyn Fn(&FieldDescriptor) -> bool,
    out: &mut Vec<Value>,
) -> Result<(), Error> {
    let fields = record.fields();

    for field in &desc.fields {
        match (&field.mapping, fields.get(field.slot)) {
            (FieldMapping::Column(_), Some(FieldRef::Column(slot))) => {
                if keep(field) {
                    out.push(slot.value());
                }
            }
            (FieldMapping::Embedded(inner), Some(FieldRef::Embedded(nested))) => {
                collect_values(inner, *nested, keep, out)?;
            }
            _ => return Err(slot_mismatch(desc, field)),
        }
    }

    Ok(())
}

/// One addressable slot per leaf, in `columns()` order, borrowed from the
/// record so scanned values land in place.
pub fn scan_targets<'r>(
    desc: &TypeDescriptor,
    record: &'r mut dyn FieldAccess,
) -> Result<Vec<&'r mut dyn ColumnSlot>, Error> {
    let mut out = Vec::new();
    collect_targets(desc, record, &mut out)?;

    Ok(out)
}

fn collect_targets<'r>(
    desc: &TypeDescriptor,
    record: &'r mut dyn FieldAccess,
    out: &mut Vec<&'r mut dyn ColumnSlot>,
) -> Result<(), Error> {
    let mut fields: Vec<Option<FieldMut<'r>>> = record.fields_mut().into_iter().map(Some).collect();

    for field in &desc.fields {
        let entry = fields.get_mut(field.slot).and_then(Option::take);

        match (&field.mapping, entry) {
            (FieldMapping::Column(_), Some(FieldMut::Column(slot))) => out.push(slot),
            (FieldMapping::Embedded(inner), Some(FieldMut::Embedded(nested))) => {
                collect_targets(inner, nested, out)?;
            }
            _ => return Err(slot_mismatch(desc, field)),
        }
    }

    Ok(())
}

/// Assign one row, in `columns()` order, into the record's scan targets.
///
/// Values are assigned front to back; on a conversion failure the earlier
/// columns have already been written.
pub fn scan_row(
    desc: &TypeDescriptor,
    record: &mut dyn FieldAccess,
    row: Vec<Value>,
) -> Result<(), Error> {
    let leaves = desc.fields.leaves();
    let targets = scan_targets(desc, record)?;

    if targets.len() != row.len() {
        return Err(ScanError::Arity {
            expected: targets.len(),
            found: row.len(),
        }
        .into());
    }

    for ((target, value), leaf) in targets.into_iter().zip(row).zip(leaves) {
        assign(target, value, leaf.column_name().unwrap_or(leaf.name))?;
    }

    Ok(())
}

/// Current value of the leaf addressed by `path`.
pub fn value_at(record: &dyn FieldAccess, path: &IndexPath) -> Result<Value, Error> {
    value_at_slots(record, path)
}

fn value_at_slots(record: &dyn FieldAccess, path: &[usize]) -> Result<Value, Error> {
    let Some((&slot, rest)) = path.split_first() else {
        return Err(Error::invalid_type("empty index path"));
    };

    match record.field(slot) {
        Some(FieldRef::Column(leaf)) if rest.is_empty() => Ok(leaf.value()),
        Some(FieldRef::Embedded(nested)) if !rest.is_empty() => value_at_slots(nested, rest),
        _ => Err(path_mismatch(slot)),
    }
}

/// Mutable slot of the leaf addressed by `path`.
pub fn slot_at<'r>(
    record: &'r mut dyn FieldAccess,
    path: &IndexPath,
) -> Result<&'r mut dyn ColumnSlot, Error> {
    slot_at_slots(record, path)
}

fn slot_at_slots<'r>(
    record: &'r mut dyn FieldAccess,
    path: &[usize],
) -> Result<&'r mut dyn ColumnSlot, Error> {
    let Some((&slot, rest)) = path.split_first() else {
        return Err(Error::invalid_type("empty index path"));
    };

    match record.field_mut(slot) {
        Some(FieldMut::Column(leaf)) if rest.is_empty() => Ok(leaf),
        Some(FieldMut::Embedded(nested)) if !rest.is_empty() => slot_at_slots(nested, rest),
        _ => Err(path_mismatch(slot)),
    }
}

/// Assign `value` into the slot at `path`; `column` names it in errors.
pub fn assign_at(
    record: &mut dyn FieldAccess,
    path: &IndexPath,
    column: &str,
    value: Value,
) -> Result<(), Error> {
    assign(slot_at(record, path)?, value, column)
}

fn assign(target: &mut dyn ColumnSlot, value: Value, column: &str) -> Result<(), Error> {
    target.assign(value).map_err(|rejected| {
        ScanError::Mismatch {
            column: column.to_string(),
            found: rejected.tag(),
        }
        .into()
    })
}

fn slot_mismatch(desc: &TypeDescriptor, field: &FieldDescriptor) -> Error {
    Error::invalid_type(format!(
        "{} slot {} ('{}') does not match its descriptor",
        desc.type_name, field.slot, field.name
    ))
}

fn path_mismatch(slot: usize) -> Error {
    Error::invalid_type(format!("index path does not resolve at slot {slot}"))
}
