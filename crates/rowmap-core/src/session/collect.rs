use crate::{
    error::{Error, ScanError},
    extract::scan_row,
    model::TypeDescriptor,
    registry::Registry,
    session::Cursor,
    traits::{FieldValue, Record},
    value::Value,
};

/// Scan every remaining row of `cursor` into a fresh `T`.
///
/// Zero rows is not-found. Any scan or cursor error aborts the collection
/// and the rows gathered so far are dropped.
pub fn collect_rows<T: Record + Default>(
    registry: &Registry,
    cursor: impl Cursor,
) -> Result<Vec<T>, Error> {
    let desc = registry.describe::<T>()?;
    let items = scan_all(&desc, cursor)?;

    if items.is_empty() {
        return Err(Error::NotFound);
    }

    Ok(items)
}

/// First column of every remaining row, converted to `T`.
///
/// Typical for id or name lists selected with a single-column query.
/// Zero rows is not-found.
pub fn collect_scalars<T: FieldValue>(mut cursor: impl Cursor) -> Result<Vec<T>, Error> {
    let mut items = Vec::new();

    while let Some(row) = cursor.next_row()? {
        let Some(value) = row.into_iter().next() else {
            return Err(ScanError::Arity {
                expected: 1,
                found: 0,
            }
            .into());
        };

        items.push(scalar(value)?);
    }

    if items.is_empty() {
        return Err(Error::NotFound);
    }

    Ok(items)
}

pub(crate) fn scan_all<T: Record + Default>(
    desc: &TypeDescriptor,
    mut cursor: impl Cursor,
) -> Result<Vec<T>, Error> {
    let mut items = Vec::new();

    while let Some(row) = cursor.next_row()? {
        let mut item = T::default();
        scan_row(desc, &mut item, row)?;
        items.push(item);
    }

    Ok(items)
}

fn scalar<T: FieldValue>(value: Value) -> Result<T, Error> {
    T::from_value(&value).ok_or_else(|| {
        ScanError::Mismatch {
            column: "scalar".to_string(),
            found: value.tag(),
        }
        .into()
    })
}
