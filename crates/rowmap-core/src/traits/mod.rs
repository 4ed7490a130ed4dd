mod field_value;

pub use field_value::*;

use crate::model::RecordShape;
use std::{rc::Rc, sync::Arc};

// ============================================================================
// SHAPE RESOLUTION
// ============================================================================
//
// Rust has no runtime reflection, so every mapped record registers its
// declared shape explicitly (normally through `#[derive(Record)]`).
//

///
/// Resolved
///
/// Outcome of reducing a type through references, smart pointers and
/// collections to the composite it ultimately describes.
///

#[derive(Clone, Copy, Debug)]
pub enum Resolved {
    Composite(&'static RecordShape),
    /// Reduction ended on a non-composite; carries the offending type label.
    Invalid(&'static str),
}

///
/// Introspect
///
/// Single normalization point for anything handed to the registry:
/// records, references to records, boxed records, and collections of
/// records all resolve to the record's shape.
///

pub trait Introspect {
    fn resolve() -> Resolved;
}

macro_rules! impl_introspect_delegate {
    ( $( $wrapper:ty ),* $(,)? ) => {
        $(
            impl<T: Introspect + ?Sized> Introspect for $wrapper {
                fn resolve() -> Resolved {
                    T::resolve()
                }
            }
        )*
    };
}

impl_introspect_delegate!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);

impl<T: Introspect> Introspect for Option<T> {
    fn resolve() -> Resolved {
        T::resolve()
    }
}

impl<T: Introspect> Introspect for Vec<T> {
    fn resolve() -> Resolved {
        T::resolve()
    }
}

impl<T: Introspect> Introspect for [T] {
    fn resolve() -> Resolved {
        T::resolve()
    }
}

impl<T: Introspect, const N: usize> Introspect for [T; N] {
    fn resolve() -> Resolved {
        T::resolve()
    }
}

macro_rules! impl_introspect_scalar {
    ( $( $type:ty => $label:literal ),* $(,)? ) => {
        $(
            impl Introspect for $type {
                fn resolve() -> Resolved {
                    Resolved::Invalid($label)
                }
            }
        )*
    };
}

impl_introspect_scalar!(
    bool => "bool",
    char => "char",
    f32 => "f32",
    f64 => "f64",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    str => "str",
    String => "String",
    crate::types::Id => "Id",
    crate::value::Value => "Value",
    ulid::Ulid => "Ulid",
    time::OffsetDateTime => "OffsetDateTime",
);

// ============================================================================
// RECORD INSTANCES
// ============================================================================

///
/// FieldRef
/// Shared view of one declared field of a record instance.
///

pub enum FieldRef<'a> {
    Column(&'a dyn ColumnSlot),
    Embedded(&'a dyn FieldAccess),
    Excluded,
}

///
/// FieldMut
/// Mutable view of one declared field of a record instance.
///

pub enum FieldMut<'a> {
    Column(&'a mut dyn ColumnSlot),
    Embedded(&'a mut dyn FieldAccess),
    Excluded,
}

///
/// FieldAccess
///
/// Object-safe slot access over a record instance. Slot indices are the
/// declared field positions, excluded fields included, so they line up with
/// `RecordShape::fields`.
///

pub trait FieldAccess {
    /// One entry per declared field, in declaration order.
    fn fields(&self) -> Vec<FieldRef<'_>>;

    /// One disjoint mutable entry per declared field, in declaration order.
    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;

    fn field(&self, slot: usize) -> Option<FieldRef<'_>> {
        self.fields().into_iter().nth(slot)
    }

    fn field_mut(&mut self, slot: usize) -> Option<FieldMut<'_>> {
        self.fields_mut().into_iter().nth(slot)
    }
}

///
/// Record
///
/// A composite mapped to a table row. Implemented by `#[derive(Record)]`.
///

pub trait Record: Introspect + FieldAccess + 'static {
    fn shape() -> &'static RecordShape;
}
