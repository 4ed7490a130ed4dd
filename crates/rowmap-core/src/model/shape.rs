use crate::traits::Resolved;
use std::any::TypeId;

///
/// RecordShape
/// Macro-generated declaration of one record type.
///

#[derive(Debug)]
pub struct RecordShape {
    /// Declared (unqualified) type name; the default table name source.
    pub type_name: &'static str,
    pub type_id: fn() -> TypeId,
    /// Table-name override; authoritative when present.
    pub table: Option<&'static str>,
    /// Every declared field in declaration order. A field's position here is
    /// its slot index.
    pub fields: &'static [DeclaredField],
}

///
/// DeclaredField
///

#[derive(Debug)]
pub struct DeclaredField {
    pub name: &'static str,
    /// Raw `db` annotation, e.g. `"owner_id,fk=users.id"`.
    pub tag: Option<&'static str>,
    pub kind: DeclaredKind,
}

impl DeclaredField {
    #[must_use]
    pub const fn column(name: &'static str, tag: Option<&'static str>) -> Self {
        Self {
            name,
            tag,
            kind: DeclaredKind::Column,
        }
    }

    #[must_use]
    pub const fn embedded(name: &'static str, resolve: fn() -> Resolved) -> Self {
        Self {
            name,
            tag: None,
            kind: DeclaredKind::Embedded(resolve),
        }
    }

    #[must_use]
    pub const fn excluded(name: &'static str) -> Self {
        Self {
            name,
            tag: Some("-"),
            kind: DeclaredKind::Excluded,
        }
    }
}

///
/// DeclaredKind
///

#[derive(Clone, Copy, Debug)]
pub enum DeclaredKind {
    Column,
    /// Nested composite; resolving it yields the nested shape.
    Embedded(fn() -> Resolved),
    Excluded,
}
