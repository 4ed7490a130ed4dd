use crate::model::FieldList;
use std::{
    any::TypeId,
    sync::{Arc, Weak},
};

///
/// TypeDescriptor
///
/// Mapping between one record type and its table. Built once by the
/// introspector and never mutated afterwards.
///

#[derive(Debug)]
pub struct TypeDescriptor {
    pub table: String,
    /// Declared type name of the record.
    pub type_name: &'static str,
    pub type_id: TypeId,
    pub fields: FieldList,
    /// Set iff this descriptor was reached by embedding from another one.
    pub(crate) parent: Option<Weak<Self>>,
}

impl TypeDescriptor {
    /// True when the descriptor is not embedded in another one.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The embedding descriptor, while it is still alive.
    #[must_use]
    pub fn parent(&self) -> Option<Arc<Self>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Direct children reached through embedded fields.
    #[must_use]
    pub fn embedded(&self) -> Vec<&Arc<Self>> {
        self.fields.iter().filter_map(|f| f.embedded()).collect()
    }
}
