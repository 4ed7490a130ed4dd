use crate::{
    error::Error,
    model::{IndexPath, TypeDescriptor},
    query::Columns,
};
use derive_more::Deref;
use std::sync::Arc;

///
/// ForeignKey
/// Declarative reference; never checked against the target table.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

///
/// ColumnMapping
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnMapping {
    pub column: String,
    pub primary_key: bool,
    /// Selected but never written. Primary keys are always read only.
    pub read_only: bool,
    pub foreign_key: Option<ForeignKey>,
}

///
/// FieldMapping
///
/// A field is either a mapped leaf or a structural branch into a nested
/// record, never both.
///

#[derive(Clone, Debug)]
pub enum FieldMapping {
    Column(ColumnMapping),
    Embedded(Arc<TypeDescriptor>),
}

///
/// FieldDescriptor
///

#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    /// Declared field name.
    pub name: &'static str,
    /// Position among the owning record's declared fields.
    pub slot: usize,
    pub mapping: FieldMapping,
}

impl FieldDescriptor {
    #[must_use]
    pub const fn column(&self) -> Option<&ColumnMapping> {
        match &self.mapping {
            FieldMapping::Column(column) => Some(column),
            FieldMapping::Embedded(_) => None,
        }
    }

    #[must_use]
    pub fn column_name(&self) -> Option<&str> {
        self.column().map(|c| c.column.as_str())
    }

    #[must_use]
    pub const fn embedded(&self) -> Option<&Arc<TypeDescriptor>> {
        match &self.mapping {
            FieldMapping::Embedded(desc) => Some(desc),
            FieldMapping::Column(_) => None,
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.mapping, FieldMapping::Column(_))
    }

    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.column().is_some_and(|c| c.primary_key)
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.column().is_some_and(|c| c.read_only)
    }

    /// Leaf eligible for INSERT/UPDATE value lists.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.column()
            .is_some_and(|c| !c.primary_key && !c.read_only)
    }

    #[must_use]
    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        self.column().and_then(|c| c.foreign_key.as_ref())
    }
}

///
/// FieldList
///
/// Ordered field descriptors of one record. All queries walk the tree
/// depth-first in declaration order, entering an embedded record at the
/// point its field is declared.
///

#[derive(Clone, Debug, Default, Deref)]
pub struct FieldList(Vec<FieldDescriptor>);

impl FieldList {
    #[must_use]
    pub const fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self(fields)
    }

    /// First leaf matching `predicate`, with its full index path.
    pub fn find(
        &self,
        predicate: impl Fn(&FieldDescriptor) -> bool,
    ) -> Option<(&FieldDescriptor, IndexPath)> {
        let mut path = IndexPath::new();
        let field = self.find_inner(&predicate, &mut path)?;

        Some((field, path))
    }

    fn find_inner<'a>(
        &'a self,
        predicate: &dyn Fn(&FieldDescriptor) -> bool,
        path: &mut IndexPath,
    ) -> Option<&'a FieldDescriptor> {
        for field in &self.0 {
            path.push(field.slot);

            let found = match &field.mapping {
                FieldMapping::Column(_) => predicate(field).then_some(field),
                FieldMapping::Embedded(desc) => desc.fields.find_inner(predicate, path),
            };
            if found.is_some() {
                return found;
            }

            path.pop();
        }

        None
    }

    /// First primary-key leaf.
    pub fn find_primary_key(&self) -> Option<(&FieldDescriptor, IndexPath)> {
        self.find(FieldDescriptor::is_primary_key)
    }

    /// First leaf mapped to `column`.
    pub fn find_by_column(&self, column: &str) -> Option<(&FieldDescriptor, IndexPath)> {
        self.find(|f| f.column_name() == Some(column))
    }

    /// Every leaf, in scan order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&FieldDescriptor> {
        self.flatten(&|_| true)
    }

    /// Leaves that are neither primary key nor read only.
    #[must_use]
    pub fn writable(&self) -> Vec<&FieldDescriptor> {
        self.flatten(&FieldDescriptor::is_writable)
    }

    /// Leaves carrying a foreign key.
    #[must_use]
    pub fn foreign_keys(&self) -> Vec<&FieldDescriptor> {
        self.flatten(&|f| f.foreign_key().is_some())
    }

    /// Column names of every leaf, in scan order.
    #[must_use]
    pub fn columns(&self) -> Columns {
        Columns::of(&self.leaves())
    }

    fn flatten(&self, keep: &dyn Fn(&FieldDescriptor) -> bool) -> Vec<&FieldDescriptor> {
        let mut out = Vec::new();
        self.flatten_into(keep, &mut out);

        out
    }

    fn flatten_into<'a>(
        &'a self,
        keep: &dyn Fn(&FieldDescriptor) -> bool,
        out: &mut Vec<&'a FieldDescriptor>,
    ) {
        for field in &self.0 {
            match &field.mapping {
                FieldMapping::Column(_) if keep(field) => out.push(field),
                FieldMapping::Column(_) => {}
                FieldMapping::Embedded(desc) => desc.fields.flatten_into(keep, out),
            }
        }
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl TypeDescriptor {
    /// Primary-key leaf and its path, or field-not-found.
    pub fn primary_key(&self) -> Result<(&FieldDescriptor, IndexPath), Error> {
        self.fields
            .find_primary_key()
            .ok_or_else(|| Error::no_primary_key(&self.table))
    }

    /// Leaf mapped to `column` and its path, or field-not-found.
    pub fn field_by_column(&self, column: &str) -> Result<(&FieldDescriptor, IndexPath), Error> {
        self.fields
            .find_by_column(column)
            .ok_or_else(|| Error::no_column(&self.table, column))
    }

    /// SELECT column list: every leaf.
    #[must_use]
    pub fn columns(&self) -> Columns {
        self.fields.columns()
    }

    /// INSERT/UPDATE column list: writable leaves only.
    #[must_use]
    pub fn writable_columns(&self) -> Columns {
        Columns::of(&self.fields.writable())
    }

    /// First foreign-key leaf (depth-first) referencing `table`.
    pub fn foreign_key_to(&self, table: &str) -> Result<&FieldDescriptor, Error> {
        let fks = self.fields.foreign_keys();
        if fks.is_empty() {
            return Err(Error::NoForeignKeys(self.table.clone()));
        }

        fks.into_iter()
            .find(|f| f.foreign_key().is_some_and(|fk| fk.table == table))
            .ok_or_else(|| Error::NoForeignKeyMatch {
                table: self.table.clone(),
                target: table.to_string(),
            })
    }
}
