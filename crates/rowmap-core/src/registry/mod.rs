use crate::{
    error::Error,
    introspect::{self, resolve_shape, table_name},
    model::{RecordShape, TypeDescriptor},
    traits::Introspect,
};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

///
/// CacheOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CacheOutcome {
    Hit,
    Miss,
}

///
/// Registry
///
/// Descriptor cache keyed by table name. Lookups share the lock; a newly
/// analyzed descriptor is published under the exclusive lock. Analysis
/// itself runs unlocked, so concurrent first lookups of one type may both
/// analyze it; the later publication replaces the earlier, equivalent one.
///

#[derive(Debug, Default)]
pub struct Registry {
    descriptors: RwLock<HashMap<String, Arc<TypeDescriptor>>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by sessions that are not given one.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Descriptor for `V` (a record, a reference or pointer to one, or a
    /// collection of them), analyzing and publishing it on first use.
    pub fn describe<V: Introspect + ?Sized>(&self) -> Result<Arc<TypeDescriptor>, Error> {
        self.describe_traced::<V>().map(|(desc, _)| desc)
    }

    /// As [`Self::describe`], inferring the type from a value.
    pub fn describe_value<V: Introspect + ?Sized>(
        &self,
        _value: &V,
    ) -> Result<Arc<TypeDescriptor>, Error> {
        self.describe::<V>()
    }

    pub(crate) fn describe_traced<V: Introspect + ?Sized>(
        &self,
    ) -> Result<(Arc<TypeDescriptor>, CacheOutcome), Error> {
        let shape = resolve_shape::<V>()?;

        // a declared table name short-circuits before any naming work
        if let Some(table) = shape.table
            && let Some(desc) = self.lookup_shape(table, shape)
        {
            return Ok((desc, CacheOutcome::Hit));
        }

        let table = table_name(shape);
        if let Some(desc) = self.lookup_shape(&table, shape) {
            return Ok((desc, CacheOutcome::Hit));
        }

        let desc = introspect::analyze(shape)?;
        self.publish(Arc::clone(&desc));

        Ok((desc, CacheOutcome::Miss))
    }

    // A cached descriptor only counts when it was built from the same type;
    // two types sharing a table name re-analyze instead of aliasing slots.
    fn lookup_shape(&self, table: &str, shape: &RecordShape) -> Option<Arc<TypeDescriptor>> {
        self.lookup(table)
            .filter(|desc| desc.type_id == (shape.type_id)())
    }

    /// Cached descriptor for `table`, if any.
    #[must_use]
    pub fn lookup(&self, table: &str) -> Option<Arc<TypeDescriptor>> {
        let map = self
            .descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        map.get(table).cloned()
    }

    /// Publish a descriptor under its table name, replacing any previous one.
    pub fn publish(&self, desc: Arc<TypeDescriptor>) {
        let mut map = self
            .descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        map.insert(desc.table.clone(), desc);
    }

    /// Drop every cached descriptor, forcing re-analysis.
    pub fn clear(&self) {
        self.descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached table names, sorted.
    #[must_use]
    pub fn tables(&self) -> Vec<String> {
        let map = self
            .descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut tables: Vec<String> = map.keys().cloned().collect();
        tables.sort_unstable();

        tables
    }
}

///
/// TESTS
///
