use derive_more::Deref;
use std::fmt;

///
/// IndexPath
///
/// Slot indices from the root record down to one leaf field. A leaf declared
/// directly on the root has a path of length one.
///

#[derive(Clone, Debug, Default, Deref, Eq, Hash, PartialEq)]
pub struct IndexPath(Vec<usize>);

impl IndexPath {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, slot: usize) {
        self.0.push(slot);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    /// Nesting depth of the addressed leaf.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<usize>> for IndexPath {
    fn from(slots: Vec<usize>) -> Self {
        Self(slots)
    }
}

impl<const N: usize> From<[usize; N]> for IndexPath {
    fn from(slots: [usize; N]) -> Self {
        Self(slots.to_vec())
    }
}

impl PartialEq<[usize]> for IndexPath {
    fn eq(&self, other: &[usize]) -> bool {
        self.0 == other
    }
}

impl<const N: usize> PartialEq<[usize; N]> for IndexPath {
    fn eq(&self, other: &[usize; N]) -> bool {
        self.0 == other
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, slot) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}")?;
        }
        f.write_str("]")
    }
}
