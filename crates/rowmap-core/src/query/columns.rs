use crate::{config::Placeholder, model::FieldDescriptor};
use derive_more::Deref;

///
/// Columns
///
/// Ordered column names with the list renderings SQL generation needs.
/// Order is the contract shared with value extraction.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
pub struct Columns(Vec<String>);

impl Columns {
    /// Column names of a leaf list, in order.
    #[must_use]
    pub fn of(fields: &[&FieldDescriptor]) -> Self {
        Self(
            fields
                .iter()
                .filter_map(|f| f.column_name())
                .map(ToString::to_string)
                .collect(),
        )
    }

    /// `a, b, c`
    #[must_use]
    pub fn list(&self) -> String {
        self.0.join(", ")
    }

    /// `p.a, p.b, p.c`
    #[must_use]
    pub fn prefixed_list(&self, prefix: &str) -> String {
        self.0
            .iter()
            .map(|col| format!("{prefix}.{col}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `$start, $start+1, ...`
    #[must_use]
    pub fn value_list(&self, start: usize, placeholder: Placeholder) -> String {
        (0..self.0.len())
            .map(|i| placeholder.render(start + i))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `a = $start, b = $start+1, ...`
    #[must_use]
    pub fn assignment_list(&self, start: usize, placeholder: Placeholder) -> String {
        self.0
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{col} = {}", placeholder.render(start + i)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<Vec<String>> for Columns {
    fn from(columns: Vec<String>) -> Self {
        Self(columns)
    }
}

impl<const N: usize> From<[&str; N]> for Columns {
    fn from(columns: [&str; N]) -> Self {
        Self(columns.iter().map(ToString::to_string).collect())
    }
}
