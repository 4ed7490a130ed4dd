use serde::{Deserialize, Serialize};

///
/// Placeholder
/// Positional parameter syntax used in generated SQL.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// `$1, $2, ...` (PostgreSQL).
    #[default]
    Dollar,
    /// `?, ?, ...`; arguments bind strictly in order of appearance.
    Question,
}

impl Placeholder {
    /// Render the placeholder for 1-based parameter `n`.
    #[must_use]
    pub fn render(self, n: usize) -> String {
        match self {
            Self::Dollar => format!("${n}"),
            Self::Question => "?".to_string(),
        }
    }

    /// True when parameters carry explicit positions.
    #[must_use]
    pub const fn is_numbered(self) -> bool {
        matches!(self, Self::Dollar)
    }
}

///
/// SessionConfig
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Print generated statements with a `[debug]` prefix.
    pub debug: bool,
    pub placeholder: Placeholder,
}

///
/// TESTS
///
