use derive_more::{Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::{num::ParseIntError, str::FromStr};

///
/// Id
///
/// Serial row identity. Zero means "not yet assigned by the store".
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deref,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct Id(i64);

impl Id {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// True once the store has assigned this identity.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl FromStr for Id {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

///
/// TESTS
///
