//! Strongly-typed process indices.
//!
//! Ranks index into the engine's process grid, so they are `usize`-backed and
//! convert to and from plain indices; they are still never passed around raw.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! process_index {
    ($name:ident, $label:literal) => {
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " {}"), self.0)
            }
        }
    };
}

process_index!(Rank, "rank");

impl Rank {
    /// The master process.
    pub const ROOT: Rank = Rank::new(0);

    pub const fn is_root(self) -> bool {
        self.0 == 0
    }

    /// Whether this rank exists in a grid of `nprocs` processes.
    pub const fn is_within(self, nprocs: usize) -> bool {
        self.0 < nprocs
    }
}
