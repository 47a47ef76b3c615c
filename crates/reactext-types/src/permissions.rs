//! Channel permission bits consulted before opening the dialog

use serde::{Deserialize, Serialize};

/// Discord permission bit set, as resolved for one user in one channel
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Permissions(u64);

impl Permissions {
    /// Add new reactions to messages
    pub const ADD_REACTIONS: Self = Self(1 << 6);
    /// Use emojis from other guilds
    pub const USE_EXTERNAL_EMOJIS: Self = Self(1 << 18);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// True if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for Permissions {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
