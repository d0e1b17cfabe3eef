use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Face {
    #[default]
    Heads,
    Tails,
}

impl Face {
    pub fn from_heads(heads: bool) -> Self {
        if heads {
            Face::Heads
        } else {
            Face::Tails
        }
    }

    pub fn is_heads(self) -> bool {
        self == Face::Heads
    }

    /// The other side of the coin.
    pub fn flipped(self) -> Self {
        match self {
            Face::Heads => Face::Tails,
            Face::Tails => Face::Heads,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Face::Heads => f.write_str("heads"),
            Face::Tails => f.write_str("tails"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flipped_twice_is_identity() {
        assert_eq!(Face::Heads.flipped(), Face::Tails);
        assert_eq!(Face::Tails.flipped().flipped(), Face::Tails);
    }

    #[test]
    fn from_heads_matches_is_heads() {
        assert!(Face::from_heads(true).is_heads());
        assert!(!Face::from_heads(false).is_heads());
        assert_eq!(Face::default(), Face::Heads);
    }
}
