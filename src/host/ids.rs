use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an element in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub i64);

impl ElementId {
    /// The host's "no element" sentinel.
    pub const INVALID: Self = Self(-1);

    /// Returns `true` unless this is the sentinel.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a material in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub i64);

impl MaterialId {
    /// The host's "no material" sentinel.
    pub const INVALID: Self = Self(-1);

    /// Returns `true` unless this is the sentinel.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque, session-scoped handle to a solid. Minted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SolidHandle(pub u64);

/// Opaque, session-scoped handle to a face. Minted by the host.
///
/// Handles are only meaningful for the document that produced them and are
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceHandle(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_invalid() {
        assert!(!ElementId::INVALID.is_valid());
        assert!(!MaterialId::INVALID.is_valid());
        assert!(ElementId(0).is_valid());
        assert!(MaterialId(42).is_valid());
    }

    #[test]
    fn element_id_displays_raw_value() {
        assert_eq!(ElementId(317).to_string(), "317");
    }
}
