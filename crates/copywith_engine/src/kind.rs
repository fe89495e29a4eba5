//! Declaration kinds as the generators see them.
//!
//! The parser reports the introducing keyword; generators only care whether a
//! declaration has value semantics, reference semantics, or is a protocol, and
//! for protocols whether conformers are restricted to reference types.

use copywith_syntax::{DeclGroup, DeclGroupKind};

/// Semantic kind of an annotated declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// `struct`
    ValueType,
    /// `class` or `actor`
    ReferenceType,
    /// `protocol`
    Protocol {
        /// Inherits `AnyObject` (or the legacy `class` constraint).
        reference_capable: bool,
    },
    /// Any declaration no generator accepts.
    Other(DeclGroupKind),
}

impl DeclKind {
    /// Classifies a parsed declaration.
    #[must_use]
    pub fn of(decl: &DeclGroup) -> Self {
        match decl.kind {
            DeclGroupKind::Struct => Self::ValueType,
            DeclGroupKind::Class | DeclGroupKind::Actor => Self::ReferenceType,
            DeclGroupKind::Protocol => Self::Protocol {
                reference_capable: decl.inherits("AnyObject") || decl.inherits("class"),
            },
            other @ (DeclGroupKind::Enum | DeclGroupKind::Extension) => Self::Other(other),
        }
    }

    /// Returns true for protocols.
    #[must_use]
    pub const fn is_protocol(self) -> bool {
        matches!(self, Self::Protocol { .. })
    }
}
