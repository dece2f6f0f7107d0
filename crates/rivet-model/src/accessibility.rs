use crate::source::{SemanticSource, TypeHandle};
use derive_more::Display;
use serde::Serialize;

///
/// Accessibility
///
/// Declared visibility of a type. Variants are ordered from most to least
/// restrictive, so `min` picks the more restrictive of two values.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Accessibility {
    #[display("private")]
    Private,

    /// Visible to derived types within the same assembly only.
    #[display("private protected")]
    ProtectedAndInternal,

    #[display("protected")]
    Protected,

    #[display("internal")]
    Internal,

    /// Visible to derived types or anything in the same assembly.
    #[display("protected internal")]
    ProtectedOrInternal,

    #[display("public")]
    Public,
}

impl Accessibility {
    /// The more restrictive of two accessibilities.
    #[must_use]
    pub fn restrict(self, other: Self) -> Self {
        self.min(other)
    }

    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

/// Effective accessibility of a type: the most restrictive of its own declared
/// accessibility and that of every lexically enclosing type.
#[must_use]
pub fn effective_accessibility(source: &dyn SemanticSource, ty: TypeHandle) -> Accessibility {
    let mut accessibility = source.declared_accessibility(ty);
    let mut current = source.containing_type(ty);

    while let Some(outer) = current {
        accessibility = accessibility.restrict(source.declared_accessibility(outer));
        current = source.containing_type(outer);
    }

    accessibility
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemorySource, TypeDecl};

    #[test]
    fn ordering_runs_private_to_public() {
        assert!(Accessibility::Private < Accessibility::ProtectedAndInternal);
        assert!(Accessibility::ProtectedAndInternal < Accessibility::Protected);
        assert!(Accessibility::Protected < Accessibility::Internal);
        assert!(Accessibility::Internal < Accessibility::ProtectedOrInternal);
        assert!(Accessibility::ProtectedOrInternal < Accessibility::Public);
    }

    #[test]
    fn nested_public_type_inherits_private_container() {
        let mut source = MemorySource::new();
        let outer = source.declare(TypeDecl::class("Outer").accessibility(Accessibility::Private));
        let middle = source.declare(
            TypeDecl::class("Middle")
                .accessibility(Accessibility::Public)
                .nested_in(outer),
        );
        let inner = source.declare(
            TypeDecl::class("Inner")
                .accessibility(Accessibility::Public)
                .nested_in(middle),
        );

        assert_eq!(
            effective_accessibility(&source, inner),
            Accessibility::Private
        );
    }

    #[test]
    fn own_restriction_wins_over_public_container() {
        let mut source = MemorySource::new();
        let outer = source.declare(TypeDecl::class("Outer"));
        let inner = source.declare(
            TypeDecl::class("Inner")
                .accessibility(Accessibility::Internal)
                .nested_in(outer),
        );

        assert_eq!(
            effective_accessibility(&source, inner),
            Accessibility::Internal
        );
    }

    #[test]
    fn display_uses_declaration_keywords() {
        assert_eq!(
            Accessibility::ProtectedAndInternal.to_string(),
            "private protected"
        );
        assert_eq!(Accessibility::Public.to_string(), "public");
    }
}
