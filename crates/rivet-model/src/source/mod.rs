//! The read-only view of a program's declarations that descriptor builders
//! query. The front-end that resolves symbols implements [`SemanticSource`];
//! the builders never construct or mutate what it hands out.

pub mod memory;

pub use memory::{MemorySource, TypeDecl};

use crate::accessibility::Accessibility;
use derive_more::Display;
use serde::Serialize;

///
/// TypeHandle
/// Opaque identity of a type declaration inside one semantic source.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[display("type#{_0}")]
pub struct TypeHandle(u32);

impl TypeHandle {
    /// Wrap a source-assigned id. Only semantic sources should call this.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

///
/// MemberHandle
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[display("member#{_0}")]
pub struct MemberHandle(u32);

impl MemberHandle {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

///
/// TypeParameter
/// One generic parameter, either declared by the type itself or inherited
/// from a containing type.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct TypeParameter {
    pub name: String,
    pub owner: TypeHandle,
    pub ordinal: usize,
}

///
/// TypeKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
pub enum TypeKind {
    Class,
    Enum,
    Interface,
    Struct,
}

impl TypeKind {
    #[must_use]
    pub const fn is_value_type(self) -> bool {
        matches!(self, Self::Enum | Self::Struct)
    }
}

///
/// Constructor
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Constructor {
    pub accessibility: Accessibility,
    pub parameter_count: usize,
}

impl Constructor {
    #[must_use]
    pub const fn new(accessibility: Accessibility, parameter_count: usize) -> Self {
        Self {
            accessibility,
            parameter_count,
        }
    }
}

///
/// Capability
///
/// Declarative markers a type can carry. The front-end answers presence and
/// argument queries; the builders never inspect attribute syntax.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum Capability {
    Immutable,
    OmitDefaultMemberValues,
    ReadOnly,
    RegisterActivator,
    RegisterCopier,
    RegisterSerializer,
    SerializationCallbacks,
    SuppressReferenceTracking,
    UseActivator,
}

impl Capability {
    /// Markers that each make a type immutable on their own.
    pub const IMMUTABLE: &'static [Self] = &[Self::Immutable, Self::ReadOnly];
}

///
/// AttributeArgument
/// One positional argument of a capability declaration.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum AttributeArgument {
    Bool(bool),
    Integer(i64),
    Null,
    String(String),
    Type(TypeHandle),
}

///
/// MemberInfo
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MemberInfo {
    pub name: String,
    pub kind: MemberKind,
}

///
/// MemberKind
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum MemberKind {
    Field { ty: TypeHandle },
    Method(MethodSignature),
    Property { ty: TypeHandle },
}

///
/// MethodSignature
/// `returns` is `None` for a method that returns no value.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MethodSignature {
    pub type_parameters: Vec<String>,
    pub parameters: Vec<TypeHandle>,
    pub returns: Option<TypeHandle>,
}

impl MethodSignature {
    #[must_use]
    pub fn new(parameters: Vec<TypeHandle>, returns: Option<TypeHandle>) -> Self {
        Self {
            type_parameters: Vec::new(),
            parameters,
            returns,
        }
    }

    #[must_use]
    pub fn with_type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }
}

///
/// SemanticSource
///
/// Query interface over resolved declarations. Handles passed in must have
/// been issued by the same source. Implementations are shared read-only
/// across extraction workers, hence `Sync`.
///

pub trait SemanticSource: Sync {
    /// Simple (unqualified, non-generic) name.
    fn name(&self, ty: TypeHandle) -> String;

    /// Fully-qualified display form, including generic parameters.
    fn display_name(&self, ty: TypeHandle) -> String;

    /// Namespace followed by the names of all containing types, dot-separated.
    /// Empty for a top-level type in the global namespace.
    fn namespace_and_nesting(&self, ty: TypeHandle) -> String;

    fn kind(&self, ty: TypeHandle) -> TypeKind;

    fn is_sealed(&self, ty: TypeHandle) -> bool;

    fn is_generic(&self, ty: TypeHandle) -> bool;

    fn declared_accessibility(&self, ty: TypeHandle) -> Accessibility;

    /// Lexically enclosing type, if any.
    fn containing_type(&self, ty: TypeHandle) -> Option<TypeHandle>;

    /// Declared base type, if any.
    fn base_type(&self, ty: TypeHandle) -> Option<TypeHandle>;

    /// Whether the type is the universal root of the class hierarchy.
    fn is_root_object(&self, ty: TypeHandle) -> bool;

    fn enum_underlying_type(&self, ty: TypeHandle) -> Option<TypeHandle>;

    /// Own and inherited generic parameters, flattened in declaration order.
    fn type_parameters(&self, ty: TypeHandle) -> Vec<TypeParameter>;

    /// Explicitly declared constructors.
    fn constructors(&self, ty: TypeHandle) -> Vec<Constructor>;

    fn has_capability(&self, ty: TypeHandle, capability: Capability) -> bool;

    /// Argument lists of every application of a repeatable capability, in
    /// declaration order.
    fn capability_arguments(
        &self,
        ty: TypeHandle,
        capability: Capability,
    ) -> Vec<Vec<AttributeArgument>>;

    /// Members declared directly on `ty` under exactly `name`. Inherited
    /// members are not included.
    fn members_named(&self, ty: TypeHandle, name: &str) -> Vec<MemberHandle>;

    fn member(&self, member: MemberHandle) -> MemberInfo;

    /// Display form of a member, used in complaints.
    fn member_display(&self, member: MemberHandle) -> String;

    /// Whether any declaration fragment of the type is marked partial.
    fn is_partial(&self, ty: TypeHandle) -> bool;

    /// Look a type up by its fully-qualified name.
    fn resolve_type(&self, qualified_name: &str) -> Option<TypeHandle>;

    //
    // provided
    //

    fn is_value_type(&self, ty: TypeHandle) -> bool {
        self.kind(ty).is_value_type()
    }

    fn is_enum(&self, ty: TypeHandle) -> bool {
        self.enum_underlying_type(ty).is_some()
    }

    fn has_any_capability(&self, ty: TypeHandle, capabilities: &[Capability]) -> bool {
        capabilities.iter().any(|c| self.has_capability(ty, *c))
    }
}
