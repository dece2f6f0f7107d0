use crate::{
    accessibility::Accessibility,
    source::{
        AttributeArgument, Capability, Constructor, MemberHandle, MemberInfo, MemberKind,
        MethodSignature, SemanticSource, TypeHandle, TypeKind, TypeParameter,
    },
};
use std::collections::HashMap;

///
/// TypeDecl
///
/// Declaration record for [`MemorySource`]. Built with chained setters and
/// handed to [`MemorySource::declare`].
///

#[derive(Clone, Debug)]
pub struct TypeDecl {
    name: String,
    namespace: Option<String>,
    kind: TypeKind,
    accessibility: Accessibility,
    sealed: bool,
    partial: bool,
    root_object: bool,
    containing: Option<TypeHandle>,
    base: Option<TypeHandle>,
    underlying: Option<TypeHandle>,
    type_parameters: Vec<String>,
    constructors: Vec<Constructor>,
    capabilities: Vec<(Capability, Vec<AttributeArgument>)>,
}

impl TypeDecl {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            kind,
            accessibility: Accessibility::Public,
            sealed: false,
            partial: false,
            root_object: false,
            containing: None,
            base: None,
            underlying: None,
            type_parameters: Vec::new(),
            constructors: Vec::new(),
            capabilities: Vec::new(),
        }
    }

    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    /// Value types are implicitly sealed.
    #[must_use]
    pub fn value_type(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Struct).sealed()
    }

    #[must_use]
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    #[must_use]
    pub fn enumeration(name: impl Into<String>, underlying: TypeHandle) -> Self {
        let mut decl = Self::new(name, TypeKind::Enum).sealed();
        decl.underlying = Some(underlying);
        decl
    }

    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub const fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    #[must_use]
    pub const fn sealed(mut self) -> Self {
        self.sealed = true;
        self
    }

    #[must_use]
    pub const fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// Mark this declaration as the root of the class hierarchy.
    #[must_use]
    pub const fn root_object(mut self) -> Self {
        self.root_object = true;
        self
    }

    #[must_use]
    pub const fn nested_in(mut self, containing: TypeHandle) -> Self {
        self.containing = Some(containing);
        self
    }

    #[must_use]
    pub const fn base(mut self, base: TypeHandle) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }

    #[must_use]
    pub fn constructor(mut self, accessibility: Accessibility, parameter_count: usize) -> Self {
        self.constructors
            .push(Constructor::new(accessibility, parameter_count));
        self
    }

    #[must_use]
    pub fn capability(self, capability: Capability) -> Self {
        self.capability_with(capability, Vec::new())
    }

    /// Apply a capability with positional arguments. Repeatable.
    #[must_use]
    pub fn capability_with(
        mut self,
        capability: Capability,
        arguments: Vec<AttributeArgument>,
    ) -> Self {
        self.capabilities.push((capability, arguments));
        self
    }
}

///
/// MemorySource
///
/// In-memory [`SemanticSource`] for drivers that resolve symbols up front and
/// for tests. Handles index into insertion-ordered tables.
///

#[derive(Debug, Default)]
pub struct MemorySource {
    types: Vec<TypeEntry>,
    members: Vec<MemberEntry>,
    by_name: HashMap<String, TypeHandle>,
}

#[derive(Debug)]
struct TypeEntry {
    decl: TypeDecl,
    members: Vec<MemberHandle>,
}

#[derive(Debug)]
struct MemberEntry {
    owner: TypeHandle,
    info: MemberInfo,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type declaration and return its handle. A later declaration
    /// with the same qualified name shadows the earlier one for lookups.
    pub fn declare(&mut self, decl: TypeDecl) -> TypeHandle {
        let handle = TypeHandle::new(next_id(self.types.len()));
        self.types.push(TypeEntry {
            decl,
            members: Vec::new(),
        });

        let qualified = self.qualified_name(handle);
        self.by_name.insert(qualified, handle);

        handle
    }

    pub fn declare_member(
        &mut self,
        owner: TypeHandle,
        name: impl Into<String>,
        kind: MemberKind,
    ) -> MemberHandle {
        let handle = MemberHandle::new(next_id(self.members.len()));
        self.members.push(MemberEntry {
            owner,
            info: MemberInfo {
                name: name.into(),
                kind,
            },
        });
        self.entry_mut(owner).members.push(handle);

        handle
    }

    pub fn declare_method(
        &mut self,
        owner: TypeHandle,
        name: impl Into<String>,
        signature: MethodSignature,
    ) -> MemberHandle {
        self.declare_member(owner, name, MemberKind::Method(signature))
    }

    /// Number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn entry(&self, ty: TypeHandle) -> &TypeEntry {
        &self.types[ty.id() as usize]
    }

    fn entry_mut(&mut self, ty: TypeHandle) -> &mut TypeEntry {
        &mut self.types[ty.id() as usize]
    }

    fn decl(&self, ty: TypeHandle) -> &TypeDecl {
        &self.entry(ty).decl
    }

    fn member_entry(&self, member: MemberHandle) -> &MemberEntry {
        &self.members[member.id() as usize]
    }

    // outermost containing type first, `ty` last
    fn nesting_chain(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        let mut chain = vec![ty];
        let mut current = self.decl(ty).containing;
        while let Some(outer) = current {
            chain.push(outer);
            current = self.decl(outer).containing;
        }
        chain.reverse();

        chain
    }

    fn qualified_name(&self, ty: TypeHandle) -> String {
        let prefix = self.namespace_and_nesting(ty);
        let name = &self.decl(ty).name;

        if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        }
    }
}

// ids are dense indexes; the tables never approach u32::MAX entries
#[allow(clippy::cast_possible_truncation)]
const fn next_id(len: usize) -> u32 {
    len as u32
}

impl SemanticSource for MemorySource {
    fn name(&self, ty: TypeHandle) -> String {
        self.decl(ty).name.clone()
    }

    fn display_name(&self, ty: TypeHandle) -> String {
        let qualified = self.qualified_name(ty);
        let params = &self.decl(ty).type_parameters;

        if params.is_empty() {
            qualified
        } else {
            format!("{qualified}<{}>", params.join(", "))
        }
    }

    fn namespace_and_nesting(&self, ty: TypeHandle) -> String {
        let chain = self.nesting_chain(ty);
        let outermost = self.decl(chain[0]);

        let mut parts: Vec<&str> = Vec::with_capacity(chain.len());
        if let Some(namespace) = outermost.namespace.as_deref() {
            parts.push(namespace);
        }
        for outer in &chain[..chain.len() - 1] {
            parts.push(&self.decl(*outer).name);
        }

        parts.join(".")
    }

    fn kind(&self, ty: TypeHandle) -> TypeKind {
        self.decl(ty).kind
    }

    fn is_sealed(&self, ty: TypeHandle) -> bool {
        self.decl(ty).sealed
    }

    fn is_generic(&self, ty: TypeHandle) -> bool {
        self.nesting_chain(ty)
            .iter()
            .any(|t| !self.decl(*t).type_parameters.is_empty())
    }

    fn declared_accessibility(&self, ty: TypeHandle) -> Accessibility {
        self.decl(ty).accessibility
    }

    fn containing_type(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.decl(ty).containing
    }

    fn base_type(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.decl(ty).base
    }

    fn is_root_object(&self, ty: TypeHandle) -> bool {
        self.decl(ty).root_object
    }

    fn enum_underlying_type(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.decl(ty).underlying
    }

    fn type_parameters(&self, ty: TypeHandle) -> Vec<TypeParameter> {
        self.nesting_chain(ty)
            .into_iter()
            .flat_map(|owner| {
                self.decl(owner)
                    .type_parameters
                    .iter()
                    .enumerate()
                    .map(move |(ordinal, name)| TypeParameter {
                        name: name.clone(),
                        owner,
                        ordinal,
                    })
            })
            .collect()
    }

    fn constructors(&self, ty: TypeHandle) -> Vec<Constructor> {
        self.decl(ty).constructors.clone()
    }

    fn has_capability(&self, ty: TypeHandle, capability: Capability) -> bool {
        self.decl(ty)
            .capabilities
            .iter()
            .any(|(c, _)| *c == capability)
    }

    fn capability_arguments(
        &self,
        ty: TypeHandle,
        capability: Capability,
    ) -> Vec<Vec<AttributeArgument>> {
        self.decl(ty)
            .capabilities
            .iter()
            .filter(|(c, _)| *c == capability)
            .map(|(_, args)| args.clone())
            .collect()
    }

    fn members_named(&self, ty: TypeHandle, name: &str) -> Vec<MemberHandle> {
        self.entry(ty)
            .members
            .iter()
            .copied()
            .filter(|m| self.member_entry(*m).info.name == name)
            .collect()
    }

    fn member(&self, member: MemberHandle) -> MemberInfo {
        self.member_entry(member).info.clone()
    }

    fn member_display(&self, member: MemberHandle) -> String {
        let entry = self.member_entry(member);
        let owner = self.display_name(entry.owner);

        match &entry.info.kind {
            MemberKind::Method(signature) => {
                let params = signature
                    .parameters
                    .iter()
                    .map(|p| self.display_name(*p))
                    .collect::<Vec<_>>()
                    .join(", ");
                let generics = if signature.type_parameters.is_empty() {
                    String::new()
                } else {
                    format!("<{}>", signature.type_parameters.join(", "))
                };

                format!("{owner}.{}{generics}({params})", entry.info.name)
            }
            MemberKind::Field { .. } | MemberKind::Property { .. } => {
                format!("{owner}.{}", entry.info.name)
            }
        }
    }

    fn is_partial(&self, ty: TypeHandle) -> bool {
        self.decl(ty).partial
    }

    fn resolve_type(&self, qualified_name: &str) -> Option<TypeHandle> {
        self.by_name.get(qualified_name).copied()
    }
}

///
/// TESTS
///
