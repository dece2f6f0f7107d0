use crate::{
    accessibility::{Accessibility, effective_accessibility},
    descriptor::MemberDescriptor,
    error::DescriptorError,
    ident::allocate_unique,
    library::LibraryTypes,
    source::{
        AttributeArgument, Capability, Constructor, SemanticSource, TypeHandle, TypeParameter,
    },
};
use serde::Serialize;

///
/// BaseType
/// Enum types report their underlying representation instead of a base.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum BaseType {
    EnumUnderlying(TypeHandle),
    Declared(TypeHandle),
    None,
}

impl BaseType {
    #[must_use]
    pub const fn handle(self) -> Option<TypeHandle> {
        match self {
            Self::EnumUnderlying(ty) | Self::Declared(ty) => Some(ty),
            Self::None => None,
        }
    }
}

///
/// TypeDescriptor
///
/// Every fact the emitter needs about one serializable type. Built once by
/// [`TypeDescriptor::build`] and immutable afterwards.
///

#[derive(Clone, Debug, Serialize)]
pub struct TypeDescriptor {
    underlying_type: TypeHandle,
    name: String,
    namespace: String,
    generated_namespace: String,
    type_syntax: String,
    accessibility: Accessibility,
    type_parameters: Vec<(String, TypeParameter)>,
    is_value_type: bool,
    is_sealed: bool,
    is_enum: bool,
    is_generic: bool,
    is_partial: bool,
    base_type: BaseType,
    has_complex_base_type: bool,
    members: Vec<MemberDescriptor>,
    serialization_hooks: Vec<TypeHandle>,
    is_empty_constructable: bool,
    use_activator: bool,
    track_references: bool,
    omit_default_member_values: bool,
    is_immutable: bool,
}

impl TypeDescriptor {
    /// Derive the descriptor for `ty`. `members` are stored as given.
    pub fn build(
        source: &dyn SemanticSource,
        library: &LibraryTypes,
        ty: TypeHandle,
        members: Vec<MemberDescriptor>,
    ) -> Result<Self, DescriptorError> {
        let type_syntax = source.display_name(ty);
        let serialization_hooks = serialization_hooks(source, ty, &type_syntax)?;

        let parameters = source.type_parameters(ty);
        let names = allocate_unique(
            &parameters
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>(),
        );
        let type_parameters = names.into_iter().zip(parameters).collect();

        let is_value_type = source.is_value_type(ty);
        let base_type = match (source.enum_underlying_type(ty), source.base_type(ty)) {
            (Some(underlying), _) => BaseType::EnumUnderlying(underlying),
            (None, Some(base)) => BaseType::Declared(base),
            (None, None) => BaseType::None,
        };
        let has_complex_base_type = !is_value_type
            && matches!(base_type, BaseType::Declared(base) if !source.is_root_object(base));
        let is_enum = matches!(base_type, BaseType::EnumUnderlying(_));

        let is_empty_constructable = is_empty_constructable(&source.constructors(ty));
        let use_activator =
            source.has_capability(ty, Capability::UseActivator) || !is_empty_constructable;
        let track_references =
            !is_value_type && !source.has_capability(ty, Capability::SuppressReferenceTracking);
        let is_immutable = is_enum || source.has_any_capability(ty, Capability::IMMUTABLE);

        let namespace = source.namespace_and_nesting(ty);
        let generated_namespace = library.generated_namespace(&namespace);

        let descriptor = Self {
            underlying_type: ty,
            name: source.name(ty),
            namespace,
            generated_namespace,
            type_syntax,
            accessibility: effective_accessibility(source, ty),
            type_parameters,
            is_value_type,
            is_sealed: source.is_sealed(ty),
            is_enum,
            is_generic: source.is_generic(ty),
            is_partial: source.is_partial(ty),
            base_type,
            has_complex_base_type,
            members,
            serialization_hooks,
            is_empty_constructable,
            use_activator,
            track_references,
            omit_default_member_values: source
                .has_capability(ty, Capability::OmitDefaultMemberValues),
            is_immutable,
        };

        tracing::debug!(
            ty = %descriptor.type_syntax,
            accessibility = %descriptor.accessibility,
            use_activator,
            track_references,
            is_immutable,
            "built type descriptor"
        );

        Ok(descriptor)
    }

    #[must_use]
    pub const fn underlying_type(&self) -> TypeHandle {
        self.underlying_type
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace and nesting path of the type.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn generated_namespace(&self) -> &str {
        &self.generated_namespace
    }

    /// Display projection of the type, computed once at build time.
    #[must_use]
    pub fn type_syntax(&self) -> &str {
        &self.type_syntax
    }

    #[must_use]
    pub const fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    /// Generated name paired with each original parameter, flattened.
    #[must_use]
    pub fn type_parameters(&self) -> &[(String, TypeParameter)] {
        &self.type_parameters
    }

    #[must_use]
    pub const fn is_value_type(&self) -> bool {
        self.is_value_type
    }

    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.is_sealed
    }

    #[must_use]
    pub const fn is_enum(&self) -> bool {
        self.is_enum
    }

    #[must_use]
    pub const fn is_generic(&self) -> bool {
        self.is_generic
    }

    /// Whether generated members may be added to the type directly.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.is_partial
    }

    #[must_use]
    pub const fn base_type(&self) -> BaseType {
        self.base_type
    }

    #[must_use]
    pub const fn has_complex_base_type(&self) -> bool {
        self.has_complex_base_type
    }

    #[must_use]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    #[must_use]
    pub fn serialization_hooks(&self) -> &[TypeHandle] {
        &self.serialization_hooks
    }

    #[must_use]
    pub const fn is_empty_constructable(&self) -> bool {
        self.is_empty_constructable
    }

    #[must_use]
    pub const fn use_activator(&self) -> bool {
        self.use_activator
    }

    #[must_use]
    pub const fn track_references(&self) -> bool {
        self.track_references
    }

    #[must_use]
    pub const fn omit_default_member_values(&self) -> bool {
        self.omit_default_member_values
    }

    #[must_use]
    pub const fn is_immutable(&self) -> bool {
        self.is_immutable
    }
}

/// A type is empty-constructable when it declares no constructors at all, or
/// when one of its zero-argument constructors is public.
#[must_use]
pub fn is_empty_constructable(constructors: &[Constructor]) -> bool {
    constructors.is_empty()
        || constructors
            .iter()
            .any(|c| c.parameter_count == 0 && c.accessibility.is_public())
}

// each SerializationCallbacks application must name its hook type first
fn serialization_hooks(
    source: &dyn SemanticSource,
    ty: TypeHandle,
    subject: &str,
) -> Result<Vec<TypeHandle>, DescriptorError> {
    source
        .capability_arguments(ty, Capability::SerializationCallbacks)
        .into_iter()
        .enumerate()
        .map(|(index, args)| match args.first() {
            Some(AttributeArgument::Type(hook)) => Ok(*hook),
            Some(other) => Err(DescriptorError::malformed_capability(
                subject,
                Capability::SerializationCallbacks,
                format!("declaration #{index} expects a hook type argument, found {other:?}"),
            )),
            None => Err(DescriptorError::malformed_capability(
                subject,
                Capability::SerializationCallbacks,
                format!("declaration #{index} is missing its hook type argument"),
            )),
        })
        .collect()
}

///
/// TESTS
///
