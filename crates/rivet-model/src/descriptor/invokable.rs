use crate::{
    contract::validate_proxy_base,
    descriptor::{GeneratedInvokerDescriptor, GeneratedProxyDescriptor, MethodDescriptor},
    error::DescriptorError,
    library::LibraryTypes,
    source::{SemanticSource, TypeHandle},
};
use serde::Serialize;

///
/// InvokableInterfaceDescriptor
///
/// An RPC-style interface together with the proxy base its generated proxy
/// derives from. Construction fails outright if the proxy base does not
/// satisfy the dispatch contract.
///

#[derive(Clone, Debug, Serialize)]
pub struct InvokableInterfaceDescriptor {
    interface_type: TypeHandle,
    name: String,
    methods: Vec<MethodDescriptor>,
    proxy_base_type: TypeHandle,
    is_extension: bool,
    generated_namespace: String,
}

impl InvokableInterfaceDescriptor {
    pub fn build(
        source: &dyn SemanticSource,
        library: &LibraryTypes,
        interface_type: TypeHandle,
        name: impl Into<String>,
        methods: Vec<MethodDescriptor>,
        proxy_base_type: TypeHandle,
        is_extension: bool,
    ) -> Result<Self, DescriptorError> {
        validate_proxy_base(source, library, proxy_base_type)?;

        let generated_namespace =
            library.generated_namespace(&source.namespace_and_nesting(interface_type));
        let descriptor = Self {
            interface_type,
            name: name.into(),
            methods,
            proxy_base_type,
            is_extension,
            generated_namespace,
        };

        tracing::debug!(
            interface = %descriptor.name,
            methods = descriptor.methods.len(),
            namespace = %descriptor.generated_namespace,
            "built invokable interface descriptor"
        );

        Ok(descriptor)
    }

    #[must_use]
    pub const fn interface_type(&self) -> TypeHandle {
        self.interface_type
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    #[must_use]
    pub const fn proxy_base_type(&self) -> TypeHandle {
        self.proxy_base_type
    }

    #[must_use]
    pub const fn is_extension(&self) -> bool {
        self.is_extension
    }

    #[must_use]
    pub fn generated_namespace(&self) -> &str {
        &self.generated_namespace
    }

    /// The proxy class generated for this interface.
    #[must_use]
    pub fn generated_proxy(&self) -> GeneratedProxyDescriptor {
        GeneratedProxyDescriptor {
            interface: self.interface_type,
            name: format!("Proxy_{}", self.name),
            generated_namespace: self.generated_namespace.clone(),
        }
    }

    /// One invoker per method; the index keeps overloads apart.
    #[must_use]
    pub fn generated_invokers(&self) -> Vec<GeneratedInvokerDescriptor> {
        self.methods
            .iter()
            .enumerate()
            .map(|(index, method)| GeneratedInvokerDescriptor {
                method: method.clone(),
                name: format!("Invokable_{}_{}_{index}", self.name, method.name),
                generated_namespace: self.generated_namespace.clone(),
            })
            .collect()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        contract::ContractViolation,
        source::{MemorySource, MethodSignature, TypeDecl},
    };
    use rivet_config::GeneratorConfig;

    struct Fixture {
        source: MemorySource,
        library: LibraryTypes,
        interface: TypeHandle,
        base: TypeHandle,
    }

    fn fixture() -> Fixture {
        let mut source = MemorySource::new();
        let rcs = source.declare(
            TypeDecl::interface("IResponseCompletionSource").in_namespace("Rivet.Invocation"),
        );
        let inv = source.declare(TypeDecl::interface("IInvokable").in_namespace("Rivet.Invocation"));
        let outer = source.declare(TypeDecl::class("Services").in_namespace("Acme"));
        let interface = source.declare(TypeDecl::interface("IOrders").nested_in(outer));
        let base = source.declare(TypeDecl::class("ProxyBase").in_namespace("Acme"));
        source.declare_method(base, "SendRequest", MethodSignature::new(vec![rcs, inv], None));
        let library = LibraryTypes::resolve(&source, &GeneratorConfig::default())
            .expect("runtime types should resolve");

        Fixture {
            source,
            library,
            interface,
            base,
        }
    }

    #[test]
    fn namespace_follows_nesting_path() {
        let mut f = fixture();
        let place = f
            .source
            .declare_method(f.interface, "Place", MethodSignature::default());
        let methods = vec![MethodDescriptor::new(f.interface, place, "Place")];

        let desc = InvokableInterfaceDescriptor::build(
            &f.source, &f.library, f.interface, "IOrders", methods, f.base, false,
        )
        .expect("valid base should build");

        assert_eq!(desc.generated_namespace(), "RivetGenerated.Acme.Services");
        assert_eq!(desc.proxy_base_type(), f.base);
        assert!(!desc.is_extension());
        assert_eq!(desc.generated_proxy().name, "Proxy_IOrders");

        let invokers = desc.generated_invokers();
        assert_eq!(invokers.len(), 1);
        assert_eq!(
            invokers[0].qualified_name(),
            "RivetGenerated.Acme.Services.Invokable_IOrders_Place_0"
        );
    }

    #[test]
    fn invalid_base_yields_no_descriptor() {
        let mut f = fixture();
        let bad_base = f.source.declare(TypeDecl::class("BadBase").in_namespace("Acme"));

        let err = InvokableInterfaceDescriptor::build(
            &f.source,
            &f.library,
            f.interface,
            "IOrders",
            Vec::new(),
            bad_base,
            true,
        )
        .expect_err("base without dispatch method should fail");

        assert_eq!(err.subject, "Acme.BadBase");
        assert_eq!(err.contract_violation(), Some(ContractViolation::NotFound));
    }
}
