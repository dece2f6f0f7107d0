#![allow(dead_code)]

use rivet_config::GeneratorConfig;
use rivet_model::{
    library::LibraryTypes,
    source::{MemorySource, TypeDecl, TypeHandle},
};

///
/// Runtime
/// Source pre-populated with the well-known invocation types.
///

pub struct Runtime {
    pub source: MemorySource,
    pub library: LibraryTypes,
    pub completion_source: TypeHandle,
    pub invokable: TypeHandle,
    pub int32: TypeHandle,
    pub object: TypeHandle,
}

pub fn runtime() -> Runtime {
    let mut source = MemorySource::new();
    let completion_source = source.declare(
        TypeDecl::interface("IResponseCompletionSource").in_namespace("Rivet.Invocation"),
    );
    let invokable = source.declare(TypeDecl::interface("IInvokable").in_namespace("Rivet.Invocation"));
    let int32 = source.declare(TypeDecl::value_type("Int32").in_namespace("System"));
    let object = source.declare(TypeDecl::class("Object").in_namespace("System").root_object());
    let library = LibraryTypes::resolve(&source, &GeneratorConfig::default())
        .expect("runtime types should resolve");

    Runtime {
        source,
        library,
        completion_source,
        invokable,
        int32,
        object,
    }
}
