use crate::source::{SemanticSource, TypeHandle};
use rivet_config::GeneratorConfig;
use thiserror::Error as ThisError;

///
/// LibraryError
///

#[derive(Debug, ThisError)]
pub enum LibraryError {
    #[error("well-known type '{name}' ({role}) not found in the semantic source")]
    UnresolvedType { role: &'static str, name: String },
}

///
/// LibraryTypes
///
/// Well-known runtime types and names, resolved once per generation run
/// against the semantic source.
///

#[derive(Clone, Debug)]
pub struct LibraryTypes {
    pub namespace_root: String,
    pub dispatch_method: String,
    pub response_completion_source: TypeHandle,
    pub invokable: TypeHandle,
}

impl LibraryTypes {
    pub fn resolve(
        source: &dyn SemanticSource,
        config: &GeneratorConfig,
    ) -> Result<Self, LibraryError> {
        let response_completion_source = resolve_named(
            source,
            "response completion source",
            &config.well_known.response_completion_source,
        )?;
        let invokable = resolve_named(source, "invokable request", &config.well_known.invokable)?;

        Ok(Self {
            namespace_root: config.namespace_root.clone(),
            dispatch_method: config.dispatch_method.clone(),
            response_completion_source,
            invokable,
        })
    }

    /// Prefix a namespace-and-nesting path with the generation root.
    #[must_use]
    pub fn generated_namespace(&self, namespace: &str) -> String {
        if namespace.is_empty() {
            self.namespace_root.clone()
        } else {
            format!("{}.{namespace}", self.namespace_root)
        }
    }
}

// resolve_named
fn resolve_named(
    source: &dyn SemanticSource,
    role: &'static str,
    name: &str,
) -> Result<TypeHandle, LibraryError> {
    source
        .resolve_type(name)
        .ok_or_else(|| LibraryError::UnresolvedType {
            role,
            name: name.to_string(),
        })
}

///
/// TESTS
///
