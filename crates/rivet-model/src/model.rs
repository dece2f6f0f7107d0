use crate::{
    descriptor::{
        GeneratedInvokerDescriptor, GeneratedProxyDescriptor, InvokableInterfaceDescriptor,
        MethodDescriptor, TypeDescriptor,
    },
    source::TypeHandle,
};
use serde::Serialize;
use std::{
    collections::{BTreeSet, HashMap},
    fmt,
};
use thiserror::Error as ThisError;

///
/// ModelError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ModelError {
    #[error("generated invoker for method '{0}' already registered")]
    DuplicateInvoker(String),

    #[error("well-known type id {id} already assigned to {existing}, cannot assign to {ty}")]
    DuplicateWellKnownId {
        id: u32,
        existing: TypeHandle,
        ty: TypeHandle,
    },
}

///
/// MetadataModel
///
/// Everything one generation run extracted, in discovery order. Entries are
/// appended during extraction and never removed or replaced; the emission
/// stage only reads.
///

#[derive(Debug, Default, Serialize)]
pub struct MetadataModel {
    serializable_types: Vec<TypeDescriptor>,
    invokable_interfaces: Vec<InvokableInterfaceDescriptor>,
    generated_invokers: Vec<GeneratedInvokerDescriptor>,
    generated_proxies: Vec<GeneratedProxyDescriptor>,
    activatable_types: Vec<TypeDescriptor>,
    detected_serializers: Vec<TypeHandle>,
    detected_activators: Vec<TypeHandle>,
    detected_copiers: Vec<TypeHandle>,
    type_aliases: Vec<(TypeHandle, String)>,
    well_known_type_ids: Vec<(TypeHandle, u32)>,
    application_parts: BTreeSet<String>,

    #[serde(skip)]
    invoker_index: HashMap<MethodDescriptor, usize>,
    #[serde(skip)]
    well_known_index: HashMap<u32, TypeHandle>,
}

impl MetadataModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    //
    // insertion
    //

    pub fn add_serializable_type(&mut self, descriptor: TypeDescriptor) {
        self.serializable_types.push(descriptor);
    }

    pub fn add_invokable_interface(&mut self, descriptor: InvokableInterfaceDescriptor) {
        self.invokable_interfaces.push(descriptor);
    }

    /// Register the invoker for one method. Exactly one invoker may exist per
    /// method; a second registration is rejected and the first is kept.
    pub fn add_generated_invoker(
        &mut self,
        invoker: GeneratedInvokerDescriptor,
    ) -> Result<(), ModelError> {
        if self.invoker_index.contains_key(&invoker.method) {
            return Err(ModelError::DuplicateInvoker(invoker.method.name));
        }

        self.invoker_index
            .insert(invoker.method.clone(), self.generated_invokers.len());
        self.generated_invokers.push(invoker);

        Ok(())
    }

    pub fn add_generated_proxy(&mut self, proxy: GeneratedProxyDescriptor) {
        self.generated_proxies.push(proxy);
    }

    pub fn add_activatable_type(&mut self, descriptor: TypeDescriptor) {
        self.activatable_types.push(descriptor);
    }

    pub fn add_detected_serializer(&mut self, ty: TypeHandle) {
        self.detected_serializers.push(ty);
    }

    pub fn add_detected_activator(&mut self, ty: TypeHandle) {
        self.detected_activators.push(ty);
    }

    pub fn add_detected_copier(&mut self, ty: TypeHandle) {
        self.detected_copiers.push(ty);
    }

    pub fn add_type_alias(&mut self, ty: TypeHandle, alias: impl Into<String>) {
        self.type_aliases.push((ty, alias.into()));
    }

    /// Assign a well-known numeric id. Ids are unique across the run.
    pub fn add_well_known_type_id(&mut self, ty: TypeHandle, id: u32) -> Result<(), ModelError> {
        if let Some(existing) = self.well_known_index.get(&id) {
            return Err(ModelError::DuplicateWellKnownId {
                id,
                existing: *existing,
                ty,
            });
        }

        self.well_known_index.insert(id, ty);
        self.well_known_type_ids.push((ty, id));

        Ok(())
    }

    /// Returns false if the part was already present.
    pub fn add_application_part(&mut self, name: impl Into<String>) -> bool {
        self.application_parts.insert(name.into())
    }

    //
    // lookup
    //

    #[must_use]
    pub fn has_invoker(&self, method: &MethodDescriptor) -> bool {
        self.invoker_index.contains_key(method)
    }

    #[must_use]
    pub fn invoker(&self, method: &MethodDescriptor) -> Option<&GeneratedInvokerDescriptor> {
        self.invoker_index
            .get(method)
            .map(|index| &self.generated_invokers[*index])
    }

    #[must_use]
    pub fn is_well_known_id_taken(&self, id: u32) -> bool {
        self.well_known_index.contains_key(&id)
    }

    //
    // iteration
    //

    #[must_use]
    pub fn serializable_types(&self) -> &[TypeDescriptor] {
        &self.serializable_types
    }

    #[must_use]
    pub fn invokable_interfaces(&self) -> &[InvokableInterfaceDescriptor] {
        &self.invokable_interfaces
    }

    /// Invokers in registration order.
    #[must_use]
    pub fn generated_invokers(&self) -> &[GeneratedInvokerDescriptor] {
        &self.generated_invokers
    }

    #[must_use]
    pub fn generated_proxies(&self) -> &[GeneratedProxyDescriptor] {
        &self.generated_proxies
    }

    #[must_use]
    pub fn activatable_types(&self) -> &[TypeDescriptor] {
        &self.activatable_types
    }

    #[must_use]
    pub fn detected_serializers(&self) -> &[TypeHandle] {
        &self.detected_serializers
    }

    #[must_use]
    pub fn detected_activators(&self) -> &[TypeHandle] {
        &self.detected_activators
    }

    #[must_use]
    pub fn detected_copiers(&self) -> &[TypeHandle] {
        &self.detected_copiers
    }

    #[must_use]
    pub fn type_aliases(&self) -> &[(TypeHandle, String)] {
        &self.type_aliases
    }

    #[must_use]
    pub fn well_known_type_ids(&self) -> &[(TypeHandle, u32)] {
        &self.well_known_type_ids
    }

    pub fn application_parts(&self) -> impl Iterator<Item = &str> {
        self.application_parts.iter().map(String::as_str)
    }

    #[must_use]
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            serializable_types: self.serializable_types.len(),
            invokable_interfaces: self.invokable_interfaces.len(),
            generated_invokers: self.generated_invokers.len(),
            generated_proxies: self.generated_proxies.len(),
            activatable_types: self.activatable_types.len(),
            detected_providers: self.detected_serializers.len()
                + self.detected_activators.len()
                + self.detected_copiers.len(),
            type_aliases: self.type_aliases.len(),
            well_known_type_ids: self.well_known_type_ids.len(),
            application_parts: self.application_parts.len(),
        }
    }
}

///
/// ModelSummary
/// Entry counts per category.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ModelSummary {
    pub serializable_types: usize,
    pub invokable_interfaces: usize,
    pub generated_invokers: usize,
    pub generated_proxies: usize,
    pub activatable_types: usize,
    pub detected_providers: usize,
    pub type_aliases: usize,
    pub well_known_type_ids: usize,
    pub application_parts: usize,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} types, {} interfaces, {} invokers, {} proxies, {} activatable, \
             {} providers, {} aliases, {} ids, {} parts",
            self.serializable_types,
            self.invokable_interfaces,
            self.generated_invokers,
            self.generated_proxies,
            self.activatable_types,
            self.detected_providers,
            self.type_aliases,
            self.well_known_type_ids,
            self.application_parts,
        )
    }
}

///
/// TESTS
///
