//! The extraction pass.
//!
//! Items discovered by the front end are turned into descriptors and
//! appended to one [`MetadataModel`]. A failing item is reported and skipped;
//! whether a failure aborts generation is left to the caller.

use crate::Error;
use rivet_config::GeneratorConfig;
use rivet_model::{
    descriptor::{
        InvokableInterfaceDescriptor, MemberDescriptor, MethodDescriptor, TypeDescriptor,
    },
    library::LibraryTypes,
    model::{MetadataModel, ModelError},
    source::{Capability, SemanticSource, TypeHandle},
};
use std::{
    collections::HashSet,
    num::NonZeroUsize,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    thread,
};

///
/// Discovered
/// One unit of work found by the front end.
///

#[derive(Clone, Debug)]
pub enum Discovered {
    Type(DiscoveredType),
    Interface(DiscoveredInterface),

    /// A type that is not serialized itself but may register providers.
    Provider(TypeHandle),
}

impl From<DiscoveredType> for Discovered {
    fn from(item: DiscoveredType) -> Self {
        Self::Type(item)
    }
}

impl From<DiscoveredInterface> for Discovered {
    fn from(item: DiscoveredInterface) -> Self {
        Self::Interface(item)
    }
}

///
/// DiscoveredType
///

#[derive(Clone, Debug)]
pub struct DiscoveredType {
    pub ty: TypeHandle,
    pub members: Vec<MemberDescriptor>,
    pub alias: Option<String>,
    pub well_known_id: Option<u32>,
    pub activatable: bool,
}

impl DiscoveredType {
    #[must_use]
    pub const fn new(ty: TypeHandle, members: Vec<MemberDescriptor>) -> Self {
        Self {
            ty,
            members,
            alias: None,
            well_known_id: None,
            activatable: false,
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub const fn with_well_known_id(mut self, id: u32) -> Self {
        self.well_known_id = Some(id);
        self
    }

    #[must_use]
    pub const fn activatable(mut self) -> Self {
        self.activatable = true;
        self
    }
}

///
/// DiscoveredInterface
///

#[derive(Clone, Debug)]
pub struct DiscoveredInterface {
    pub interface: TypeHandle,
    pub name: String,
    pub methods: Vec<MethodDescriptor>,
    pub proxy_base: TypeHandle,
    pub is_extension: bool,
}

impl DiscoveredInterface {
    #[must_use]
    pub fn new(
        interface: TypeHandle,
        name: impl Into<String>,
        methods: Vec<MethodDescriptor>,
        proxy_base: TypeHandle,
    ) -> Self {
        Self {
            interface,
            name: name.into(),
            methods,
            proxy_base,
            is_extension: false,
        }
    }

    #[must_use]
    pub const fn extension(mut self) -> Self {
        self.is_extension = true;
        self
    }
}

///
/// CancelToken
///
/// Shared stop flag. Checked between items only; an item that has started is
/// always finished.
///

#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

///
/// PassFailure
///

#[derive(Debug)]
pub struct PassFailure {
    /// Position of the failed item in the discovered list.
    pub index: usize,
    pub error: rivet_model::Error,
}

///
/// PassReport
///

#[derive(Debug)]
pub struct PassReport {
    pub model: MetadataModel,
    pub failures: Vec<PassFailure>,
    pub processed: usize,
    pub total: usize,
}

impl PassReport {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.processed < self.total
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.is_cancelled()
    }

    /// Treat any failure or cancellation as fatal.
    pub fn into_result(self) -> Result<MetadataModel, Error> {
        if self.is_cancelled() {
            return Err(Error::Cancelled {
                processed: self.processed,
                total: self.total,
            });
        }

        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.error.into()),
            None => Ok(self.model),
        }
    }
}

///
/// ExtractionPass
///

pub struct ExtractionPass<'a> {
    source: &'a dyn SemanticSource,
    library: LibraryTypes,
    model: MetadataModel,
    cancel: CancelToken,
    parallelism: usize,
}

impl<'a> ExtractionPass<'a> {
    /// Resolve the well-known runtime types and seed the model with the
    /// configured application parts.
    pub fn new(source: &'a dyn SemanticSource, config: &GeneratorConfig) -> Result<Self, Error> {
        config.validate()?;
        let library = LibraryTypes::resolve(source, config)?;

        let mut model = MetadataModel::new();
        for part in &config.application_parts {
            model.add_application_part(part.as_str());
        }

        Ok(Self {
            source,
            library,
            model,
            cancel: CancelToken::new(),
            parallelism: worker_count(config.parallelism),
        })
    }

    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    #[must_use]
    pub const fn library(&self) -> &LibraryTypes {
        &self.library
    }

    // run
    pub fn run(mut self, items: &[Discovered]) -> PassReport {
        let mut failures = Vec::new();
        let mut processed = 0;

        for (index, item) in items.iter().enumerate() {
            if self.cancel.is_cancelled() {
                break;
            }

            let outcome = extract(self.source, &self.library, item);
            self.commit(index, outcome, &mut failures);
            processed += 1;
        }

        self.finish(failures, processed, items.len())
    }

    /// Extract on scoped worker threads, then insert in discovery order.
    ///
    /// The resulting model is identical to the one [`Self::run`] produces for
    /// the same items.
    pub fn run_parallel(mut self, items: &[Discovered]) -> PassReport {
        let workers = self.parallelism.clamp(1, items.len().max(1));
        let next = AtomicUsize::new(0);
        let done = Mutex::new(Vec::with_capacity(items.len()));

        let source = self.source;
        let library = &self.library;
        let cancel = &self.cancel;

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    while !cancel.is_cancelled() {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(item) = items.get(index) else {
                            break;
                        };

                        let outcome = extract(source, library, item);
                        done.lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push((index, outcome));
                    }
                });
            }
        });

        let mut outcomes = done.into_inner().unwrap_or_else(PoisonError::into_inner);
        outcomes.sort_by_key(|(index, _)| *index);

        let mut failures = Vec::new();
        let processed = outcomes.len();
        for (index, outcome) in outcomes {
            self.commit(index, outcome, &mut failures);
        }

        self.finish(failures, processed, items.len())
    }

    // commit
    fn commit(
        &mut self,
        index: usize,
        outcome: Result<Outcome, rivet_model::Error>,
        failures: &mut Vec<PassFailure>,
    ) {
        let result = outcome.and_then(|outcome| insert(&mut self.model, outcome));

        if let Err(error) = result {
            tracing::warn!(index, %error, "discovered item rejected");
            failures.push(PassFailure { index, error });
        }
    }

    // finish
    fn finish(self, failures: Vec<PassFailure>, processed: usize, total: usize) -> PassReport {
        let summary = self.model.summary();
        tracing::info!(
            processed,
            total,
            failed = failures.len(),
            %summary,
            "extraction pass finished"
        );

        PassReport {
            model: self.model,
            failures,
            processed,
            total,
        }
    }
}

///
/// Outcome
/// A finished item, waiting to be inserted into the model.
///

#[derive(Debug)]
enum Outcome {
    Type {
        descriptor: TypeDescriptor,
        alias: Option<String>,
        well_known_id: Option<u32>,
        activatable: bool,
        providers: Providers,
    },
    Interface(InvokableInterfaceDescriptor),
    Provider {
        ty: TypeHandle,
        providers: Providers,
    },
}

///
/// Providers
/// Which provider registrations a type carries.
///

#[derive(Clone, Copy, Debug, Default)]
struct Providers {
    serializer: bool,
    activator: bool,
    copier: bool,
}

impl Providers {
    fn of(source: &dyn SemanticSource, ty: TypeHandle) -> Self {
        Self {
            serializer: source.has_capability(ty, Capability::RegisterSerializer),
            activator: source.has_capability(ty, Capability::RegisterActivator),
            copier: source.has_capability(ty, Capability::RegisterCopier),
        }
    }

    fn register(self, model: &mut MetadataModel, ty: TypeHandle) {
        if self.serializer {
            model.add_detected_serializer(ty);
        }
        if self.activator {
            model.add_detected_activator(ty);
        }
        if self.copier {
            model.add_detected_copier(ty);
        }
    }
}

// worker_count
// zero asks for one worker per available core
fn worker_count(configured: usize) -> usize {
    match configured {
        0 => thread::available_parallelism().map_or(1, NonZeroUsize::get),
        n => n,
    }
}

// extract
fn extract(
    source: &dyn SemanticSource,
    library: &LibraryTypes,
    item: &Discovered,
) -> Result<Outcome, rivet_model::Error> {
    let outcome = match item {
        Discovered::Type(item) => Outcome::Type {
            descriptor: TypeDescriptor::build(source, library, item.ty, item.members.clone())?,
            alias: item.alias.clone(),
            well_known_id: item.well_known_id,
            activatable: item.activatable,
            providers: Providers::of(source, item.ty),
        },

        Discovered::Interface(item) => {
            Outcome::Interface(InvokableInterfaceDescriptor::build(
                source,
                library,
                item.interface,
                item.name.clone(),
                item.methods.clone(),
                item.proxy_base,
                item.is_extension,
            )?)
        }

        Discovered::Provider(ty) => Outcome::Provider {
            ty: *ty,
            providers: Providers::of(source, *ty),
        },
    };

    Ok(outcome)
}

// insert
// every check runs before the first insertion so a rejected item leaves no trace
fn insert(model: &mut MetadataModel, outcome: Outcome) -> Result<(), rivet_model::Error> {
    match outcome {
        Outcome::Type {
            descriptor,
            alias,
            well_known_id,
            activatable,
            providers,
        } => {
            let ty = descriptor.underlying_type();
            if let Some(id) = well_known_id {
                model.add_well_known_type_id(ty, id)?;
            }
            if let Some(alias) = alias {
                model.add_type_alias(ty, alias);
            }
            providers.register(model, ty);
            if activatable {
                model.add_activatable_type(descriptor.clone());
            }
            model.add_serializable_type(descriptor);
        }

        Outcome::Interface(descriptor) => {
            let invokers = descriptor.generated_invokers();

            let mut seen = HashSet::new();
            for invoker in &invokers {
                if model.has_invoker(&invoker.method) || !seen.insert(&invoker.method) {
                    return Err(ModelError::DuplicateInvoker(invoker.method.name.clone()).into());
                }
            }

            model.add_generated_proxy(descriptor.generated_proxy());
            for invoker in invokers {
                model.add_generated_invoker(invoker)?;
            }
            model.add_invokable_interface(descriptor);
        }

        Outcome::Provider { ty, providers } => providers.register(model, ty),
    }

    Ok(())
}

///
/// TESTS
///
