//! Descriptor extraction for rivet: derives serializer and proxy descriptors
//! from a read-only semantic source and accumulates them in the metadata model.
#![warn(unreachable_pub)]

pub mod accessibility;
pub mod contract;
pub mod descriptor;
pub mod error;
pub mod ident;
pub mod library;
pub mod model;
pub mod source;

use thiserror::Error as ThisError;

///
/// Prelude
///
/// Domain vocabulary only; builders and errors are imported explicitly.
///

pub mod prelude {
    pub use crate::{
        accessibility::Accessibility,
        descriptor::{
            GeneratedInvokerDescriptor, GeneratedProxyDescriptor, InvokableInterfaceDescriptor,
            MemberDescriptor, MethodDescriptor, TypeDescriptor,
        },
        library::LibraryTypes,
        model::MetadataModel,
        source::{Capability, MemberHandle, SemanticSource, TypeHandle, TypeKind},
    };
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Descriptor(#[from] error::DescriptorError),

    #[error(transparent)]
    Library(#[from] library::LibraryError),

    #[error(transparent)]
    Model(#[from] model::ModelError),
}
