//! Descriptors handed to the emission stage.
//!
//! Type and interface descriptors are derived here; member and method
//! descriptors are produced by the caller and only stored.

mod invokable;
mod ty;

pub use invokable::InvokableInterfaceDescriptor;
pub use ty::{BaseType, TypeDescriptor, is_empty_constructable};

use crate::source::{MemberHandle, TypeHandle};
use serde::Serialize;
use std::hash::{Hash, Hasher};

///
/// MemberDescriptor
/// One serializable member of a type, as discovered by the caller.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MemberDescriptor {
    pub name: String,
    pub member: MemberHandle,
    pub ty: TypeHandle,
    pub field_id: u32,
}

///
/// MethodDescriptor
///
/// One invokable method; the key of the generated-invoker index. Identity is
/// the (interface, method) handle pair; `name` is display only.
///

#[derive(Clone, Debug, Serialize)]
pub struct MethodDescriptor {
    pub interface: TypeHandle,
    pub method: MemberHandle,
    pub name: String,
}

impl MethodDescriptor {
    #[must_use]
    pub fn new(interface: TypeHandle, method: MemberHandle, name: impl Into<String>) -> Self {
        Self {
            interface,
            method,
            name: name.into(),
        }
    }
}

impl PartialEq for MethodDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.interface == other.interface && self.method == other.method
    }
}

impl Eq for MethodDescriptor {}

impl Hash for MethodDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.interface.hash(state);
        self.method.hash(state);
    }
}

///
/// GeneratedInvokerDescriptor
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GeneratedInvokerDescriptor {
    pub method: MethodDescriptor,
    pub name: String,
    pub generated_namespace: String,
}

impl GeneratedInvokerDescriptor {
    /// Fully-qualified name of the generated invoker.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.generated_namespace, self.name)
    }
}

///
/// GeneratedProxyDescriptor
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GeneratedProxyDescriptor {
    pub interface: TypeHandle,
    pub name: String,
    pub generated_namespace: String,
}
