use crate::{contract::ContractViolation, source::Capability};
use std::fmt;
use thiserror::Error as ThisError;

///
/// DescriptorError
///
/// Fatal failure to build one descriptor. Carries the identity of the type or
/// interface being processed, which invariant failed, and the complaint text.
/// Nothing is inserted into the model for the failing declaration.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{subject}: {message}")]
pub struct DescriptorError {
    pub subject: String,
    pub kind: DescriptorErrorKind,
    pub message: String,
}

impl DescriptorError {
    pub fn new(
        subject: impl Into<String>,
        kind: DescriptorErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            kind,
            message: message.into(),
        }
    }

    /// Construct a malformed-capability error for a declaration.
    pub(crate) fn malformed_capability(
        subject: impl Into<String>,
        capability: Capability,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            subject,
            DescriptorErrorKind::MalformedCapability(capability),
            message,
        )
    }

    #[must_use]
    pub const fn contract_violation(&self) -> Option<ContractViolation> {
        match self.kind {
            DescriptorErrorKind::Contract(violation) => Some(violation),
            DescriptorErrorKind::MalformedCapability(_) => None,
        }
    }
}

///
/// DescriptorErrorKind
/// Discriminator for the invariant a rejected declaration failed.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DescriptorErrorKind {
    Contract(ContractViolation),
    MalformedCapability(Capability),
}

impl fmt::Display for DescriptorErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contract(violation) => write!(f, "contract:{}", violation.code()),
            Self::MalformedCapability(capability) => {
                write!(f, "malformed_capability:{capability}")
            }
        }
    }
}
