//! Proxy base contract validation.
//!
//! A proxy base type receives every forwarded invocation through one dispatch
//! entry point, `void <dispatch>(ResponseCompletionSource, Invokable)`, which
//! must be declared directly on the candidate type.

use crate::{
    error::{DescriptorError, DescriptorErrorKind},
    library::LibraryTypes,
    source::{MemberHandle, MemberKind, SemanticSource, TypeHandle},
};
use thiserror::Error as ThisError;

///
/// ContractViolation
/// The sub-condition of the dispatch contract that a candidate failed.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, ThisError)]
pub enum ContractViolation {
    #[error("not a method")]
    NotMethod,

    #[error("unexpected type parameters")]
    UnexpectedTypeParameters,

    #[error("wrong parameter count")]
    WrongParameterCount,

    #[error("parameter 0 type mismatch")]
    Parameter0Mismatch,

    #[error("parameter 1 type mismatch")]
    Parameter1Mismatch,

    #[error("unexpected return type")]
    UnexpectedReturnType,

    #[error("no matching dispatch entry point found")]
    NotFound,
}

impl ContractViolation {
    /// Stable snake_case discriminator for reports.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotMethod => "not_method",
            Self::UnexpectedTypeParameters => "unexpected_type_parameters",
            Self::WrongParameterCount => "wrong_parameter_count",
            Self::Parameter0Mismatch => "parameter_0_mismatch",
            Self::Parameter1Mismatch => "parameter_1_mismatch",
            Self::UnexpectedReturnType => "unexpected_return_type",
            Self::NotFound => "not_found",
        }
    }
}

///
/// ContractError
///
/// Rejection of a proxy base. When the dispatch name exists but no member
/// matches, `violation` is the first rejected member's reason and
/// `rejected` lists every member with its reason in declaration order.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct ContractError {
    pub base: String,
    pub violation: ContractViolation,
    pub rejected: Vec<(String, ContractViolation)>,
    pub message: String,
}

impl From<ContractError> for DescriptorError {
    fn from(err: ContractError) -> Self {
        Self::new(
            err.base,
            DescriptorErrorKind::Contract(err.violation),
            err.message,
        )
    }
}

/// Check that `base` declares a usable dispatch entry point.
///
/// Succeeds if any member under the dispatch name satisfies every condition;
/// additional non-matching overloads are tolerated.
pub fn validate_proxy_base(
    source: &dyn SemanticSource,
    library: &LibraryTypes,
    base: TypeHandle,
) -> Result<(), ContractError> {
    let dispatch = library.dispatch_method.as_str();
    let mut rejected = Vec::new();

    for member in source.members_named(base, dispatch) {
        match check_dispatch_member(source, library, member) {
            Ok(()) => return Ok(()),
            Err(violation) => rejected.push((source.member_display(member), violation)),
        }
    }

    let base = source.display_name(base);
    let Some((first_member, first_violation)) = rejected.first().cloned() else {
        let message = format!(
            "proxy base type {base} does not contain a definition for void {dispatch}({}, {})",
            source.display_name(library.response_completion_source),
            source.display_name(library.invokable),
        );

        return Err(ContractError {
            base,
            violation: ContractViolation::NotFound,
            rejected,
            message,
        });
    };

    let complaints = rejected
        .iter()
        .map(|(member, violation)| format!("complaint: {violation} for symbol: {member}"))
        .collect::<Vec<_>>()
        .join("; ");
    let message = format!(
        "proxy base type {base}: {}; {complaints}",
        ContractViolation::NotFound
    );
    tracing::debug!(
        %base,
        member = %first_member,
        violation = first_violation.code(),
        "proxy base rejected"
    );

    Err(ContractError {
        base,
        violation: first_violation,
        rejected,
        message,
    })
}

// check_dispatch_member
fn check_dispatch_member(
    source: &dyn SemanticSource,
    library: &LibraryTypes,
    member: MemberHandle,
) -> Result<(), ContractViolation> {
    let MemberKind::Method(method) = source.member(member).kind else {
        return Err(ContractViolation::NotMethod);
    };

    if !method.type_parameters.is_empty() {
        return Err(ContractViolation::UnexpectedTypeParameters);
    }

    if method.parameters.len() != 2 {
        return Err(ContractViolation::WrongParameterCount);
    }

    if method.parameters[0] != library.response_completion_source {
        return Err(ContractViolation::Parameter0Mismatch);
    }

    if method.parameters[1] != library.invokable {
        return Err(ContractViolation::Parameter1Mismatch);
    }

    if method.returns.is_some() {
        return Err(ContractViolation::UnexpectedReturnType);
    }

    Ok(())
}

///
/// TESTS
///
