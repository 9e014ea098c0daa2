//! Resolution Error Types

use fallback_contract::FaultCause;
use thiserror::Error;

/// Errors during fallback declaration validation
///
/// Every variant is detected at registration time and is fatal to the
/// guarded operation's setup: the surrounding system must refuse to
/// activate the operation rather than defer the error to call time.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// Declaration names neither a method nor a handler
    #[error("fallback declaration for {operation} names neither a method nor a handler")]
    MalformedDeclaration { operation: String },

    /// No same-owner method matches the declared name and argument shape
    #[error("no method named {method:?} on {owner} is zero-arg or matches the guarded arguments")]
    MethodNotFound { owner: &'static str, method: String },

    /// More than one same-named method matches the argument shape
    #[error("{candidates} overloads of {method:?} on {owner} match the guarded arguments")]
    AmbiguousMethod {
        owner: &'static str,
        method: String,
        candidates: usize,
    },

    /// Fallback output type does not match the guarded return type
    #[error("{declared_by} fallback for {operation} returns {found}, not assignable to {expected}")]
    IncompatibleReturnType {
        operation: String,
        declared_by: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// Handler factory failed its probe construction
    #[error("fallback handler {handler} could not be constructed: {cause}")]
    HandlerNotConstructible {
        handler: &'static str,
        cause: FaultCause,
    },
}
