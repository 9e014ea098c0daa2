//! Per-Invocation Failure Context

use crate::types::{ArgValue, FaultCause};
use std::any::Any;
use std::fmt;

/// Everything a fallback path may need about one failed invocation
///
/// Created by the invocation layer once the primary call has definitively
/// failed; discarded after dispatch returns. Holds the original arguments,
/// the captured failure, and the attempt count when retries preceded it.
pub struct FailureContext {
    operation: String,
    arguments: Vec<ArgValue>,
    cause: FaultCause,
    attempt: u32,
}

impl FailureContext {
    /// Context for one failed call of `operation`
    pub fn new(operation: impl Into<String>, arguments: Vec<ArgValue>, cause: FaultCause) -> Self {
        Self {
            operation: operation.into(),
            arguments,
            cause,
            attempt: 0,
        }
    }

    /// Record how many attempts preceded this failure
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }

    /// Qualified name of the failed operation
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Original call arguments, in declaration order
    pub fn arguments(&self) -> &[ArgValue] {
        &self.arguments
    }

    /// The captured failure
    pub fn cause(&self) -> &FaultCause {
        &self.cause
    }

    /// Attempt marker; 0 when no retries preceded the failure
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Typed access to one original argument
    pub fn argument<T: Any>(&self, index: usize) -> Option<&T> {
        self.arguments.get(index).and_then(|v| v.downcast_ref::<T>())
    }
}

impl fmt::Debug for FailureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureContext")
            .field("operation", &self.operation)
            .field("arguments", &self.arguments.len())
            .field("cause", &self.cause)
            .field("attempt", &self.attempt)
            .finish()
    }
}
