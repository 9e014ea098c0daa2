//! Fallback Handler Contract

use crate::context::FailureContext;
use crate::types::{ArgValue, FaultCause, TypeSpec};
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A pluggable fallback handler producing a substitute result from failure context
///
/// Implementations are constructed fresh for every failed call; they must not
/// assume any state survives between invocations.
pub trait FallbackHandler: Send {
    /// Result type; must match the guarded operation's return type
    type Output: Any + Send + Sync;

    /// Produce a substitute result for one failed invocation
    fn handle(&self, context: &FailureContext) -> Result<Self::Output, FaultCause>;
}

/// Object-safe view of a handler, used at dispatch time
pub trait ErasedHandler: Send {
    /// Type-erased [`FallbackHandler::handle`]
    fn handle_erased(&self, context: &FailureContext) -> Result<ArgValue, FaultCause>;
}

impl fmt::Debug for dyn ErasedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErasedHandler")
    }
}

struct ErasedAdapter<H>(H);

impl<H: FallbackHandler> ErasedHandler for ErasedAdapter<H> {
    fn handle_erased(&self, context: &FailureContext) -> Result<ArgValue, FaultCause> {
        self.0
            .handle(context)
            .map(|value| Box::new(value) as ArgValue)
    }
}

/// Factory yielding a fresh unmanaged handler instance per failed call
pub type HandlerFactory = Arc<dyn Fn() -> Result<Box<dyn ErasedHandler>, FaultCause> + Send + Sync>;

/// Reference to a handler type: its identity, declared output type, and constructor
///
/// The output [`TypeSpec`] is derived from the handler's associated `Output`
/// type, so the declared and actual output types cannot drift apart.
#[derive(Clone)]
pub struct HandlerSpec {
    type_name: &'static str,
    output: TypeSpec,
    factory: HandlerFactory,
}

impl HandlerSpec {
    /// Spec for a handler constructible with no externally supplied arguments
    pub fn of<H>() -> Self
    where
        H: FallbackHandler + Default + 'static,
    {
        Self::with_factory(|| Ok(H::default()))
    }

    /// Spec with a caller-supplied factory, e.g. a dependency-injected one
    pub fn with_factory<H, F>(factory: F) -> Self
    where
        H: FallbackHandler + 'static,
        F: Fn() -> Result<H, FaultCause> + Send + Sync + 'static,
    {
        Self {
            type_name: type_name::<H>(),
            output: TypeSpec::of::<H::Output>(),
            factory: Arc::new(move || {
                factory().map(|handler| Box::new(ErasedAdapter(handler)) as Box<dyn ErasedHandler>)
            }),
        }
    }

    /// Construct one fresh handler instance
    pub fn construct(&self) -> Result<Box<dyn ErasedHandler>, FaultCause> {
        (self.factory)()
    }

    /// Name of the handler type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declared output type of the handling operation
    pub fn output(&self) -> TypeSpec {
        self.output
    }
}

impl fmt::Debug for HandlerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSpec")
            .field("type_name", &self.type_name)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}
