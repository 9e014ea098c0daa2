//! Shared Fallback Contracts
//!
//! Data model shared by the fallback resolver and dispatcher: type identity,
//! erased argument values, operation signatures, fallback declarations,
//! handler contracts, and per-invocation failure context.

mod context;
mod handler;
mod signature;
mod types;

pub use context::FailureContext;
pub use handler::{ErasedHandler, FallbackHandler, HandlerFactory, HandlerSpec};
pub use signature::{FallbackDeclaration, OperationSignature, SignatureSummary};
pub use types::{erase, ArgValue, FaultCause, TypeSpec};
