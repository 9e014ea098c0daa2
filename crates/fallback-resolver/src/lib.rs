//! Fallback Resolution
//!
//! Registration-time half of the fallback engine: explicit method tables
//! replace reflective lookup, and [`resolve`] turns one declaration plus one
//! guarded-operation signature into an immutable [`FallbackPlan`] that the
//! dispatcher consumes on every failed call.

mod error;
mod plan;
mod registry;
mod resolver;

pub use error::ResolveError;
pub use plan::{BoundMethod, FallbackPlan, PlanSummary};
pub use registry::{ArgumentMismatch, MethodEntry, MethodFn, MethodTable};
pub use resolver::resolve;
