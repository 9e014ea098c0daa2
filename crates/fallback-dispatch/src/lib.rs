//! Fallback Dispatch
//!
//! Execution-time half of the fallback engine: [`dispatch`] runs a resolved
//! [`fallback_resolver::FallbackPlan`] against one failed invocation. Method
//! first, handler only on method failure, [`DispatchError::Exhausted`] when
//! every path fails.

mod dispatcher;
mod error;

pub use dispatcher::dispatch;
pub use error::{DispatchError, FallbackStage};
