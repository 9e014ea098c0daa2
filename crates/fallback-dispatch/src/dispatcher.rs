//! Execution-Time Fallback Dispatch

use crate::error::{DispatchError, FallbackStage};
use fallback_contract::{ArgValue, FailureContext};
use fallback_resolver::FallbackPlan;
use tracing::{debug, warn};

/// Execute a resolved plan against one failed invocation
///
/// The bound method runs first; the handler runs only when the method is
/// absent or itself fails, and a fresh unmanaged handler instance is
/// constructed per call, never cached or pooled. Stateless: any number of
/// threads may dispatch against one shared plan concurrently.
pub fn dispatch(plan: &FallbackPlan, context: &FailureContext) -> Result<ArgValue, DispatchError> {
    let mut stage = FallbackStage::Primary;
    let mut cause = context.cause().clone();

    if let Some(method) = plan.method() {
        debug!(
            "attempting fallback method {:?} for {} (attempt {})",
            method.name(),
            plan.operation(),
            context.attempt()
        );
        match method.invoke(context.arguments()) {
            Ok(value) => return Ok(value),
            Err(method_cause) => {
                warn!(
                    "fallback method {:?} for {} failed: {}",
                    method.name(),
                    plan.operation(),
                    method_cause
                );
                stage = FallbackStage::MethodAttempt;
                cause = method_cause;
            }
        }
    }

    if let Some(spec) = plan.handler() {
        debug!(
            "attempting fallback handler {} for {}",
            spec.type_name(),
            plan.operation()
        );
        let attempt = spec
            .construct()
            .and_then(|handler| handler.handle_erased(context));
        match attempt {
            Ok(value) => return Ok(value),
            Err(handler_cause) => {
                warn!(
                    "fallback handler {} for {} failed: {}",
                    spec.type_name(),
                    plan.operation(),
                    handler_cause
                );
                stage = FallbackStage::HandlerAttempt;
                cause = handler_cause;
            }
        }
    }

    Err(DispatchError::Exhausted {
        operation: plan.operation().to_string(),
        stage,
        cause,
    })
}
