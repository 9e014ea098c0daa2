//! Resolved Fallback Plans

use crate::registry::MethodFn;
use fallback_contract::{ArgValue, FaultCause, HandlerSpec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback method bound during resolution
#[derive(Clone)]
pub struct BoundMethod {
    name: &'static str,
    arity: usize,
    invoke: MethodFn,
}

impl BoundMethod {
    pub(crate) fn new(name: &'static str, arity: usize, invoke: MethodFn) -> Self {
        Self {
            name,
            arity,
            invoke,
        }
    }

    /// Name of the bound method
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of arguments the bound method takes (0 for zero-arg matches)
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invoke the bound method against the original call arguments
    ///
    /// Zero-arg methods ignore the slice.
    pub fn invoke(&self, args: &[ArgValue]) -> Result<ArgValue, FaultCause> {
        (self.invoke)(args)
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Immutable, validated binding of a guarded operation to its fallbacks
///
/// Built once by [`crate::resolve`]; owns no per-call state, so one plan is
/// safely shared read-only by any number of concurrent dispatches.
#[derive(Debug, Clone)]
pub struct FallbackPlan {
    operation: String,
    primary: Option<BoundMethod>,
    secondary: Option<HandlerSpec>,
}

impl FallbackPlan {
    pub(crate) fn new(
        operation: String,
        primary: Option<BoundMethod>,
        secondary: Option<HandlerSpec>,
    ) -> Self {
        Self {
            operation,
            primary,
            secondary,
        }
    }

    /// Qualified name of the guarded operation this plan belongs to
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The bound sibling method, tried first when present
    pub fn method(&self) -> Option<&BoundMethod> {
        self.primary.as_ref()
    }

    /// The handler spec, tried only when the method is absent or fails
    pub fn handler(&self) -> Option<&HandlerSpec> {
        self.secondary.as_ref()
    }

    /// True when a sibling-method fallback was validated
    pub fn has_method_fallback(&self) -> bool {
        self.primary.is_some()
    }

    /// True when a handler fallback was validated
    pub fn has_handler_fallback(&self) -> bool {
        self.secondary.is_some()
    }

    /// Serializable description for reports and structured logs
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            operation: self.operation.clone(),
            method: self.primary.as_ref().map(|m| m.name().to_string()),
            method_arity: self.primary.as_ref().map(BoundMethod::arity),
            handler: self.secondary.as_ref().map(|h| h.type_name().to_string()),
        }
    }
}

/// Serializable view of a resolved plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Qualified operation name
    pub operation: String,
    /// Bound method name, when present
    pub method: Option<String>,
    /// Bound method arity, when present
    pub method_arity: Option<usize>,
    /// Handler type name, when present
    pub handler: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn plan_with_method() -> FallbackPlan {
        let invoke: MethodFn = Arc::new(|_args| Ok(fallback_contract::erase(0i64)));
        FallbackPlan::new(
            "PricingService::quote".to_string(),
            Some(BoundMethod::new("fb", 1, invoke)),
            None,
        )
    }

    #[test]
    fn test_fast_branching_flags() {
        let plan = plan_with_method();
        assert!(plan.has_method_fallback());
        assert!(!plan.has_handler_fallback());
    }

    #[test]
    fn test_summary_serializes() {
        let summary = plan_with_method().summary();
        let json = serde_json::to_string(&summary).unwrap();
        let back: PlanSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, back);
        assert_eq!(back.method.as_deref(), Some("fb"));
        assert_eq!(back.method_arity, Some(1));
        assert_eq!(back.handler, None);
    }

    #[test]
    fn test_plan_is_shareable() {
        fn assert_sync_send<T: Send + Sync>() {}
        assert_sync_send::<FallbackPlan>();
    }
}
