//! Registration-Time Fallback Validation

use crate::error::ResolveError;
use crate::plan::{BoundMethod, FallbackPlan};
use crate::registry::{MethodEntry, MethodTable};
use fallback_contract::{FallbackDeclaration, HandlerSpec, OperationSignature};
use tracing::{debug, info};

/// Validate a fallback declaration against a guarded operation's signature
///
/// Runs once per guarded-operation definition, before the operation is
/// activated. Pure apart from one probe construction of the declared
/// handler. Method lookup failure is fatal even when a handler is also
/// declared; a declaration is only as good as its weakest part.
pub fn resolve(
    signature: &OperationSignature,
    declaration: &FallbackDeclaration,
    methods: &MethodTable,
) -> Result<FallbackPlan, ResolveError> {
    let operation = signature.qualified_name();

    if declaration.is_empty() {
        return Err(ResolveError::MalformedDeclaration { operation });
    }

    let primary = match declaration.method_name() {
        Some(name) => Some(bind_method(signature, name, methods, &operation)?),
        None => None,
    };

    let secondary = match declaration.handler_spec() {
        Some(spec) => Some(check_handler(signature, spec, &operation)?),
        None => None,
    };

    info!(
        "resolved fallback plan for {}: method={:?}, handler={:?}",
        operation,
        primary.as_ref().map(BoundMethod::name),
        secondary.as_ref().map(HandlerSpec::type_name),
    );
    Ok(FallbackPlan::new(operation, primary, secondary))
}

/// Find the single same-owner method matching name and argument shape
fn bind_method(
    signature: &OperationSignature,
    name: &str,
    methods: &MethodTable,
    operation: &str,
) -> Result<BoundMethod, ResolveError> {
    let matched: Vec<&MethodEntry> = methods
        .candidates(name)
        .filter(|entry| entry.params().is_empty() || entry.params() == signature.params())
        .collect();

    let entry = match matched.as_slice() {
        [] => {
            return Err(ResolveError::MethodNotFound {
                owner: methods.owner(),
                method: name.to_string(),
            })
        }
        [entry] => *entry,
        _ => {
            return Err(ResolveError::AmbiguousMethod {
                owner: methods.owner(),
                method: name.to_string(),
                candidates: matched.len(),
            })
        }
    };

    if entry.returns() != signature.returns() {
        return Err(ResolveError::IncompatibleReturnType {
            operation: operation.to_string(),
            declared_by: "method",
            expected: signature.returns().name(),
            found: entry.returns().name(),
        });
    }

    debug!(
        "bound fallback method {:?} (arity {}) for {}",
        entry.name(),
        entry.params().len(),
        operation
    );
    Ok(BoundMethod::new(
        entry.name(),
        entry.params().len(),
        entry.invoker(),
    ))
}

/// Check the handler's output type and probe its factory once
fn check_handler(
    signature: &OperationSignature,
    spec: &HandlerSpec,
    operation: &str,
) -> Result<HandlerSpec, ResolveError> {
    if spec.output() != signature.returns() {
        return Err(ResolveError::IncompatibleReturnType {
            operation: operation.to_string(),
            declared_by: "handler",
            expected: signature.returns().name(),
            found: spec.output().name(),
        });
    }

    // Probe the factory so construction failures surface at registration,
    // not on the first failed call. The probe instance is dropped.
    spec.construct()
        .map_err(|cause| ResolveError::HandlerNotConstructible {
            handler: spec.type_name(),
            cause,
        })?;

    debug!("validated fallback handler {} for {}", spec.type_name(), operation);
    Ok(spec.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fallback_contract::{FailureContext, FallbackHandler, FaultCause, TypeSpec};
    use proptest::prelude::*;
    use std::sync::Arc;

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct TestFault(&'static str);

    #[derive(Default)]
    struct StringHandler;

    impl FallbackHandler for StringHandler {
        type Output = String;

        fn handle(&self, _context: &FailureContext) -> Result<String, FaultCause> {
            Ok("handled".to_string())
        }
    }

    #[derive(Default)]
    struct IntHandler;

    impl FallbackHandler for IntHandler {
        type Output = i64;

        fn handle(&self, _context: &FailureContext) -> Result<i64, FaultCause> {
            Ok(0)
        }
    }

    fn signature() -> OperationSignature {
        OperationSignature::new(
            "PricingService",
            "quote",
            vec![TypeSpec::of::<i64>()],
            TypeSpec::of::<String>(),
        )
    }

    fn table() -> MethodTable {
        let mut table = MethodTable::new("PricingService");
        table.register_unary("fb", |x: &i64| Ok::<String, FaultCause>(format!("fb {x}")));
        table.register_nullary("cached", || Ok::<String, FaultCause>("cached".into()));
        table.register_unary("wrong_type", |x: &i64| Ok::<i64, FaultCause>(*x));
        table
    }

    #[test]
    fn test_method_only_resolves() {
        let plan = resolve(&signature(), &FallbackDeclaration::method("fb"), &table()).unwrap();
        assert!(plan.has_method_fallback());
        assert!(!plan.has_handler_fallback());
        assert_eq!(plan.method().unwrap().name(), "fb");
        assert_eq!(plan.method().unwrap().arity(), 1);
        assert_eq!(plan.operation(), "PricingService::quote");
    }

    #[test]
    fn test_zero_arg_method_matches_any_signature() {
        let plan = resolve(&signature(), &FallbackDeclaration::method("cached"), &table()).unwrap();
        assert_eq!(plan.method().unwrap().arity(), 0);
    }

    #[test]
    fn test_method_not_found() {
        let err = resolve(&signature(), &FallbackDeclaration::method("missing"), &table())
            .unwrap_err();
        assert!(matches!(err, ResolveError::MethodNotFound { .. }));
    }

    #[test]
    fn test_shape_mismatch_is_not_found() {
        let mut table = MethodTable::new("PricingService");
        table.register_binary("fb", |x: &i64, y: &i64| {
            Ok::<String, FaultCause>(format!("{x}{y}"))
        });
        let err = resolve(&signature(), &FallbackDeclaration::method("fb"), &table).unwrap_err();
        assert!(matches!(err, ResolveError::MethodNotFound { .. }));
    }

    #[test]
    fn test_ambiguous_overloads() {
        let mut table = table();
        // A zero-arg overload of "fb" also matches, making two candidates.
        table.register_nullary("fb", || Ok::<String, FaultCause>("static".into()));

        let err = resolve(&signature(), &FallbackDeclaration::method("fb"), &table).unwrap_err();
        match err {
            ResolveError::AmbiguousMethod { candidates, .. } => assert_eq!(candidates, 2),
            other => panic!("expected AmbiguousMethod, got {other:?}"),
        }
    }

    #[test]
    fn test_method_return_type_mismatch() {
        let err = resolve(
            &signature(),
            &FallbackDeclaration::method("wrong_type"),
            &table(),
        )
        .unwrap_err();
        match err {
            ResolveError::IncompatibleReturnType { declared_by, .. } => {
                assert_eq!(declared_by, "method");
            }
            other => panic!("expected IncompatibleReturnType, got {other:?}"),
        }
    }

    #[test]
    fn test_handler_only_resolves() {
        let decl = FallbackDeclaration::handler(HandlerSpec::of::<StringHandler>());
        let plan = resolve(&signature(), &decl, &table()).unwrap();
        assert!(!plan.has_method_fallback());
        assert!(plan.has_handler_fallback());
        assert!(plan.handler().unwrap().type_name().contains("StringHandler"));
    }

    #[test]
    fn test_handler_output_mismatch() {
        let decl = FallbackDeclaration::handler(HandlerSpec::of::<IntHandler>());
        let err = resolve(&signature(), &decl, &table()).unwrap_err();
        match err {
            ResolveError::IncompatibleReturnType { declared_by, .. } => {
                assert_eq!(declared_by, "handler");
            }
            other => panic!("expected IncompatibleReturnType, got {other:?}"),
        }
    }

    #[test]
    fn test_handler_not_constructible() {
        let spec = HandlerSpec::with_factory::<StringHandler, _>(|| {
            Err(Arc::new(TestFault("container down")) as FaultCause)
        });
        let err = resolve(&signature(), &FallbackDeclaration::handler(spec), &table())
            .unwrap_err();
        match err {
            ResolveError::HandlerNotConstructible { cause, .. } => {
                assert_eq!(cause.to_string(), "container down");
            }
            other => panic!("expected HandlerNotConstructible, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_declaration() {
        let err = resolve(&signature(), &FallbackDeclaration::method(""), &table()).unwrap_err();
        assert!(matches!(err, ResolveError::MalformedDeclaration { .. }));
    }

    #[test]
    fn test_method_failure_fatal_despite_handler() {
        // Strict policy: an invalid method name is not tolerated just
        // because a valid handler is also declared.
        let decl = FallbackDeclaration::method_with_handler(
            "missing",
            HandlerSpec::of::<StringHandler>(),
        );
        let err = resolve(&signature(), &decl, &table()).unwrap_err();
        assert!(matches!(err, ResolveError::MethodNotFound { .. }));
    }

    #[test]
    fn test_both_paths_resolve() {
        let decl =
            FallbackDeclaration::method_with_handler("fb", HandlerSpec::of::<StringHandler>());
        let plan = resolve(&signature(), &decl, &table()).unwrap();
        assert!(plan.has_method_fallback());
        assert!(plan.has_handler_fallback());
    }

    #[test]
    fn test_resolution_idempotent() {
        let decl = FallbackDeclaration::method("fb");
        let first = resolve(&signature(), &decl, &table()).unwrap();
        let second = resolve(&signature(), &decl, &table()).unwrap();
        assert_eq!(first.summary(), second.summary());

        let bad = FallbackDeclaration::method("missing");
        let first = resolve(&signature(), &bad, &table()).unwrap_err();
        let second = resolve(&signature(), &bad, &table()).unwrap_err();
        assert_eq!(
            std::mem::discriminant(&first),
            std::mem::discriminant(&second)
        );
    }

    fn param_shapes() -> impl Strategy<Value = Vec<TypeSpec>> {
        prop::collection::vec(
            prop::sample::select(vec![
                TypeSpec::of::<i64>(),
                TypeSpec::of::<f64>(),
                TypeSpec::of::<String>(),
            ]),
            0..4,
        )
    }

    proptest! {
        #[test]
        fn prop_zero_arg_method_matches_every_shape(params in param_shapes()) {
            let sig = OperationSignature::new(
                "PricingService",
                "quote",
                params,
                TypeSpec::of::<String>(),
            );
            let mut table = MethodTable::new("PricingService");
            table.register_nullary("cached", || Ok::<String, FaultCause>("cached".into()));

            let plan = resolve(&sig, &FallbackDeclaration::method("cached"), &table);
            prop_assert!(plan.is_ok());
            prop_assert_eq!(plan.unwrap().method().unwrap().arity(), 0);
        }

        #[test]
        fn prop_resolution_idempotent(
            params in param_shapes(),
            name in prop::sample::select(vec!["fb", "cached", "wrong_type", "missing"]),
        ) {
            let sig = OperationSignature::new(
                "PricingService",
                "quote",
                params,
                TypeSpec::of::<String>(),
            );
            let decl = FallbackDeclaration::method(name);
            let first = resolve(&sig, &decl, &table());
            let second = resolve(&sig, &decl, &table());
            match (first, second) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a.summary(), b.summary()),
                (Err(a), Err(b)) => prop_assert_eq!(
                    std::mem::discriminant(&a),
                    std::mem::discriminant(&b)
                ),
                _ => prop_assert!(false, "resolution outcome changed between runs"),
            }
        }
    }
}
