//! Guarded Operation Signatures and Fallback Declarations

use crate::handler::HandlerSpec;
use crate::types::TypeSpec;
use serde::Serialize;

/// Immutable descriptor of a guarded operation
///
/// Built once when the operation is registered; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSignature {
    owner: &'static str,
    name: &'static str,
    params: Vec<TypeSpec>,
    returns: TypeSpec,
}

impl OperationSignature {
    /// Describe a guarded operation on its owning type
    pub fn new(
        owner: &'static str,
        name: &'static str,
        params: Vec<TypeSpec>,
        returns: TypeSpec,
    ) -> Self {
        Self {
            owner,
            name,
            params,
            returns,
        }
    }

    /// Name of the owning type
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Name of the operation itself
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ordered parameter types
    pub fn params(&self) -> &[TypeSpec] {
        &self.params
    }

    /// Declared return type
    pub fn returns(&self) -> TypeSpec {
        self.returns
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// `Owner::name` form used in errors and logs
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.owner, self.name)
    }

    /// Serializable description for reports and structured logs
    pub fn summary(&self) -> SignatureSummary {
        SignatureSummary {
            owner: self.owner.to_string(),
            name: self.name.to_string(),
            params: self.params.iter().map(|p| p.name().to_string()).collect(),
            returns: self.returns.name().to_string(),
        }
    }
}

/// Serializable view of an [`OperationSignature`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureSummary {
    /// Owning type name
    pub owner: String,
    /// Operation name
    pub name: String,
    /// Parameter type names, in order
    pub params: Vec<String>,
    /// Return type name
    pub returns: String,
}

/// Declared fallback intent for one guarded operation
///
/// The method name mirrors the declarative form it is read from: an empty
/// string means "not specified". At least one of method and handler must be
/// present for the declaration to be valid; the resolver enforces this.
#[derive(Debug, Clone)]
pub struct FallbackDeclaration {
    method: String,
    handler: Option<HandlerSpec>,
}

impl FallbackDeclaration {
    /// Declare a sibling-method fallback
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            method: name.into(),
            handler: None,
        }
    }

    /// Declare a handler-type fallback
    pub fn handler(spec: HandlerSpec) -> Self {
        Self {
            method: String::new(),
            handler: Some(spec),
        }
    }

    /// Declare both: the method is tried first, the handler only on its failure
    pub fn method_with_handler(name: impl Into<String>, spec: HandlerSpec) -> Self {
        Self {
            method: name.into(),
            handler: Some(spec),
        }
    }

    /// Declared method name, `None` when unspecified
    pub fn method_name(&self) -> Option<&str> {
        if self.method.is_empty() {
            None
        } else {
            Some(&self.method)
        }
    }

    /// Declared handler spec, `None` when unspecified
    pub fn handler_spec(&self) -> Option<&HandlerSpec> {
        self.handler.as_ref()
    }

    /// True when neither a method nor a handler is declared
    pub fn is_empty(&self) -> bool {
        self.method.is_empty() && self.handler.is_none()
    }
}
