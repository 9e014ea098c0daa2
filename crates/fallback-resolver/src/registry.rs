//! Fallback Method Registration
//!
//! Explicit registration replaces reflective method search: each owning type
//! records its candidate fallback methods once, with parameter shapes and
//! return types captured from the registered closures so the recorded shape
//! cannot drift from the callable.

use fallback_contract::{erase, ArgValue, FaultCause, TypeSpec};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Invocation closure bound to a registered method
pub type MethodFn = Arc<dyn Fn(&[ArgValue]) -> Result<ArgValue, FaultCause> + Send + Sync>;

/// Raised when dispatch arguments contradict the validated shape
///
/// Only reachable when the invocation layer passes arguments that differ
/// from the signature the plan was validated against.
#[derive(Debug, Clone, Error)]
#[error("argument {index} passed to fallback method {method:?} is not a {expected}")]
pub struct ArgumentMismatch {
    /// Method that rejected the argument
    pub method: &'static str,
    /// Zero-based argument position
    pub index: usize,
    /// Expected type name
    pub expected: &'static str,
}

fn typed_arg<'a, T: Any>(
    method: &'static str,
    args: &'a [ArgValue],
    index: usize,
) -> Result<&'a T, FaultCause> {
    args.get(index)
        .and_then(|value| value.downcast_ref::<T>())
        .ok_or_else(|| {
            Arc::new(ArgumentMismatch {
                method,
                index,
                expected: std::any::type_name::<T>(),
            }) as FaultCause
        })
}

/// A registered candidate fallback method
#[derive(Clone)]
pub struct MethodEntry {
    name: &'static str,
    params: Vec<TypeSpec>,
    returns: TypeSpec,
    invoke: MethodFn,
}

impl MethodEntry {
    /// Method name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameter shape
    pub fn params(&self) -> &[TypeSpec] {
        &self.params
    }

    /// Declared return type
    pub fn returns(&self) -> TypeSpec {
        self.returns
    }

    /// Shared handle to the invocation closure
    pub fn invoker(&self) -> MethodFn {
        Arc::clone(&self.invoke)
    }
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("name", &self.name)
            .field("arity", &self.params.len())
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// Candidate fallback methods for one owning type
///
/// Built once at registration; the resolver searches it by name and shape.
/// Same-named entries are legal here and surface as ambiguity only when more
/// than one matches a concrete signature.
pub struct MethodTable {
    owner: &'static str,
    entries: Vec<MethodEntry>,
}

impl MethodTable {
    /// Empty table for one owning type
    pub fn new(owner: &'static str) -> Self {
        Self {
            owner,
            entries: Vec::new(),
        }
    }

    /// Name of the owning type
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Number of registered methods
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries with the given name
    pub fn candidates<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.name == name)
    }

    /// Register a zero-argument method
    pub fn register_nullary<R, F>(&mut self, name: &'static str, body: F)
    where
        R: Any + Send + Sync,
        F: Fn() -> Result<R, FaultCause> + Send + Sync + 'static,
    {
        self.entries.push(MethodEntry {
            name,
            params: Vec::new(),
            returns: TypeSpec::of::<R>(),
            invoke: Arc::new(move |_args| body().map(erase)),
        });
    }

    /// Register a one-argument method
    pub fn register_unary<A, R, F>(&mut self, name: &'static str, body: F)
    where
        A: Any + Send + Sync,
        R: Any + Send + Sync,
        F: Fn(&A) -> Result<R, FaultCause> + Send + Sync + 'static,
    {
        self.entries.push(MethodEntry {
            name,
            params: vec![TypeSpec::of::<A>()],
            returns: TypeSpec::of::<R>(),
            invoke: Arc::new(move |args| {
                let a = typed_arg::<A>(name, args, 0)?;
                body(a).map(erase)
            }),
        });
    }

    /// Register a two-argument method
    pub fn register_binary<A, B, R, F>(&mut self, name: &'static str, body: F)
    where
        A: Any + Send + Sync,
        B: Any + Send + Sync,
        R: Any + Send + Sync,
        F: Fn(&A, &B) -> Result<R, FaultCause> + Send + Sync + 'static,
    {
        self.entries.push(MethodEntry {
            name,
            params: vec![TypeSpec::of::<A>(), TypeSpec::of::<B>()],
            returns: TypeSpec::of::<R>(),
            invoke: Arc::new(move |args| {
                let a = typed_arg::<A>(name, args, 0)?;
                let b = typed_arg::<B>(name, args, 1)?;
                body(a, b).map(erase)
            }),
        });
    }

    /// Register a three-argument method
    pub fn register_ternary<A, B, C, R, F>(&mut self, name: &'static str, body: F)
    where
        A: Any + Send + Sync,
        B: Any + Send + Sync,
        C: Any + Send + Sync,
        R: Any + Send + Sync,
        F: Fn(&A, &B, &C) -> Result<R, FaultCause> + Send + Sync + 'static,
    {
        self.entries.push(MethodEntry {
            name,
            params: vec![TypeSpec::of::<A>(), TypeSpec::of::<B>(), TypeSpec::of::<C>()],
            returns: TypeSpec::of::<R>(),
            invoke: Arc::new(move |args| {
                let a = typed_arg::<A>(name, args, 0)?;
                let b = typed_arg::<B>(name, args, 1)?;
                let c = typed_arg::<C>(name, args, 2)?;
                body(a, b, c).map(erase)
            }),
        });
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("owner", &self.owner)
            .field("entries", &self.entries)
            .finish()
    }
}
