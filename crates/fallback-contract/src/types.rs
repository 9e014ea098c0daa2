//! Type Identity and Erased Values

use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

/// Identity of a Rust type as used in compatibility checks
///
/// "Assignable to" in declaration validation means type identity here;
/// equality compares the `TypeId` only, the name is kept for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TypeSpec {
    id: TypeId,
    name: &'static str,
}

impl TypeSpec {
    /// Capture the identity of `T`
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Human-readable type name for error messages and logs
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeSpec {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeSpec {}

/// A type-erased argument or result value
pub type ArgValue = Box<dyn Any + Send + Sync>;

/// A captured failure, cheaply shareable across fallback stages
pub type FaultCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Erase a concrete value into an [`ArgValue`]
pub fn erase<T: Any + Send + Sync>(value: T) -> ArgValue {
    Box::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typespec_equality_by_id() {
        assert_eq!(TypeSpec::of::<String>(), TypeSpec::of::<String>());
        assert_ne!(TypeSpec::of::<String>(), TypeSpec::of::<i64>());
        assert_ne!(TypeSpec::of::<Vec<u8>>(), TypeSpec::of::<Vec<i8>>());
    }

    #[test]
    fn test_typespec_name() {
        assert!(TypeSpec::of::<i64>().name().contains("i64"));
    }

    #[test]
    fn test_erase_roundtrip() {
        let value = erase(42i64);
        assert_eq!(value.downcast_ref::<i64>(), Some(&42));
        assert!(value.downcast_ref::<u64>().is_none());
    }
}
