//! Dispatch Error Types

use fallback_contract::FaultCause;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stage of the fallback chain that produced the wrapped cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStage {
    /// The guarded operation itself; no fallback path ran
    Primary,
    /// The bound sibling method
    MethodAttempt,
    /// The constructed handler instance
    HandlerAttempt,
}

impl FallbackStage {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackStage::Primary => "primary",
            FallbackStage::MethodAttempt => "method_attempt",
            FallbackStage::HandlerAttempt => "handler_attempt",
        }
    }
}

impl fmt::Display for FallbackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors during fallback dispatch
///
/// Never fatal to the process; surfaced to the original caller as the call's
/// failure outcome.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// Every available fallback path failed, or none existed
    #[error("fallback exhausted for {operation} at {stage}: {cause}")]
    Exhausted {
        /// Qualified operation name
        operation: String,
        /// Stage that produced the wrapped cause
        stage: FallbackStage,
        /// Most recent underlying failure
        cause: FaultCause,
    },
}

impl DispatchError {
    /// Stage that produced the wrapped cause
    pub fn stage(&self) -> FallbackStage {
        match self {
            DispatchError::Exhausted { stage, .. } => *stage,
        }
    }

    /// Most recent underlying failure
    pub fn cause(&self) -> &FaultCause {
        match self {
            DispatchError::Exhausted { cause, .. } => cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_serializes_snake_case() {
        let json = serde_json::to_string(&FallbackStage::HandlerAttempt).unwrap();
        assert_eq!(json, "\"handler_attempt\"");
        let back: FallbackStage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FallbackStage::HandlerAttempt);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(FallbackStage::MethodAttempt.to_string(), "method_attempt");
    }
}
