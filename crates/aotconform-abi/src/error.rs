//! Bridge error taxonomy.

use aotconform_runtime::{RuntimeError, Thrown, Unwind};
use thiserror::Error;

/// Arguments or return value did not fit the routine's signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    #[error("bad signature descriptor {0:?}")]
    Descriptor(String),
    #[error("expected {expected} arguments, got {found}")]
    Arity { expected: usize, found: usize },
    #[error("argument {index}: expected {expected}, got {found}")]
    Kind {
        index: usize,
        expected: String,
        found: String,
    },
    #[error("return: expected {expected}, got {found}")]
    Return { expected: String, found: String },
    #[error("null returned where {0} was expected")]
    NullReturn(String),
}

/// What stopped a routine: a managed unwind or a marshaling problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trap {
    Unwind(Unwind),
    Marshal(MarshalError),
}

impl From<Unwind> for Trap {
    fn from(u: Unwind) -> Self {
        Self::Unwind(u)
    }
}

impl From<Thrown> for Trap {
    fn from(t: Thrown) -> Self {
        Self::Unwind(Unwind::Throw(t))
    }
}

impl From<RuntimeError> for Trap {
    fn from(e: RuntimeError) -> Self {
        Self::Unwind(Unwind::Error(e))
    }
}

impl From<MarshalError> for Trap {
    fn from(e: MarshalError) -> Self {
        Self::Marshal(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("routine {0} is unavailable")]
    Unavailable(String),
    #[error("marshal: {0}")]
    Marshal(#[from] MarshalError),
    #[error("unknown weak handle {0}")]
    UnknownHandle(u64),
    #[error("runtime: {0}")]
    Runtime(RuntimeError),
}

impl From<RuntimeError> for BridgeError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::UnknownWeak(id) => Self::UnknownHandle(id),
            other => Self::Runtime(other),
        }
    }
}

impl BridgeError {
    /// Whether this error ends the enclosing suite rather than one case.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unavailable_is_fatal() {
        assert!(BridgeError::Unavailable("x".into()).is_fatal());
        assert!(!BridgeError::UnknownHandle(3).is_fatal());
        assert!(!BridgeError::from(MarshalError::Arity { expected: 1, found: 0 }).is_fatal());
    }

    #[test]
    fn unknown_weak_maps_to_unknown_handle() {
        assert_eq!(
            BridgeError::from(RuntimeError::UnknownWeak(7)),
            BridgeError::UnknownHandle(7)
        );
    }
}
