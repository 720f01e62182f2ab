//! Comparison policies.

use std::fmt;

/// How a case's actual outcome is compared with the oracle's.
///
/// Whatever the policy, an expected fault is always checked by kind first
/// (see [`crate::verify`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Policy {
    /// Same type tag and identical bits.
    Exact,
    /// Integral values compared on `raw_bits & mask` only.
    Masked { mask: u64 },
    /// Floating values within `max_delta` of each other. Allowed only after
    /// the floating-point baseline suite.
    Approx { max_delta: f64 },
    /// Fault kind, plus the escaping fault must be the first one raised
    /// during the call (a rethrow, not a fresh throw).
    FaultIdentity,
    /// Liveness state after a full collection.
    Liveness,
}

impl Policy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Masked { .. } => "masked",
            Self::Approx { .. } => "approx",
            Self::FaultIdentity => "fault-identity",
            Self::Liveness => "liveness",
        }
    }

    #[must_use]
    pub const fn is_tolerance(&self) -> bool {
        matches!(self, Self::Approx { .. })
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Masked { mask } => write!(f, "masked(0x{mask:x})"),
            Self::Approx { max_delta } => write!(f, "approx({max_delta:e})"),
            other => f.write_str(other.as_str()),
        }
    }
}
