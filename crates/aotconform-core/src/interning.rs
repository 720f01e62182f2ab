//! Interning and liveness oracle.

use crate::value::Liveness;

/// Literal held in the constant pool of the interning fixture.
pub const POOL_CONSTANT: &str = "Class InternedString";

/// Half of the computed string; concatenated with itself at run time.
pub const COMPUTED_HALF: &str = "blah";

/// How an interned string came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOrigin {
    /// Loaded from the constant pool, which keeps it strongly reachable.
    Literal,
    /// Built at run time and interned; only the weak intern table refers to it.
    Computed,
}

/// Liveness of an interned string after its last strong reference is
/// dropped and a full collection has completed.
#[must_use]
pub fn expected_liveness(origin: StringOrigin) -> Liveness {
    match origin {
        StringOrigin::Literal => Liveness::Alive,
        StringOrigin::Computed => Liveness::Dead,
    }
}

#[must_use]
pub fn concat(a: &str, b: &str) -> String {
    let mut s = String::with_capacity(a.len() + b.len());
    s.push_str(a);
    s.push_str(b);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_map_to_liveness() {
        assert_eq!(expected_liveness(StringOrigin::Literal), Liveness::Alive);
        assert_eq!(expected_liveness(StringOrigin::Computed), Liveness::Dead);
        assert_eq!(concat(COMPUTED_HALF, COMPUTED_HALF), "blahblah");
    }
}
