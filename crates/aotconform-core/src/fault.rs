//! Fault kinds and fault signals.
//!
//! A fault is the managed-language notion of a thrown exception. Across the
//! native boundary it travels as a [`FaultSignal`]: a categorical kind, an
//! optional identity token (so a rethrow can be told apart from a fresh
//! throw of the same kind), and the message carried by the throwable.

use std::fmt;

/// Categorical tag for an abnormal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FaultKind {
    /// Field or method access through a null reference.
    NullPointer,
    /// Integer division or remainder by zero.
    Arithmetic,
    /// Array index outside `0..len`.
    IndexOutOfBounds,
    /// Array allocation with a negative count.
    NegativeArraySize,
    /// Reference cast to an incompatible type.
    ClassCast,
    /// Store of an incompatible element into a covariant array.
    ArrayStore,
    /// A verification routine found a value it did not expect.
    AssertionFailed,
    /// The local-handle table ran out of slots.
    HandleOverflow,
    /// Method resolution failed.
    NoSuchMethod,
}

impl FaultKind {
    /// All kinds, in declaration order.
    pub const ALL: [FaultKind; 9] = [
        Self::NullPointer,
        Self::Arithmetic,
        Self::IndexOutOfBounds,
        Self::NegativeArraySize,
        Self::ClassCast,
        Self::ArrayStore,
        Self::AssertionFailed,
        Self::HandleOverflow,
        Self::NoSuchMethod,
    ];

    /// Stable short name used in reports and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NullPointer => "null-pointer",
            Self::Arithmetic => "arithmetic",
            Self::IndexOutOfBounds => "index-out-of-bounds",
            Self::NegativeArraySize => "negative-array-size",
            Self::ClassCast => "class-cast",
            Self::ArrayStore => "array-store",
            Self::AssertionFailed => "assertion-failed",
            Self::HandleOverflow => "handle-overflow",
            Self::NoSuchMethod => "no-such-method",
        }
    }

    /// Managed-language class name of the throwable for this kind.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::NullPointer => "java/lang/NullPointerException",
            Self::Arithmetic => "java/lang/ArithmeticException",
            Self::IndexOutOfBounds => "java/lang/ArrayIndexOutOfBoundsException",
            Self::NegativeArraySize => "java/lang/NegativeArraySizeException",
            Self::ClassCast => "java/lang/ClassCastException",
            Self::ArrayStore => "java/lang/ArrayStoreException",
            Self::AssertionFailed => "java/lang/AssertionError",
            Self::HandleOverflow => "java/lang/OutOfMemoryError",
            Self::NoSuchMethod => "java/lang/NoSuchMethodError",
        }
    }

    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let lowered = s.to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| {
            kind.as_str() == lowered || kind.class_name().eq_ignore_ascii_case(s)
        })
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque identity of one raised throwable.
///
/// Two signals carry the same token iff they refer to the same throwable
/// object. A rethrow preserves the token; a fresh throw mints a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaultToken(pub u64);

impl fmt::Display for FaultToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fault#{}", self.0)
    }
}

/// One entry of a runtime's fault journal: which throwable was raised, and
/// its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RaisedFault {
    pub token: FaultToken,
    pub kind: FaultKind,
}

impl fmt::Display for RaisedFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.token, self.kind)
    }
}

/// A signaled fault as observed across the native boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultSignal {
    pub kind: FaultKind,
    /// `None` for oracle-side expectations, which never carry identity.
    pub token: Option<FaultToken>,
    pub message: String,
}

impl FaultSignal {
    /// An expected fault of `kind` with no identity or message.
    #[must_use]
    pub fn of(kind: FaultKind) -> Self {
        Self {
            kind,
            token: None,
            message: String::new(),
        }
    }

    /// Attach an identity token.
    #[must_use]
    pub fn with_token(mut self, token: FaultToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Attach a message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Display for FaultSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(token) = self.token {
            write!(f, " [{token}]")?;
        }
        if !self.message.is_empty() {
            write!(f, " \"{}\"", self.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_parse_back() {
        for kind in FaultKind::ALL {
            assert_eq!(FaultKind::from_str_loose(kind.as_str()), Some(kind));
            assert_eq!(FaultKind::from_str_loose(kind.class_name()), Some(kind));
        }
        assert_eq!(FaultKind::from_str_loose("ARITHMETIC"), Some(FaultKind::Arithmetic));
        assert_eq!(FaultKind::from_str_loose("segfault"), None);
    }

    #[test]
    fn signal_display_includes_identity_and_message() {
        let sig = FaultSignal::of(FaultKind::NullPointer)
            .with_token(FaultToken(7))
            .with_message("npe!");
        assert_eq!(sig.to_string(), "null-pointer [fault#7] \"npe!\"");
        assert_eq!(FaultSignal::of(FaultKind::Arithmetic).to_string(), "arithmetic");
    }
}
