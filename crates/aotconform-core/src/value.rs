//! Typed values exchanged with routines under test.
//!
//! Every primitive carries an explicit bit-width. Equality for conformance
//! purposes is bit-exact: NaN payloads and the sign of zero are significant,
//! which is why [`Scalar`] deliberately does not lean on `PartialEq` for
//! floats when comparing results (see [`Scalar::bits_eq`]).

use std::fmt;

use crate::fault::FaultSignal;

/// A primitive scalar with explicit width and signedness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Byte(i8),
    /// Unsigned 16-bit code unit.
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Scalar {
    /// JNI descriptor character for this scalar's type.
    #[must_use]
    pub const fn descriptor(&self) -> char {
        match self {
            Self::Bool(_) => 'Z',
            Self::Byte(_) => 'B',
            Self::Char(_) => 'C',
            Self::Short(_) => 'S',
            Self::Int(_) => 'I',
            Self::Long(_) => 'J',
            Self::Float(_) => 'F',
            Self::Double(_) => 'D',
        }
    }

    /// Width of the value in bits.
    #[must_use]
    pub const fn width_bits(&self) -> u32 {
        match self {
            Self::Bool(_) | Self::Byte(_) => 8,
            Self::Char(_) | Self::Short(_) => 16,
            Self::Int(_) | Self::Float(_) => 32,
            Self::Long(_) | Self::Double(_) => 64,
        }
    }

    /// Raw bit pattern, zero-extended to 64 bits.
    #[must_use]
    pub fn raw_bits(&self) -> u64 {
        match *self {
            Self::Bool(b) => u64::from(b),
            Self::Byte(v) => u64::from(v as u8),
            Self::Char(v) => u64::from(v),
            Self::Short(v) => u64::from(v as u16),
            Self::Int(v) => u64::from(v as u32),
            Self::Long(v) => v as u64,
            Self::Float(v) => u64::from(v.to_bits()),
            Self::Double(v) => v.to_bits(),
        }
    }

    /// Integral value widened the way the managed language widens it:
    /// sign-extension for signed types, zero-extension for `char` and
    /// `boolean`. Floating values yield their raw bits.
    #[must_use]
    pub fn widened(&self) -> i64 {
        match *self {
            Self::Bool(b) => i64::from(b),
            Self::Byte(v) => i64::from(v),
            Self::Char(v) => i64::from(v),
            Self::Short(v) => i64::from(v),
            Self::Int(v) => i64::from(v),
            Self::Long(v) => v,
            Self::Float(v) => i64::from(v.to_bits()),
            Self::Double(v) => v.to_bits() as i64,
        }
    }

    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(self, Self::Float(_) | Self::Double(_))
    }

    /// Same type and same bit pattern.
    #[must_use]
    pub fn bits_eq(&self, other: &Self) -> bool {
        self.descriptor() == other.descriptor() && self.raw_bits() == other.raw_bits()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}b"),
            Self::Char(v) => write!(f, "'\\u{v:04x}'"),
            Self::Short(v) => write!(f, "{v}s"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}L"),
            Self::Float(v) => write!(f, "{v:?}f (0x{:08x})", v.to_bits()),
            Self::Double(v) => write!(f, "{v:?} (0x{:016x})", v.to_bits()),
        }
    }
}

/// A primitive array (or a string array) passed by value across the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue {
    Bool(Vec<bool>),
    Byte(Vec<i8>),
    Char(Vec<u16>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    /// `String[]`; `None` elements are null references.
    Str(Vec<Option<String>>),
}

impl ArrayValue {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Byte(v) => v.len(),
            Self::Char(v) => v.len(),
            Self::Short(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Long(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Str(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JNI descriptor of the array type, e.g. `[I`.
    #[must_use]
    pub const fn descriptor(&self) -> &'static str {
        match self {
            Self::Bool(_) => "[Z",
            Self::Byte(_) => "[B",
            Self::Char(_) => "[C",
            Self::Short(_) => "[S",
            Self::Int(_) => "[I",
            Self::Long(_) => "[J",
            Self::Float(_) => "[F",
            Self::Double(_) => "[D",
            Self::Str(_) => "[Ljava/lang/String;",
        }
    }

    /// Element at `idx` as a scalar. `None` for string arrays or out of range.
    #[must_use]
    pub fn scalar_at(&self, idx: usize) -> Option<Scalar> {
        match self {
            Self::Bool(v) => v.get(idx).copied().map(Scalar::Bool),
            Self::Byte(v) => v.get(idx).copied().map(Scalar::Byte),
            Self::Char(v) => v.get(idx).copied().map(Scalar::Char),
            Self::Short(v) => v.get(idx).copied().map(Scalar::Short),
            Self::Int(v) => v.get(idx).copied().map(Scalar::Int),
            Self::Long(v) => v.get(idx).copied().map(Scalar::Long),
            Self::Float(v) => v.get(idx).copied().map(Scalar::Float),
            Self::Double(v) => v.get(idx).copied().map(Scalar::Double),
            Self::Str(_) => None,
        }
    }

    /// Same element type, same length, and bit-identical elements.
    #[must_use]
    pub fn bits_eq(&self, other: &Self) -> bool {
        if self.descriptor() != other.descriptor() || self.len() != other.len() {
            return false;
        }
        if let (Self::Str(a), Self::Str(b)) = (self, other) {
            return a == b;
        }
        (0..self.len()).all(|i| match (self.scalar_at(i), other.scalar_at(i)) {
            (Some(a), Some(b)) => a.bits_eq(&b),
            _ => false,
        })
    }

    /// Index of the first element that differs, if any. Lengths are assumed equal.
    #[must_use]
    pub fn first_difference(&self, other: &Self) -> Option<usize> {
        if let (Self::Str(a), Self::Str(b)) = (self, other) {
            return a.iter().zip(b).position(|(x, y)| x != y);
        }
        (0..self.len().min(other.len())).find(|&i| {
            match (self.scalar_at(i), other.scalar_at(i)) {
                (Some(a), Some(b)) => !a.bits_eq(&b),
                _ => true,
            }
        })
    }

    /// Render a single element for diagnostics.
    #[must_use]
    pub fn render_at(&self, idx: usize) -> String {
        match self {
            Self::Str(v) => match v.get(idx) {
                Some(Some(s)) => format!("{s:?}"),
                Some(None) => "null".to_string(),
                None => "<missing>".to_string(),
            },
            _ => self
                .scalar_at(idx)
                .map_or_else(|| "<missing>".to_string(), |s| s.to_string()),
        }
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.descriptor())?;
        for i in 0..self.len() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&self.render_at(i))?;
        }
        f.write_str("}")
    }
}

/// Whether a weakly observed value survived a reclamation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alive => "alive",
            Self::Dead => "dead",
        })
    }
}

/// Opaque handle to a weak observation held by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeakToken(pub u64);

/// Shape of an [`Outcome`]. Results are only compared value-wise when their
/// shapes agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Unit,
    Scalar(char),
    Array(&'static str),
    Text,
    Fault,
    Liveness,
    Weak,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("void"),
            Self::Scalar(c) => write!(f, "scalar {c}"),
            Self::Array(d) => write!(f, "array {d}"),
            Self::Text => f.write_str("string"),
            Self::Fault => f.write_str("fault"),
            Self::Liveness => f.write_str("liveness"),
            Self::Weak => f.write_str("weak handle"),
        }
    }
}

/// Result of a routine invocation, or the oracle's expectation of it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The routine returned normally with no value.
    Unit,
    Scalar(Scalar),
    Array(ArrayValue),
    Text(String),
    Fault(FaultSignal),
    Liveness(Liveness),
    Weak(WeakToken),
}

impl Outcome {
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::Unit => Shape::Unit,
            Self::Scalar(s) => Shape::Scalar(s.descriptor()),
            Self::Array(a) => Shape::Array(a.descriptor()),
            Self::Text(_) => Shape::Text,
            Self::Fault(_) => Shape::Fault,
            Self::Liveness(_) => Shape::Liveness,
            Self::Weak(_) => Shape::Weak,
        }
    }

    #[must_use]
    pub fn as_fault(&self) -> Option<&FaultSignal> {
        match self {
            Self::Fault(f) => Some(f),
            _ => None,
        }
    }
}

impl From<Scalar> for Outcome {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<ArrayValue> for Outcome {
    fn from(a: ArrayValue) -> Self {
        Self::Array(a)
    }
}

impl From<FaultSignal> for Outcome {
    fn from(f: FaultSignal) -> Self {
        Self::Fault(f)
    }
}

impl From<Liveness> for Outcome {
    fn from(l: Liveness) -> Self {
        Self::Liveness(l)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("void"),
            Self::Scalar(s) => write!(f, "{s}"),
            Self::Array(a) => write!(f, "{a}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Fault(sig) => write!(f, "fault {sig}"),
            Self::Liveness(l) => write!(f, "{l}"),
            Self::Weak(w) => write!(f, "weak#{}", w.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::FaultKind;

    #[test]
    fn bits_eq_distinguishes_signed_zero_and_nan_payload() {
        assert!(!Scalar::Float(0.0).bits_eq(&Scalar::Float(-0.0)));
        assert!(Scalar::Float(f32::NAN).bits_eq(&Scalar::Float(f32::NAN)));
        let other_nan = f32::from_bits(0x7fc0_0001);
        assert!(!Scalar::Float(f32::NAN).bits_eq(&Scalar::Float(other_nan)));
    }

    #[test]
    fn bits_eq_requires_same_width() {
        assert!(!Scalar::Int(1).bits_eq(&Scalar::Long(1)));
        assert!(!Scalar::Short(-1).bits_eq(&Scalar::Char(0xffff)));
        assert!(Scalar::Char(0xea23).bits_eq(&Scalar::Char(0xea23)));
    }

    #[test]
    fn widening_follows_signedness() {
        assert_eq!(Scalar::Byte(-1).widened(), -1);
        assert_eq!(Scalar::Char(0xffff).widened(), 0xffff);
        assert_eq!(Scalar::Short(-256).widened(), -256);
        assert_eq!(Scalar::Bool(true).widened(), 1);
    }

    #[test]
    fn array_difference_is_located() {
        let a = ArrayValue::Int(vec![1, 2, 3]);
        let b = ArrayValue::Int(vec![1, 5, 3]);
        assert!(!a.bits_eq(&b));
        assert_eq!(a.first_difference(&b), Some(1));
        assert!(a.bits_eq(&a.clone()));
        assert!(!a.bits_eq(&ArrayValue::Long(vec![1, 2, 3])));
    }

    #[test]
    fn shapes_include_scalar_type() {
        assert_ne!(
            Outcome::Scalar(Scalar::Int(1)).shape(),
            Outcome::Scalar(Scalar::Long(1)).shape()
        );
        assert_eq!(
            Outcome::Fault(FaultSignal::of(FaultKind::Arithmetic)).shape(),
            Shape::Fault
        );
        assert_eq!(Shape::Array("[J").to_string(), "array [J");
    }
}
