//! The wide-signature call fixture.
//!
//! `MethodCall.manyArgs` takes thirty parameters of mixed widths and checks
//! each one against the values compiled into it. The fixture below is those
//! values. Edge bit patterns (a NaN payload, negative zero, `Long.MIN_VALUE`,
//! `'\uffff'`, `(byte) -128`) sit at fixed positions, so an argument whose
//! bits change on the way in shows up as a mismatch.

use crate::fault::FaultKind;
use crate::value::Scalar;

pub const MANY_ARGS_DESCRIPTOR: &str = "(IJIJIJIIDFDSICIIBZIIJJIIIII[[Ljava/lang/String;[Ljava/lang/String;Ljava/lang/String;)V";

/// Parameters `a0..=a26`, in declaration order.
pub const MANY_ARGS_SCALARS: [Scalar; 27] = [
    Scalar::Int(0),
    Scalar::Long(i64::MIN),
    Scalar::Int(2),
    Scalar::Long(3),
    Scalar::Int(i32::MIN),
    Scalar::Long(-1),
    Scalar::Int(6),
    Scalar::Int(7),
    Scalar::Double(f64::from_bits(0x7ff8_0000_0000_0bad)),
    Scalar::Float(-0.0),
    Scalar::Double(f64::from_bits(1)),
    Scalar::Short(i16::MIN),
    Scalar::Int(12),
    Scalar::Char(0xffff),
    Scalar::Int(14),
    Scalar::Int(15),
    Scalar::Byte(-128),
    Scalar::Bool(true),
    Scalar::Int(18),
    Scalar::Int(19),
    Scalar::Long(0x1122_3344_5566_7788),
    Scalar::Long(i64::MAX),
    Scalar::Int(22),
    Scalar::Int(23),
    Scalar::Int(24),
    Scalar::Int(25),
    Scalar::Int(26),
];

/// A `String[]` as passed by value; `None` elements are null.
pub type Strings = Vec<Option<String>>;

fn strings(items: &[Option<&str>]) -> Strings {
    items.iter().map(|s| s.map(str::to_string)).collect()
}

/// One set of `manyArgs` arguments. `None` at the top level of a reference
/// parameter is a null reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ManyArgs {
    pub scalars: Vec<Scalar>,
    /// `a27`, a `String[][]` with a null row and an empty row.
    pub rows: Option<Vec<Option<Strings>>>,
    /// `a28`, a `String[]` with a null element.
    pub strings: Option<Strings>,
    pub text: Option<String>,
}

impl ManyArgs {
    /// The values the routine expects.
    #[must_use]
    pub fn fixture() -> Self {
        Self {
            scalars: MANY_ARGS_SCALARS.to_vec(),
            rows: Some(vec![
                Some(strings(&[Some("a0"), None, Some("a2")])),
                None,
                Some(Vec::new()),
            ]),
            strings: Some(strings(&[Some("b0"), None])),
            text: Some("many".to_string()),
        }
    }

    /// Replace scalar parameter `index`.
    #[must_use]
    pub fn with_scalar(mut self, index: usize, value: Scalar) -> Self {
        if let Some(slot) = self.scalars.get_mut(index) {
            *slot = value;
        }
        self
    }

    /// Index of the first parameter that differs from the fixture, comparing
    /// scalars by bit pattern.
    #[must_use]
    pub fn first_mismatch(&self) -> Option<usize> {
        let fixture = Self::fixture();
        if self.scalars.len() != fixture.scalars.len() {
            return Some(self.scalars.len().min(fixture.scalars.len()));
        }
        if let Some(i) = self
            .scalars
            .iter()
            .zip(&fixture.scalars)
            .position(|(a, b)| !a.bits_eq(b))
        {
            return Some(i);
        }
        let base = MANY_ARGS_SCALARS.len();
        if self.rows != fixture.rows {
            Some(base)
        } else if self.strings != fixture.strings {
            Some(base + 1)
        } else if self.text != fixture.text {
            Some(base + 2)
        } else {
            None
        }
    }

    /// What the call should do: return normally, or fail its assertion.
    pub fn check(&self) -> Result<(), FaultKind> {
        match self.first_mismatch() {
            None => Ok(()),
            Some(_) => Err(FaultKind::AssertionFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_matches_scalar_widths() {
        let params: String = MANY_ARGS_SCALARS.iter().map(Scalar::descriptor).collect();
        assert!(MANY_ARGS_DESCRIPTOR.starts_with(&format!("({params}[[L")));
    }

    #[test]
    fn fixture_passes_its_own_check() {
        assert_eq!(ManyArgs::fixture().check(), Ok(()));
    }

    #[test]
    fn canonical_nan_and_positive_zero_are_mismatches() {
        let nan = ManyArgs::fixture().with_scalar(8, Scalar::Double(f64::NAN));
        assert_eq!(nan.first_mismatch(), Some(8));
        let zero = ManyArgs::fixture().with_scalar(9, Scalar::Float(0.0));
        assert_eq!(zero.first_mismatch(), Some(9));
        assert_eq!(zero.check(), Err(FaultKind::AssertionFailed));
    }

    #[test]
    fn reference_parameters_are_positioned_after_scalars() {
        let mut args = ManyArgs::fixture();
        args.strings = Some(strings(&[Some("b0"), Some("null")]));
        assert_eq!(args.first_mismatch(), Some(28));
        let mut args = ManyArgs::fixture();
        args.text = None;
        assert_eq!(args.first_mismatch(), Some(29));
    }
}
