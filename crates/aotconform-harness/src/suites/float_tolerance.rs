//! Accumulations whose rounding depends on evaluation order. The oracle
//! sums largest index first, so exact bits are not expected.

use aotconform_core::Scalar;

use super::int;
use crate::case::{TestCase, TestSuite};
use crate::policy::Policy;

fn harmonic(n: i32) -> f64 {
    (1..=n).rev().map(|k| 1.0 / f64::from(k)).sum()
}

fn harmonic_f32(n: i32) -> f32 {
    (1..=n).rev().map(|k| 1.0 / k as f32).sum()
}

pub(super) fn suite() -> TestSuite {
    let mut s = TestSuite::new("float_tolerance");
    for n in [1, 100, 10_000] {
        s.push(
            TestCase::call(format!("harmonic_{n}"), "FloatMath.harmonic", vec![int(n)])
                .expect(move || Scalar::Double(harmonic(n)).into())
                .with_policy(Policy::Approx { max_delta: 1.0e-9 }),
        );
        s.push(
            TestCase::call(format!("harmonic_float_{n}"), "FloatMath.harmonicFloat", vec![int(n)])
                .expect(move || Scalar::Float(harmonic_f32(n)).into())
                .with_policy(Policy::Approx { max_delta: 1.0e-2 }),
        );
    }
    s
}
