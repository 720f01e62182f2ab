//! The standard suites, one per semantic area, in execution order.
//!
//! The floating-point baseline runs before anything compared with a
//! tolerance, and the local-handle suite runs last so its occupancy checks
//! see a runtime that every other routine has already exercised.

use aotconform_abi::Arg;
use aotconform_core::{ArrayValue, FaultKind, FaultSignal, Outcome, Scalar};
use aotconform_runtime::RuntimeConfig;

use crate::case::TestSuite;

mod arrays;
mod comparisons;
mod conversions;
mod exceptions;
mod fields;
mod float_baseline;
mod float_tolerance;
mod integer_arithmetic;
mod interning;
mod local_handles;
mod objects;

#[must_use]
pub fn standard(config: &RuntimeConfig) -> Vec<TestSuite> {
    vec![
        integer_arithmetic::suite(),
        float_baseline::suite(),
        comparisons::suite(),
        conversions::suite(),
        float_tolerance::suite(),
        arrays::suite(),
        objects::suite(),
        fields::suite(),
        exceptions::suite(),
        interning::suite(),
        local_handles::suite(config),
    ]
}

// ---------------------------------------------------------------------------
// Argument and expectation shorthands
// ---------------------------------------------------------------------------

pub(crate) fn int(v: i32) -> Arg {
    Scalar::Int(v).into()
}

pub(crate) fn long(v: i64) -> Arg {
    Scalar::Long(v).into()
}

pub(crate) fn float(v: f32) -> Arg {
    Scalar::Float(v).into()
}

pub(crate) fn double(v: f64) -> Arg {
    Scalar::Double(v).into()
}

pub(crate) fn boolean(v: bool) -> Arg {
    Scalar::Bool(v).into()
}

pub(crate) fn fault(kind: FaultKind) -> Outcome {
    Outcome::Fault(FaultSignal::of(kind))
}

/// `Ok(v)` as a value, `Err(kind)` as an expected fault.
pub(crate) fn or_fault<T: Into<Outcome>>(result: Result<T, FaultKind>) -> Outcome {
    match result {
        Ok(v) => v.into(),
        Err(kind) => fault(kind),
    }
}

pub(crate) fn ints<const N: usize>(values: [i32; N]) -> Outcome {
    ArrayValue::Int(values.to_vec()).into()
}

pub(crate) fn longs<const N: usize>(values: [i64; N]) -> Outcome {
    ArrayValue::Long(values.to_vec()).into()
}

pub(crate) fn floats<const N: usize>(values: [f32; N]) -> Outcome {
    ArrayValue::Float(values.to_vec()).into()
}

pub(crate) fn doubles<const N: usize>(values: [f64; N]) -> Outcome {
    ArrayValue::Double(values.to_vec()).into()
}

pub(crate) fn bools<const N: usize>(values: [bool; N]) -> Outcome {
    ArrayValue::Bool(values.to_vec()).into()
}
