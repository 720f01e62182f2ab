//! Local-handle loop oracle.
//!
//! The fixture loop runs `n` iterations. Each one produces a value and
//! discards it, produces another into a variable overwritten every
//! iteration, then raises a null-pointer fault and catches it.

use crate::value::ArrayValue;

/// Iteration count used by the standard suite.
pub const LOOP_ITERATIONS: i32 = 1024;

/// `(faults caught, value retained after the loop)`.
#[must_use]
pub fn handle_loop(n: i32) -> (i32, Option<String>) {
    let n = n.max(0);
    let retained = (n > 0).then(|| (n - 1).to_string());
    (n, retained)
}

/// [`handle_loop`] as the `String[] { caught, retained }` the routine returns.
#[must_use]
pub fn handle_loop_outcome(n: i32) -> ArrayValue {
    let (caught, retained) = handle_loop(n);
    ArrayValue::Str(vec![Some(caught.to_string()), retained])
}
