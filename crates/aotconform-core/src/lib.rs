//! # aotconform-core
//!
//! Value model and reference oracles for compiler conformance testing.
//!
//! Everything here is pure: the oracles recompute the result a compiled
//! routine should produce using explicitly specified arithmetic (masked
//! shifts, two's-complement wraparound, IEEE comparison rules, saturating
//! conversions). They never consult the routine under test and never panic
//! on any input. Faults are values (`Outcome::Fault`), not control flow.

#![deny(unsafe_code)]

pub mod approx;
pub mod arrays;
pub mod calls;
pub mod compare;
pub mod conv;
pub mod fault;
pub mod float_math;
pub mod int_math;
pub mod interning;
pub mod locals;
pub mod objects;
pub mod value;

pub use fault::{FaultKind, FaultSignal, FaultToken, RaisedFault};
pub use value::{ArrayValue, Liveness, Outcome, Scalar, WeakToken};
