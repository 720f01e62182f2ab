//! # aotconform-abi
//!
//! The native bridge contract between the conformance harness and a
//! library of ahead-of-time compiled routines.
//!
//! - [`NativeBridge`]: invoke a routine by id, request a full collection,
//!   observe weak handles, sample runtime counters.
//! - [`Signature`]: method descriptors and the argument kinds each
//!   parameter accepts.
//! - [`ReferenceBridge`]: an in-process implementation backed by
//!   `aotconform-runtime` and the [`RoutineTable`] of reference routines.

#![deny(unsafe_code)]

pub mod bridge;
pub mod error;
pub mod marshal;
pub mod routines;
pub mod signature;

pub use bridge::{NativeBridge, Probe, ReferenceBridge};
pub use error::{BridgeError, MarshalError, Trap};
pub use marshal::{Arg, Returned, Slot};
pub use routines::{Routine, RoutineFn, RoutineTable};
pub use signature::Signature;
