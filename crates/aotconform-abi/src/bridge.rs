//! The native bridge: how the harness invokes compiled routines.
//!
//! Every invocation runs in its own runtime frame. Arguments are checked
//! against the routine's descriptor before anything touches the heap, then
//! marshaled, the routine runs, and its return value is unmarshaled while
//! the frame is still live. The frame is popped on every exit path.
//!
//! A managed fault escaping the routine is not an error: it becomes
//! `Outcome::Fault` carrying the throwable's identity token. Only a routine
//! that is missing, a marshaling mismatch or a runtime misuse surface as
//! [`BridgeError`].

use std::sync::Arc;

use aotconform_core::{FaultSignal, Liveness, Outcome, RaisedFault, WeakToken};
use aotconform_runtime::{CollectionStats, Env, Runtime, RuntimeConfig, Unwind};
use parking_lot::Mutex;

use crate::error::{BridgeError, Trap};
use crate::marshal::{Arg, marshal_arg, unmarshal_return};
use crate::routines::{RoutineFn, RoutineTable};
use crate::signature::Signature;

/// Runtime counters sampled between invocations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Probe {
    pub local_occupancy: usize,
    pub local_peak: usize,
    pub faults_raised: usize,
    pub object_count: usize,
    /// Collections so far, requested or not.
    pub collections: u64,
    pub swept_total: u64,
}

/// Contract between the harness and a library of compiled routines.
pub trait NativeBridge: Send + Sync {
    /// Run routine `id` (`Class.method`) with `args`.
    fn invoke(&self, id: &str, args: &[Arg]) -> Result<Outcome, BridgeError>;

    /// Run a full collection, then purge dead interned strings.
    fn request_full_collection(&self) -> Result<CollectionStats, BridgeError>;

    /// Whether the object behind a weak handle has been collected.
    fn liveness(&self, token: WeakToken) -> Result<Liveness, BridgeError>;

    fn probe(&self) -> Probe;

    /// Faults raised after the first `mark`, oldest first. `mark` comes from
    /// a [`Probe`] taken before the invocation.
    fn faults_since(&self, mark: usize) -> Vec<RaisedFault>;

    /// Descriptor of routine `id`, if the library provides it.
    fn signature(&self, id: &str) -> Option<&'static str>;
}

/// In-process bridge over the modeled runtime and the reference routines.
#[derive(Debug, Clone)]
pub struct ReferenceBridge {
    runtime: Arc<Mutex<Runtime>>,
    routines: RoutineTable,
}

impl ReferenceBridge {
    #[must_use]
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_routines(config, RoutineTable::standard())
    }

    #[must_use]
    pub fn with_routines(config: RuntimeConfig, routines: RoutineTable) -> Self {
        Self {
            runtime: Arc::new(Mutex::new(Runtime::new(config))),
            routines,
        }
    }

    /// Standard routines minus `ids`.
    #[must_use]
    pub fn without_routines(config: RuntimeConfig, ids: &[&str]) -> Self {
        Self::with_routines(config, RoutineTable::standard().without(ids))
    }

    #[must_use]
    pub fn routines(&self) -> &RoutineTable {
        &self.routines
    }

    /// Run `f` with exclusive access to the runtime.
    pub fn with_runtime<R>(&self, f: impl FnOnce(&mut Runtime) -> R) -> R {
        f(&mut self.runtime.lock())
    }
}

fn call(env: &mut Env<'_>, sig: &Signature, func: RoutineFn, args: &[Arg]) -> Result<Outcome, Trap> {
    let slots = args
        .iter()
        .map(|arg| marshal_arg(env, arg))
        .collect::<Result<Vec<_>, _>>()?;
    let returned = func(env, &slots)?;
    unmarshal_return(env, sig, returned)
}

impl NativeBridge for ReferenceBridge {
    fn invoke(&self, id: &str, args: &[Arg]) -> Result<Outcome, BridgeError> {
        let routine = self
            .routines
            .get(id)
            .copied()
            .ok_or_else(|| BridgeError::Unavailable(id.to_string()))?;
        let sig = Signature::parse(routine.descriptor)?;
        sig.check_args(args)?;

        let mut rt = self.runtime.lock();
        let result = {
            let mut env = rt.env();
            call(&mut env, &sig, routine.func, args)
        };
        match result {
            Ok(outcome) => Ok(outcome),
            Err(Trap::Unwind(Unwind::Throw(thrown))) => Ok(Outcome::Fault(
                FaultSignal::of(thrown.kind)
                    .with_token(thrown.token)
                    .with_message(thrown.message),
            )),
            Err(Trap::Unwind(Unwind::Error(e))) => Err(e.into()),
            Err(Trap::Marshal(e)) => Err(e.into()),
        }
    }

    fn request_full_collection(&self) -> Result<CollectionStats, BridgeError> {
        Ok(self.runtime.lock().collect_garbage())
    }

    fn liveness(&self, token: WeakToken) -> Result<Liveness, BridgeError> {
        Ok(self.runtime.lock().liveness(token)?)
    }

    fn probe(&self) -> Probe {
        let rt = self.runtime.lock();
        Probe {
            local_occupancy: rt.local_occupancy(),
            local_peak: rt.local_peak(),
            faults_raised: rt.faults_raised(),
            object_count: rt.object_count(),
            collections: rt.collection_count(),
            swept_total: rt.total_swept(),
        }
    }

    fn faults_since(&self, mark: usize) -> Vec<RaisedFault> {
        self.runtime.lock().faults_since(mark).to_vec()
    }

    fn signature(&self, id: &str) -> Option<&'static str> {
        self.routines.get(id).map(|r| r.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aotconform_core::{FaultKind, Scalar};

    fn bridge() -> ReferenceBridge {
        ReferenceBridge::new(RuntimeConfig::default())
    }

    #[test]
    fn scalar_call_round_trips() {
        let out = bridge()
            .invoke("IntMath.unop", &[Scalar::Int(5).into()])
            .unwrap();
        assert!(matches!(out, Outcome::Scalar(Scalar::Int(_))));
    }

    #[test]
    fn escaping_fault_carries_journaled_token() {
        let b = bridge();
        let mark = b.probe().faults_raised;
        let out = b.invoke("Throw.nullField", &[]).unwrap();
        let fault = out.as_fault().unwrap();
        assert_eq!(fault.kind, FaultKind::NullPointer);
        assert_eq!(
            b.faults_since(mark),
            vec![RaisedFault {
                token: fault.token.unwrap(),
                kind: FaultKind::NullPointer,
            }]
        );
    }

    #[test]
    fn missing_routine_is_unavailable() {
        let b = ReferenceBridge::without_routines(RuntimeConfig::default(), &["IntMath.unop"]);
        assert_eq!(
            b.invoke("IntMath.unop", &[Scalar::Int(1).into()]),
            Err(BridgeError::Unavailable("IntMath.unop".into()))
        );
        assert!(b.signature("IntMath.unop").is_none());
        assert_eq!(b.signature("IntMath.cmpLong"), Some("(JJ)I"));
    }
}
