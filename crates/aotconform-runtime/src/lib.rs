//! # aotconform-runtime
//!
//! A small managed-runtime model that native routines run against: a
//! mark-sweep heap with weak handles, a weak string intern table, a
//! constant pool, a class table with virtual and super dispatch, and a
//! bounded local-handle table with per-invocation frames.
//!
//! All state lives in one [`Runtime`]. Routines see it only through an
//! [`Env`], which scopes their local handles.

#![deny(unsafe_code)]

pub mod classes;
pub mod config;
pub mod env;
pub mod error;
pub mod heap;
pub mod intern;
pub mod locals;

use std::collections::HashMap;

use aotconform_core::{Liveness, RaisedFault, WeakToken};

pub use classes::{ClassTable, MethodImpl};
pub use config::{OverflowPolicy, RuntimeConfig};
pub use env::Env;
pub use error::{EnvResult, RuntimeError, Thrown, Unwind};
pub use heap::{CollectionStats, Heap, ObjectId};
pub use intern::InternTable;
pub use locals::{LocalRef, LocalTable};

#[derive(Debug)]
pub struct Runtime {
    config: RuntimeConfig,
    heap: Heap,
    classes: ClassTable,
    locals: LocalTable,
    interned: InternTable,
    /// Constant-pool strings by text.
    constants: HashMap<String, ObjectId>,
    /// Faults raised since the outermost frame was last entered, in order.
    faults: Vec<RaisedFault>,
    /// Faults raised before `faults[0]`.
    faults_base: usize,
    next_token: u64,
}

impl Runtime {
    /// Runtime with the fixture classes loaded.
    #[must_use]
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_classes(config, ClassTable::with_fixtures())
    }

    #[must_use]
    pub fn with_classes(config: RuntimeConfig, classes: ClassTable) -> Self {
        Self {
            config,
            heap: Heap::new(),
            classes,
            locals: LocalTable::new(&config),
            interned: InternTable::new(),
            constants: HashMap::new(),
            faults: Vec::new(),
            faults_base: 0,
            next_token: 1,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Enter a new invocation frame.
    pub fn env(&mut self) -> Env<'_> {
        Env::enter(self)
    }

    /// An invocation is starting: journal entries from earlier invocations
    /// have been read by now and are dropped.
    pub(crate) fn begin_invocation(&mut self) {
        self.faults_base += self.faults.len();
        self.faults.clear();
    }

    /// An invocation has finished. Collect if it left enough garbage behind.
    pub(crate) fn end_invocation(&mut self) {
        if self.heap.allocated_since_collection() >= self.config.collect_threshold {
            self.collect_garbage();
        }
    }

    /// Full synchronous collection. Live locals and pinned constants are
    /// roots; dead intern-table entries are purged afterwards.
    pub fn collect_garbage(&mut self) -> CollectionStats {
        let roots: Vec<ObjectId> = self.locals.roots().collect();
        let stats = self.heap.collect(roots);
        self.interned.purge(&mut self.heap);
        stats
    }

    pub fn liveness(&self, token: WeakToken) -> Result<Liveness, RuntimeError> {
        Ok(match self.heap.weak_target(token)? {
            Some(_) => Liveness::Alive,
            None => Liveness::Dead,
        })
    }

    #[must_use]
    pub fn local_occupancy(&self) -> usize {
        self.locals.occupancy()
    }

    #[must_use]
    pub fn local_peak(&self) -> usize {
        self.locals.peak()
    }

    /// Faults raised over the runtime's lifetime.
    #[must_use]
    pub fn faults_raised(&self) -> usize {
        self.faults_base + self.faults.len()
    }

    /// Faults raised after the first `mark`. Only the current (or most
    /// recent) invocation's faults are still journaled.
    #[must_use]
    pub fn faults_since(&self, mark: usize) -> &[RaisedFault] {
        let start = mark.saturating_sub(self.faults_base);
        self.faults.get(start..).unwrap_or(&[])
    }

    #[must_use]
    pub fn collection_count(&self) -> u64 {
        self.heap.collection_count()
    }

    #[must_use]
    pub fn total_swept(&self) -> u64 {
        self.heap.total_swept()
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.heap.object_count()
    }

    #[must_use]
    pub fn interned_count(&self) -> usize {
        self.interned.len()
    }
}
