//! Managed heap with a synchronous mark-sweep collector.
//!
//! Objects live in a `BTreeMap` keyed by a monotonically assigned id, so
//! marking and sweeping visit objects in a deterministic order. Roots are:
//! - pinned objects (constant-pool entries);
//! - whatever the caller passes to [`Heap::collect`] (live local handles).
//!
//! Weak handles do not keep their target alive. A sweep clears every weak
//! handle whose target was reclaimed, before `collect` returns.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use aotconform_core::objects::{STRING, TypeDesc};
use aotconform_core::{ArrayValue, FaultKind, FaultToken, Scalar, WeakToken};

use crate::error::RuntimeError;

/// Identity of a heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj-{}", self.0)
    }
}

/// Value stored in an instance field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Scalar(Scalar),
    Ref(Option<ObjectId>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectBody {
    Instance {
        class: String,
        fields: BTreeMap<String, FieldValue>,
    },
    /// Primitive array. Never holds `ArrayValue::Str`; string arrays are
    /// reference arrays of string objects.
    PrimArray(ArrayValue),
    RefArray {
        element: TypeDesc,
        items: Vec<Option<ObjectId>>,
    },
    Str(String),
    Throwable {
        kind: FaultKind,
        message: String,
        token: FaultToken,
    },
}

impl ObjectBody {
    fn references(&self) -> Vec<ObjectId> {
        match self {
            Self::Instance { fields, .. } => fields
                .values()
                .filter_map(|v| match v {
                    FieldValue::Ref(r) => *r,
                    FieldValue::Scalar(_) => None,
                })
                .collect(),
            Self::RefArray { items, .. } => items.iter().flatten().copied().collect(),
            Self::PrimArray(_) | Self::Str(_) | Self::Throwable { .. } => Vec::new(),
        }
    }

    /// Runtime type of the object.
    #[must_use]
    pub fn type_desc(&self) -> TypeDesc {
        match self {
            Self::Instance { class, .. } => TypeDesc::class(class),
            Self::PrimArray(a) => TypeDesc::parse(a.descriptor())
                .unwrap_or_else(|| TypeDesc::object().array_of()),
            Self::RefArray { element, .. } => element.clone().array_of(),
            Self::Str(_) => TypeDesc::class(STRING),
            Self::Throwable { kind, .. } => TypeDesc::class(kind.class_name()),
        }
    }

    /// Short description for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        self.type_desc().descriptor()
    }
}

#[derive(Debug, Clone)]
struct HeapObject {
    body: ObjectBody,
    pinned: bool,
}

/// Statistics from a single collection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub marked_count: u64,
    pub swept_count: u64,
    pub weak_cleared: u64,
}

#[derive(Debug, Default)]
pub struct Heap {
    objects: BTreeMap<ObjectId, HeapObject>,
    next_id: u64,
    weak: BTreeMap<WeakToken, Option<ObjectId>>,
    next_weak: u64,
    collection_count: u64,
    total_swept: u64,
    /// Objects left after the last collection.
    survivors: usize,
}

impl Heap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an unpinned object.
    pub fn alloc(&mut self, body: ObjectBody) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, HeapObject { body, pinned: false });
        id
    }

    pub fn get(&self, id: ObjectId) -> Result<&ObjectBody, RuntimeError> {
        self.objects
            .get(&id)
            .map(|o| &o.body)
            .ok_or(RuntimeError::DanglingObject(id.0))
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Result<&mut ObjectBody, RuntimeError> {
        self.objects
            .get_mut(&id)
            .map(|o| &mut o.body)
            .ok_or(RuntimeError::DanglingObject(id.0))
    }

    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Make an object a permanent root.
    pub fn pin(&mut self, id: ObjectId) -> Result<(), RuntimeError> {
        let obj = self
            .objects
            .get_mut(&id)
            .ok_or(RuntimeError::DanglingObject(id.0))?;
        obj.pinned = true;
        Ok(())
    }

    /// Register a weak observation of `id`.
    pub fn new_weak(&mut self, id: ObjectId) -> Result<WeakToken, RuntimeError> {
        if !self.contains(id) {
            return Err(RuntimeError::DanglingObject(id.0));
        }
        let token = WeakToken(self.next_weak);
        self.next_weak += 1;
        self.weak.insert(token, Some(id));
        Ok(token)
    }

    /// Current target of a weak handle; `None` once reclaimed.
    pub fn weak_target(&self, token: WeakToken) -> Result<Option<ObjectId>, RuntimeError> {
        self.weak
            .get(&token)
            .copied()
            .ok_or(RuntimeError::UnknownWeak(token.0))
    }

    /// Forget a weak handle.
    pub fn drop_weak(&mut self, token: WeakToken) {
        self.weak.remove(&token);
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn collection_count(&self) -> u64 {
        self.collection_count
    }

    /// Objects allocated since the last collection that are still on the
    /// heap (an upper bound on the garbage a collection would find).
    #[must_use]
    pub fn allocated_since_collection(&self) -> usize {
        self.objects.len().saturating_sub(self.survivors)
    }

    #[must_use]
    pub fn total_swept(&self) -> u64 {
        self.total_swept
    }

    /// Full mark-sweep. `extra_roots` are treated like pinned objects for
    /// this pass only. References to ids no longer on the heap are ignored.
    pub fn collect(&mut self, extra_roots: impl IntoIterator<Item = ObjectId>) -> CollectionStats {
        let mut marked: BTreeSet<ObjectId> = BTreeSet::new();
        let mut work_stack: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, o)| o.pinned)
            .map(|(id, _)| *id)
            .collect();
        work_stack.extend(extra_roots);

        while let Some(id) = work_stack.pop() {
            if marked.contains(&id) {
                continue;
            }
            if let Some(obj) = self.objects.get(&id) {
                marked.insert(id);
                work_stack.extend(
                    obj.body
                        .references()
                        .into_iter()
                        .filter(|r| !marked.contains(r)),
                );
            }
        }

        let before = self.objects.len() as u64;
        self.objects.retain(|id, _| marked.contains(id));
        let swept_count = before - self.objects.len() as u64;

        let mut weak_cleared = 0;
        for target in self.weak.values_mut() {
            if target.is_some_and(|id| !marked.contains(&id)) {
                *target = None;
                weak_cleared += 1;
            }
        }

        self.collection_count += 1;
        self.total_swept += swept_count;
        self.survivors = self.objects.len();

        CollectionStats {
            marked_count: marked.len() as u64,
            swept_count,
            weak_cleared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(heap: &mut Heap, s: &str) -> ObjectId {
        heap.alloc(ObjectBody::Str(s.to_string()))
    }

    #[test]
    fn unrooted_objects_are_swept_and_weak_cleared() {
        let mut heap = Heap::new();
        let a = string(&mut heap, "a");
        let w = heap.new_weak(a).expect("live object");
        let stats = heap.collect([]);
        assert_eq!(stats.swept_count, 1);
        assert_eq!(stats.weak_cleared, 1);
        assert_eq!(heap.weak_target(w), Ok(None));
        assert!(!heap.contains(a));
    }

    #[test]
    fn pinned_and_extra_roots_survive() {
        let mut heap = Heap::new();
        let pinned = string(&mut heap, "pinned");
        heap.pin(pinned).expect("pin");
        let local = string(&mut heap, "local");
        let garbage = string(&mut heap, "garbage");
        let stats = heap.collect([local]);
        assert_eq!(stats.marked_count, 2);
        assert!(heap.contains(pinned));
        assert!(heap.contains(local));
        assert!(!heap.contains(garbage));
    }

    #[test]
    fn references_are_traced_through_arrays_and_fields() {
        let mut heap = Heap::new();
        let leaf = string(&mut heap, "leaf");
        let arr = heap.alloc(ObjectBody::RefArray {
            element: TypeDesc::class(STRING),
            items: vec![Some(leaf), None],
        });
        let mut fields = BTreeMap::new();
        fields.insert("mArr".to_string(), FieldValue::Ref(Some(arr)));
        let holder = heap.alloc(ObjectBody::Instance {
            class: "Holder".to_string(),
            fields,
        });
        heap.collect([holder]);
        assert!(heap.contains(leaf));
        heap.collect([]);
        assert_eq!(heap.object_count(), 0);
        assert_eq!(heap.collection_count(), 2);
    }

    #[test]
    fn cycles_terminate() {
        let mut heap = Heap::new();
        let a = heap.alloc(ObjectBody::RefArray {
            element: TypeDesc::object(),
            items: vec![None],
        });
        let b = heap.alloc(ObjectBody::RefArray {
            element: TypeDesc::object(),
            items: vec![Some(a)],
        });
        if let Ok(ObjectBody::RefArray { items, .. }) = heap.get_mut(a) {
            items[0] = Some(b);
        }
        assert_eq!(heap.collect([a]).marked_count, 2);
        assert_eq!(heap.collect([]).swept_count, 2);
    }

    #[test]
    fn unknown_weak_is_an_error() {
        let heap = Heap::new();
        assert_eq!(heap.weak_target(WeakToken(9)), Err(RuntimeError::UnknownWeak(9)));
    }
}
