//! Local-handle table.
//!
//! Generational slot arena: every slot has a generation counter that is
//! bumped when the slot is released, so a handle that outlives its slot is
//! detected (generation mismatch) instead of silently aliasing a newer
//! local. Released slots go onto a free list for reuse.
//!
//! Locals belong to the frame that was innermost when they were created.
//! Popping a frame releases all of its remaining locals, whatever path the
//! routine took out of the frame.

use crate::config::{OverflowPolicy, RuntimeConfig};
use crate::error::RuntimeError;
use crate::heap::ObjectId;

/// A handle to a heap object, valid until deleted or its frame is popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalRef {
    index: u32,
    generation: u32,
}

impl LocalRef {
    #[must_use]
    pub fn index(self) -> u32 {
        self.index
    }

    #[must_use]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u32,
    target: Option<ObjectId>,
    frame: usize,
}

/// Returned when no slot is available under [`OverflowPolicy::Fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalOverflow {
    pub capacity: usize,
}

#[derive(Debug)]
pub struct LocalTable {
    slots: Vec<Slot>,
    free_list: Vec<usize>,
    /// Occupancy at the entry of each active frame.
    frame_marks: Vec<usize>,
    live: usize,
    peak: usize,
    capacity: usize,
    policy: OverflowPolicy,
}

impl LocalTable {
    #[must_use]
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            frame_marks: Vec::new(),
            live: 0,
            peak: 0,
            capacity: config.local_capacity.max(1),
            policy: config.overflow,
        }
    }

    /// Enter a new frame.
    pub fn push_frame(&mut self) {
        self.frame_marks.push(self.live);
    }

    /// Leave the innermost frame, releasing its locals. Returns how many
    /// locals were released.
    pub fn pop_frame(&mut self) -> usize {
        let depth = self.frame_marks.len();
        if self.frame_marks.pop().is_none() {
            return 0;
        }
        let mut released = 0;
        for idx in 0..self.slots.len() {
            let slot = self.slots[idx];
            if slot.target.is_some() && slot.frame == depth {
                self.release(idx);
                released += 1;
            }
        }
        released
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frame_marks.len()
    }

    /// Create a local for `target` in the innermost frame.
    pub fn new_local(&mut self, target: ObjectId) -> Result<LocalRef, LocalOverflow> {
        if self.live >= self.capacity {
            match self.policy {
                OverflowPolicy::Fault => {
                    return Err(LocalOverflow {
                        capacity: self.capacity,
                    });
                }
                OverflowPolicy::Grow => self.capacity = self.capacity.saturating_mul(2),
            }
        }
        let frame = self.frame_marks.len();
        let index = if let Some(free_idx) = self.free_list.pop() {
            let slot = &mut self.slots[free_idx];
            slot.target = Some(target);
            slot.frame = frame;
            free_idx
        } else {
            self.slots.push(Slot {
                generation: 0,
                target: Some(target),
                frame,
            });
            self.slots.len() - 1
        };
        self.live += 1;
        self.peak = self.peak.max(self.live);
        Ok(LocalRef {
            index: index as u32,
            generation: self.slots[index].generation,
        })
    }

    fn slot_index(&self, local: LocalRef) -> Result<usize, RuntimeError> {
        let idx = local.index as usize;
        match self.slots.get(idx) {
            Some(slot) if slot.generation == local.generation && slot.target.is_some() => Ok(idx),
            _ => Err(RuntimeError::StaleLocal {
                index: local.index,
                generation: local.generation,
            }),
        }
    }

    /// Object a live local refers to.
    pub fn get(&self, local: LocalRef) -> Result<ObjectId, RuntimeError> {
        let idx = self.slot_index(local)?;
        self.slots[idx].target.ok_or(RuntimeError::StaleLocal {
            index: local.index,
            generation: local.generation,
        })
    }

    /// Release a local before its frame ends.
    pub fn delete(&mut self, local: LocalRef) -> Result<(), RuntimeError> {
        let idx = self.slot_index(local)?;
        self.release(idx);
        Ok(())
    }

    fn release(&mut self, idx: usize) {
        let slot = &mut self.slots[idx];
        slot.target = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(idx);
        self.live -= 1;
    }

    /// Number of live locals.
    #[must_use]
    pub fn occupancy(&self) -> usize {
        self.live
    }

    /// Highest occupancy ever observed.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Objects referenced by live locals; these are collection roots.
    pub fn roots(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.slots.iter().filter_map(|s| s.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{Heap, ObjectBody};

    fn ids(n: usize) -> Vec<ObjectId> {
        let mut heap = Heap::new();
        (0..n).map(|i| heap.alloc(ObjectBody::Str(i.to_string()))).collect()
    }

    #[test]
    fn pop_frame_releases_everything_created_in_it() {
        let objs = ids(4);
        let mut table = LocalTable::new(&RuntimeConfig::default());
        table.push_frame();
        let outer = table.new_local(objs[0]).expect("slot");
        table.push_frame();
        table.new_local(objs[1]).expect("slot");
        table.new_local(objs[2]).expect("slot");
        assert_eq!(table.occupancy(), 3);
        assert_eq!(table.pop_frame(), 2);
        assert_eq!(table.occupancy(), 1);
        assert_eq!(table.get(outer), Ok(objs[0]));
        assert_eq!(table.pop_frame(), 1);
        assert_eq!(table.occupancy(), 0);
        assert_eq!(table.peak(), 3);
    }

    #[test]
    fn deleted_handles_are_stale_and_slots_reused() {
        let objs = ids(2);
        let mut table = LocalTable::new(&RuntimeConfig::default());
        table.push_frame();
        let a = table.new_local(objs[0]).expect("slot");
        table.delete(a).expect("live");
        assert!(matches!(table.get(a), Err(RuntimeError::StaleLocal { .. })));
        assert!(table.delete(a).is_err());
        let b = table.new_local(objs[1]).expect("slot");
        assert_eq!(b.index(), a.index());
        assert_ne!(b.generation(), a.generation());
        assert_eq!(table.get(b), Ok(objs[1]));
    }

    #[test]
    fn overflow_faults_or_grows() {
        let objs = ids(3);
        let cfg = RuntimeConfig::default().with_local_capacity(2);
        let mut table = LocalTable::new(&cfg);
        table.push_frame();
        table.new_local(objs[0]).expect("slot");
        table.new_local(objs[1]).expect("slot");
        assert_eq!(table.new_local(objs[2]), Err(LocalOverflow { capacity: 2 }));

        let mut growing = LocalTable::new(&cfg.with_overflow(OverflowPolicy::Grow));
        growing.push_frame();
        for &id in &objs {
            growing.new_local(id).expect("grows");
        }
        assert_eq!(growing.capacity(), 4);
        assert_eq!(growing.roots().count(), 3);
    }

    #[test]
    fn bounded_loop_with_deletes_stays_flat() {
        let objs = ids(1);
        let cfg = RuntimeConfig::default().with_local_capacity(4);
        let mut table = LocalTable::new(&cfg);
        table.push_frame();
        let mut kept = None;
        for _ in 0..10_000 {
            let tmp = table.new_local(objs[0]).expect("slot");
            table.delete(tmp).expect("live");
            let next = table.new_local(objs[0]).expect("slot");
            if let Some(prev) = kept.replace(next) {
                table.delete(prev).expect("live");
            }
        }
        assert_eq!(table.occupancy(), 1);
        assert!(table.peak() <= 2);
    }
}
