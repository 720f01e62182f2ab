//! String intern table.
//!
//! The table refers to canonical strings only through weak handles, so an
//! interned string with no other strong reference is reclaimed by the next
//! collection. Constant-pool literals stay alive because they are pinned,
//! not because the table holds them.

use std::collections::HashMap;

use aotconform_core::WeakToken;

use crate::error::RuntimeError;
use crate::heap::{Heap, ObjectBody, ObjectId};

#[derive(Debug, Default)]
pub struct InternTable {
    entries: HashMap<String, WeakToken>,
}

impl InternTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical object for the string held by `candidate`. If no live
    /// canonical object exists, `candidate` becomes canonical.
    pub fn intern(&mut self, heap: &mut Heap, candidate: ObjectId) -> Result<ObjectId, RuntimeError> {
        let text = match heap.get(candidate)? {
            ObjectBody::Str(s) => s.clone(),
            other => {
                return Err(RuntimeError::UnexpectedObject {
                    expected: "string",
                    found: other.describe(),
                });
            }
        };
        if let Some(&token) = self.entries.get(&text)
            && let Some(existing) = heap.weak_target(token)?
        {
            return Ok(existing);
        }
        let token = heap.new_weak(candidate)?;
        if let Some(stale) = self.entries.insert(text, token) {
            heap.drop_weak(stale);
        }
        Ok(candidate)
    }

    /// Drop entries whose canonical string has been reclaimed.
    pub fn purge(&mut self, heap: &mut Heap) -> usize {
        let dead: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, token)| !matches!(heap.weak_target(**token), Ok(Some(_))))
            .map(|(text, _)| text.clone())
            .collect();
        for text in &dead {
            if let Some(token) = self.entries.remove(text) {
                heap.drop_weak(token);
            }
        }
        dead.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_returns_first_live_canonical() {
        let mut heap = Heap::new();
        let mut table = InternTable::new();
        let a = heap.alloc(ObjectBody::Str("blahblah".into()));
        let b = heap.alloc(ObjectBody::Str("blahblah".into()));
        assert_eq!(table.intern(&mut heap, a), Ok(a));
        assert_eq!(table.intern(&mut heap, b), Ok(a));
    }

    #[test]
    fn table_does_not_keep_strings_alive() {
        let mut heap = Heap::new();
        let mut table = InternTable::new();
        let a = heap.alloc(ObjectBody::Str("blahblah".into()));
        table.intern(&mut heap, a).expect("string");
        heap.collect([]);
        assert_eq!(table.purge(&mut heap), 1);
        assert!(table.is_empty());

        let b = heap.alloc(ObjectBody::Str("blahblah".into()));
        assert_eq!(table.intern(&mut heap, b), Ok(b));
    }

    #[test]
    fn interning_a_non_string_is_an_error() {
        let mut heap = Heap::new();
        let mut table = InternTable::new();
        let arr = heap.alloc(ObjectBody::PrimArray(aotconform_core::ArrayValue::Int(vec![1])));
        assert!(matches!(
            table.intern(&mut heap, arr),
            Err(RuntimeError::UnexpectedObject { .. })
        ));
    }
}
