//! Reference routine table.
//!
//! These are hand-written stand-ins for generated code: each routine does
//! what the fixture method does, using native Rust arithmetic and the
//! runtime's [`Env`] for anything managed. They never call the oracle.

use std::collections::BTreeMap;

use aotconform_core::Scalar;
use aotconform_core::objects::TypeDesc;
use aotconform_runtime::{Env, LocalRef};

use crate::error::{MarshalError, Trap};
use crate::marshal::{Returned, Slot};

/// Register `id => descriptor, function` triples.
macro_rules! register {
    ($table:expr; $($id:literal => $desc:literal, $func:path;)*) => {
        $( $table.add($id, $desc, $func); )*
    };
}

mod arrays;
mod classes;
mod compare;
mod float_math;
mod inst_field;
mod int_math;
mod interned;
mod local_ref;
mod method_call;
mod throw;

pub type RoutineFn = fn(&mut Env<'_>, &[Slot]) -> Result<Returned, Trap>;

#[derive(Clone, Copy)]
pub struct Routine {
    pub descriptor: &'static str,
    pub func: RoutineFn,
}

impl std::fmt::Debug for Routine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Routine")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Routines by id (`Class.method`).
#[derive(Debug, Clone, Default)]
pub struct RoutineTable {
    routines: BTreeMap<&'static str, Routine>,
}

impl RoutineTable {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every reference routine.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::empty();
        int_math::register(&mut table);
        float_math::register(&mut table);
        compare::register(&mut table);
        arrays::register(&mut table);
        classes::register(&mut table);
        inst_field::register(&mut table);
        throw::register(&mut table);
        interned::register(&mut table);
        local_ref::register(&mut table);
        method_call::register(&mut table);
        table
    }

    pub fn add(&mut self, id: &'static str, descriptor: &'static str, func: RoutineFn) {
        self.routines.insert(id, Routine { descriptor, func });
    }

    /// Drop routines, e.g. to model a partially generated library.
    #[must_use]
    pub fn without(mut self, ids: &[&str]) -> Self {
        self.routines.retain(|id, _| !ids.contains(id));
        self
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Routine> {
        self.routines.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routines.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Argument accessors. Signatures are checked before a routine runs, so a
// mismatch here means the routine and its descriptor disagree.
// ---------------------------------------------------------------------------

fn mismatch(args: &[Slot], index: usize, expected: &str) -> Trap {
    MarshalError::Kind {
        index,
        expected: expected.to_string(),
        found: match args.get(index) {
            Some(Slot::Scalar(s)) => s.descriptor().to_string(),
            Some(Slot::Ref(_)) => "reference".to_string(),
            Some(Slot::Class(_)) => "class literal".to_string(),
            None => "nothing".to_string(),
        },
    }
    .into()
}

macro_rules! scalar_accessor {
    ($name:ident, $variant:ident, $ty:ty, $desc:literal) => {
        pub(crate) fn $name(args: &[Slot], index: usize) -> Result<$ty, Trap> {
            match args.get(index) {
                Some(Slot::Scalar(Scalar::$variant(v))) => Ok(*v),
                _ => Err(mismatch(args, index, $desc)),
            }
        }
    };
}

scalar_accessor!(arg_bool, Bool, bool, "Z");
scalar_accessor!(arg_byte, Byte, i8, "B");
scalar_accessor!(arg_char, Char, u16, "C");
scalar_accessor!(arg_short, Short, i16, "S");
scalar_accessor!(arg_int, Int, i32, "I");
scalar_accessor!(arg_long, Long, i64, "J");
scalar_accessor!(arg_float, Float, f32, "F");
scalar_accessor!(arg_double, Double, f64, "D");

pub(crate) fn arg_ref(args: &[Slot], index: usize) -> Result<Option<LocalRef>, Trap> {
    match args.get(index) {
        Some(Slot::Ref(r)) => Ok(*r),
        _ => Err(mismatch(args, index, "reference")),
    }
}

pub(crate) fn arg_class(args: &[Slot], index: usize) -> Result<TypeDesc, Trap> {
    match args.get(index) {
        Some(Slot::Class(t)) => Ok(t.clone()),
        _ => Err(mismatch(args, index, "class literal")),
    }
}

/// Wrap a primitive vector as a returned heap array.
pub(crate) fn ret_array(
    env: &mut Env<'_>,
    value: aotconform_core::ArrayValue,
) -> Result<Returned, Trap> {
    Ok(Returned::from(env.array_from(&value)?))
}
