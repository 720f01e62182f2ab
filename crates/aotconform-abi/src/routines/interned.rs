//! String interning routines.

use aotconform_core::Scalar;
use aotconform_runtime::Env;

use super::{RoutineTable, arg_ref};
use crate::error::Trap;
use crate::marshal::{Returned, Slot};

const HALF: &str = "blah";
const POOL: &str = "Class InternedString";

pub(super) fn register(table: &mut RoutineTable) {
    register! { table;
        "Interned.weakComputed" => "()Ljava/lang/ref/WeakReference;", weak_computed;
        "Interned.weakLiteral" => "()Ljava/lang/ref/WeakReference;", weak_literal;
        "Interned.internTwiceSame" => "()Z", intern_twice_same;
        "Interned.internMatchesLiteral" => "()Z", intern_matches_literal;
        "Interned.concat" => "(Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;", concat;
    }
}

/// `new WeakReference<>((HALF + HALF).intern())`; the strong reference dies
/// with the frame.
fn weak_computed(env: &mut Env<'_>, _args: &[Slot]) -> Result<Returned, Trap> {
    let half = Some(env.literal(HALF)?);
    let built = env.concat(half, half)?;
    let interned = env.intern(Some(built))?;
    Ok(Returned::Weak(env.new_weak(interned)?))
}

fn weak_literal(env: &mut Env<'_>, _args: &[Slot]) -> Result<Returned, Trap> {
    let lit = env.literal(POOL)?;
    let interned = env.intern(Some(lit))?;
    Ok(Returned::Weak(env.new_weak(interned)?))
}

fn intern_twice_same(env: &mut Env<'_>, _args: &[Slot]) -> Result<Returned, Trap> {
    let half = Some(env.literal(HALF)?);
    let a = env.concat(half, half)?;
    let b = env.concat(half, half)?;
    let ia = env.intern(Some(a))?;
    let ib = env.intern(Some(b))?;
    Ok(Scalar::Bool(env.is_same_object(Some(ia), Some(ib))?).into())
}

fn intern_matches_literal(env: &mut Env<'_>, _args: &[Slot]) -> Result<Returned, Trap> {
    let lit = Some(env.literal(POOL)?);
    let (head, tail) = POOL.split_at(6);
    let head = Some(env.new_string(head)?);
    let tail = Some(env.new_string(tail)?);
    let copy = env.concat(head, tail)?;
    let interned = env.intern(Some(copy))?;
    Ok(Scalar::Bool(env.is_same_object(lit, Some(interned))?).into())
}

fn concat(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let a = arg_ref(args, 0)?;
    let b = arg_ref(args, 1)?;
    Ok(env.concat(a, b)?.into())
}
