//! Fault raising, catching and rethrowing routines.

use aotconform_core::{FaultKind, Scalar};
use aotconform_runtime::{Env, Unwind};

use super::{RoutineTable, arg_int};
use crate::error::Trap;
use crate::marshal::{Returned, Slot};

const NPE: &str = "java/lang/NullPointerException";
const IOOBE: &str = "java/lang/IndexOutOfBoundsException";
const RUNTIME_EXCEPTION: &str = "java/lang/RuntimeException";

pub(super) fn register(table: &mut RoutineTable) {
    register! { table;
        "Throw.nullField" => "()I", null_field;
        "Throw.nullMethod" => "()I", null_method;
        "Throw.rethrow" => "(I)I", rethrow;
        "Throw.rethrowFresh" => "(I)I", rethrow_fresh;
        "Throw.catchCode" => "(I)I", catch_code;
    }
}

/// `((InstField) null).mInt1`
fn null_field(env: &mut Env<'_>, _args: &[Slot]) -> Result<Returned, Trap> {
    Ok(env.get_field(None, "mInt1")?.into())
}

/// `((Classes) null).tag()`
fn null_method(env: &mut Env<'_>, _args: &[Slot]) -> Result<Returned, Trap> {
    Ok(Scalar::Int(env.call_int_method(None, "tag")?).into())
}

fn load_from_pair(env: &mut Env<'_>, idx: i32) -> Result<Scalar, Unwind> {
    let pair = Some(env.new_prim_array('I', 2)?);
    env.get_element(pair, idx)
}

/// `try { return pair[idx]; } catch (IndexOutOfBoundsException e) { throw e; }`
fn rethrow(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let idx = arg_int(args, 0)?;
    match load_from_pair(env, idx) {
        Ok(v) => Ok(v.into()),
        Err(unwind) => {
            let caught = env.catch(unwind, IOOBE)?;
            Err(Unwind::Throw(caught).into())
        }
    }
}

/// Like [`rethrow`], but throws a new fault of the same kind. Identity is lost.
fn rethrow_fresh(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let idx = arg_int(args, 0)?;
    match load_from_pair(env, idx) {
        Ok(v) => Ok(v.into()),
        Err(unwind) => {
            let caught = env.catch(unwind, IOOBE)?;
            Err(env.throw_new(caught.kind, &caught.message).into())
        }
    }
}

/// ```text
/// try { raise(x); return 0; }
/// catch (NullPointerException e) { return 1; }
/// catch (RuntimeException e) { return 2; }
/// ```
/// where `raise` throws NPE, bounds, arithmetic, or an assertion error for
/// `x` = 0..=3, and nothing otherwise.
fn catch_code(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let x = arg_int(args, 0)?;
    let raised: Result<(), Unwind> = match x {
        0 => env.string_length(None).map(|_| ()),
        1 => load_from_pair(env, 2).map(|_| ()),
        2 => Err(env.throw_new(FaultKind::Arithmetic, "divide by zero").into()),
        3 => Err(env.throw_new(FaultKind::AssertionFailed, "raise(3)").into()),
        _ => Ok(()),
    };
    let code = match raised {
        Ok(()) => 0,
        Err(unwind) => match env.catch(unwind, NPE) {
            Ok(_) => 1,
            Err(unwind) => {
                env.catch(unwind, RUNTIME_EXCEPTION)?;
                2
            }
        },
    };
    Ok(Scalar::Int(code).into())
}
