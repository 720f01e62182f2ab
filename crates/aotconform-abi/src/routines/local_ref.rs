//! Local-handle lifecycle routines.

use aotconform_core::Scalar;
use aotconform_core::objects::{STRING, TypeDesc};
use aotconform_runtime::Env;

use super::{RoutineTable, arg_int};
use crate::error::Trap;
use crate::marshal::{Returned, Slot};

pub(super) fn register(table: &mut RoutineTable) {
    register! { table;
        "LocalRef.loop" => "(I)[Ljava/lang/String;", handle_loop;
        "LocalRef.leak" => "(I)I", leak;
    }
}

/// ```text
/// for (int i = 0; i < n; i++) {
///     String.valueOf(i);                 // discarded
///     retained = String.valueOf(i);      // overwritten
///     try { ((String) null).length(); } catch (NullPointerException e) { caught++; }
/// }
/// return new String[] { String.valueOf(caught), retained };
/// ```
/// Every handle the body no longer needs is deleted before the next
/// iteration.
fn handle_loop(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let n = arg_int(args, 0)?;
    let mut caught = 0i32;
    let mut retained = None;
    for i in 0..n {
        let discarded = env.new_string(&i.to_string())?;
        env.delete_local(discarded)?;

        let next = env.new_string(&i.to_string())?;
        if let Some(prev) = retained.replace(next) {
            env.delete_local(prev)?;
        }

        if let Err(unwind) = env.string_length(None) {
            env.catch(unwind, "java/lang/NullPointerException")?;
            caught += 1;
        }
    }
    let out = Some(env.new_object_array(TypeDesc::class(STRING), 2)?);
    let count = env.new_string(&caught.to_string())?;
    env.set_object_element(out, 0, Some(count))?;
    env.set_object_element(out, 1, retained)?;
    Ok(Returned::Object(out))
}

/// Allocate `n` strings and never delete their handles.
fn leak(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let n = arg_int(args, 0)?;
    for i in 0..n {
        env.new_string(&i.to_string())?;
    }
    Ok(Scalar::Int(n).into())
}
