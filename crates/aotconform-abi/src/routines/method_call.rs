//! Method-call routines: overriding through `super`, and a thirty-argument
//! static call that checks every parameter it receives.

use aotconform_core::calls::{MANY_ARGS_DESCRIPTOR, MANY_ARGS_SCALARS};
use aotconform_core::{ArrayValue, FaultKind, Scalar};
use aotconform_runtime::{Env, LocalRef};

use super::{
    RoutineTable, arg_bool, arg_byte, arg_char, arg_double, arg_float, arg_int, arg_long, arg_ref,
    arg_short,
};
use crate::error::Trap;
use crate::marshal::{Returned, Slot};

pub(super) fn register(table: &mut RoutineTable) {
    register! { table;
        "MethodCall.tryThing" => "(LMethodCallBase;)I", try_thing;
    }
    table.add("MethodCall.manyArgs", MANY_ARGS_DESCRIPTOR, many_args);
}

fn try_thing(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let recv = arg_ref(args, 0)?;
    Ok(Scalar::Int(env.call_int_method(recv, "tryThing")?).into())
}

const ROWS: [Option<&[Option<&str>]>; 3] = [
    Some(&[Some("a0"), None, Some("a2")]),
    None,
    Some(&[]),
];
const STRINGS: [Option<&str>; 2] = [Some("b0"), None];
const TEXT: &str = "many";

/// Read parameter `index` with the accessor for `like`'s type.
fn scalar_like(args: &[Slot], index: usize, like: Scalar) -> Result<Scalar, Trap> {
    Ok(match like {
        Scalar::Bool(_) => Scalar::Bool(arg_bool(args, index)?),
        Scalar::Byte(_) => Scalar::Byte(arg_byte(args, index)?),
        Scalar::Char(_) => Scalar::Char(arg_char(args, index)?),
        Scalar::Short(_) => Scalar::Short(arg_short(args, index)?),
        Scalar::Int(_) => Scalar::Int(arg_int(args, index)?),
        Scalar::Long(_) => Scalar::Long(arg_long(args, index)?),
        Scalar::Float(_) => Scalar::Float(arg_float(args, index)?),
        Scalar::Double(_) => Scalar::Double(arg_double(args, index)?),
    })
}

/// A `String[]` parameter copied out, `None` if it is null.
fn strings(env: &mut Env<'_>, array: Option<LocalRef>) -> Result<Option<Vec<Option<String>>>, Trap> {
    if array.is_none() {
        return Ok(None);
    }
    match env.array_value(array)? {
        ArrayValue::Str(items) => Ok(Some(items)),
        other => Err(fail(env, format!("{} is not a string array", other.descriptor()))),
    }
}

fn owned(items: &[Option<&str>]) -> Vec<Option<String>> {
    items.iter().map(|s| s.map(str::to_string)).collect()
}

fn fail(env: &mut Env<'_>, message: String) -> Trap {
    env.throw_new(FaultKind::AssertionFailed, &message).into()
}

/// `static void manyArgs(int a0, long a1, ..., String[][] a27, String[] a28, String a29)`
fn many_args(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    for (i, want) in MANY_ARGS_SCALARS.into_iter().enumerate() {
        let got = scalar_like(args, i, want)?;
        if !got.bits_eq(&want) {
            return Err(fail(env, format!("a{i}: {got}, expected {want}")));
        }
    }

    let outer = arg_ref(args, 27)?;
    if outer.is_none() {
        return Err(fail(env, "a27: null".to_string()));
    }
    let rows = env.array_length(outer)?;
    if rows as usize != ROWS.len() {
        return Err(fail(env, format!("a27: length {rows}, expected {}", ROWS.len())));
    }
    for (r, want) in ROWS.iter().enumerate() {
        let row = env.get_object_element(outer, r as i32)?;
        let got = strings(env, row)?;
        if let Some(local) = row {
            env.delete_local(local)?;
        }
        if got != want.map(owned) {
            return Err(fail(env, format!("a27[{r}]: {got:?}, expected {want:?}")));
        }
    }

    let got = strings(env, arg_ref(args, 28)?)?;
    if got != Some(owned(&STRINGS)) {
        return Err(fail(env, format!("a28: {got:?}, expected {STRINGS:?}")));
    }

    let text = arg_ref(args, 29)?;
    let got = match text {
        Some(_) => Some(env.string_value(text)?),
        None => None,
    };
    if got.as_deref() != Some(TEXT) {
        return Err(fail(env, format!("a29: {got:?}, expected {TEXT:?}")));
    }
    Ok(Returned::Void)
}
