//! Array access, allocation and static-data routines.
//!
//! The `verify*` routines are array-in/void checks: they throw an assertion
//! fault at the first element that differs from the data compiled into them.

use aotconform_core::objects::TypeDesc;
use aotconform_core::{ArrayValue, FaultKind, Scalar};
use aotconform_runtime::{Env, LocalRef};

use super::{RoutineTable, arg_bool, arg_int, arg_long, arg_ref, ret_array};
use crate::error::Trap;
use crate::marshal::{Returned, Slot};

pub(super) fn register(table: &mut RoutineTable) {
    register! { table;
        "Arrays.verifyBytes" => "([B)V", verify_bytes;
        "Arrays.verifyShorts" => "([S)V", verify_shorts;
        "Arrays.verifyChars" => "([C)V", verify_chars;
        "Arrays.verifyInts" => "([I)V", verify_ints;
        "Arrays.verifyBooleans" => "([Z)V", verify_booleans;
        "Arrays.verifyFloats" => "([F)V", verify_floats;
        "Arrays.verifyLongs" => "([J)V", verify_longs;
        "Arrays.verifyStrings" => "([Ljava/lang/String;)V", verify_strings;
        "Arrays.fillBytes" => "()[B", fill_bytes;
        "Arrays.fillChars" => "()[C", fill_chars;
        "Arrays.fillLongs" => "()[J", fill_longs;
        "Arrays.filledNewArray" => "(III)[I", filled_new_array;
        "Arrays.getInt" => "([II)I", get_int;
        "Arrays.putInt" => "([III)[I", put_int;
        "Arrays.getLong" => "([JI)J", get_long;
        "Arrays.putLong" => "([JIJ)[J", put_long;
        "Arrays.newIntArray" => "(I)I", new_int_array;
        "Arrays.newObjectArray" => "(I)I", new_object_array;
        "Arrays.newNested" => "(II)I", new_nested;
        "Arrays.storeCovariant" => "(Z)V", store_covariant;
    }
}

fn verify(env: &mut Env<'_>, array: Option<LocalRef>, expected: &[Scalar]) -> Result<Returned, Trap> {
    let len = env.array_length(array)?;
    if len as usize != expected.len() {
        return Err(env
            .throw_new(
                FaultKind::AssertionFailed,
                &format!("length {len}, expected {}", expected.len()),
            )
            .into());
    }
    for (i, want) in expected.iter().enumerate() {
        let got = env.get_element(array, i as i32)?;
        if !got.bits_eq(want) {
            return Err(env
                .throw_new(
                    FaultKind::AssertionFailed,
                    &format!("element {i}: {got}, expected {want}"),
                )
                .into());
        }
    }
    Ok(Returned::Void)
}

fn verify_bytes(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let expected = [0, -1, -2, -3, -4].map(Scalar::Byte);
    verify(env, arg_ref(args, 0)?, &expected)
}

fn verify_shorts(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let expected = [20, 10, 0, -10, -20].map(Scalar::Short);
    verify(env, arg_ref(args, 0)?, &expected)
}

fn verify_chars(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let expected = [40000, 40001, 40002, 40003, 40004].map(Scalar::Char);
    verify(env, arg_ref(args, 0)?, &expected)
}

fn verify_ints(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let expected = [70000, 70001, 70002, 70003, 70004].map(Scalar::Int);
    verify(env, arg_ref(args, 0)?, &expected)
}

fn verify_booleans(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let expected = [true, true, false, true, false].map(Scalar::Bool);
    verify(env, arg_ref(args, 0)?, &expected)
}

fn verify_floats(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let expected = [-1.5, -0.5, 0.0, 0.5, 1.5].map(Scalar::Float);
    verify(env, arg_ref(args, 0)?, &expected)
}

fn verify_longs(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let expected = [
        0x1122_3344_5566_7788,
        -0x7788_99aa_bbcc_ddef,
        0,
        1,
        -1,
    ]
    .map(Scalar::Long);
    verify(env, arg_ref(args, 0)?, &expected)
}

fn verify_strings(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let array = arg_ref(args, 0)?;
    let expected = ["zero", "one", "two", "three", "four"];
    let len = env.array_length(array)?;
    if len as usize != expected.len() {
        return Err(env
            .throw_new(FaultKind::AssertionFailed, &format!("length {len}"))
            .into());
    }
    for (i, want) in expected.iter().enumerate() {
        let element = env.get_object_element(array, i as i32)?;
        let got = match element {
            Some(_) => env.string_value(element)?,
            None => String::from("null"),
        };
        if got != *want {
            return Err(env
                .throw_new(
                    FaultKind::AssertionFailed,
                    &format!("element {i}: {got:?}, expected {want:?}"),
                )
                .into());
        }
    }
    Ok(Returned::Void)
}

fn fill_bytes(env: &mut Env<'_>, _args: &[Slot]) -> Result<Returned, Trap> {
    const DATA: [u8; 15] = [
        0x00, 0x01, 0x01, 0x02, 0x03, 0x05, 0x08, 0x0d, 0x15, 0x22, 0x37, 0x59, 0x90, 0xe9, 0x79,
    ];
    ret_array(env, ArrayValue::Byte(DATA.iter().map(|&b| b as i8).collect()))
}

fn fill_chars(env: &mut Env<'_>, _args: &[Slot]) -> Result<Returned, Trap> {
    const DATA: [u16; 7] = [0xffff, 0x4321, 0xabcd, 0x0000, 0x0061, 0x0062, 0x0063];
    ret_array(env, ArrayValue::Char(DATA.to_vec()))
}

fn fill_longs(env: &mut Env<'_>, _args: &[Slot]) -> Result<Returned, Trap> {
    const DATA: [u64; 3] = [
        0x40AB_CFB3_C032_5745,
        0x68A3_DD8E_61EC_CFBD,
        0xA94F_AD42_221F_2702,
    ];
    ret_array(env, ArrayValue::Long(DATA.iter().map(|&l| l as i64).collect()))
}

fn filled_new_array(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let values = [arg_int(args, 0)?, arg_int(args, 1)?, arg_int(args, 2)?];
    let array = Some(env.new_prim_array('I', 3)?);
    for (i, v) in values.into_iter().enumerate() {
        env.set_element(array, i as i32, Scalar::Int(v))?;
    }
    Ok(Returned::Object(array))
}

fn get_int(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let array = arg_ref(args, 0)?;
    let idx = arg_int(args, 1)?;
    Ok(env.get_element(array, idx)?.into())
}

fn put_int(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let array = arg_ref(args, 0)?;
    let idx = arg_int(args, 1)?;
    let value = arg_int(args, 2)?;
    env.set_element(array, idx, Scalar::Int(value))?;
    Ok(Returned::Object(array))
}

fn get_long(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let array = arg_ref(args, 0)?;
    let idx = arg_int(args, 1)?;
    Ok(env.get_element(array, idx)?.into())
}

fn put_long(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let array = arg_ref(args, 0)?;
    let idx = arg_int(args, 1)?;
    let value = arg_long(args, 2)?;
    env.set_element(array, idx, Scalar::Long(value))?;
    Ok(Returned::Object(array))
}

fn new_int_array(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let count = arg_int(args, 0)?;
    let array = env.new_prim_array('I', count)?;
    Ok(Scalar::Int(env.array_length(Some(array))?).into())
}

fn new_object_array(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let count = arg_int(args, 0)?;
    let array = env.new_object_array(TypeDesc::object(), count)?;
    Ok(Scalar::Int(env.array_length(Some(array))?).into())
}

/// `new int[outer][inner]`, returning the total number of leaf elements.
fn new_nested(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let outer = arg_int(args, 0)?;
    let inner = arg_int(args, 1)?;
    let grid = Some(env.new_multi_array(TypeDesc::Prim('I'), &[outer, inner])?);
    let rows = env.array_length(grid)?;
    let mut total = 0i32;
    for r in 0..rows {
        let row = env.get_object_element(grid, r)?;
        total += env.array_length(row)?;
        if let Some(local) = row {
            env.delete_local(local)?;
        }
    }
    Ok(Scalar::Int(total).into())
}

/// `X[] xs = new Y[1]; xs[0] = store_base ? new X() : new Y();`
fn store_covariant(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let store_base = arg_bool(args, 0)?;
    let xs = Some(env.new_object_array(TypeDesc::class("Y"), 1)?);
    let value = env.new_instance(if store_base { "X" } else { "Y" })?;
    env.set_object_element(xs, 0, Some(value))?;
    Ok(Returned::Void)
}
