//! Floating-point comparison routines.

use std::cmp::Ordering;

use aotconform_core::{ArrayValue, Scalar};
use aotconform_runtime::Env;

use super::{RoutineTable, arg_double, arg_float, ret_array};
use crate::error::Trap;
use crate::marshal::{Returned, Slot};

pub(super) fn register(table: &mut RoutineTable) {
    register! { table;
        "Compare.relationsFloat" => "(FF)[Z", relations_float;
        "Compare.relationsDouble" => "(DD)[Z", relations_double;
        "Compare.floatCmp" => "(FF)[I", float_cmp;
        "Compare.doubleCmp" => "(DD)[I", double_cmp;
        "Compare.compareNanGreatest" => "(DD)I", compare_nan_greatest;
        "Compare.compareNanLeast" => "(DD)I", compare_nan_least;
    }
}

fn relations_float(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let a = arg_float(args, 0)?;
    let b = arg_float(args, 1)?;
    ret_array(env, ArrayValue::Bool(vec![a < b, a <= b, a > b, a >= b, a == b, a != b]))
}

fn relations_double(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let a = arg_double(args, 0)?;
    let b = arg_double(args, 1)?;
    ret_array(env, ArrayValue::Bool(vec![a < b, a <= b, a > b, a >= b, a == b, a != b]))
}

/// `cmpl`/`cmpg`: the unordered case yields `bias`.
fn bias_cmp<T: PartialOrd>(a: T, b: T, bias: i32) -> i32 {
    a.partial_cmp(&b).map_or(bias, |o| o as i32)
}

fn float_cmp(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let a = arg_float(args, 0)?;
    let b = arg_float(args, 1)?;
    ret_array(env, ArrayValue::Int(vec![bias_cmp(a, b, -1), bias_cmp(a, b, 1)]))
}

fn double_cmp(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let a = arg_double(args, 0)?;
    let b = arg_double(args, 1)?;
    ret_array(env, ArrayValue::Int(vec![bias_cmp(a, b, -1), bias_cmp(a, b, 1)]))
}

/// Rank NaN above (`nan_high`) or below every number, then compare.
fn nan_extreme(a: f64, b: f64, nan_high: bool) -> i32 {
    let ordering = match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) if nan_high => Ordering::Greater,
        (true, false) => Ordering::Less,
        (false, true) if nan_high => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    };
    ordering as i32
}

fn compare_nan_greatest(_env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let a = arg_double(args, 0)?;
    let b = arg_double(args, 1)?;
    Ok(Scalar::Int(nan_extreme(a, b, true)).into())
}

fn compare_nan_least(_env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let a = arg_double(args, 0)?;
    let b = arg_double(args, 1)?;
    Ok(Scalar::Int(nan_extreme(a, b, false)).into())
}
