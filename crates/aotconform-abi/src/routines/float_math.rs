//! Floating-point arithmetic and conversion routines.

use aotconform_core::{ArrayValue, Scalar};
use aotconform_runtime::Env;

use super::{RoutineTable, arg_double, arg_float, arg_int, arg_long, ret_array};
use crate::error::Trap;
use crate::marshal::{Returned, Slot};

pub(super) fn register(table: &mut RoutineTable) {
    register! { table;
        "FloatMath.floatOper" => "(FF)[F", float_oper;
        "FloatMath.doubleOper" => "(DD)[D", double_oper;
        "FloatMath.negateFloat" => "(F)F", negate_float;
        "FloatMath.negateDouble" => "(D)D", negate_double;
        "FloatMath.floatConsts" => "()[F", float_consts;
        "FloatMath.doubleConsts" => "()[D", double_consts;
        "FloatMath.jlmFloat" => "(F)[F", jlm_float;
        "FloatMath.jlmDouble" => "(D)[D", jlm_double;
        "FloatMath.convI" => "(JFDF)[I", conv_i;
        "FloatMath.convL" => "(IFDD)[J", conv_l;
        "FloatMath.convF" => "(IJD)[F", conv_f;
        "FloatMath.convD" => "(IJF)[D", conv_d;
        "FloatMath.roundTripInt" => "(I)I", round_trip_int;
        "FloatMath.roundTripFloat" => "(F)F", round_trip_float;
        "FloatMath.harmonic" => "(I)D", harmonic;
        "FloatMath.harmonicFloat" => "(I)F", harmonic_float;
    }
}

fn float_oper(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let x = arg_float(args, 0)?;
    let y = arg_float(args, 1)?;
    ret_array(
        env,
        ArrayValue::Float(vec![
            x + y,
            x - y,
            x * y,
            x / y,
            x % -y,
            (x + y) * (x - y),
            -x,
            -(x * 0.0),
            x / x,
        ]),
    )
}

fn double_oper(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let x = arg_double(args, 0)?;
    let y = arg_double(args, 1)?;
    ret_array(
        env,
        ArrayValue::Double(vec![
            x + y,
            x - y,
            x * y,
            x / y,
            x % -y,
            (x + y) * (x - y),
            -x,
            -(x * 0.0),
            x / x,
        ]),
    )
}

fn negate_float(_env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    Ok(Scalar::Float(-arg_float(args, 0)?).into())
}

fn negate_double(_env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    Ok(Scalar::Double(-arg_double(args, 0)?).into())
}

fn float_consts(env: &mut Env<'_>, _args: &[Slot]) -> Result<Returned, Trap> {
    ret_array(
        env,
        ArrayValue::Float(vec![
            f32::from_bits(0x4120_0000),
            f32::from_bits(0xbf80_0000),
            f32::from_bits(0x7f7f_ffff),
            f32::from_bits(0x0000_0001),
            f32::from_bits(0x8000_0000),
            f32::from_bits(0x7f80_0000),
        ]),
    )
}

fn double_consts(env: &mut Env<'_>, _args: &[Slot]) -> Result<Returned, Trap> {
    ret_array(
        env,
        ArrayValue::Double(vec![
            f64::from_bits(0x4024_0000_0000_0000),
            f64::from_bits(0xbff0_0000_0000_0000),
            f64::from_bits(0x7fef_ffff_ffff_ffff),
            f64::from_bits(0x0000_0000_0000_0001),
            f64::from_bits(0x8000_0000_0000_0000),
            f64::from_bits(0xfff0_0000_0000_0000),
        ]),
    )
}

fn jmin_f32(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else if a == b {
        // -0.0 wins a tie with 0.0
        f32::from_bits(a.to_bits() | b.to_bits())
    } else if a < b {
        a
    } else {
        b
    }
}

fn jmax_f32(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else if a == b {
        f32::from_bits(a.to_bits() & b.to_bits())
    } else if a > b {
        a
    } else {
        b
    }
}

fn jmin_f64(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else if a == b {
        f64::from_bits(a.to_bits() | b.to_bits())
    } else if a < b {
        a
    } else {
        b
    }
}

fn jmax_f64(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else if a == b {
        f64::from_bits(a.to_bits() & b.to_bits())
    } else if a > b {
        a
    } else {
        b
    }
}

fn jlm_float(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let f = arg_float(args, 0)?;
    ret_array(
        env,
        ArrayValue::Float(vec![f.abs(), (-f).abs(), jmin_f32(f, -5.0), jmax_f32(f, -5.0)]),
    )
}

fn jlm_double(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let d = arg_double(args, 0)?;
    ret_array(
        env,
        ArrayValue::Double(vec![d.abs(), (-d).abs(), jmin_f64(d, -5.0), jmax_f64(d, -5.0)]),
    )
}

// Rust `as` casts from float to int saturate and send NaN to zero, which is
// exactly the managed-language rule.

fn conv_i(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let l = arg_long(args, 0)?;
    let f = arg_float(args, 1)?;
    let d = arg_double(args, 2)?;
    let zero = arg_float(args, 3)?;
    let inf = 1.0 / zero;
    ret_array(
        env,
        ArrayValue::Int(vec![
            l as i32,
            f as i32,
            d as i32,
            inf as i32,
            (-1.0 / zero) as i32,
            (inf / inf) as i32,
        ]),
    )
}

fn conv_l(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let i = arg_int(args, 0)?;
    let f = arg_float(args, 1)?;
    let d = arg_double(args, 2)?;
    let zero = arg_double(args, 3)?;
    let inf = 1.0 / zero;
    ret_array(
        env,
        ArrayValue::Long(vec![
            i64::from(i),
            f as i64,
            d as i64,
            inf as i64,
            (-1.0 / zero) as i64,
            (inf / inf) as i64,
        ]),
    )
}

fn conv_f(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let i = arg_int(args, 0)?;
    let l = arg_long(args, 1)?;
    let d = arg_double(args, 2)?;
    ret_array(env, ArrayValue::Float(vec![i as f32, l as f32, d as f32]))
}

fn conv_d(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let i = arg_int(args, 0)?;
    let l = arg_long(args, 1)?;
    let f = arg_float(args, 2)?;
    ret_array(
        env,
        ArrayValue::Double(vec![f64::from(i), l as f64, f64::from(f)]),
    )
}

fn round_trip_int(_env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let i = arg_int(args, 0)?;
    Ok(Scalar::Int((i as f32) as i32).into())
}

fn round_trip_float(_env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let f = arg_float(args, 0)?;
    Ok(Scalar::Float((f as i32) as f32).into())
}

/// `sum(1/k)` for `k = 1..=n`, accumulated smallest index first.
fn harmonic(_env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let n = arg_int(args, 0)?;
    let mut sum = 0.0f64;
    for k in 1..=n {
        sum += 1.0 / f64::from(k);
    }
    Ok(Scalar::Double(sum).into())
}

fn harmonic_float(_env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let n = arg_int(args, 0)?;
    let mut sum = 0.0f32;
    for k in 1..=n {
        sum += 1.0 / k as f32;
    }
    Ok(Scalar::Float(sum).into())
}
