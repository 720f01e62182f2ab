//! Integer arithmetic routines.

use aotconform_core::{ArrayValue, FaultKind, Scalar};
use aotconform_runtime::Env;

use super::{
    RoutineTable, arg_byte, arg_char, arg_int, arg_long, arg_ref, arg_short, ret_array,
};
use crate::error::Trap;
use crate::marshal::{Returned, Slot};

pub(super) fn register(table: &mut RoutineTable) {
    register! { table;
        "IntMath.intOper" => "(II)[I", int_oper;
        "IntMath.longOper" => "(JJ)[J", long_oper;
        "IntMath.lit16" => "(I)[I", lit16;
        "IntMath.lit8" => "(I)[I", lit8;
        "IntMath.intShift" => "(II)[I", int_shift;
        "IntMath.longShift" => "(JI)[J", long_shift;
        "IntMath.shiftBy" => "(I)[J", shift_by;
        "IntMath.packBytes" => "([I)[J", pack_bytes;
        "IntMath.unsignedShift" => "(BSCII)[I", unsigned_shift;
        "IntMath.convIntLong" => "(IJ)[J", conv_int_long;
        "IntMath.charSub" => "(CC)I", char_sub;
        "IntMath.truncate" => "(I)[I", truncate;
        "IntMath.bigDivide" => "(IJ)[J", big_divide;
        "IntMath.divideByZero" => "(I)I", divide_by_zero;
        "IntMath.unop" => "(I)I", unop;
        "IntMath.jlm" => "(IJ)[J", jlm;
        "IntMath.divLiteral" => "(II)[I", div_literal;
        "IntMath.cmpLong" => "(JJ)I", cmp_long;
        "IntMath.relationsInt" => "(II)[Z", relations_int;
        "IntMath.relationsLong" => "(JJ)[Z", relations_long;
    }
}

fn div_by_zero(env: &mut Env<'_>) -> Trap {
    env.throw_new(FaultKind::Arithmetic, "divide by zero").into()
}

fn idiv(env: &mut Env<'_>, a: i32, b: i32) -> Result<i32, Trap> {
    if b == 0 {
        return Err(div_by_zero(env));
    }
    Ok(a.wrapping_div(b))
}

fn irem(env: &mut Env<'_>, a: i32, b: i32) -> Result<i32, Trap> {
    if b == 0 {
        return Err(div_by_zero(env));
    }
    Ok(a.wrapping_rem(b))
}

fn ldiv(env: &mut Env<'_>, a: i64, b: i64) -> Result<i64, Trap> {
    if b == 0 {
        return Err(div_by_zero(env));
    }
    Ok(a.wrapping_div(b))
}

fn lrem(env: &mut Env<'_>, a: i64, b: i64) -> Result<i64, Trap> {
    if b == 0 {
        return Err(div_by_zero(env));
    }
    Ok(a.wrapping_rem(b))
}

// `wrapping_sh*` already masks the distance to the operand width.
fn ishl(x: i32, d: i32) -> i32 {
    x.wrapping_shl(d as u32)
}

fn ishr(x: i32, d: i32) -> i32 {
    x.wrapping_shr(d as u32)
}

fn iushr(x: i32, d: i32) -> i32 {
    (x as u32).wrapping_shr(d as u32) as i32
}

fn lshl(x: i64, d: i32) -> i64 {
    x.wrapping_shl(d as u32)
}

fn lshr(x: i64, d: i32) -> i64 {
    x.wrapping_shr(d as u32)
}

fn lushr(x: i64, d: i32) -> i64 {
    (x as u64).wrapping_shr(d as u32) as i64
}

fn int_oper(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let x = arg_int(args, 0)?;
    let y = arg_int(args, 1)?;
    let mut out = vec![
        x.wrapping_add(y),
        x.wrapping_sub(y),
        x.wrapping_mul(y),
        x.wrapping_mul(x),
    ];
    out.push(idiv(env, x, y)?);
    out.push(irem(env, x, y.wrapping_neg())?);
    out.extend([x & y, x | y, x ^ y]);
    let t = x.wrapping_add(y).wrapping_sub(y).wrapping_mul(y);
    out.push(idiv(env, t, y)?);
    ret_array(env, ArrayValue::Int(out))
}

fn long_oper(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let x = arg_long(args, 0)?;
    let y = arg_long(args, 1)?;
    let mut out = vec![
        x.wrapping_add(y),
        x.wrapping_sub(y),
        x.wrapping_mul(y),
        x.wrapping_mul(x),
    ];
    out.push(ldiv(env, x, y)?);
    out.push(lrem(env, x, y.wrapping_neg())?);
    out.extend([x & y, x | y, x ^ y]);
    let t = x.wrapping_add(y).wrapping_sub(y).wrapping_mul(y);
    out.push(ldiv(env, t, y)?);
    ret_array(env, ArrayValue::Long(out))
}

fn lit16(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let x = arg_int(args, 0)?;
    ret_array(
        env,
        ArrayValue::Int(vec![
            x.wrapping_add(1000),
            1000i32.wrapping_sub(x),
            x.wrapping_mul(1000),
            x / 1000,
            x % 1000,
            x & 1000,
            x | -1000,
            x ^ -1000,
        ]),
    )
}

fn lit8(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let x = arg_int(args, 0)?;
    ret_array(
        env,
        ArrayValue::Int(vec![
            x.wrapping_add(10),
            10i32.wrapping_sub(x),
            x.wrapping_mul(10),
            x / 10,
            x % 10,
            x & 10,
            x | -10,
            x ^ -10,
        ]),
    )
}

fn int_shift(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let v = arg_int(args, 0)?;
    let d = arg_int(args, 1)?;
    let round = ishl(iushr(ishr(ishl(v, d), d), d), d);
    ret_array(env, ArrayValue::Int(vec![ishl(v, d), ishr(v, d), iushr(v, d), round]))
}

fn long_shift(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let v = arg_long(args, 0)?;
    let d = arg_int(args, 1)?;
    let round = lshl(lushr(lshr(lshl(v, d), d), d), d);
    ret_array(env, ArrayValue::Long(vec![lshl(v, d), lshr(v, d), lushr(v, d), round]))
}

fn shift_by(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let n = arg_int(args, 0)?;
    ret_array(
        env,
        ArrayValue::Long(vec![
            lshl(1, n),
            i64::from(ishl(1, n)),
            i64::from(iushr(-1, n)),
            lshr(i64::MIN, n),
        ]),
    )
}

fn pack_bytes(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let arr = arg_ref(args, 0)?;
    let mut b = [0i32; 8];
    for (i, slot) in b.iter_mut().enumerate() {
        if let Scalar::Int(v) = env.get_element(arr, i as i32)? {
            *slot = v;
        }
    }
    let low = b[0] | (b[1] << 8) | (b[2] << 16) | ishl(b[3], 24);
    let high = b[4] | (b[5] << 8) | (b[6] << 16) | ishl(b[7], 24);
    let joined = i64::from(low) | (i64::from(high) << 32);
    let mut direct = 0i64;
    for (i, &byte) in b.iter().enumerate() {
        direct |= lshl(i64::from(byte), 8 * i as i32);
    }
    ret_array(
        env,
        ArrayValue::Long(vec![i64::from(low), i64::from(high), joined, direct]),
    )
}

fn unsigned_shift(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let b = arg_byte(args, 0)?;
    let s = arg_short(args, 1)?;
    let c = arg_char(args, 2)?;
    let i = arg_int(args, 3)?;
    let d = arg_int(args, 4)?;
    // b >>>= d; s >>>= d; c >>>= d; i >>>= d;
    let b = iushr(i32::from(b), d) as i8;
    let s = iushr(i32::from(s), d) as i16;
    let c = iushr(i32::from(c), d) as u16;
    let i = iushr(i, d);
    ret_array(
        env,
        ArrayValue::Int(vec![i32::from(b), i32::from(s), i32::from(c), i]),
    )
}

fn conv_int_long(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let i = arg_int(args, 0)?;
    let l = arg_long(args, 1)?;
    ret_array(env, ArrayValue::Long(vec![i64::from(i), i64::from(l as i32)]))
}

fn char_sub(_env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let a = arg_char(args, 0)?;
    let b = arg_char(args, 1)?;
    Ok(Scalar::Int(i32::from(a) - i32::from(b)).into())
}

/// Narrowing goes through `Shorty` fields so the stores truncate.
fn truncate(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let x = arg_int(args, 0)?;
    let shorty = Some(env.new_instance("Shorty")?);
    env.set_field(shorty, "mShort", Scalar::Short(x as i16))?;
    env.set_field(shorty, "mChar", Scalar::Char(x as u16))?;
    env.set_field(shorty, "mByte", Scalar::Byte(x as i8))?;
    let mut out = Vec::with_capacity(3);
    for field in ["mShort", "mChar", "mByte"] {
        out.push(match env.get_field(shorty, field)? {
            Scalar::Short(v) => i32::from(v),
            Scalar::Char(v) => i32::from(v),
            Scalar::Byte(v) => i32::from(v),
            _ => 0,
        });
    }
    ret_array(env, ArrayValue::Int(out))
}

fn big_divide(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let idivisor = arg_int(args, 0)?;
    let ldivisor = arg_long(args, 1)?;
    let out = vec![
        i64::from(idiv(env, i32::MIN, idivisor)?),
        i64::from(irem(env, i32::MIN, idivisor)?),
        ldiv(env, i64::MIN, ldivisor)?,
        lrem(env, i64::MIN, ldivisor)?,
    ];
    ret_array(env, ArrayValue::Long(out))
}

fn divide_by_zero(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let z = arg_int(args, 0)?;
    Ok(Scalar::Int(idiv(env, 100, z)?).into())
}

fn unop(_env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let x = arg_int(args, 0)?;
    Ok(Scalar::Int(!x.wrapping_neg()).into())
}

fn jlm(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let ii = arg_int(args, 0)?;
    let ll = arg_long(args, 1)?;
    ret_array(
        env,
        ArrayValue::Long(vec![
            i64::from(ii.wrapping_abs()),
            i64::from(ii.wrapping_neg().wrapping_abs()),
            i64::from(ii.min(-5)),
            i64::from(ii.max(-5)),
            ll.wrapping_abs(),
            ll.wrapping_neg().wrapping_abs(),
            ll.min(-5),
            ll.max(-5),
        ]),
    )
}

fn div_literal(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let start = arg_int(args, 0)?;
    let count = arg_int(args, 1)?;
    let mut out = vec![0i32; 14];
    let mut i = start;
    for _ in 0..count {
        let quotients = [i / 2, i / 3, i / 5, i / 7, i / 10, i / -3, i / -7];
        let remainders = [i % 2, i % 3, i % 5, i % 7, i % 10, i % -3, i % -7];
        for k in 0..7 {
            out[k] = out[k].wrapping_add(quotients[k]);
            out[k + 7] = out[k + 7].wrapping_add(remainders[k]);
        }
        i = i.wrapping_add(1);
    }
    ret_array(env, ArrayValue::Int(out))
}

fn cmp_long(_env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let a = arg_long(args, 0)?;
    let b = arg_long(args, 1)?;
    Ok(Scalar::Int(a.cmp(&b) as i32).into())
}

fn relations_int(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let a = arg_int(args, 0)?;
    let b = arg_int(args, 1)?;
    ret_array(env, ArrayValue::Bool(vec![a < b, a <= b, a > b, a >= b, a == b, a != b]))
}

fn relations_long(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let a = arg_long(args, 0)?;
    let b = arg_long(args, 1)?;
    ret_array(env, ArrayValue::Bool(vec![a < b, a <= b, a > b, a >= b, a == b, a != b]))
}
