//! Integer arithmetic oracle.
//!
//! Two's-complement semantics are computed in a wider type and truncated,
//! rather than through `wrapping_*`, so the oracle stays structurally
//! different from the routines it checks. Shift distances are masked to the
//! operand width (5 bits for 32-bit, 6 bits for 64-bit) for every shift
//! flavor, including negative distances.

use crate::fault::FaultKind;

const SHIFT_MASK_32: i32 = 0x1f;
const SHIFT_MASK_64: i32 = 0x3f;

#[inline]
#[must_use]
pub fn add32(a: i32, b: i32) -> i32 {
    (i64::from(a) + i64::from(b)) as i32
}

#[inline]
#[must_use]
pub fn sub32(a: i32, b: i32) -> i32 {
    (i64::from(a) - i64::from(b)) as i32
}

#[inline]
#[must_use]
pub fn mul32(a: i32, b: i32) -> i32 {
    (i64::from(a) * i64::from(b)) as i32
}

#[inline]
#[must_use]
pub fn neg32(a: i32) -> i32 {
    (-i64::from(a)) as i32
}

#[inline]
#[must_use]
pub fn add64(a: i64, b: i64) -> i64 {
    (i128::from(a) + i128::from(b)) as i64
}

#[inline]
#[must_use]
pub fn sub64(a: i64, b: i64) -> i64 {
    (i128::from(a) - i128::from(b)) as i64
}

#[inline]
#[must_use]
pub fn mul64(a: i64, b: i64) -> i64 {
    (i128::from(a) * i128::from(b)) as i64
}

#[inline]
#[must_use]
pub fn neg64(a: i64) -> i64 {
    (-i128::from(a)) as i64
}

/// Truncating division. Faults iff `b == 0`; `MIN / -1 == MIN`.
pub fn div32(a: i32, b: i32) -> Result<i32, FaultKind> {
    if b == 0 {
        return Err(FaultKind::Arithmetic);
    }
    Ok((i64::from(a) / i64::from(b)) as i32)
}

/// Remainder with the sign of the dividend. Faults iff `b == 0`; `MIN % -1 == 0`.
pub fn rem32(a: i32, b: i32) -> Result<i32, FaultKind> {
    if b == 0 {
        return Err(FaultKind::Arithmetic);
    }
    Ok((i64::from(a) % i64::from(b)) as i32)
}

pub fn div64(a: i64, b: i64) -> Result<i64, FaultKind> {
    if b == 0 {
        return Err(FaultKind::Arithmetic);
    }
    Ok((i128::from(a) / i128::from(b)) as i64)
}

pub fn rem64(a: i64, b: i64) -> Result<i64, FaultKind> {
    if b == 0 {
        return Err(FaultKind::Arithmetic);
    }
    Ok((i128::from(a) % i128::from(b)) as i64)
}

#[inline]
#[must_use]
pub fn shl32(x: i32, dist: i32) -> i32 {
    ((x as u32) << (dist & SHIFT_MASK_32)) as i32
}

#[inline]
#[must_use]
pub fn shr32(x: i32, dist: i32) -> i32 {
    x >> (dist & SHIFT_MASK_32)
}

/// Logical (unsigned) right shift.
#[inline]
#[must_use]
pub fn ushr32(x: i32, dist: i32) -> i32 {
    ((x as u32) >> (dist & SHIFT_MASK_32)) as i32
}

#[inline]
#[must_use]
pub fn shl64(x: i64, dist: i32) -> i64 {
    ((x as u64) << (dist & SHIFT_MASK_64)) as i64
}

#[inline]
#[must_use]
pub fn shr64(x: i64, dist: i32) -> i64 {
    x >> (dist & SHIFT_MASK_64)
}

#[inline]
#[must_use]
pub fn ushr64(x: i64, dist: i32) -> i64 {
    ((x as u64) >> (dist & SHIFT_MASK_64)) as i64
}

/// `abs` as the managed language defines it: `abs(MIN) == MIN`.
#[must_use]
pub fn abs32(x: i32) -> i32 {
    i64::from(x).abs() as i32
}

#[must_use]
pub fn abs64(x: i64) -> i64 {
    i128::from(x).abs() as i64
}

/// Three-way long compare (`cmp-long`).
#[must_use]
pub fn cmp_long(a: i64, b: i64) -> i32 {
    match a.cmp(&b) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

// Narrowing keeps the low bits; widening sign-extends except for char.

#[must_use]
pub fn int_to_byte(x: i32) -> i8 {
    (x & 0xff) as u8 as i8
}

#[must_use]
pub fn int_to_short(x: i32) -> i16 {
    (x & 0xffff) as u16 as i16
}

#[must_use]
pub fn int_to_char(x: i32) -> u16 {
    (x & 0xffff) as u16
}

#[must_use]
pub fn long_to_int(x: i64) -> i32 {
    (x & 0xffff_ffff) as u32 as i32
}

#[must_use]
pub fn int_to_long(x: i32) -> i64 {
    i64::from(x)
}

// ---------------------------------------------------------------------------
// Composite fixtures
// ---------------------------------------------------------------------------

/// Binary operator battery over two ints.
///
/// Layout: `x+y, x-y, x*y, x*x, x/y, x%-y, x&y, x|y, x^y, (((x+y)-y)*y)/y`.
pub fn int_oper(x: i32, y: i32) -> Result<[i32; 10], FaultKind> {
    let chained = div32(mul32(sub32(add32(x, y), y), y), y)?;
    Ok([
        add32(x, y),
        sub32(x, y),
        mul32(x, y),
        mul32(x, x),
        div32(x, y)?,
        rem32(x, neg32(y))?,
        x & y,
        x | y,
        x ^ y,
        chained,
    ])
}

/// 64-bit counterpart of [`int_oper`] with the same layout.
pub fn long_oper(x: i64, y: i64) -> Result<[i64; 10], FaultKind> {
    let chained = div64(mul64(sub64(add64(x, y), y), y), y)?;
    Ok([
        add64(x, y),
        sub64(x, y),
        mul64(x, y),
        mul64(x, x),
        div64(x, y)?,
        rem64(x, neg64(y))?,
        x & y,
        x | y,
        x ^ y,
        chained,
    ])
}

/// Operations against 16-bit literal operands.
#[must_use]
pub fn lit16(x: i32) -> [i32; 8] {
    [
        add32(x, 1000),
        sub32(1000, x),
        mul32(x, 1000),
        x / 1000,
        x % 1000,
        x & 1000,
        x | -1000,
        x ^ -1000,
    ]
}

/// Operations against 8-bit literal operands.
#[must_use]
pub fn lit8(x: i32) -> [i32; 8] {
    [
        add32(x, 10),
        sub32(10, x),
        mul32(x, 10),
        x / 10,
        x % 10,
        x & 10,
        x | -10,
        x ^ -10,
    ]
}

/// `v<<d, v>>d, v>>>d, (((v<<d)>>d)>>>d)<<d`.
#[must_use]
pub fn int_shift(value: i32, dist: i32) -> [i32; 4] {
    [
        shl32(value, dist),
        shr32(value, dist),
        ushr32(value, dist),
        shl32(ushr32(shr32(shl32(value, dist), dist), dist), dist),
    ]
}

#[must_use]
pub fn long_shift(value: i64, dist: i32) -> [i64; 4] {
    [
        shl64(value, dist),
        shr64(value, dist),
        ushr64(value, dist),
        shl64(ushr64(shr64(shl64(value, dist), dist), dist), dist),
    ]
}

/// Shifts by a distance equal to (or beyond) the operand width.
///
/// Layout: `1L<<n, 1<<n, -1>>>n, Long.MIN_VALUE>>n`.
#[must_use]
pub fn shift_by(n: i32) -> [i64; 4] {
    [
        shl64(1, n),
        i64::from(shl32(1, n)),
        i64::from(ushr32(-1, n)),
        shr64(i64::MIN, n),
    ]
}

/// Assemble little-endian byte values into ints and longs.
///
/// Layout: low int, high int (each widened), the two ints joined, and the
/// eight bytes joined directly into a long.
#[must_use]
pub fn pack_bytes(bytes: [i32; 8]) -> [i64; 4] {
    let low = bytes[0] | shl32(bytes[1], 8) | shl32(bytes[2], 16) | shl32(bytes[3], 24);
    let high = bytes[4] | shl32(bytes[5], 8) | shl32(bytes[6], 16) | shl32(bytes[7], 24);
    let joined = int_to_long(low) | shl64(int_to_long(high), 32);
    let direct = bytes
        .iter()
        .enumerate()
        .fold(0i64, |acc, (i, &b)| acc | shl64(int_to_long(b), 8 * i as i32));
    [int_to_long(low), int_to_long(high), joined, direct]
}

/// Compound `>>>=` on sub-int types: promote, shift, narrow back.
///
/// Results are the narrowed values widened back to int.
#[must_use]
pub fn unsigned_shift(b: i8, s: i16, c: u16, i: i32, dist: i32) -> [i32; 4] {
    [
        i32::from(int_to_byte(ushr32(i32::from(b), dist))),
        i32::from(int_to_short(ushr32(i32::from(s), dist))),
        i32::from(int_to_char(ushr32(i32::from(c), dist))),
        ushr32(i, dist),
    ]
}

/// `[(long) i, (long) (int) l]`.
#[must_use]
pub fn conv_int_long(i: i32, l: i64) -> [i64; 2] {
    [int_to_long(i), int_to_long(long_to_int(l))]
}

/// Char operands are zero-extended before subtraction.
#[must_use]
pub fn char_sub(a: u16, b: u16) -> i32 {
    sub32(i32::from(a), i32::from(b))
}

/// Narrow an int to short, char and byte; each widened back to int.
#[must_use]
pub fn truncate(x: i32) -> [i32; 3] {
    [
        i32::from(int_to_short(x)),
        i32::from(int_to_char(x)),
        i32::from(int_to_byte(x)),
    ]
}

/// Most-negative values divided (and reduced) by the given divisors.
///
/// Layout: `MIN32/idiv, MIN32%idiv, MIN64/ldiv, MIN64%ldiv`.
pub fn big_divide(idiv: i32, ldiv: i64) -> Result<[i64; 4], FaultKind> {
    Ok([
        int_to_long(div32(i32::MIN, idiv)?),
        int_to_long(rem32(i32::MIN, idiv)?),
        div64(i64::MIN, ldiv)?,
        rem64(i64::MIN, ldiv)?,
    ])
}

/// `~(-x)` spelled the way the fixture does: negate, then xor with all ones.
#[must_use]
pub fn unop(x: i32) -> i32 {
    neg32(x) ^ -1
}

/// Integer `abs/min/max` battery.
///
/// Layout: `abs(i), abs(-i), min(i,-5), max(i,-5)` then the same for the long.
#[must_use]
pub fn jlm(ii: i32, ll: i64) -> [i64; 8] {
    [
        int_to_long(abs32(ii)),
        int_to_long(abs32(neg32(ii))),
        int_to_long(if ii < -5 { ii } else { -5 }),
        int_to_long(if ii > -5 { ii } else { -5 }),
        abs64(ll),
        abs64(neg64(ll)),
        if ll < -5 { ll } else { -5 },
        if ll > -5 { ll } else { -5 },
    ]
}

/// Literal divisors that code generators commonly strength-reduce.
pub const DIV_LITERALS: [i32; 7] = [2, 3, 5, 7, 10, -3, -7];

/// Sums of quotients (first half) and remainders (second half) over
/// `start..start+count` for every divisor in [`DIV_LITERALS`].
#[must_use]
pub fn div_literal(start: i32, count: i32) -> [i32; 14] {
    let mut out = [0i32; 14];
    for step in 0..count.max(0) {
        let i = add32(start, step);
        for (slot, &d) in DIV_LITERALS.iter().enumerate() {
            // Literal divisors are never zero.
            let q = (i64::from(i) / i64::from(d)) as i32;
            let r = (i64::from(i) % i64::from(d)) as i32;
            out[slot] = add32(out[slot], q);
            out[slot + DIV_LITERALS.len()] = add32(out[slot + DIV_LITERALS.len()], r);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_faults_only_on_zero() {
        for (x, y) in [(7, 0), (i32::MIN, 0), (0, 0)] {
            assert_eq!(div32(x, y), Err(FaultKind::Arithmetic));
            assert_eq!(rem32(x, y), Err(FaultKind::Arithmetic));
        }
        assert_eq!(div32(i32::MIN, -1), Ok(i32::MIN));
        assert_eq!(rem32(i32::MIN, -1), Ok(0));
        assert_eq!(div64(i64::MIN, -1), Ok(i64::MIN));
        assert_eq!(rem64(i64::MIN, -1), Ok(0));
        assert_eq!(div32(-7, 2), Ok(-3));
        assert_eq!(rem32(-7, 2), Ok(-1));
    }

    #[test]
    fn division_sweep_matches_fault_rule() {
        let samples = [i32::MIN, i32::MIN + 1, -70000, -3, -1, 0, 1, 3, 77777, i32::MAX];
        for &x in &samples {
            for &y in &samples {
                let r = div32(x, y);
                assert_eq!(r.is_err(), y == 0, "div32({x}, {y})");
            }
        }
    }

    #[test]
    fn shift_distance_is_masked() {
        for d in [-65, -33, -1, 0, 1, 8, 31, 32, 33, 63, 64, 100, i32::MIN, i32::MAX] {
            let x = 0xff00_aa01_u32 as i32;
            assert_eq!(shl32(x, d), shl32(x, d.rem_euclid(32)));
            assert_eq!(ushr32(x, d), ushr32(x, d.rem_euclid(32)));
            let y = 0xd5aa_96de_ff00_aa01_u64 as i64;
            assert_eq!(shl64(y, d), shl64(y, d.rem_euclid(64)));
            assert_eq!(shr64(y, d), shr64(y, d.rem_euclid(64)));
        }
    }

    #[test]
    fn int_oper_fixture() {
        assert_eq!(
            int_oper(70000, -3),
            Ok([69997, 70003, -210000, 605032704, -23333, 1, 70000, -3, -70003, 70000])
        );
        assert_eq!(int_oper(1, 0), Err(FaultKind::Arithmetic));
    }

    #[test]
    fn long_oper_fixture() {
        assert_eq!(
            long_oper(70_000_000_000, -3),
            Ok([
                69_999_999_997,
                70_000_000_003,
                -210_000_000_000,
                -6_833_923_606_740_729_856,
                -23_333_333_333,
                1,
                70_000_000_000,
                -3,
                -70_000_000_003,
                70_000_000_000,
            ])
        );
    }

    #[test]
    fn literal_fixtures() {
        assert_eq!(lit16(77777), [78777, -76777, 77777000, 77, 777, 960, -39, -76855]);
        assert_eq!(lit8(-55555), [-55545, 55565, -555550, -5555, -5, 8, -1, 55563]);
    }

    #[test]
    fn shift_fixtures() {
        assert_eq!(
            int_shift(0xff00_aa01_u32 as i32, 8),
            [0x00aa_0100, 0xffff_00aa_u32 as i32, 0x00ff_00aa, 0xaa00]
        );
        let long = long_shift(0xd5aa_96de_ff00_aa01_u64 as i64, 16);
        assert_eq!(long[0], 0x96de_ff00_aa01_0000_u64 as i64);
        assert_eq!(long[1], 0xffff_d5aa_96de_ff00_u64 as i64);
        assert_eq!(long[2], 0x0000_d5aa_96de_ff00);
        assert_eq!(long[3], 0xffff_96de_ff00_0000_u64 as i64);
        assert_eq!(
            shift_by(32),
            [0x1_0000_0000, 1, -1, 0xffff_ffff_8000_0000_u64 as i64]
        );
    }

    #[test]
    fn packing_fixtures() {
        let packed = pack_bytes([0x11, 0x22, 0x33, 0x44, 0x88, 0x99, 0xaa, 0xbb]);
        assert_eq!(packed[0], 0x4433_2211);
        assert_eq!(packed[1], 0xbbaa_9988_u32 as i32 as i64);
        assert_eq!(packed[2], 0xbbaa_9988_4433_2211_u64 as i64);
        assert_eq!(packed[3], 0xbbaa_9988_4433_2211_u64 as i64);
    }

    #[test]
    fn sub_int_unsigned_shift() {
        assert_eq!(unsigned_shift(-4, -4, 0xfffc, -4, 4), [-1, -1, 0x0fff, 268435455]);
    }

    #[test]
    fn conversion_fixtures() {
        assert_eq!(conv_int_long(7654, 5_678_956_789), [7654, 1_383_989_493]);
        assert_eq!(conv_int_long(-7654, -5_678_956_789), [-7654, -1_383_989_493]);
        assert_eq!(char_sub(0x00e9, 0xffff), 0xffff_00ea_u32 as i32);
        assert_eq!(truncate(-16_717_277), [-5597, 0xea23, 0x23]);
    }

    #[test]
    fn misc_fixtures() {
        assert_eq!(
            big_divide(-1, -1),
            Ok([i64::from(i32::MIN), 0, i64::MIN, 0])
        );
        assert_eq!(unop(38), 37);
        let j = jlm(12345, 0x1122_3344_5566_7788);
        assert_eq!(&j[..4], &[12345, 12345, -5, 12345]);
        assert_eq!(j[6], -5);
        assert_eq!(abs32(i32::MIN), i32::MIN);
        assert_eq!(cmp_long(-5, -4_294_967_287), 1);
    }

    #[test]
    fn div_literal_matches_plain_division() {
        let sums = div_literal(-1000, 2000);
        let mut expected = [0i32; 14];
        for i in -1000..1000 {
            for (slot, &d) in DIV_LITERALS.iter().enumerate() {
                expected[slot] += i / d;
                expected[slot + 7] += i % d;
            }
        }
        assert_eq!(sums, expected);
    }
}
