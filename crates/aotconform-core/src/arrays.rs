//! Array fixtures and the bounds/allocation oracle.

use crate::fault::FaultKind;

pub const CHECK_BYTES: [i8; 5] = [0, -1, -2, -3, -4];
pub const CHECK_SHORTS: [i16; 5] = [20, 10, 0, -10, -20];
pub const CHECK_CHARS: [u16; 5] = [40000, 40001, 40002, 40003, 40004];
pub const CHECK_INTS: [i32; 5] = [70000, 70001, 70002, 70003, 70004];
pub const CHECK_BOOLEANS: [bool; 5] = [true, true, false, true, false];
pub const CHECK_FLOATS: [f32; 5] = [-1.5, -0.5, 0.0, 0.5, 1.5];
pub const CHECK_LONGS: [i64; 5] = [
    0x1122_3344_5566_7788,
    0x8877_6655_4433_2211_u64 as i64,
    0,
    1,
    -1,
];
pub const CHECK_STRINGS: [&str; 5] = ["zero", "one", "two", "three", "four"];

/// Payloads materialized from static array data.
pub const FILL_BYTES: [i8; 15] = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, -112, -23, 121];
pub const FILL_CHARS: [u16; 7] = [0xffff, 0x4321, 0xabcd, 0, 'a' as u16, 'b' as u16, 'c' as u16];
pub const FILL_LONGS: [i64; 3] = [
    4_660_046_610_375_530_309,
    7_540_113_804_746_346_429,
    -6_246_583_658_587_674_878,
];

/// Validate `idx` against an array of `len` elements.
///
/// Every index outside `0..len` is a bounds fault, including negative
/// indices and `i32::MIN`.
pub fn index_check(len: usize, idx: i32) -> Result<usize, FaultKind> {
    usize::try_from(idx)
        .ok()
        .filter(|&i| i < len)
        .ok_or(FaultKind::IndexOutOfBounds)
}

/// Element read through a possibly-null array reference. The null check
/// precedes the bounds check.
pub fn element<T: Copy>(array: Option<&[T]>, idx: i32) -> Result<T, FaultKind> {
    let array = array.ok_or(FaultKind::NullPointer)?;
    index_check(array.len(), idx).map(|i| array[i])
}

/// Element write through a possibly-null array reference.
pub fn store<T: Copy>(array: Option<&[T]>, idx: i32, value: T) -> Result<Vec<T>, FaultKind> {
    let array = array.ok_or(FaultKind::NullPointer)?;
    let i = index_check(array.len(), idx)?;
    let mut out = array.to_vec();
    out[i] = value;
    Ok(out)
}

/// Validate a single allocation count. Zero is a valid, empty allocation.
pub fn alloc_check(count: i32) -> Result<usize, FaultKind> {
    usize::try_from(count).map_err(|_| FaultKind::NegativeArraySize)
}

/// Validate every dimension of a multi-dimensional allocation before any
/// array is created, and return the number of leaf elements.
pub fn nested_alloc_check(dims: &[i32]) -> Result<usize, FaultKind> {
    dims.iter().try_fold(1usize, |total, &d| {
        alloc_check(d).map(|n| total.saturating_mul(n))
    })
}

/// `new int[] { a, b, c }`.
#[must_use]
pub fn filled_new_array(a: i32, b: i32, c: i32) -> [i32; 3] {
    [a, b, c]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_range_taxonomy() {
        let ints = CHECK_INTS;
        for idx in [5, 6, -1, i32::MIN, i32::MAX] {
            assert_eq!(element(Some(&ints[..]), idx), Err(FaultKind::IndexOutOfBounds));
        }
        let empty: [i32; 0] = [];
        assert_eq!(element(Some(&empty[..]), 0), Err(FaultKind::IndexOutOfBounds));
        assert_eq!(element::<i32>(None, 0), Err(FaultKind::NullPointer));
        assert_eq!(element::<i32>(None, -1), Err(FaultKind::NullPointer));
        assert_eq!(element(Some(&ints[..]), 4), Ok(70004));
        assert_eq!(store(Some(&CHECK_LONGS[..]), 0, 9), Ok(vec![9, CHECK_LONGS[1], 0, 1, -1]));
        assert_eq!(store(Some(&CHECK_LONGS[..]), 5, 9), Err(FaultKind::IndexOutOfBounds));
    }

    #[test]
    fn negative_allocation_taxonomy() {
        assert_eq!(alloc_check(-1), Err(FaultKind::NegativeArraySize));
        assert_eq!(alloc_check(i32::MIN), Err(FaultKind::NegativeArraySize));
        assert_eq!(alloc_check(0), Ok(0));
        assert_eq!(nested_alloc_check(&[3, -1]), Err(FaultKind::NegativeArraySize));
        assert_eq!(nested_alloc_check(&[-1, 3]), Err(FaultKind::NegativeArraySize));
        assert_eq!(nested_alloc_check(&[0, -1]), Err(FaultKind::NegativeArraySize));
        assert_eq!(nested_alloc_check(&[3, 4]), Ok(12));
    }

    #[test]
    fn fill_data_spot_values() {
        assert_eq!(FILL_BYTES[1], 1);
        assert_eq!(FILL_CHARS[1], 0x4321);
        assert_eq!(FILL_LONGS[1], 7_540_113_804_746_346_429);
    }
}
