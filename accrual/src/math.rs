//! Checked fixed-point helpers.

const LOW_MASK: u128 = u64::MAX as u128;

/// `floor(a * b / d)` computed with a 256-bit intermediate.
///
/// Returns `None` if `d == 0` or the quotient does not fit in u128. The
/// product itself may exceed u128.
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    if let Some(product) = a.checked_mul(b) {
        return Some(product / d);
    }
    let (hi, lo) = widening_mul(a, b);
    if hi >= d {
        return None;
    }
    // Restoring division of (hi, lo) by d; `rem < d` holds at every step.
    let mut rem = hi;
    let mut quotient = 0u128;
    for i in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> i) & 1);
        quotient <<= 1;
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quotient |= 1;
        }
    }
    Some(quotient)
}

/// Full 256-bit product of two u128 values as `(high, low)`.
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    let (a0, a1) = (a & LOW_MASK, a >> 64);
    let (b0, b1) = (b & LOW_MASK, b >> 64);

    let p00 = a0 * b0;
    let p01 = a0 * b1;
    let p10 = a1 * b0;
    let p11 = a1 * b1;

    let mid = (p00 >> 64) + (p01 & LOW_MASK) + (p10 & LOW_MASK);
    let lo = (p00 & LOW_MASK) | ((mid & LOW_MASK) << 64);
    let hi = p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64);
    (hi, lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_operands_take_fast_path() {
        assert_eq!(mul_div_floor(10, 20, 3), Some(66));
        assert_eq!(mul_div_floor(0, u128::MAX, 7), Some(0));
    }

    #[test]
    fn zero_divisor_is_none() {
        assert_eq!(mul_div_floor(1, 1, 0), None);
    }

    #[test]
    fn wide_product_divides_exactly() {
        // (2^127) * 4 / 8 = 2^126
        assert_eq!(mul_div_floor(1u128 << 127, 4, 8), Some(1u128 << 126));
        // MAX * MAX / MAX = MAX
        assert_eq!(mul_div_floor(u128::MAX, u128::MAX, u128::MAX), Some(u128::MAX));
    }

    #[test]
    fn wide_product_rounds_down() {
        // (2^127 + 1) * 3 / 2 = 3 * 2^126 + 1 (remainder 1 dropped)
        let a = (1u128 << 127) + 1;
        assert_eq!(mul_div_floor(a, 3, 2), Some(3 * (1u128 << 126) + 1));
    }

    #[test]
    fn quotient_overflow_is_none() {
        assert_eq!(mul_div_floor(u128::MAX, u128::MAX, 1), None);
        assert_eq!(mul_div_floor(u128::MAX, 2, 1), None);
    }

    #[test]
    fn widening_mul_matches_known_values() {
        assert_eq!(widening_mul(u128::MAX, 2), (1, u128::MAX - 1));
        assert_eq!(widening_mul(1u128 << 64, 1u128 << 64), (1, 0));
    }
}
