//! Small Decimal helpers shared by the engines.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

/// Median of an unsorted slice. `None` for an empty slice.
pub(crate) fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let count = sorted.len();
    let median = if count % 2 == 0 {
        let mid = count / 2;
        (sorted[mid - 1] + sorted[mid]) / dec!(2)
    } else {
        sorted[count / 2]
    };
    Some(median)
}

/// Arithmetic mean. `None` for an empty slice.
pub(crate) fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().copied().sum();
    Some(sum / Decimal::from(values.len() as i64))
}

/// Integer power via iterative multiplication (avoids powd precision drift).
/// `None` when an intermediate product overflows.
pub(crate) fn pow_int(base: Decimal, exp: u32) -> Option<Decimal> {
    (0..exp).try_fold(Decimal::ONE, |acc, _| acc.checked_mul(base))
}

/// n-th root of a positive value.
///
/// Seeded with `exp(ln(value) / n)` and polished with Newton's method, which
/// the transcendental approximations alone are not precise enough for.
/// `None` for non-positive input, `n == 0`, or when an iterate is not
/// representable.
pub(crate) fn nth_root(value: Decimal, n: u32) -> Option<Decimal> {
    if value <= Decimal::ZERO || n == 0 {
        return None;
    }
    if n == 1 {
        return Some(value);
    }

    let n_dec = Decimal::from(n);
    let mut x = value
        .checked_ln()
        .and_then(|ln| (ln / n_dec).checked_exp())
        .filter(|seed| *seed > Decimal::ZERO)
        .unwrap_or(Decimal::ONE);

    for _ in 0..100 {
        let x_pow_nm1 = pow_int(x, n - 1)?;
        let denom = n_dec.checked_mul(x_pow_nm1)?;
        if denom.is_zero() {
            break;
        }
        let residual = x_pow_nm1.checked_mul(x)? - value;
        let next = x - residual.checked_div(denom)?;
        let next = if next <= Decimal::ZERO { x / dec!(2) } else { next };
        if (next - x).abs() < dec!(0.0000000000001) {
            x = next;
            break;
        }
        x = next;
    }

    Some(x)
}
