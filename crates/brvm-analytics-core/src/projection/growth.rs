use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::stats;
use crate::types::{Money, Percent};

/// Compound annual growth rate in percent: `((end / start)^(1 / periods) − 1) × 100`.
///
/// Zero when either endpoint is non-positive, there are no periods, or the
/// rate is not representable.
pub fn cagr(start: Money, end: Money, periods: u32) -> Percent {
    if start <= Decimal::ZERO || end <= Decimal::ZERO || periods == 0 {
        return Decimal::ZERO;
    }
    end.checked_div(start)
        .and_then(|ratio| stats::nth_root(ratio, periods))
        .and_then(|root| (root - Decimal::ONE).checked_mul(dec!(100)))
        .unwrap_or(Decimal::ZERO)
}

/// `value × (1 + rate/100)^years`, `None` on overflow.
pub(crate) fn compound(value: Money, rate: Percent, years: u32) -> Option<Money> {
    let factor = Decimal::ONE.checked_add(rate / dec!(100))?;
    stats::pow_int(factor, years)?.checked_mul(value)
}
