use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const SCALE_LIMIT: Decimal = dec!(1000000000000);

/// Ordinary least squares fit of `y = intercept + slope × x`.
///
/// `x` is stored centred on its mean so fiscal years (≈2000) do not cost
/// precision in the normal equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: Decimal,
    pub intercept: Decimal,
    pub r_squared: Decimal,
    x_mean: Decimal,
}

impl LinearFit {
    /// Fit over `(x, y)` pairs. `None` for an empty sample, or when the
    /// fitted line is not representable.
    ///
    /// A sample with no spread in `x` gets a flat line through the mean of `y`.
    /// A constant `y` is a perfect fit (R² = 1).
    pub fn fit(points: &[(Decimal, Decimal)]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        // Large y values are shifted down by powers of a thousand (exact in
        // Decimal) so the sums of squares stay in range.
        let magnitude = points.iter().map(|(_, y)| y.abs()).max().unwrap_or_default();
        let mut scale = Decimal::ONE;
        while magnitude / scale > SCALE_LIMIT {
            scale *= dec!(1000);
        }
        let n = Decimal::from(points.len() as i64);
        let x_mean = points.iter().map(|(x, _)| *x).sum::<Decimal>() / n;
        let scaled: Vec<(Decimal, Decimal)> = points
            .iter()
            .map(|(x, y)| (*x - x_mean, *y / scale))
            .collect();
        let y_mean = scaled.iter().map(|(_, y)| *y).sum::<Decimal>() / n;

        let mut sxx = Decimal::ZERO;
        let mut sxy = Decimal::ZERO;
        let mut ss_tot = Decimal::ZERO;
        for (dx, y) in &scaled {
            let dy = *y - y_mean;
            sxx += dx * dx;
            sxy += dx * dy;
            ss_tot += dy * dy;
        }

        let slope = if sxx.is_zero() { Decimal::ZERO } else { sxy / sxx };

        let ss_res: Decimal = scaled
            .iter()
            .map(|(dx, y)| {
                let residual = *y - (y_mean + slope * dx);
                residual * residual
            })
            .sum();

        let r_squared = if ss_tot.is_zero() {
            Decimal::ONE
        } else {
            (Decimal::ONE - ss_res / ss_tot).clamp(Decimal::ZERO, Decimal::ONE)
        };

        Some(Self {
            slope: slope.checked_mul(scale)?,
            // Intercept in centred coordinates is the mean of y.
            intercept: y_mean.checked_mul(scale)?,
            r_squared,
            x_mean,
        })
    }

    /// Value of the line at `x`, saturating at the Decimal range.
    pub fn predict(&self, x: Decimal) -> Decimal {
        self.intercept
            .saturating_add(self.slope.saturating_mul(x - self.x_mean))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_points_exact_line() {
        let fit = LinearFit::fit(&[(dec!(2021), dec!(100)), (dec!(2022), dec!(121))]).unwrap();
        assert_eq!(fit.slope, dec!(21));
        assert_eq!(fit.r_squared, Decimal::ONE);
        assert_eq!(fit.predict(dec!(2023)), dec!(142));
    }

    #[test]
    fn test_noisy_fit() {
        let points = [
            (dec!(2019), dec!(100)),
            (dec!(2020), dec!(112)),
            (dec!(2021), dec!(118)),
            (dec!(2022), dec!(135)),
        ];
        let fit = LinearFit::fit(&points).unwrap();
        // Sxy = 55.5, Sxx = 5
        assert_eq!(fit.slope, dec!(11.1));
        assert!(fit.r_squared > dec!(0.9) && fit.r_squared < Decimal::ONE);
    }

    #[test]
    fn test_constant_series() {
        let fit = LinearFit::fit(&[(dec!(2020), dec!(50)), (dec!(2021), dec!(50))]).unwrap();
        assert_eq!(fit.slope, Decimal::ZERO);
        assert_eq!(fit.r_squared, Decimal::ONE);
        assert_eq!(fit.predict(dec!(2030)), dec!(50));
    }

    #[test]
    fn test_empty_sample() {
        assert!(LinearFit::fit(&[]).is_none());
    }

    #[test]
    fn test_large_values_do_not_overflow() {
        let big = dec!(10000000000000000000000000);
        let fit = LinearFit::fit(&[(dec!(2021), big), (dec!(2022), big * dec!(2))]).unwrap();
        assert_eq!(fit.r_squared, Decimal::ONE);
        assert_eq!(fit.predict(dec!(2023)), big * dec!(3));
    }
}
