// In crates/strategies/src/window.rs

use core_types::{MAX_PRICE, PRICE_SCALE};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::VecDeque;

/// Largest window length a `RollingWindow` supports.
///
/// Together with `MAX_PRICE` and `PRICE_SCALE` this keeps every sum and every
/// cross product below `i128::MAX`.
pub const MAX_WINDOW: usize = 10_000;

/// A fixed-capacity price buffer that tracks a short and a long trailing window.
///
/// Only the most recent `long_len` prices are retained. Prices are held as
/// integer multiples of `10^-PRICE_SCALE` and both window sums are maintained
/// incrementally, so every `push` is O(1) and the sums are exact.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    prices: VecDeque<i128>,
    short_len: usize,
    long_len: usize,
    short_sum: i128,
    long_sum: i128,
}

impl RollingWindow {
    /// Creates an empty window. Callers guarantee `0 < short_len < long_len <= MAX_WINDOW`.
    pub fn new(short_len: usize, long_len: usize) -> Self {
        Self {
            prices: VecDeque::with_capacity(long_len),
            short_len,
            long_len,
            short_sum: 0,
            long_sum: 0,
        }
    }

    /// Appends a price, evicting the oldest one once the buffer is full.
    pub fn push(&mut self, price: Decimal) {
        let units = to_units(price);
        if self.prices.len() == self.long_len {
            if let Some(evicted) = self.prices.pop_front() {
                self.long_sum -= evicted;
            }
        }
        self.prices.push_back(units);
        self.long_sum += units;
        self.short_sum += units;

        // The price that just slid out of the short window is still buffered.
        let len = self.prices.len();
        if len > self.short_len {
            self.short_sum -= self.prices[len - 1 - self.short_len];
        }
    }

    /// True once `long_len` prices have been seen.
    pub fn is_warm(&self) -> bool {
        self.prices.len() == self.long_len
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.long_len
    }

    /// Mean of the last `short_len` prices, once the window is warm.
    pub fn short_mean(&self) -> Option<Decimal> {
        self.mean(self.short_sum, self.short_len)
    }

    /// Mean of the last `long_len` prices, once the window is warm.
    pub fn long_mean(&self) -> Option<Decimal> {
        self.mean(self.long_sum, self.long_len)
    }

    /// Orders the short mean against the long mean.
    ///
    /// The comparison cross-multiplies the integer sums instead of dividing,
    /// so equal averages compare `Equal` exactly.
    pub fn compare_means(&self) -> Option<Ordering> {
        if !self.is_warm() {
            return None;
        }
        let short_scaled = self.short_sum.checked_mul(self.long_len as i128)?;
        let long_scaled = self.long_sum.checked_mul(self.short_len as i128)?;
        Some(short_scaled.cmp(&long_scaled))
    }

    fn mean(&self, sum: i128, len: usize) -> Option<Decimal> {
        if !self.is_warm() {
            return None;
        }
        let sum = Decimal::try_from_i128_with_scale(sum, PRICE_SCALE).ok()?;
        sum.checked_div(Decimal::from(len))
    }
}

/// Converts a price to whole multiples of `10^-PRICE_SCALE`.
///
/// Prices outside `[0, MAX_PRICE]` are clamped into it. `Observation`
/// constructors never produce such prices.
fn to_units(price: Decimal) -> i128 {
    let price = price
        .clamp(Decimal::ZERO, Decimal::from(MAX_PRICE))
        .round_dp(PRICE_SCALE);
    price.mantissa() * 10i128.pow(PRICE_SCALE - price.scale())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn is_not_warm_until_long_window_is_full() {
        let mut window = RollingWindow::new(2, 3);
        window.push(dec!(1));
        window.push(dec!(2));
        assert!(!window.is_warm());
        assert_eq!(window.short_mean(), None);
        assert_eq!(window.compare_means(), None);

        window.push(dec!(3));
        assert!(window.is_warm());
        assert_eq!(window.short_mean(), Some(dec!(2.5)));
        assert_eq!(window.long_mean(), Some(dec!(2)));
        assert_eq!(window.compare_means(), Some(Ordering::Greater));
    }

    #[test]
    fn retains_only_long_window_prices() {
        let mut window = RollingWindow::new(2, 4);
        for p in 1..=10 {
            window.push(Decimal::from(p));
        }
        assert_eq!(window.len(), 4);
        assert_eq!(window.capacity(), 4);
        // Last four: 7, 8, 9, 10.
        assert_eq!(window.long_mean(), Some(dec!(8.5)));
        assert_eq!(window.short_mean(), Some(dec!(9.5)));
    }

    #[test]
    fn constant_prices_compare_equal() {
        let mut window = RollingWindow::new(3, 7);
        for _ in 0..50 {
            window.push(dec!(0.1));
        }
        assert_eq!(window.compare_means(), Some(Ordering::Equal));
        assert_eq!(window.short_mean(), window.long_mean());
    }

    #[test]
    fn falling_prices_put_short_mean_below_long() {
        let mut window = RollingWindow::new(2, 3);
        for p in [dec!(20), dec!(20), dec!(5)] {
            window.push(p);
        }
        assert_eq!(window.compare_means(), Some(Ordering::Less));
    }

    #[test]
    fn long_fractional_constant_prices_still_compare_equal() {
        let mut window = RollingWindow::new(3, 7);
        for _ in 0..200 {
            window.push(dec!(1.2345678901234567890123456789));
            if window.is_warm() {
                assert_eq!(window.compare_means(), Some(Ordering::Equal));
            }
        }
        assert_eq!(window.short_mean(), Some(dec!(1.234567890123)));
    }

    #[test]
    fn largest_prices_and_windows_do_not_overflow() {
        let mut window = RollingWindow::new(MAX_WINDOW - 1, MAX_WINDOW);
        for _ in 0..MAX_WINDOW + 5 {
            window.push(Decimal::from(MAX_PRICE));
        }
        assert_eq!(window.compare_means(), Some(Ordering::Equal));

        // Out-of-range input is clamped rather than trusted.
        let mut window = RollingWindow::new(1, 2);
        window.push(dec!(50000000000000000000000000000));
        window.push(dec!(50000000000000000000000000000));
        assert_eq!(window.compare_means(), Some(Ordering::Equal));
        window.push(dec!(-3));
        assert_eq!(window.compare_means(), Some(Ordering::Less));
    }
}
