//! Compensated floating-point summation.
//!
//! Plain `f64` summation loses low-order bits with every addition and its result depends
//! on the order of the terms. [`CompensatedSum`] tracks the lost bits separately
//! (Neumaier's variant of Kahan summation), which keeps the error independent of the
//! number of terms.

/// Running Neumaier-compensated sum.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sum: 0.0,
            compensation: 0.0,
        }
    }

    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

impl FromIterator<f64> for CompensatedSum {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut sum = Self::new();
        for value in iter {
            sum.add(value);
        }
        sum
    }
}

impl Extend<f64> for CompensatedSum {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

/// Compensated sum of `values`.
pub fn sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().collect::<CompensatedSum>().value()
}

/// Compensated arithmetic mean of `values`, or `None` if there are none.
#[expect(clippy::cast_precision_loss)]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = CompensatedSum::new();
    let mut count = 0_usize;
    for value in values {
        sum.add(value);
        count += 1;
    }
    (count > 0).then(|| sum.value() / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenths_sum_exactly() {
        let naive = std::iter::repeat_n(0.1, 10).sum::<f64>();
        assert_ne!(naive, 1.0);
        assert_eq!(sum(std::iter::repeat_n(0.1, 10)), 1.0);
    }

    #[test]
    fn test_cancellation() {
        assert_eq!(sum([1.0, 1e100, 1.0, -1e100]), 2.0);
    }

    #[test]
    fn test_mean_of_empty_is_none() {
        assert_eq!(mean(std::iter::empty()), None);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean([1.0, 2.0, 3.0, 6.0]), Some(3.0));
    }

    #[test]
    fn test_extend_matches_collect() {
        let values = [0.3, 1e-9, 7.25, -2.5];
        let mut extended = CompensatedSum::new();
        extended.extend(values);
        assert_eq!(extended, values.into_iter().collect::<CompensatedSum>());
    }
}
