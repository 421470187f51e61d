//! Reproducible statistics for population-level reductions.
//!
//! This crate provides:
//!
//! - **Compensated summation**: Neumaier-compensated sums and means whose result does not
//!   drift with the number of terms
//! - **Descriptive statistics**: min, max, mean, median, variance and standard deviation,
//!   computed over sorted values so the result does not depend on input order
//!
//! Parallel evaluators produce their values in an arbitrary order. Every reduction here
//! sorts first and sums with compensation, so two runs over the same multiset of values
//! yield bit-identical results.
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use flapevo_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Summing many small terms
//!
//! ```
//! use flapevo_stats::summation::CompensatedSum;
//!
//! let sum = std::iter::repeat_n(0.1, 10).collect::<CompensatedSum>();
//! assert_eq!(sum.value(), 1.0);
//! ```

pub mod descriptive;
pub mod summation;
