//! Seeded row partitioning.
//!
//! Every row receives one independent uniform draw, so subset sizes are only
//! approximately proportional to the requested fractions. This matches
//! Spark's `randomSplit`; with the default generator the assignments agree
//! with Spark for the same seed and row order.

use collinear_common::error::{CommonError, CommonResult};
use collinear_random::SparkXorShiftRandom;
use rand::{Rng, RngCore};

/// Assigns rows to subsets using a generator it owns.
#[derive(Debug, Clone)]
pub struct BernoulliPartitioner<R = SparkXorShiftRandom> {
    rng: R,
}

impl BernoulliPartitioner<SparkXorShiftRandom> {
    pub fn from_seed(seed: i64) -> Self {
        Self::new(SparkXorShiftRandom::new(seed))
    }
}

impl<R: RngCore> BernoulliPartitioner<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Flags each of `n` rows `true` with probability `p`.
    pub fn partition(&mut self, n: usize, p: f64) -> CommonResult<Vec<bool>> {
        check_row_count(n)?;
        if !(p > 0.0 && p < 1.0) {
            return Err(CommonError::invalid(format!(
                "probability must be in (0, 1), got {p}"
            )));
        }
        let mask = (0..n)
            .map(|_| self.rng.random::<f64>() < p)
            .collect::<Vec<_>>();
        log::debug!(
            "partitioned {n} rows: {} selected with p={p}",
            mask.iter().filter(|x| **x).count()
        );
        Ok(mask)
    }

    /// Assigns each of `n` rows to one of `weights.len()` subsets.
    ///
    /// Weights are normalized; a row goes to the subset whose cumulative
    /// bound interval `[lb, ub)` contains its draw.
    pub fn split(&mut self, n: usize, weights: &[f64]) -> CommonResult<Vec<usize>> {
        check_row_count(n)?;
        let bounds = cumulative_bounds(weights)?;
        let assignment = (0..n)
            .map(|_| {
                let x = self.rng.random::<f64>();
                bounds
                    .iter()
                    .position(|ub| x < *ub)
                    .unwrap_or(bounds.len() - 1)
            })
            .collect();
        Ok(assignment)
    }
}

/// Partitions `n` rows with the default generator seeded from `seed`.
pub fn partition(n: usize, p: f64, seed: i64) -> CommonResult<Vec<bool>> {
    BernoulliPartitioner::from_seed(seed).partition(n, p)
}

/// Splits `n` rows by `weights` with the default generator seeded from `seed`.
pub fn random_split(n: usize, weights: &[f64], seed: i64) -> CommonResult<Vec<usize>> {
    BernoulliPartitioner::from_seed(seed).split(n, weights)
}

fn check_row_count(n: usize) -> CommonResult<()> {
    if n == 0 {
        return Err(CommonError::invalid("row count must be positive"));
    }
    Ok(())
}

/// Upper bounds of the normalized cumulative weights. The last bound is 1.
fn cumulative_bounds(weights: &[f64]) -> CommonResult<Vec<f64>> {
    if weights.is_empty() {
        return Err(CommonError::invalid("at least one weight is required"));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(CommonError::invalid(format!(
            "weights must be non-negative, got {w}"
        )));
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(CommonError::invalid("weights must have a positive sum"));
    }
    let mut acc = 0.0;
    let mut bounds = weights
        .iter()
        .map(|w| {
            acc += w / total;
            acc
        })
        .collect::<Vec<_>>();
    if let Some(last) = bounds.last_mut() {
        *last = 1.0;
    }
    Ok(bounds)
}
