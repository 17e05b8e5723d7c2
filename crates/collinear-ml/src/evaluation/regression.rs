use std::fmt;
use std::str::FromStr;

use collinear_common::error::{CommonError, CommonResult};
use serde::{Deserialize, Serialize};

/// Metrics supported by [`RegressionEvaluator`], named as in Spark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegressionMetric {
    #[default]
    R2,
    Mse,
    Rmse,
    Mae,
    /// Explained variance `Σ(ŷᵢ − ȳ)² / n`.
    Var,
}

impl RegressionMetric {
    pub fn name(&self) -> &'static str {
        match self {
            RegressionMetric::R2 => "r2",
            RegressionMetric::Mse => "mse",
            RegressionMetric::Rmse => "rmse",
            RegressionMetric::Mae => "mae",
            RegressionMetric::Var => "var",
        }
    }

    pub fn is_larger_better(&self) -> bool {
        matches!(self, RegressionMetric::R2 | RegressionMetric::Var)
    }
}

impl FromStr for RegressionMetric {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "r2" => Ok(RegressionMetric::R2),
            "mse" => Ok(RegressionMetric::Mse),
            "rmse" => Ok(RegressionMetric::Rmse),
            "mae" => Ok(RegressionMetric::Mae),
            "var" => Ok(RegressionMetric::Var),
            _ => Err(CommonError::invalid(format!("unknown regression metric: {s}"))),
        }
    }
}

impl fmt::Display for RegressionMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Scores predictions against actual targets with a single metric.
#[derive(Debug, Clone, Default)]
pub struct RegressionEvaluator {
    metric: RegressionMetric,
}

impl RegressionEvaluator {
    pub fn new(metric: RegressionMetric) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> RegressionMetric {
        self.metric
    }

    pub fn evaluate(&self, actual: &[f64], predicted: &[f64]) -> CommonResult<f64> {
        match self.metric {
            RegressionMetric::R2 => r2_score(actual, predicted),
            RegressionMetric::Mse => mean_squared_error(actual, predicted),
            RegressionMetric::Rmse => root_mean_squared_error(actual, predicted),
            RegressionMetric::Mae => mean_absolute_error(actual, predicted),
            RegressionMetric::Var => explained_variance(actual, predicted),
        }
    }
}

/// Coefficient of determination `1 − SS_res / SS_tot`.
///
/// Not clamped: a model worse than predicting the mean scores below zero.
/// Undefined for fewer than two values or a constant target.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> CommonResult<f64> {
    check_pair(actual, predicted)?;
    if actual.len() < 2 {
        return Err(CommonError::undefined(format!(
            "R² needs at least 2 values, got {}",
            actual.len()
        )));
    }
    if actual.iter().all(|y| *y == actual[0]) {
        return Err(CommonError::undefined(
            "R² is undefined for a constant target",
        ));
    }
    let mean = mean(actual);
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|y| (y - mean).powi(2)).sum();
    if ss_tot == 0.0 || !ss_tot.is_finite() {
        return Err(CommonError::undefined(format!(
            "R² is undefined for a total sum of squares of {ss_tot}"
        )));
    }
    Ok(1.0 - ss_res / ss_tot)
}

pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> CommonResult<f64> {
    check_pair(actual, predicted)?;
    check_non_empty(actual)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    Ok(sum / actual.len() as f64)
}

pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> CommonResult<f64> {
    mean_squared_error(actual, predicted).map(f64::sqrt)
}

pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> CommonResult<f64> {
    check_pair(actual, predicted)?;
    check_non_empty(actual)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).abs())
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Spark's explained variance: `Σ(ŷᵢ − ȳ)² / n`.
pub fn explained_variance(actual: &[f64], predicted: &[f64]) -> CommonResult<f64> {
    check_pair(actual, predicted)?;
    check_non_empty(actual)?;
    let mean = mean(actual);
    let sum: f64 = predicted.iter().map(|p| (p - mean).powi(2)).sum();
    Ok(sum / actual.len() as f64)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn check_pair(actual: &[f64], predicted: &[f64]) -> CommonResult<()> {
    if actual.len() != predicted.len() {
        return Err(CommonError::mismatch(format!(
            "{} actual values but {} predictions",
            actual.len(),
            predicted.len()
        )));
    }
    if actual.iter().chain(predicted).any(|v| !v.is_finite()) {
        return Err(CommonError::invalid_input(
            "evaluation inputs contain non-finite values",
        ));
    }
    Ok(())
}

fn check_non_empty(actual: &[f64]) -> CommonResult<()> {
    if actual.is_empty() {
        return Err(CommonError::undefined("no values to evaluate"));
    }
    Ok(())
}
