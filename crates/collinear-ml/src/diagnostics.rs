//! Multicollinearity diagnostics.
//!
//! With strongly correlated predictors a fitted coefficient is a partial
//! effect: it may carry the opposite sign of the feature's marginal
//! correlation with the target. [`sign_reversals`] reports exactly those
//! features, and [`variance_inflation_factors`] measures how much each
//! feature is explained by the others.

use collinear_common::error::{CommonError, CommonResult};
use serde::{Deserialize, Serialize};

use crate::dataset::FeatureMatrix;
use crate::estimator::LinearRegression;
use crate::evaluation::r2_score;
use crate::model::LinearRegressionModel;

/// Comparison of a fitted coefficient with the marginal correlation of its feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignReversal {
    pub feature: String,
    pub coefficient: f64,
    /// `None` when the feature or the target is constant over the sample.
    pub correlation: Option<f64>,
    /// `true` when the coefficient and the correlation have strictly opposite signs.
    pub reversed: bool,
}

/// Pearson correlation coefficient of two equally long samples.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> CommonResult<f64> {
    if x.len() != y.len() {
        return Err(CommonError::mismatch(format!(
            "samples have {} and {} values",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(CommonError::undefined(
            "correlation needs at least 2 values",
        ));
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return Err(CommonError::undefined(
            "correlation is undefined for a constant sample",
        ));
    }
    Ok((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Like [`pearson_correlation`], with an undefined correlation mapped to `None`.
fn defined_correlation(x: &[f64], y: &[f64]) -> CommonResult<Option<f64>> {
    match pearson_correlation(x, y) {
        Ok(r) => Ok(Some(r)),
        Err(CommonError::UndefinedMetric(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Pairwise Pearson correlations of the feature columns, row `i` column `j`
/// holding `corr(xᵢ, xⱼ)`. Pairs involving a constant column are `None`.
pub fn correlation_matrix(features: &FeatureMatrix) -> CommonResult<Vec<Vec<Option<f64>>>> {
    let columns = (0..features.num_features())
        .map(|j| features.column(j))
        .collect::<Vec<_>>();
    let k = columns.len();
    let mut matrix = vec![vec![None; k]; k];
    for i in 0..k {
        matrix[i][i] = defined_correlation(&columns[i], &columns[i])?;
        for j in (i + 1)..k {
            let r = defined_correlation(&columns[i], &columns[j])?;
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    Ok(matrix)
}

/// `VIFⱼ = 1 / (1 − R²ⱼ)` where `R²ⱼ` comes from regressing feature `j` on
/// the remaining features. Exactly dependent features get `+∞`, and so do
/// constant features, which are collinear with the intercept.
pub fn variance_inflation_factors(features: &FeatureMatrix) -> CommonResult<Vec<f64>> {
    if features.num_features() < 2 {
        return Err(CommonError::invalid(
            "variance inflation needs at least 2 features",
        ));
    }
    let estimator = LinearRegression::new();
    (0..features.num_features())
        .map(|j| {
            let others = features.without_feature(j)?;
            let target = features.column(j);
            let model = estimator.fit(&others, &target)?;
            let r2 = match r2_score(&target, &model.predict(&others)?) {
                Ok(r2) => r2,
                Err(CommonError::UndefinedMetric(_)) => return Ok(f64::INFINITY),
                Err(e) => return Err(e),
            };
            let unexplained = 1.0 - r2;
            if unexplained <= f64::EPSILON.sqrt() {
                Ok(f64::INFINITY)
            } else {
                Ok(1.0 / unexplained)
            }
        })
        .collect()
}

/// Compares each coefficient of `model` with the marginal correlation between
/// its feature and `target` over `features`. Constant features or a constant
/// target leave the correlation undefined and are never reported as reversed.
pub fn sign_reversals(
    model: &LinearRegressionModel,
    features: &FeatureMatrix,
    target: &[f64],
) -> CommonResult<Vec<SignReversal>> {
    if model.num_features() != features.num_features() {
        return Err(CommonError::mismatch(format!(
            "model has {} coefficients, matrix has {} features",
            model.num_features(),
            features.num_features()
        )));
    }
    model
        .coefficients()
        .iter()
        .zip(features.names())
        .enumerate()
        .map(|(j, (coefficient, name))| {
            let correlation = defined_correlation(&features.column(j), target)?;
            Ok(SignReversal {
                feature: name.clone(),
                coefficient: *coefficient,
                correlation,
                reversed: correlation.is_some_and(|r| coefficient * r < 0.0),
            })
        })
        .collect()
}
