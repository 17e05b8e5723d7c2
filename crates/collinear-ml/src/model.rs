//! Trained ML models.

use collinear_common::error::{CommonError, CommonResult};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::dataset::FeatureMatrix;

/// A trained linear regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    coefficients: Vec<f64>,
    intercept: f64,
    feature_names: Vec<String>,
    rank: usize,
    num_parameters: usize,
}

impl LinearRegressionModel {
    /// Create a new trained model.
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        let num_parameters = coefficients.len() + 1;
        Self {
            coefficients,
            intercept,
            feature_names: vec![],
            rank: num_parameters,
            num_parameters,
        }
    }

    pub(crate) fn with_feature_names(mut self, feature_names: Vec<String>) -> Self {
        self.feature_names = feature_names;
        self
    }

    pub(crate) fn with_rank(mut self, rank: usize, num_parameters: usize) -> Self {
        self.rank = rank;
        self.num_parameters = num_parameters;
        self
    }

    /// Get the model coefficients, in feature order.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Get the model intercept.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Get the number of features.
    pub fn num_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Feature names seen during fitting; empty when fitted from unnamed rows.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Numerical rank of the design matrix the model was fitted on.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Whether the design had linearly dependent columns.
    /// The coefficients are then the minimum-norm least squares solution.
    pub fn is_rank_deficient(&self) -> bool {
        self.rank < self.num_parameters
    }

    /// Predict for a single sample.
    pub fn predict_row(&self, features: &[f64]) -> CommonResult<f64> {
        self.check_num_features(features.len())?;
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(coef, feat)| coef * feat)
                .sum::<f64>())
    }

    /// Predict for multiple samples.
    pub fn predict_batch(&self, features: &[Vec<f64>]) -> CommonResult<Vec<f64>> {
        features.iter().map(|f| self.predict_row(f)).collect()
    }

    /// Predict every row of a feature matrix laid out like the training one.
    pub fn predict(&self, features: &FeatureMatrix) -> CommonResult<Vec<f64>> {
        self.check_num_features(features.num_features())?;
        if !self.feature_names.is_empty() && self.feature_names.as_slice() != features.names() {
            return Err(CommonError::invalid(format!(
                "features {:?} do not match the fitted features {:?}",
                features.names(),
                self.feature_names
            )));
        }
        let coefficients = DVector::from_column_slice(&self.coefficients);
        let predictions = features.values() * coefficients;
        Ok(predictions.iter().map(|p| p + self.intercept).collect())
    }

    fn check_num_features(&self, actual: usize) -> CommonResult<()> {
        if actual != self.coefficients.len() {
            return Err(CommonError::mismatch(format!(
                "expected {} features, got {actual}",
                self.coefficients.len()
            )));
        }
        Ok(())
    }
}
