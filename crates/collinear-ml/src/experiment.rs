//! End-to-end regression experiment: partition, fit, predict, evaluate.

use collinear_common::config::AppConfig;
use collinear_common::error::{CommonError, CommonResult};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::diagnostics::{
    correlation_matrix, sign_reversals, variance_inflation_factors, SignReversal,
};
use crate::estimator::LinearRegression;
use crate::evaluation::{r2_score, RegressionEvaluator, RegressionMetric};
use crate::model::LinearRegressionModel;
use crate::partition::partition;
use crate::solver::Solver;

/// Fits a linear regression on a seeded training subset and scores it on the held-out rows.
#[derive(Debug, Clone)]
pub struct RegressionExperiment {
    features: Vec<String>,
    target: String,
    train_fraction: f64,
    seed: i64,
    estimator: LinearRegression,
    metric: RegressionMetric,
}

/// Outcome of [`RegressionExperiment::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub features: Vec<String>,
    pub target: String,
    pub train_rows: usize,
    pub test_rows: usize,
    pub model: LinearRegressionModel,
    pub metric: RegressionMetric,
    /// Value of `metric` on the held-out rows.
    pub score: f64,
    /// R² on the held-out rows.
    pub r2: f64,
    /// Coefficient signs against marginal correlations on the training rows.
    pub sign_reversals: Vec<SignReversal>,
    /// Pairwise feature correlations on the training rows, `None` for constant columns.
    pub feature_correlations: Vec<Vec<Option<f64>>>,
    /// Variance inflation factors on the training rows, when there are at least 2 features.
    pub variance_inflation: Option<Vec<f64>>,
}

impl ExperimentReport {
    pub fn reversed_features(&self) -> impl Iterator<Item = &str> {
        self.sign_reversals
            .iter()
            .filter(|s| s.reversed)
            .map(|s| s.feature.as_str())
    }
}

impl RegressionExperiment {
    pub fn new<S: Into<String>>(
        features: impl IntoIterator<Item = S>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            features: features.into_iter().map(Into::into).collect(),
            target: target.into(),
            train_fraction: 0.8,
            seed: 42,
            estimator: LinearRegression::new(),
            metric: RegressionMetric::R2,
        }
    }

    /// Applies the split, fit and evaluation sections of the configuration.
    pub fn with_config(self, config: &AppConfig) -> CommonResult<Self> {
        let solver = config.fit.solver.parse::<Solver>()?;
        let metric = config.evaluation.metric.parse::<RegressionMetric>()?;
        Ok(self
            .with_train_fraction(config.split.train_fraction)
            .with_seed(config.split.seed)
            .with_solver(solver)
            .with_fit_intercept(config.fit.fit_intercept)
            .with_metric(metric))
    }

    pub fn with_train_fraction(mut self, train_fraction: f64) -> Self {
        self.train_fraction = train_fraction;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.estimator = self.estimator.with_solver(solver);
        self
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.estimator = self.estimator.with_fit_intercept(fit_intercept);
        self
    }

    pub fn with_metric(mut self, metric: RegressionMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn run(&self, dataset: &Dataset) -> CommonResult<ExperimentReport> {
        if self.features.is_empty() {
            return Err(CommonError::invalid("at least one feature is required"));
        }
        let mask = partition(dataset.num_rows(), self.train_fraction, self.seed)?;
        let (train, test) = dataset.split(&mask)?;
        log::info!(
            "split {} rows into {} training and {} held-out rows (seed {})",
            dataset.num_rows(),
            train.num_rows(),
            test.num_rows(),
            self.seed
        );

        let x_train = train.feature_matrix(&self.features)?;
        let y_train = train.target(&self.target)?;
        let model = self.estimator.fit(&x_train, &y_train)?;

        let x_test = test.feature_matrix(&self.features)?;
        let y_test = test.target(&self.target)?;
        let predictions = model.predict(&x_test)?;
        let score = RegressionEvaluator::new(self.metric).evaluate(&y_test, &predictions)?;
        let r2 = r2_score(&y_test, &predictions)?;
        log::info!("held-out {} = {score:.6}, R² = {r2:.6}", self.metric);

        let sign_reversals = sign_reversals(&model, &x_train, &y_train)?;
        for reversal in &sign_reversals {
            match reversal.correlation {
                Some(correlation) if reversal.reversed => log::info!(
                    "coefficient of {} ({:.4}) has the opposite sign of its correlation with {} ({correlation:.4})",
                    reversal.feature,
                    reversal.coefficient,
                    self.target,
                ),
                None => log::warn!(
                    "correlation of {} with {} is undefined on the training rows",
                    reversal.feature,
                    self.target
                ),
                Some(_) => {}
            }
        }
        let feature_correlations = correlation_matrix(&x_train)?;
        let variance_inflation = if x_train.num_features() >= 2 {
            Some(variance_inflation_factors(&x_train)?)
        } else {
            None
        };

        Ok(ExperimentReport {
            features: self.features.clone(),
            target: self.target.clone(),
            train_rows: train.num_rows(),
            test_rows: test.num_rows(),
            model,
            metric: self.metric,
            score,
            r2,
            sign_reversals,
            feature_correlations,
            variance_inflation,
        })
    }
}
