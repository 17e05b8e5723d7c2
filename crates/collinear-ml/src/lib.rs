//! Ordinary least squares regression with held-out evaluation and
//! multicollinearity diagnostics.
//!
//! The typical flow is [`Dataset`] → [`partition()`] → [`LinearRegression::fit`]
//! → [`LinearRegressionModel::predict`] → [`r2_score`], which
//! [`RegressionExperiment`] runs end to end.

pub mod dataset;
pub mod diagnostics;
pub mod estimator;
pub mod evaluation;
pub mod experiment;
pub mod model;
pub mod partition;
pub mod solver;

pub use dataset::{Dataset, FeatureMatrix};
pub use diagnostics::{
    correlation_matrix, pearson_correlation, sign_reversals, variance_inflation_factors,
    SignReversal,
};
pub use estimator::LinearRegression;
pub use evaluation::{r2_score, RegressionEvaluator, RegressionMetric};
pub use experiment::{ExperimentReport, RegressionExperiment};
pub use model::LinearRegressionModel;
pub use partition::{partition, random_split, BernoulliPartitioner};
pub use solver::Solver;
