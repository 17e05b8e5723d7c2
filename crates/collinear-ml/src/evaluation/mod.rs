//! Model evaluation metrics.

mod regression;

pub use regression::{
    explained_variance, mean_absolute_error, mean_squared_error, r2_score,
    root_mean_squared_error, RegressionEvaluator, RegressionMetric,
};
