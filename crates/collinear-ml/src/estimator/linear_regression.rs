//! Linear Regression estimator.

use collinear_common::error::{CommonError, CommonResult};
use nalgebra::DVector;

use crate::dataset::FeatureMatrix;
use crate::model::LinearRegressionModel;
use crate::solver::normal_equation::solve_normal_equation;
use crate::solver::svd::solve_svd;
use crate::solver::Solver;

/// Linear Regression estimator.
///
/// Minimizes `Σ(yᵢ − β₀ − Σⱼ βⱼ·xᵢⱼ)²`. The design is augmented with a
/// column of ones so the intercept is solved jointly with the coefficients.
///
/// Collinear or duplicated features are not an error: the SVD solver returns
/// the minimum-norm solution and the model reports the design as rank
/// deficient. Individual coefficients are then partial effects that may
/// carry the opposite sign of the feature's marginal correlation with the target.
///
/// # Example
///
/// ```ignore
/// let lr = LinearRegression::new()
///     .with_solver(Solver::Svd);
///
/// let model = lr.fit(&features, &labels)?;
/// ```
#[derive(Debug, Clone)]
pub struct LinearRegression {
    solver: Solver,
    fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Create a new LinearRegression estimator with default parameters.
    pub fn new() -> Self {
        Self {
            solver: Solver::Auto,
            fit_intercept: true,
        }
    }

    /// Set the solver type.
    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.solver = solver;
        self
    }

    /// Set whether to fit an intercept term.
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn solver(&self) -> Solver {
        self.solver
    }

    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }

    /// Train the model on the given data.
    pub fn fit(
        &self,
        features: &FeatureMatrix,
        labels: &[f64],
    ) -> CommonResult<LinearRegressionModel> {
        let num_rows = features.num_rows();
        let num_features = features.num_features();
        let num_parameters = num_features + usize::from(self.fit_intercept);

        if labels.len() != num_rows {
            return Err(CommonError::mismatch(format!(
                "{num_rows} feature rows but {} labels",
                labels.len()
            )));
        }
        if num_parameters == 0 {
            return Err(CommonError::invalid(
                "no features and no intercept: nothing to fit",
            ));
        }
        if num_rows < num_parameters {
            return Err(CommonError::insufficient(format!(
                "{num_rows} rows cannot determine {num_parameters} parameters"
            )));
        }
        if !features.is_finite() {
            return Err(CommonError::invalid_input("features contain non-finite values"));
        }
        if let Some(i) = labels.iter().position(|y| !y.is_finite()) {
            return Err(CommonError::invalid_input(format!(
                "label at row {i} is not finite"
            )));
        }

        let design = if self.fit_intercept {
            features.values().clone().insert_column(0, 1.0)
        } else {
            features.values().clone()
        };
        let target = DVector::from_column_slice(labels);

        let solution = match self.solver.effective() {
            Solver::NormalEquation => {
                log::info!("Using normal equation solver");
                solve_normal_equation(design, &target)?
            }
            Solver::Svd | Solver::Auto => {
                log::info!("Using SVD solver (minimum-norm solution)");
                solve_svd(design, &target)?
            }
        };
        if solution.rank < num_parameters {
            log::warn!(
                "design matrix is rank deficient (rank {} of {num_parameters}); \
                 coefficients are the minimum-norm solution",
                solution.rank
            );
        }

        let parameters = solution.parameters.as_slice();
        let (intercept, coefficients) = if self.fit_intercept {
            (parameters[0], parameters[1..].to_vec())
        } else {
            (0.0, parameters.to_vec())
        };
        Ok(LinearRegressionModel::new(coefficients, intercept)
            .with_feature_names(features.names().to_vec())
            .with_rank(solution.rank, num_parameters))
    }

    /// Train the model on unnamed feature rows.
    pub fn fit_rows(
        &self,
        features: &[Vec<f64>],
        labels: &[f64],
    ) -> CommonResult<LinearRegressionModel> {
        self.fit(&FeatureMatrix::from_unnamed_rows(features)?, labels)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    /// Rows of (x1, x2) and y = 3 + 2·x1 − x2 without noise.
    fn exact_plane() -> (Vec<Vec<f64>>, Vec<f64>) {
        let features = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![2.0, 3.0],
            vec![-1.0, 4.0],
            vec![3.5, -2.0],
        ];
        let labels = features.iter().map(|x| 3.0 + 2.0 * x[0] - x[1]).collect();
        (features, labels)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_fit_recovers_exact_plane() {
        let (features, labels) = exact_plane();
        for solver in [Solver::Auto, Solver::Svd, Solver::NormalEquation] {
            let model = LinearRegression::new()
                .with_solver(solver)
                .fit_rows(&features, &labels)
                .unwrap();
            assert_close(model.intercept(), 3.0);
            assert_close(model.coefficients()[0], 2.0);
            assert_close(model.coefficients()[1], -1.0);
            assert!(!model.is_rank_deficient());
        }
    }

    #[test]
    fn test_fit_collinear_features_reproduces_training_targets() {
        // x2 = 2·x1 exactly, x3 independent.
        let features = [
            [1.0, 0.5],
            [2.0, -1.0],
            [3.0, 2.0],
            [4.0, 0.0],
            [5.0, 1.5],
            [6.0, -0.5],
        ]
        .iter()
        .map(|[x1, x3]| vec![*x1, 2.0 * x1, *x3])
        .collect::<Vec<_>>();
        let labels = features
            .iter()
            .map(|x| 1.0 + 0.5 * x[0] + 0.25 * x[1] - 3.0 * x[2])
            .collect::<Vec<_>>();

        for solver in [Solver::Svd, Solver::NormalEquation] {
            let model = LinearRegression::new()
                .with_solver(solver)
                .fit_rows(&features, &labels)
                .unwrap();
            assert!(model.is_rank_deficient());
            assert_eq!(model.rank(), 3);
            let predictions = model.predict_batch(&features).unwrap();
            for (actual, expected) in predictions.iter().zip(&labels) {
                assert_close(*actual, *expected);
            }
        }
    }

    #[test]
    fn test_fit_without_intercept() {
        let features = vec![vec![1.0], vec![2.0], vec![3.0]];
        let labels = vec![2.0, 4.0, 6.0];
        let model = LinearRegression::new()
            .with_fit_intercept(false)
            .fit_rows(&features, &labels)
            .unwrap();
        assert_eq!(model.intercept(), 0.0);
        assert_close(model.coefficients()[0], 2.0);
    }

    #[test]
    fn test_fit_intercept_only_is_the_mean() {
        let features = FeatureMatrix::from_rows(vec![], &[vec![], vec![], vec![]]).unwrap();
        let model = LinearRegression::new()
            .fit(&features, &[1.0, 2.0, 6.0])
            .unwrap();
        assert!(model.coefficients().is_empty());
        assert_close(model.intercept(), 3.0);
    }

    #[test]
    fn test_fit_insufficient_data() {
        let features = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
        let result = LinearRegression::new().fit_rows(&features, &[1.0, 2.0]);
        assert!(matches!(result, Err(CommonError::InsufficientData(_))));

        let empty = FeatureMatrix::from_rows(vec!["a".to_string()], &[]).unwrap();
        let result = LinearRegression::new().fit(&empty, &[]);
        assert!(matches!(result, Err(CommonError::InsufficientData(_))));
    }

    #[test]
    fn test_fit_non_finite_input() {
        let (mut features, labels) = exact_plane();
        features[2][1] = f64::NAN;
        let result = LinearRegression::new().fit_rows(&features, &labels);
        assert!(matches!(result, Err(CommonError::InvalidInput(_))));

        let (features, mut labels) = exact_plane();
        labels[0] = f64::INFINITY;
        let result = LinearRegression::new().fit_rows(&features, &labels);
        assert!(matches!(result, Err(CommonError::InvalidInput(_))));
    }

    #[test]
    fn test_fit_label_count_mismatch() {
        let (features, _) = exact_plane();
        let result = LinearRegression::new().fit_rows(&features, &[1.0]);
        assert!(matches!(result, Err(CommonError::DimensionMismatch(_))));
    }

    #[test]
    fn test_fit_records_feature_names() {
        let features = FeatureMatrix::from_rows(
            vec!["engine".to_string(), "city".to_string()],
            &exact_plane().0,
        )
        .unwrap();
        let model = LinearRegression::new()
            .fit(&features, &exact_plane().1)
            .unwrap();
        assert_eq!(model.feature_names(), features.names());
        assert_eq!(model.predict(&features).unwrap().len(), 6);
    }
}
