//! SVD (pseudo-inverse) solver.
//!
//! For the design `X = UΣVᵀ` the minimum-norm solution is `β = VΣ⁺Uᵀy`,
//! where singular values below `σ_max · max(m·ε, n·ε, 10⁻¹²)` are treated
//! as zero.
//! Rank-deficient designs therefore still yield a unique, deterministic β.

use collinear_common::error::{CommonError, CommonResult};
use nalgebra::{DMatrix, DVector};

use crate::solver::LeastSquaresSolution;

/// Train using the singular value decomposition of the design matrix.
pub fn solve_svd(design: DMatrix<f64>, target: &DVector<f64>) -> CommonResult<LeastSquaresSolution> {
    let (rows, cols) = design.shape();
    if rows != target.len() {
        return Err(CommonError::mismatch(format!(
            "design has {rows} rows, target has {}",
            target.len()
        )));
    }
    if cols == 0 {
        return Ok(LeastSquaresSolution {
            parameters: DVector::zeros(0),
            rank: 0,
        });
    }

    let svd = design.svd(true, true);
    let tolerance = rank_tolerance(svd.singular_values.max(), rows, cols);
    let rank = svd.rank(tolerance);
    let parameters = svd
        .solve(target, tolerance)
        .map_err(|e| CommonError::internal(format!("SVD solve failed: {e}")))?;
    if parameters.iter().any(|v| !v.is_finite()) {
        return Err(CommonError::internal("SVD produced non-finite parameters"));
    }
    log::debug!("SVD solve: {rows}x{cols} design, rank {rank}, tolerance {tolerance:e}");
    Ok(LeastSquaresSolution { parameters, rank })
}

/// Relative threshold below which singular values are treated as zero.
const MIN_RELATIVE_TOLERANCE: f64 = 1e-12;

/// Singular values at or below this threshold are treated as zero.
pub fn rank_tolerance(max_singular_value: f64, rows: usize, cols: usize) -> f64 {
    let relative = (rows.max(cols) as f64 * f64::EPSILON).max(MIN_RELATIVE_TOLERANCE);
    max_singular_value * relative
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_svd_full_rank() {
        // y = 2 + 3x on x = [0, 1, 2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let solution = solve_svd(x, &y).unwrap();
        assert_eq!(solution.rank, 2);
        assert!((solution.parameters[0] - 2.0).abs() < 1e-10);
        assert!((solution.parameters[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_svd_duplicate_columns_split_weight() {
        // Two identical columns: the minimum-norm solution shares the weight.
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let y = DVector::from_row_slice(&[2.0, 4.0, 6.0]);

        let solution = solve_svd(x, &y).unwrap();
        assert_eq!(solution.rank, 1);
        assert!((solution.parameters[0] - 1.0).abs() < 1e-10);
        assert!((solution.parameters[1] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_svd_zero_design() {
        let x = DMatrix::zeros(3, 2);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);

        let solution = solve_svd(x, &y).unwrap();
        assert_eq!(solution.rank, 0);
        assert!(solution.parameters.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_svd_row_mismatch() {
        let x = DMatrix::zeros(3, 2);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(matches!(
            solve_svd(x, &y),
            Err(CommonError::DimensionMismatch(_))
        ));
    }
}
