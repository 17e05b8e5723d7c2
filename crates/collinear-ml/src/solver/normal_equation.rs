//! Normal equation solver.
//!
//! Solves `(XᵀX)β = Xᵀy` by Cholesky factorization. Squaring the design
//! squares its condition number, so the factorization is only trusted when
//! the pivots of `L` stay well away from zero; otherwise the solve is
//! delegated to the SVD solver.

use collinear_common::error::{CommonError, CommonResult};
use nalgebra::{DMatrix, DVector};

use crate::solver::svd::solve_svd;
use crate::solver::LeastSquaresSolution;

/// Train using the normal equation, falling back to SVD for ill-conditioned designs.
pub fn solve_normal_equation(
    design: DMatrix<f64>,
    target: &DVector<f64>,
) -> CommonResult<LeastSquaresSolution> {
    let (rows, cols) = design.shape();
    if rows != target.len() {
        return Err(CommonError::mismatch(format!(
            "design has {rows} rows, target has {}",
            target.len()
        )));
    }

    let gram = design.tr_mul(&design);
    let moment = design.tr_mul(target);
    match gram.cholesky() {
        Some(cholesky) if is_well_conditioned(&cholesky.l(), cols) => {
            let parameters = cholesky.solve(&moment);
            if parameters.iter().all(|v| v.is_finite()) {
                return Ok(LeastSquaresSolution {
                    parameters,
                    rank: cols,
                });
            }
            log::warn!("normal equation produced non-finite parameters, falling back to SVD");
        }
        _ => {
            log::warn!("XᵀX is not numerically positive definite, falling back to SVD");
        }
    }
    solve_svd(design, target)
}

/// The squared ratio of the smallest to the largest Cholesky pivot
/// approximates the reciprocal condition number of `XᵀX`.
fn is_well_conditioned(l: &DMatrix<f64>, cols: usize) -> bool {
    let diagonal = l.diagonal();
    let largest = diagonal.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let smallest = diagonal.iter().fold(f64::INFINITY, |acc, v| acc.min(v.abs()));
    if largest == 0.0 {
        return false;
    }
    let ratio = smallest / largest;
    ratio * ratio > cols.max(1) as f64 * f64::EPSILON.sqrt()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_equation_full_rank() {
        // y = 1 + 2a - b
        let x = DMatrix::from_row_slice(
            4,
            3,
            &[
                1.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                1.0, 0.0, 1.0, //
                1.0, 2.0, 3.0,
            ],
        );
        let y = DVector::from_row_slice(&[1.0, 3.0, 0.0, 2.0]);

        let solution = solve_normal_equation(x, &y).unwrap();
        assert_eq!(solution.rank, 3);
        for (actual, expected) in solution.parameters.iter().zip([1.0, 2.0, -1.0]) {
            assert!((actual - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_normal_equation_falls_back_for_collinear_columns() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0]);
        let y = DVector::from_row_slice(&[5.0, 10.0, 15.0]);

        let solution = solve_normal_equation(x.clone(), &y).unwrap();
        assert_eq!(solution.rank, 1);
        let fitted = x * solution.parameters;
        for (actual, expected) in fitted.iter().zip(y.iter()) {
            assert!((actual - expected).abs() < 1e-9);
        }
    }
}
