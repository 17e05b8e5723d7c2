//! Least squares solvers.

use std::fmt;
use std::str::FromStr;

use collinear_common::error::CommonError;
use nalgebra::DVector;

pub mod normal_equation;
pub mod svd;

/// Solver type for linear regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Solver {
    /// Choose automatically (currently always [`Solver::Svd`]).
    #[default]
    Auto,
    /// Pseudo-inverse through the singular value decomposition of the design.
    Svd,
    /// Cholesky factorization of `X'X`, falling back to [`Solver::Svd`]
    /// when `X'X` is not numerically positive definite.
    NormalEquation,
}

impl Solver {
    /// Get the effective solver.
    pub fn effective(&self) -> Solver {
        match self {
            Solver::Auto => Solver::Svd,
            other => *other,
        }
    }
}

impl FromStr for Solver {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Solver::Auto),
            "svd" => Ok(Solver::Svd),
            "normal-equation" | "normal" => Ok(Solver::NormalEquation),
            _ => Err(CommonError::invalid(format!("unknown solver: {s}"))),
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Solver::Auto => "auto",
            Solver::Svd => "svd",
            Solver::NormalEquation => "normal-equation",
        };
        write!(f, "{name}")
    }
}

/// The solution of `min ‖Xβ − y‖²` together with the numerical rank of `X`.
#[derive(Debug, Clone)]
pub struct LeastSquaresSolution {
    pub parameters: DVector<f64>,
    pub rank: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_from_str() {
        assert_eq!("AUTO".parse::<Solver>().unwrap(), Solver::Auto);
        assert_eq!("svd".parse::<Solver>().unwrap(), Solver::Svd);
        assert_eq!(
            "normal-equation".parse::<Solver>().unwrap(),
            Solver::NormalEquation
        );
        assert!("sgd".parse::<Solver>().is_err());
    }

    #[test]
    fn test_solver_effective() {
        assert_eq!(Solver::Auto.effective(), Solver::Svd);
        assert_eq!(Solver::NormalEquation.effective(), Solver::NormalEquation);
    }
}
