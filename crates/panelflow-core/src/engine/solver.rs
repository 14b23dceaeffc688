use super::config::SolverConfig;
use nalgebra::{DMatrix, DVector};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("Zero pivot at row {row}: the diagonal entry A[{row}][{row}] is 0")]
    ZeroPivot { row: usize },

    #[error("Dimension mismatch: {what} has {found} entries, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Iteration diverged: non-finite iterate after sweep {iteration}")]
    Diverged { iteration: usize },
}

/// Result of a Gauss-Seidel solve, including how it ended.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussSeidelSolution {
    pub x: DVector<f64>,
    /// Number of completed sweeps.
    pub iterations: usize,
    /// Whether the update norm fell below the tolerance before the iteration cap.
    pub converged: bool,
    /// Infinity norm of the update in the last sweep.
    pub final_delta: f64,
    /// `‖b − A·x‖∞` after each sweep.
    pub residual_history: Vec<f64>,
}

/// Solves `A·x = b` by Gauss-Seidel relaxation.
///
/// Each sweep updates the unknowns in row order, in place, so later rows already see the new
/// values of earlier ones. Iteration stops when the largest change of a sweep falls below
/// `config.tolerance`, or after `config.max_iterations` sweeps. Reaching the cap is not an
/// error; it is reported through [`GaussSeidelSolution::converged`].
///
/// # Arguments
///
/// * `a` - Square coefficient matrix with a non-zero diagonal.
/// * `b` - Right-hand side.
/// * `x0` - Initial guess; zeros when `None`.
/// * `config` - Iteration cap and tolerance.
///
/// # Errors
///
/// * [`SolverError::DimensionMismatch`] if the shapes of `a`, `b` and `x0` disagree.
/// * [`SolverError::ZeroPivot`] if a diagonal entry is zero. This is checked up front.
/// * [`SolverError::Diverged`] if an iterate becomes non-finite.
pub fn gauss_seidel(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: Option<&DVector<f64>>,
    config: &SolverConfig,
) -> Result<GaussSeidelSolution, SolverError> {
    let n = b.len();
    check_dimensions(a, b, x0)?;

    if let Some(row) = (0..n).find(|&i| a[(i, i)] == 0.0) {
        return Err(SolverError::ZeroPivot { row });
    }

    let mut x = x0.cloned().unwrap_or_else(|| DVector::zeros(n));
    if n == 0 {
        return Ok(GaussSeidelSolution {
            x,
            iterations: 0,
            converged: true,
            final_delta: 0.0,
            residual_history: Vec::new(),
        });
    }

    let mut residual_history = Vec::new();
    let mut final_delta = f64::INFINITY;

    for sweep in 1..=config.max_iterations {
        let delta = relax(a, b, &mut x);
        if x.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::Diverged { iteration: sweep });
        }

        final_delta = delta;
        residual_history.push(residual_norm(a, b, &x));

        if delta < config.tolerance {
            trace!(iterations = sweep, delta, "Gauss-Seidel converged.");
            return Ok(GaussSeidelSolution {
                x,
                iterations: sweep,
                converged: true,
                final_delta,
                residual_history,
            });
        }
    }

    Ok(GaussSeidelSolution {
        x,
        iterations: config.max_iterations,
        converged: false,
        final_delta,
        residual_history,
    })
}

/// `‖b − A·x‖∞`.
pub fn residual_norm(a: &DMatrix<f64>, b: &DVector<f64>, x: &DVector<f64>) -> f64 {
    (b - a * x).amax()
}

fn check_dimensions(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: Option<&DVector<f64>>,
) -> Result<(), SolverError> {
    let n = b.len();
    if a.nrows() != n {
        return Err(SolverError::DimensionMismatch {
            what: "matrix rows",
            expected: n,
            found: a.nrows(),
        });
    }
    if a.ncols() != n {
        return Err(SolverError::DimensionMismatch {
            what: "matrix columns",
            expected: n,
            found: a.ncols(),
        });
    }
    match x0 {
        Some(x0) if x0.len() != n => Err(SolverError::DimensionMismatch {
            what: "initial guess",
            expected: n,
            found: x0.len(),
        }),
        _ => Ok(()),
    }
}

/// One in-place sweep; returns the largest absolute update.
fn relax(a: &DMatrix<f64>, b: &DVector<f64>, x: &mut DVector<f64>) -> f64 {
    let n = b.len();
    let mut delta: f64 = 0.0;
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..n {
            if j != i {
                sum -= a[(i, j)] * x[j];
            }
        }
        let updated = sum / a[(i, i)];
        delta = delta.max((updated - x[i]).abs());
        x[i] = updated;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dominant_system() -> (DMatrix<f64>, DVector<f64>) {
        let a = DMatrix::from_row_slice(3, 3, &[10.0, 1.0, 1.0, 1.0, 10.0, 1.0, 1.0, 1.0, 10.0]);
        let b = DVector::from_vec(vec![12.0, 12.0, 12.0]);
        (a, b)
    }

    #[test]
    fn diagonally_dominant_system_converges_to_exact_solution() {
        let (a, b) = dominant_system();
        let solution = gauss_seidel(&a, &b, None, &SolverConfig::default()).unwrap();

        assert!(solution.converged);
        assert!(solution.iterations < 30, "took {}", solution.iterations);
        assert!(solution.final_delta < 1e-10);
        for value in solution.x.iter() {
            assert!((value - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn residual_history_of_dominant_system_is_non_increasing() {
        let (a, b) = dominant_system();
        let solution = gauss_seidel(&a, &b, None, &SolverConfig::default()).unwrap();

        assert_eq!(solution.residual_history.len(), solution.iterations);
        assert!((solution.residual_history[0] - 2.052).abs() < 1e-9);
        for pair in solution.residual_history.windows(2) {
            assert!(pair[1] <= pair[0], "{:?}", pair);
        }
    }

    #[test]
    fn sweep_uses_values_updated_earlier_in_the_same_sweep() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]);
        let b = DVector::from_vec(vec![3.0, 3.0]);
        let config = SolverConfig {
            max_iterations: 1,
            ..SolverConfig::default()
        };
        let solution = gauss_seidel(&a, &b, None, &config).unwrap();
        assert_eq!(solution.x, DVector::from_vec(vec![1.5, 0.75]));
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let (a, b) = dominant_system();
        let config = SolverConfig {
            max_iterations: 2,
            tolerance: 1e-14,
            ..SolverConfig::default()
        };
        let solution = gauss_seidel(&a, &b, None, &config).unwrap();
        assert!(!solution.converged);
        assert_eq!(solution.iterations, 2);
        assert_eq!(solution.residual_history.len(), 2);
        assert!(solution.final_delta > 1e-14);
    }

    #[test]
    fn exact_initial_guess_converges_in_one_sweep() {
        let (a, b) = dominant_system();
        let x0 = DVector::from_element(3, 1.0);
        let solution = gauss_seidel(&a, &b, Some(&x0), &SolverConfig::default()).unwrap();
        assert!(solution.converged);
        assert_eq!(solution.iterations, 1);
        assert_eq!(solution.final_delta, 0.0);
    }

    #[test]
    fn zero_diagonal_is_reported_before_iterating() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 0.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);
        assert_eq!(
            gauss_seidel(&a, &b, None, &SolverConfig::default()),
            Err(SolverError::ZeroPivot { row: 1 })
        );
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let (a, _) = dominant_system();
        let b = DVector::from_vec(vec![1.0, 1.0]);
        assert!(matches!(
            gauss_seidel(&a, &b, None, &SolverConfig::default()),
            Err(SolverError::DimensionMismatch { .. })
        ));

        let (a, b) = dominant_system();
        let x0 = DVector::zeros(4);
        assert_eq!(
            gauss_seidel(&a, &b, Some(&x0), &SolverConfig::default()),
            Err(SolverError::DimensionMismatch {
                what: "initial guess",
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn strongly_non_dominant_system_diverges() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 10.0, 10.0, 1.0]);
        let b = DVector::from_vec(vec![11.0, 11.0]);
        let result = gauss_seidel(&a, &b, None, &SolverConfig::default());
        assert!(matches!(result, Err(SolverError::Diverged { .. })), "{:?}", result);
    }

    #[test]
    fn repeated_solves_are_identical() {
        let (a, b) = dominant_system();
        let first = gauss_seidel(&a, &b, None, &SolverConfig::default()).unwrap();
        let second = gauss_seidel(&a, &b, None, &SolverConfig::default()).unwrap();
        assert_eq!(first, second);
    }
}
