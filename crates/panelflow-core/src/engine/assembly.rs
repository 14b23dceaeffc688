use crate::core::kernel::{QuadratureConfig, influence_integral_with};
use crate::core::models::freestream::Freestream;
use crate::core::models::panel::Panel;
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Geometry-only influence coefficients of a panel set.
///
/// `normal[(i, j)]` and `tangential[(i, j)]` are the normal and tangential velocity induced at
/// the control point of panel `i` by a unit source distribution on panel `j`, both divided by
/// `2π`. Diagonals are zero; the self-induced normal velocity of a source panel enters the
/// system as the constant `1/2` instead.
///
/// A vortex distribution of unit strength on panel `j` induces `-tangential` in the normal
/// direction and `normal` in the tangential direction, so both singularity types are covered by
/// these two matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct InfluenceCoefficients {
    normal: DMatrix<f64>,
    tangential: DMatrix<f64>,
}

impl InfluenceCoefficients {
    /// Integrates every panel pair once.
    #[instrument(skip_all, name = "influence_coefficients", fields(panels = panels.len()))]
    pub fn compute(panels: &[Panel], config: &QuadratureConfig) -> Self {
        let n = panels.len();

        let iterator = 0..n;

        #[cfg(feature = "parallel")]
        let iterator = (0..n).into_par_iter();

        let rows: Vec<InfluenceRow> = iterator
            .map(|i| influence_row(panels, i, config))
            .collect();

        let unconverged: usize = rows.iter().map(|row| row.unconverged).sum();
        debug!(
            integrals = n * n.saturating_sub(1) * 2,
            unconverged, "Influence coefficients computed."
        );

        Self {
            normal: DMatrix::from_fn(n, n, |i, j| rows[i].normal[j]),
            tangential: DMatrix::from_fn(n, n, |i, j| rows[i].tangential[j]),
        }
    }

    pub fn panel_count(&self) -> usize {
        self.normal.nrows()
    }

    pub fn normal(&self) -> &DMatrix<f64> {
        &self.normal
    }

    pub fn tangential(&self) -> &DMatrix<f64> {
        &self.tangential
    }

    /// Normal velocity at each control point per unit source strength: `½·I + Kn`.
    pub fn source_matrix(&self) -> DMatrix<f64> {
        let n = self.panel_count();
        &self.normal + DMatrix::from_diagonal_element(n, n, 0.5)
    }

    /// Normal velocity at each control point induced by a unit vortex strength on every panel.
    pub fn vortex_array(&self) -> DVector<f64> {
        row_sums(&self.tangential)
    }

    /// Tangential velocity at each control point induced by a unit vortex strength on every
    /// panel.
    pub fn vortex_tangential_array(&self) -> DVector<f64> {
        -row_sums(&self.normal)
    }

    /// The Kutta row: the sum of the tangential-velocity rows of the first and last panel.
    ///
    /// Entries `0..N` multiply the source strengths, entry `N` the circulation. Setting the row
    /// against `−u∞·(sin(α−β₀) + sin(α−βₙ₋₁))` makes the two trailing-edge panels carry
    /// tangential velocities of equal magnitude.
    pub fn kutta_array(&self) -> DVector<f64> {
        let n = self.panel_count();
        let mut kutta = DVector::zeros(n + 1);
        if n == 0 {
            return kutta;
        }
        let last = n - 1;
        for j in 0..n {
            kutta[j] = self.tangential[(0, j)] + self.tangential[(last, j)];
        }
        kutta[n] = -(self.normal.row(0).sum() + self.normal.row(last).sum());
        kutta
    }

    /// The full `(N+1)×(N+1)` system matrix.
    pub fn system_matrix(&self) -> DMatrix<f64> {
        let n = self.panel_count();
        let mut a = DMatrix::zeros(n + 1, n + 1);
        a.view_mut((0, 0), (n, n)).copy_from(&self.source_matrix());
        a.view_mut((0, n), (n, 1)).copy_from(&self.vortex_array());
        a.view_mut((n, 0), (1, n + 1))
            .copy_from(&self.kutta_array().transpose());
        a
    }
}

struct InfluenceRow {
    normal: Vec<f64>,
    tangential: Vec<f64>,
    unconverged: usize,
}

fn influence_row(panels: &[Panel], i: usize, config: &QuadratureConfig) -> InfluenceRow {
    let target = &panels[i];
    let (sin_beta, cos_beta) = target.beta.sin_cos();
    let (x, y) = (target.center.x, target.center.y);

    let mut row = InfluenceRow {
        normal: vec![0.0; panels.len()],
        tangential: vec![0.0; panels.len()],
        unconverged: 0,
    };
    for (j, source) in panels.iter().enumerate() {
        if j == i {
            continue;
        }
        let normal = influence_integral_with(x, y, source, cos_beta, sin_beta, config);
        let tangential = influence_integral_with(x, y, source, -sin_beta, cos_beta, config);
        row.normal[j] = normal.value / (2.0 * PI);
        row.tangential[j] = tangential.value / (2.0 * PI);
        row.unconverged += usize::from(!normal.converged) + usize::from(!tangential.converged);
    }
    row
}

fn row_sums(matrix: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(matrix.nrows(), matrix.row_iter().map(|row| row.sum()))
}

/// Right-hand side of the system for one freestream case.
pub fn build_rhs(panels: &[Panel], freestream: &Freestream) -> DVector<f64> {
    let n = panels.len();
    let mut b = DVector::zeros(n + 1);
    for (i, panel) in panels.iter().enumerate() {
        b[i] = -freestream.normal_component(panel.beta);
    }
    if let (Some(first), Some(last)) = (panels.first(), panels.last()) {
        b[n] = -(freestream.tangential_component(first.beta)
            + freestream.tangential_component(last.beta));
    }
    b
}

/// Source influence matrix, `½` on the diagonal. Integrates with default quadrature settings.
pub fn source_matrix(panels: &[Panel]) -> DMatrix<f64> {
    InfluenceCoefficients::compute(panels, &QuadratureConfig::default()).source_matrix()
}

/// Vortex influence column of the system. Integrates with default quadrature settings.
pub fn vortex_array(panels: &[Panel]) -> DVector<f64> {
    InfluenceCoefficients::compute(panels, &QuadratureConfig::default()).vortex_array()
}

/// Kutta-condition row of the system. Integrates with default quadrature settings.
pub fn kutta_array(panels: &[Panel]) -> DVector<f64> {
    InfluenceCoefficients::compute(panels, &QuadratureConfig::default()).kutta_array()
}

/// Full system matrix. Integrates with default quadrature settings.
pub fn build_matrix(panels: &[Panel]) -> DMatrix<f64> {
    InfluenceCoefficients::compute(panels, &QuadratureConfig::default()).system_matrix()
}
