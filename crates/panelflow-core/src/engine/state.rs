use crate::core::io::export::SurfaceRecord;
use crate::core::models::panel::Panel;
use nalgebra::DVector;

/// How the linear solve for a case ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveStatus {
    pub iterations: usize,
    pub converged: bool,
    pub final_delta: f64,
}

/// Solved quantities of a single panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSolution {
    pub sigma: f64,
    pub tangential_velocity: f64,
    pub pressure_coefficient: f64,
}

/// Solution of one freestream case, indexed like the panel slice it was solved on.
///
/// Produced by the solve step with `tangential_velocity` and `pressure_coefficient` zeroed;
/// post-processing returns a copy with both filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionState {
    pub sigma: Vec<f64>,
    pub gamma: f64,
    pub tangential_velocity: Vec<f64>,
    pub pressure_coefficient: Vec<f64>,
    pub status: SolveStatus,
}

impl SolutionState {
    /// Splits the unknown vector `[σ₀ … σₙ₋₁, γ]` of the linear system.
    pub fn from_unknowns(unknowns: &DVector<f64>, status: SolveStatus) -> Self {
        let n = unknowns.len().saturating_sub(1);
        let sigma = unknowns.iter().take(n).copied().collect();
        let gamma = unknowns.get(n).copied().unwrap_or(0.0);
        Self {
            sigma,
            gamma,
            tangential_velocity: vec![0.0; n],
            pressure_coefficient: vec![0.0; n],
            status,
        }
    }

    /// The unknown vector `[σ₀ … σₙ₋₁, γ]`, e.g. as a warm start for a neighbouring case.
    pub fn unknowns(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.sigma.len() + 1,
            self.sigma.iter().copied().chain(std::iter::once(self.gamma)),
        )
    }

    pub fn panel_count(&self) -> usize {
        self.sigma.len()
    }

    pub fn panel(&self, index: usize) -> Option<PanelSolution> {
        Some(PanelSolution {
            sigma: *self.sigma.get(index)?,
            tangential_velocity: *self.tangential_velocity.get(index)?,
            pressure_coefficient: *self.pressure_coefficient.get(index)?,
        })
    }

    /// Net source output `Σ σᵢ·Lᵢ`; zero for a closed body.
    pub fn total_source_strength(&self, panels: &[Panel]) -> f64 {
        self.sigma
            .iter()
            .zip(panels)
            .map(|(sigma, panel)| sigma * panel.length)
            .sum()
    }

    /// One export row per panel, located at the control point.
    pub fn surface_records(&self, panels: &[Panel]) -> Vec<SurfaceRecord> {
        panels
            .iter()
            .enumerate()
            .filter_map(|(i, panel)| {
                let solution = self.panel(i)?;
                Some(SurfaceRecord {
                    panel: i,
                    x: panel.center.x,
                    y: panel.center.y,
                    side: panel.side.as_str(),
                    beta: panel.beta,
                    length: panel.length,
                    sigma: solution.sigma,
                    vt: solution.tangential_velocity,
                    cp: solution.pressure_coefficient,
                })
            })
            .collect()
    }
}
