use crate::core::geometry::{GeometryError, MIN_PANEL_COUNT};
use crate::core::io::export::CaseRecord;
use crate::core::kernel::QuadratureConfig;
use crate::core::models::freestream::Freestream;
use crate::core::models::panel::Panel;
use crate::engine::assembly::{InfluenceCoefficients, build_rhs};
use crate::engine::config::{AnalysisConfig, SolverConfig};
use crate::engine::error::EngineError;
use crate::engine::postprocess;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::solver::gauss_seidel;
use crate::engine::state::{SolutionState, SolveStatus};
use tracing::{info, instrument, warn};

/// Aerodynamic result of one angle-of-attack case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    pub alpha_deg: f64,
    /// Kutta-Joukowski lift coefficient from the circulation.
    pub cl: f64,
    /// Lift coefficient from integrated flow-side surface pressures.
    pub cl_pressure: f64,
    /// Broadcast moment coefficient about the configured reference.
    pub cm: f64,
    /// Pressure moment coefficient about the configured reference, positive nose-up.
    pub cm_pressure: f64,
    pub center_of_pressure: f64,
    pub state: SolutionState,
}

impl CaseResult {
    pub fn record(&self) -> CaseRecord {
        CaseRecord {
            alpha_deg: self.alpha_deg,
            cl: self.cl,
            cl_pressure: self.cl_pressure,
            cm: self.cm,
            cm_pressure: self.cm_pressure,
            center_of_pressure: self.center_of_pressure,
            gamma: self.state.gamma,
            iterations: self.state.status.iterations,
            converged: self.state.status.converged,
        }
    }
}

/// Solves for the source strengths and circulation of one freestream case.
///
/// The returned state has tangential velocity and pressure coefficient zeroed; pass it to
/// [`post_process`] to fill them in.
pub fn solve(
    panels: &[Panel],
    freestream: &Freestream,
    config: &AnalysisConfig,
) -> Result<SolutionState, EngineError> {
    config.validate()?;
    check_panels(panels)?;
    let coefficients = InfluenceCoefficients::compute(panels, &config.quadrature);
    solve_with(panels, freestream, &coefficients, &config.solver)
}

/// [`solve`] with precomputed influence coefficients.
///
/// An unconverged Gauss-Seidel run is logged and reported in the returned status, or turned
/// into [`EngineError::Convergence`] when `solver.require_convergence` is set.
pub fn solve_with(
    panels: &[Panel],
    freestream: &Freestream,
    coefficients: &InfluenceCoefficients,
    solver: &SolverConfig,
) -> Result<SolutionState, EngineError> {
    check_coefficients(panels, coefficients)?;

    let a = coefficients.system_matrix();
    let b = build_rhs(panels, freestream);
    let solution = gauss_seidel(&a, &b, None, solver)?;

    if !solution.converged {
        if solver.require_convergence {
            return Err(EngineError::Convergence {
                iterations: solution.iterations,
            });
        }
        warn!(
            alpha_deg = freestream.alpha_degrees(),
            iterations = solution.iterations,
            final_delta = solution.final_delta,
            "Gauss-Seidel did not converge; continuing with the last iterate."
        );
    }

    let status = SolveStatus {
        iterations: solution.iterations,
        converged: solution.converged,
        final_delta: solution.final_delta,
    };
    Ok(SolutionState::from_unknowns(&solution.x, status))
}

/// Fills in tangential velocity and pressure coefficient of a solved state.
///
/// Recomputes the influence coefficients with default quadrature settings; callers holding
/// coefficients already should use [`postprocess::post_process`] directly.
pub fn post_process(
    panels: &[Panel],
    freestream: &Freestream,
    state: SolutionState,
) -> Result<SolutionState, EngineError> {
    check_panels(panels)?;
    if state.panel_count() != panels.len() {
        return Err(EngineError::InvalidInput(format!(
            "solution has {} panels, geometry has {}",
            state.panel_count(),
            panels.len()
        )));
    }
    let coefficients = InfluenceCoefficients::compute(panels, &QuadratureConfig::default());
    Ok(postprocess::post_process(
        panels,
        freestream,
        state,
        &coefficients,
    ))
}

/// Analyzes one angle of attack from scratch.
#[instrument(skip_all, name = "analysis_workflow", fields(alpha_deg = alpha_deg))]
pub fn run(
    panels: &[Panel],
    alpha_deg: f64,
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<CaseResult, EngineError> {
    config.validate()?;
    check_panels(panels)?;
    let freestream = Freestream::new(config.u_inf, alpha_deg)?;

    reporter.report(Progress::PhaseStart {
        name: "Influence Coefficients",
    });
    let coefficients = InfluenceCoefficients::compute(panels, &config.quadrature);
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Solve" });
    let result = analyze_case(panels, &freestream, &coefficients, config)?;
    reporter.report(Progress::PhaseFinish);
    reporter.report(Progress::CaseFinished {
        alpha_deg,
        cl: result.cl,
        converged: result.state.status.converged,
    });

    info!(
        cl = result.cl,
        cm = result.cm_pressure,
        iterations = result.state.status.iterations,
        "Analysis complete."
    );
    Ok(result)
}

/// Solves, post-processes and reduces one case on shared coefficients.
pub(crate) fn analyze_case(
    panels: &[Panel],
    freestream: &Freestream,
    coefficients: &InfluenceCoefficients,
    config: &AnalysisConfig,
) -> Result<CaseResult, EngineError> {
    let state = solve_with(panels, freestream, coefficients, &config.solver)?;
    let state = postprocess::post_process(panels, freestream, state, coefficients);

    let x_mid = postprocess::control_point_x(panels);
    let cl = postprocess::lift_coefficient(panels, state.gamma, freestream);
    let cm = postprocess::moment_coefficient(cl, &x_mid, config.moment_reference);
    let center_of_pressure = postprocess::center_of_pressure(cl, &x_mid);

    let flow_side = postprocess::flow_side_velocity(&state.tangential_velocity, state.gamma);
    let surface_cp = postprocess::pressure_coefficient(&flow_side, freestream);
    let cl_pressure = postprocess::pressure_lift_coefficient(panels, &surface_cp, freestream);
    let cm_pressure =
        postprocess::pressure_moment_coefficient(panels, &surface_cp, config.moment_reference);

    Ok(CaseResult {
        alpha_deg: freestream.alpha_degrees(),
        cl,
        cl_pressure,
        cm,
        cm_pressure,
        center_of_pressure,
        state,
    })
}

pub(crate) fn check_panels(panels: &[Panel]) -> Result<(), EngineError> {
    if panels.len() < MIN_PANEL_COUNT {
        return Err(GeometryError::TooFewPanels {
            requested: panels.len(),
            minimum: MIN_PANEL_COUNT,
        }
        .into());
    }
    Ok(())
}

fn check_coefficients(
    panels: &[Panel],
    coefficients: &InfluenceCoefficients,
) -> Result<(), EngineError> {
    check_panels(panels)?;
    if coefficients.panel_count() != panels.len() {
        return Err(EngineError::InvalidInput(format!(
            "influence coefficients cover {} panels, geometry has {}",
            coefficients.panel_count(),
            panels.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::discretize;
    use crate::core::geometry::naca::Naca4;
    use crate::engine::config::AnalysisConfigBuilder;
    use std::f64::consts::PI;

    fn circle_panels(n: usize) -> Vec<Panel> {
        let (x, y): (Vec<f64>, Vec<f64>) = (0..200)
            .map(|k| {
                let t = 2.0 * PI * k as f64 / 200.0;
                (t.cos(), t.sin())
            })
            .unzip();
        discretize(&x, &y, n).unwrap()
    }

    fn naca_panels(designation: &str, n: usize) -> Vec<Panel> {
        let (x, y) = Naca4::parse(designation).unwrap().coordinates(100);
        discretize(&x, &y, n).unwrap()
    }

    #[test]
    fn four_panel_circle_has_symmetric_sources_and_no_circulation() {
        let panels = circle_panels(4);
        let freestream = Freestream::new(1.0, 0.0).unwrap();
        let config = AnalysisConfigBuilder::new()
            .u_inf(1.0)
            .max_iterations(10_000)
            .build()
            .unwrap();

        let state = solve(&panels, &freestream, &config).unwrap();
        let s = &state.sigma;

        assert!(state.status.converged);
        assert!((s[0] - s[3]).abs() < 1e-6, "mirror across x-axis: {:?}", s);
        assert!((s[1] - s[2]).abs() < 1e-6, "mirror across x-axis: {:?}", s);
        assert!((s[0] + s[1]).abs() < 1e-6, "fore/aft antisymmetry: {:?}", s);
        assert!(state.gamma.abs() < 1e-8);
    }

    #[test]
    fn solve_returns_zeroed_surface_fields_until_post_processed() {
        let panels = naca_panels("0012", 40);
        let freestream = Freestream::new(1.0, 2.0).unwrap();
        let state = solve(&panels, &freestream, &AnalysisConfig::default()).unwrap();
        assert!(state.tangential_velocity.iter().all(|&v| v == 0.0));

        let processed = post_process(&panels, &freestream, state).unwrap();
        assert!(processed.tangential_velocity.iter().any(|&v| v != 0.0));
        assert_eq!(processed.pressure_coefficient.len(), 40);
    }

    #[test]
    fn source_strengths_sum_to_zero_on_a_closed_body() {
        let panels = naca_panels("0012", 100);
        let config = AnalysisConfig::default();
        for alpha in [0.0, 5.0] {
            let freestream = Freestream::new(1.0, alpha).unwrap();
            let state = solve(&panels, &freestream, &config).unwrap();
            let total = state.total_source_strength(&panels);
            assert!(total.abs() < 1e-2, "alpha {}: {}", alpha, total);
        }
    }

    #[test]
    fn gauss_seidel_converges_on_non_dominant_panel_system() {
        let panels = naca_panels("0012", 100);
        let freestream = Freestream::new(1.0, 4.0).unwrap();
        let coefficients =
            InfluenceCoefficients::compute(&panels, &QuadratureConfig::default());
        let a = coefficients.system_matrix();
        let b = build_rhs(&panels, &freestream);

        let non_dominant_rows = (0..a.nrows())
            .filter(|&i| {
                let off_diagonal: f64 = (0..a.ncols())
                    .filter(|&j| j != i)
                    .map(|j| a[(i, j)].abs())
                    .sum();
                a[(i, i)].abs() < off_diagonal
            })
            .count();
        assert!(non_dominant_rows > a.nrows() / 2, "{} rows", non_dominant_rows);

        let solution = gauss_seidel(&a, &b, None, &SolverConfig::default()).unwrap();
        assert!(solution.converged, "{} sweeps", solution.iterations);
        let last = solution.residual_history.last().copied().unwrap();
        assert!(last < 1e-6, "final residual {}", last);
    }

    #[test]
    fn symmetric_section_at_zero_incidence_has_no_lift() {
        let panels = naca_panels("0012", 100);
        let result =
            run(&panels, 0.0, &AnalysisConfig::default(), &ProgressReporter::new()).unwrap();
        assert!(result.cl.abs() < 1e-6, "cl = {}", result.cl);
        assert!(result.cl_pressure.abs() < 1e-6);
        assert!(result.cm_pressure.abs() < 1e-6);
    }

    #[test]
    fn pressure_lift_agrees_with_circulation_lift() {
        let panels = naca_panels("2412", 100);
        let result =
            run(&panels, 4.0, &AnalysisConfig::default(), &ProgressReporter::new()).unwrap();
        assert!(result.cl > 0.5);
        assert!(
            (result.cl_pressure - result.cl).abs() < 0.03 * result.cl,
            "cl {} vs cl_pressure {}",
            result.cl,
            result.cl_pressure
        );
        assert!(result.cm_pressure < 0.0, "cambered section pitches nose down");
    }

    #[test]
    fn center_of_pressure_of_broadcast_moment_is_mean_control_point() {
        let panels = naca_panels("0012", 100);
        let result =
            run(&panels, 4.0, &AnalysisConfig::default(), &ProgressReporter::new()).unwrap();
        let mean = postprocess::control_point_x(&panels).iter().sum::<f64>() / 100.0;
        assert!((result.center_of_pressure - mean).abs() <= 0.0005 + 1e-12);
    }

    #[test]
    fn strict_mode_turns_iteration_cap_into_error() {
        let panels = naca_panels("0012", 40);
        let config = AnalysisConfigBuilder::new()
            .u_inf(1.0)
            .max_iterations(3)
            .require_convergence(true)
            .build()
            .unwrap();
        let result = run(&panels, 2.0, &config, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(EngineError::Convergence { iterations: 3 })
        ));
    }

    #[test]
    fn lenient_mode_reports_non_convergence_in_status() {
        let panels = naca_panels("0012", 40);
        let config = AnalysisConfigBuilder::new()
            .u_inf(1.0)
            .max_iterations(3)
            .build()
            .unwrap();
        let result = run(&panels, 2.0, &config, &ProgressReporter::new()).unwrap();
        assert!(!result.state.status.converged);
        assert_eq!(result.state.status.iterations, 3);
        assert!(!result.record().converged);
    }

    #[test]
    fn too_few_panels_are_rejected_before_assembly() {
        let panels = circle_panels(4)[..2].to_vec();
        let freestream = Freestream::new(1.0, 0.0).unwrap();
        let result = solve(&panels, &freestream, &AnalysisConfig::default());
        assert!(matches!(
            result,
            Err(EngineError::Geometry {
                source: GeometryError::TooFewPanels { requested: 2, .. }
            })
        ));
    }

    #[test]
    fn mismatched_coefficients_are_rejected() {
        let freestream = Freestream::new(1.0, 0.0).unwrap();
        let coefficients =
            InfluenceCoefficients::compute(&circle_panels(6), &QuadratureConfig::default());
        let result = solve_with(
            &circle_panels(8),
            &freestream,
            &coefficients,
            &SolverConfig::default(),
        );
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn invalid_speed_is_a_domain_error() {
        let panels = circle_panels(8);
        let config = AnalysisConfig {
            u_inf: -1.0,
            ..AnalysisConfig::default()
        };
        // Config validation catches it first.
        assert!(matches!(
            run(&panels, 0.0, &config, &ProgressReporter::new()),
            Err(EngineError::Config { .. })
        ));
        assert!(Freestream::new(-1.0, 0.0).is_err());
    }
}
