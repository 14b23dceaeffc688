use super::analyze::{CaseResult, analyze_case, check_panels};
use crate::core::io::export::CaseRecord;
use crate::core::models::freestream::Freestream;
use crate::core::models::panel::Panel;
use crate::engine::assembly::InfluenceCoefficients;
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::postprocess::{
    aerodynamic_center_from_lift, broadcast_aerodynamic_center, linear_fit,
};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Results of an angle-of-attack sweep, in the order the angles were given.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub cases: Vec<CaseResult>,
    /// `dCl/dα` from a least-squares fit over all cases.
    pub lift_slope_per_degree: Option<f64>,
    pub lift_slope_per_radian: Option<f64>,
    /// Angle of attack, in degrees, where the fitted lift line crosses zero.
    pub zero_lift_alpha: Option<f64>,
    /// `0.25 − d(cm/100)/d(α)` from the broadcast moment coefficients, α in degrees.
    pub aerodynamic_center: Option<f64>,
    /// `x_ref − d(cm_pressure)/d(cl_pressure)` from the integrated surface pressures.
    pub pressure_aerodynamic_center: Option<f64>,
}

impl SweepResult {
    pub fn records(&self) -> Vec<CaseRecord> {
        self.cases.iter().map(CaseResult::record).collect()
    }

    pub fn all_converged(&self) -> bool {
        self.cases.iter().all(|c| c.state.status.converged)
    }
}

/// Analyzes every angle in `alphas_deg` on one panel set.
///
/// Influence coefficients are computed once and shared by all cases. With the `parallel`
/// feature the cases run concurrently; each case's Gauss-Seidel solve stays sequential.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] for an empty angle list, and otherwise the first error
/// of any case.
#[instrument(skip_all, name = "sweep_workflow", fields(cases = alphas_deg.len()))]
pub fn run(
    panels: &[Panel],
    alphas_deg: &[f64],
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<SweepResult, EngineError> {
    if alphas_deg.is_empty() {
        return Err(EngineError::InvalidInput(
            "sweep requires at least one angle of attack".to_string(),
        ));
    }
    config.validate()?;
    check_panels(panels)?;
    let freestreams = alphas_deg
        .iter()
        .map(|&alpha| Freestream::new(config.u_inf, alpha))
        .collect::<Result<Vec<_>, _>>()?;

    reporter.report(Progress::PhaseStart {
        name: "Influence Coefficients",
    });
    info!(panels = panels.len(), "Computing influence coefficients.");
    let coefficients = InfluenceCoefficients::compute(panels, &config.quadrature);
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Cases" });
    reporter.report(Progress::TaskStart {
        total_steps: freestreams.len() as u64,
    });

    let iterator = freestreams.iter();

    #[cfg(feature = "parallel")]
    let iterator = freestreams.par_iter();

    let cases = iterator
        .map(|freestream| {
            let result = analyze_case(panels, freestream, &coefficients, config);
            if let Ok(case) = &result {
                reporter.report(Progress::CaseFinished {
                    alpha_deg: case.alpha_deg,
                    cl: case.cl,
                    converged: case.state.status.converged,
                });
            }
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect::<Result<Vec<_>, _>>()?;

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let result = summarize(cases, config.moment_reference);
    if !result.all_converged() {
        warn!("At least one case did not converge; see the per-case status.");
    }
    info!(
        lift_slope_per_radian = result.lift_slope_per_radian,
        aerodynamic_center = result.pressure_aerodynamic_center,
        "Sweep complete."
    );
    Ok(result)
}

fn summarize(cases: Vec<CaseResult>, moment_reference: f64) -> SweepResult {
    let alphas: Vec<f64> = cases.iter().map(|c| c.alpha_deg).collect();
    let cls: Vec<f64> = cases.iter().map(|c| c.cl).collect();
    let cms: Vec<f64> = cases.iter().map(|c| c.cm).collect();
    let cls_pressure: Vec<f64> = cases.iter().map(|c| c.cl_pressure).collect();
    let cms_pressure: Vec<f64> = cases.iter().map(|c| c.cm_pressure).collect();

    let lift_line = linear_fit(&alphas, &cls);
    let lift_slope_per_degree = lift_line.map(|(slope, _)| slope);
    let zero_lift_alpha = lift_line
        .filter(|(slope, _)| *slope != 0.0)
        .map(|(slope, intercept)| -intercept / slope);

    SweepResult {
        lift_slope_per_degree,
        lift_slope_per_radian: lift_slope_per_degree.map(|slope| slope.to_degrees()),
        zero_lift_alpha,
        aerodynamic_center: broadcast_aerodynamic_center(&alphas, &cms),
        pressure_aerodynamic_center: aerodynamic_center_from_lift(
            &cls_pressure,
            &cms_pressure,
            moment_reference,
        ),
        cases,
    }
}
