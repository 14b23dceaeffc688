use super::{create_output, load_airfoil};
use crate::cli::AnalyzeArgs;
use crate::config::PartialAnalysisConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CaseProgress;
use panelflow::{core::io::export, engine::progress::ProgressReporter, workflows};
use tracing::{info, warn};

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let partial_config = PartialAnalysisConfig::load(args.case.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.case)?;

    let airfoil = load_airfoil(&args.case.geometry, config.panel_count)?;

    let progress = CaseProgress::new();
    let reporter = ProgressReporter::with_callback(progress.callback());

    println!(
        "Analyzing {} at α = {:+.2}° with {} panels...",
        airfoil.name,
        args.alpha,
        airfoil.panels.len()
    );
    let result = workflows::analyze::run(&airfoil.panels, args.alpha, &config, &reporter)?;

    let status = &result.state.status;
    if !status.converged {
        warn!(
            "Solution did not converge after {} iterations (last change {:.3e}).",
            status.iterations, status.final_delta
        );
        println!(
            "Warning: the linear solve did not converge after {} iterations.",
            status.iterations
        );
    }

    println!("  Cl (circulation)      {:>10.5}", result.cl);
    println!("  Cl (pressure)         {:>10.5}", result.cl_pressure);
    println!(
        "  Cm @ {:.2}c (pressure) {:>10.5}",
        config.moment_reference, result.cm_pressure
    );
    println!("  Center of pressure    {:>10.3}", result.center_of_pressure);
    println!("  Circulation γ         {:>10.5}", result.state.gamma);
    println!("  Gauss-Seidel sweeps   {:>10}", status.iterations);

    if let Some(path) = &args.case.output {
        let records = result.state.surface_records(&airfoil.panels);
        export::write_surface_csv(create_output(path)?, &records).map_err(|e| {
            CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            }
        })?;
        println!("✓ Surface distribution written to: {}", path.display());
    }

    Ok(())
}
