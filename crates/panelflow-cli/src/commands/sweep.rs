use super::{create_output, load_airfoil};
use crate::cli::SweepArgs;
use crate::config::PartialAnalysisConfig;
use crate::error::{CliError, Result};
use crate::utils::parser::parse_alphas;
use crate::utils::progress::CaseProgress;
use panelflow::{core::io::export, engine::progress::ProgressReporter, workflows};
use tracing::{info, warn};

pub fn run(args: SweepArgs) -> Result<()> {
    let alphas = parse_alphas(&args.alphas).map_err(|e| CliError::Argument(e.to_string()))?;

    let partial_config = PartialAnalysisConfig::load(args.case.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.case)?;

    let airfoil = load_airfoil(&args.case.geometry, config.panel_count)?;

    let progress = CaseProgress::new();
    let reporter = ProgressReporter::with_callback(progress.callback());

    println!(
        "Sweeping {} over {} angle(s) of attack with {} panels...",
        airfoil.name,
        alphas.len(),
        airfoil.panels.len()
    );
    let result = workflows::sweep::run(&airfoil.panels, &alphas, &config, &reporter)?;

    println!(
        "  {:>8} {:>10} {:>10} {:>10} {:>6}",
        "α (deg)", "Cl", "Cl_p", "Cm_p", "iter"
    );
    for case in &result.cases {
        let marker = if case.state.status.converged { "" } else { " *" };
        println!(
            "  {:>8.2} {:>10.5} {:>10.5} {:>10.5} {:>6}{}",
            case.alpha_deg,
            case.cl,
            case.cl_pressure,
            case.cm_pressure,
            case.state.status.iterations,
            marker
        );
    }
    if !result.all_converged() {
        warn!("Some cases did not converge; they are marked with '*'.");
        println!("  * linear solve did not converge");
    }

    if let Some(slope) = result.lift_slope_per_radian {
        println!("  Lift slope            {:>10.4} /rad", slope);
    }
    if let Some(alpha_zero) = result.zero_lift_alpha {
        println!("  Zero-lift angle       {:>10.3} deg", alpha_zero);
    }
    if let Some(x_ac) = result.pressure_aerodynamic_center {
        println!("  Aerodynamic center    {:>10.4} c", x_ac);
    }

    if let Some(path) = &args.case.output {
        export::write_sweep_csv(create_output(path)?, &result.records()).map_err(|e| {
            CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            }
        })?;
        println!("✓ Sweep table written to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;

    fn parse(args: &[&str]) -> SweepArgs {
        match Cli::parse_from(args).command {
            Commands::Sweep(args) => args,
            _ => panic!("Expected 'sweep' subcommand"),
        }
    }

    #[test]
    fn writes_one_row_per_angle() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("sweep.csv");
        let args = parse(&[
            "pflow",
            "sweep",
            "--naca",
            "0012",
            "--alphas",
            "-2:2:2",
            "-n",
            "60",
            "-o",
            output.to_str().unwrap(),
        ]);

        run(args).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("alpha_deg,cl,cl_pressure,cm,cm_pressure"));
        assert!(lines[1].starts_with("-2"));
    }

    #[test]
    fn malformed_angle_list_is_an_argument_error() {
        let args = parse(&["pflow", "sweep", "--naca", "0012", "--alphas", "0:4"]);
        assert!(matches!(run(args), Err(CliError::Argument(_))));
    }
}
