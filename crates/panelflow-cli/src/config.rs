mod defaults;

pub use defaults::DefaultsConfig;

use crate::cli::CaseArgs;
use crate::error::{CliError, Result};
use panelflow::core::kernel::QuadratureConfig;
use panelflow::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialGeometryConfig {
    panel_count: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialFreestreamConfig {
    u_inf: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSolverConfig {
    max_iterations: Option<usize>,
    tolerance: Option<f64>,
    require_convergence: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialQuadratureConfig {
    abs_tolerance: Option<f64>,
    rel_tolerance: Option<f64>,
    max_subintervals: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialPostProcessingConfig {
    moment_reference: Option<f64>,
}

/// Analysis settings as read from a TOML file; every field may be omitted.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialAnalysisConfig {
    geometry: Option<PartialGeometryConfig>,
    freestream: Option<PartialFreestreamConfig>,
    solver: Option<PartialSolverConfig>,
    quadrature: Option<PartialQuadratureConfig>,
    post_processing: Option<PartialPostProcessingConfig>,
}

impl PartialAnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final configuration. Precedence: `-S` overrides, then dedicated CLI flags,
    /// then the file, then [`DefaultsConfig`].
    pub fn merge_with_cli(mut self, args: &CaseArgs) -> Result<core_config::AnalysisConfig> {
        let defaults = DefaultsConfig::default();
        self.apply_cli_flags(args);
        self.apply_set_values(&args.set_values)?;

        let geometry = self.geometry.take().unwrap_or_default();
        let freestream = self.freestream.take().unwrap_or_default();
        let solver = self.solver.take().unwrap_or_default();
        let quadrature = self.quadrature.take().unwrap_or_default();
        let post = self.post_processing.take().unwrap_or_default();

        core_config::AnalysisConfigBuilder::new()
            .panel_count(geometry.panel_count.unwrap_or(defaults.panel_count))
            .u_inf(freestream.u_inf.unwrap_or(defaults.u_inf))
            .moment_reference(post.moment_reference.unwrap_or(defaults.moment_reference))
            .max_iterations(solver.max_iterations.unwrap_or(defaults.max_iterations))
            .tolerance(solver.tolerance.unwrap_or(defaults.tolerance))
            .require_convergence(
                solver
                    .require_convergence
                    .unwrap_or(defaults.require_convergence),
            )
            .quadrature(QuadratureConfig {
                abs_tolerance: quadrature.abs_tolerance.unwrap_or(defaults.abs_tolerance),
                rel_tolerance: quadrature.rel_tolerance.unwrap_or(defaults.rel_tolerance),
                max_subintervals: quadrature
                    .max_subintervals
                    .unwrap_or(defaults.max_subintervals),
            })
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_cli_flags(&mut self, args: &CaseArgs) {
        if let Some(panels) = args.panels {
            self.geometry.get_or_insert_with(Default::default).panel_count = Some(panels);
        }
        if let Some(u_inf) = args.u_inf {
            self.freestream.get_or_insert_with(Default::default).u_inf = Some(u_inf);
        }
        let solver = &mut self.solver;
        if let Some(max_iterations) = args.max_iterations {
            solver.get_or_insert_with(Default::default).max_iterations = Some(max_iterations);
        }
        if let Some(tolerance) = args.tolerance {
            solver.get_or_insert_with(Default::default).tolerance = Some(tolerance);
        }
        if args.require_convergence {
            solver.get_or_insert_with(Default::default).require_convergence = Some(true);
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let (key, value_str) = (key.trim(), value_str.trim());

            match key {
                "geometry.panel-count" => {
                    self.geometry.get_or_insert_with(Default::default).panel_count =
                        Some(parse_value(key, value_str)?);
                }
                "freestream.u-inf" => {
                    self.freestream.get_or_insert_with(Default::default).u_inf =
                        Some(parse_value(key, value_str)?);
                }
                "solver.max-iterations" => {
                    self.solver.get_or_insert_with(Default::default).max_iterations =
                        Some(parse_value(key, value_str)?);
                }
                "solver.tolerance" => {
                    self.solver.get_or_insert_with(Default::default).tolerance =
                        Some(parse_value(key, value_str)?);
                }
                "solver.require-convergence" => {
                    self.solver
                        .get_or_insert_with(Default::default)
                        .require_convergence = Some(parse_value(key, value_str)?);
                }
                "quadrature.abs-tolerance" => {
                    self.quadrature
                        .get_or_insert_with(Default::default)
                        .abs_tolerance = Some(parse_value(key, value_str)?);
                }
                "quadrature.rel-tolerance" => {
                    self.quadrature
                        .get_or_insert_with(Default::default)
                        .rel_tolerance = Some(parse_value(key, value_str)?);
                }
                "quadrature.max-subintervals" => {
                    self.quadrature
                        .get_or_insert_with(Default::default)
                        .max_subintervals = Some(parse_value(key, value_str)?);
                }
                "post-processing.moment-reference" => {
                    self.post_processing
                        .get_or_insert_with(Default::default)
                        .moment_reference = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let file_path = dir.path().join("pflow.toml");
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn case_args(extra: &[&str]) -> CaseArgs {
        let mut args = vec!["pflow", "analyze", "--naca", "0012", "-a", "2"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Analyze(args) => args.case,
            _ => panic!("Expected 'analyze' subcommand"),
        }
    }

    #[test]
    fn missing_file_and_flags_fall_back_to_defaults() {
        let args = case_args(&[]);
        let config = PartialAnalysisConfig::load(None)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();
        assert_eq!(config, core_config::AnalysisConfig::default());
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [geometry]
            panel-count = 80

            [freestream]
            u-inf = 30.0

            [solver]
            tolerance = 1e-12
            require-convergence = true

            [quadrature]
            max-subintervals = 100

            [post-processing]
            moment-reference = 0.3
            "#,
        );
        let config = PartialAnalysisConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&case_args(&[]))
            .unwrap();

        assert_eq!(config.panel_count, 80);
        assert_eq!(config.u_inf, 30.0);
        assert_eq!(config.solver.tolerance, 1e-12);
        assert!(config.solver.require_convergence);
        assert_eq!(config.solver.max_iterations, 1000);
        assert_eq!(config.quadrature.max_subintervals, 100);
        assert_eq!(config.moment_reference, 0.3);
    }

    #[test]
    fn cli_flags_override_file_and_set_values_override_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [geometry]
            panel-count = 80 # overridden by --panels

            [solver]
            max-iterations = 200 # overridden by -S
            "#,
        );
        let args = case_args(&[
            "--panels",
            "120",
            "--max-iterations",
            "300",
            "-S",
            "solver.max-iterations=400",
            "-S",
            "quadrature.abs-tolerance=1e-10",
        ]);
        let config = PartialAnalysisConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.panel_count, 120);
        assert_eq!(config.solver.max_iterations, 400);
        assert_eq!(config.quadrature.abs_tolerance, 1e-10);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(&dir, "[solver]\nrelaxation = 1.2\n");
        assert!(matches!(
            PartialAnalysisConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));

        let result =
            PartialAnalysisConfig::default().merge_with_cli(&case_args(&["-S", "solver.omega=1"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("solver.omega")));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        let result =
            PartialAnalysisConfig::default().merge_with_cli(&case_args(&["-S", "solver.tolerance"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("KEY=VALUE")));

        let result = PartialAnalysisConfig::default()
            .merge_with_cli(&case_args(&["-S", "geometry.panel-count=many"]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn invalid_values_fail_core_validation() {
        let result = PartialAnalysisConfig::default().merge_with_cli(&case_args(&["--u-inf=-1"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("u_inf")));

        let result = PartialAnalysisConfig::default().merge_with_cli(&case_args(&["-n", "2"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("panel_count")));
    }
}
