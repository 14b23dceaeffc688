use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "PanelFlow Developers",
    version,
    about = "PanelFlow CLI - Inviscid 2D airfoil analysis with the source-vortex panel method.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze an airfoil at a single angle of attack and report surface pressures.
    Analyze(AnalyzeArgs),
    /// Analyze an airfoil over a range of angles of attack.
    Sweep(SweepArgs),
}

/// Where the airfoil contour comes from. Exactly one source must be given.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct GeometrySource {
    /// Path to an airfoil coordinate file (x y per line, whitespace or comma separated).
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Generate a NACA 4-digit section instead of reading a file (e.g., '2412').
    #[arg(long, value_name = "DIGITS")]
    pub naca: Option<String>,
}

/// Options shared by every analysis command.
#[derive(Args, Debug, Clone)]
pub struct CaseArgs {
    #[command(flatten)]
    pub geometry: GeometrySource,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path for the CSV output. Results are only printed when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Override the number of panels.
    #[arg(short = 'n', long, value_name = "INT")]
    pub panels: Option<usize>,

    /// Override the freestream speed.
    #[arg(long, value_name = "FLOAT")]
    pub u_inf: Option<f64>,

    /// Override the maximum number of Gauss-Seidel sweeps.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    /// Override the Gauss-Seidel convergence tolerance.
    #[arg(long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Fail instead of warning when the linear solve does not converge.
    #[arg(long)]
    pub require_convergence: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S solver.tolerance=1e-12
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub case: CaseArgs,

    /// Angle of attack in degrees.
    #[arg(short, long, value_name = "DEG", allow_hyphen_values = true)]
    pub alpha: f64,
}

/// Arguments for the `sweep` subcommand.
#[derive(Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub case: CaseArgs,

    /// Angles of attack in degrees: a 'start:stop:step' range or a comma-separated list.
    #[arg(short, long, value_name = "ANGLES", allow_hyphen_values = true)]
    pub alphas: String,
}
